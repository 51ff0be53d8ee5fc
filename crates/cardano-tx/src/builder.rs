//! Unsigned transaction builder with linear fee estimation
//!
//! Fees follow the ledger's linear rule `minFeeA * size + minFeeB`, where the
//! size is taken from a fully witnessed stand-in of the transaction: one fake
//! vkey witness per distinct payment credential among the inputs.
//!
//! A first estimate uses a wide placeholder fee. [`CardanoTxBuilder::settle_fee`]
//! then rebuilds with the real fee until it equals the minimum of the final body.

use std::collections::BTreeSet;

use tracing::debug;

use crate::address::{address_bytes, payment_credential};
use crate::cbor::CborEncoder;
use crate::error::CardanoTxError;
use crate::metadata::AuxiliaryData;
use crate::output::TxOutput;
use crate::types::{CardanoProtocolParams, CardanoUtxo};

/// Fee written into the body while estimating, wide enough to never
/// undercount the encoded fee field
const PLACEHOLDER_FEE: u64 = 0x1_0000_0000;

const BODY_INPUTS: u64 = 0;
const BODY_OUTPUTS: u64 = 1;
const BODY_FEE: u64 = 2;
const BODY_AUX_HASH: u64 = 7;

const WITNESS_VKEYS: u64 = 0;

/// Rebuilds allowed before the fee must have settled
const MAX_FEE_ROUNDS: usize = 8;

/// Reference to a spent output plus the address that must witness it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub tx_hash: [u8; 32],
    pub index: u32,
    pub address: Vec<u8>,
}

impl TxInput {
    pub fn from_utxo(utxo: &CardanoUtxo) -> Result<Self, CardanoTxError> {
        let invalid = || CardanoTxError::InvalidHex {
            field: "txId",
            value: utxo.tx_id.clone(),
        };
        let tx_hash: [u8; 32] = hex::decode(&utxo.tx_id)
            .map_err(|_| invalid())?
            .try_into()
            .map_err(|_| invalid())?;

        Ok(Self {
            tx_hash,
            index: utxo.index,
            address: address_bytes(&utxo.address)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CardanoTxBuilder {
    params: CardanoProtocolParams,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    fee: Option<u64>,
    auxiliary_data: Option<AuxiliaryData>,
}

impl CardanoTxBuilder {
    pub fn new(params: CardanoProtocolParams) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            outputs: Vec::new(),
            fee: None,
            auxiliary_data: None,
        }
    }

    pub fn add_input(&mut self, input: TxInput) -> &mut Self {
        self.inputs.push(input);
        self
    }

    pub fn add_output(&mut self, output: TxOutput) -> &mut Self {
        self.outputs.push(output);
        self
    }

    pub fn set_fee(&mut self, fee: u64) -> &mut Self {
        self.fee = Some(fee);
        self
    }

    pub fn set_auxiliary_data(&mut self, data: AuxiliaryData) -> &mut Self {
        self.auxiliary_data = Some(data);
        self
    }

    pub fn inputs(&self) -> &[TxInput] {
        &self.inputs
    }

    fn snapshot(&self, fee: u64) -> UnsignedCardanoTx {
        UnsignedCardanoTx {
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            fee,
            auxiliary_data: self.auxiliary_data.clone(),
        }
    }

    fn linear_fee(&self, size: usize) -> Result<u64, CardanoTxError> {
        self.params
            .min_fee_a
            .checked_mul(size as u64)
            .and_then(|f| f.checked_add(self.params.min_fee_b))
            .ok_or(CardanoTxError::FeeOverflow)
    }

    /// Minimum fee of the transaction as currently assembled.
    ///
    /// Sized with the fee already set, or with a placeholder wide enough to
    /// cover any fee when none is set yet.
    pub fn min_fee(&self) -> Result<u64, CardanoTxError> {
        let size = self
            .snapshot(self.fee.unwrap_or(PLACEHOLDER_FEE))
            .witnessed_size();
        self.linear_fee(size)
    }

    /// Find the fee that equals the minimum fee of the finished transaction.
    ///
    /// `complete` adds the outputs whose value depends on the fee (the change)
    /// to a copy of this builder. Starting from `estimate`, the copy is rebuilt
    /// with the last computed minimum until the two agree. If the encoded size
    /// keeps flipping between two fees, the larger one is kept, which still
    /// covers its own minimum.
    pub fn settle_fee<E, F>(&self, estimate: u64, mut complete: F) -> Result<Self, E>
    where
        E: From<CardanoTxError>,
        F: FnMut(&mut Self, u64) -> Result<(), E>,
    {
        let mut fee = estimate;
        let mut covering: Option<Self> = None;

        for _ in 0..MAX_FEE_ROUNDS {
            let mut candidate = self.clone();
            complete(&mut candidate, fee)?;
            candidate.set_fee(fee);

            let min_fee = candidate.min_fee()?;
            if min_fee == fee {
                return Ok(candidate);
            }
            if min_fee < fee {
                covering = Some(candidate);
            }
            fee = min_fee;
        }

        debug!(fee, "Cardano fee did not settle");
        covering.ok_or_else(|| CardanoTxError::FeeNotSettled.into())
    }

    /// Extra fee incurred by adding `output`
    pub fn fee_for_output(&self, output: &TxOutput) -> Result<u64, CardanoTxError> {
        let without = self.min_fee()?;

        let mut with = self.clone();
        with.add_output(output.clone());
        let with = with.min_fee()?;

        with.checked_sub(without).ok_or(CardanoTxError::FeeOverflow)
    }

    /// Finish the transaction, checking outputs against the value size limit
    /// and the whole transaction against the size limit
    pub fn build(&self) -> Result<UnsignedCardanoTx, CardanoTxError> {
        let fee = self.fee.ok_or(CardanoTxError::MissingFee)?;
        let tx = self.snapshot(fee);

        let max_value = self.params.max_value_size as usize;
        for output in &tx.outputs {
            let size = output.value_size();
            if size > max_value {
                return Err(CardanoTxError::ValueTooLarge {
                    size,
                    max: max_value,
                });
            }
        }

        let size = tx.witnessed_size();
        let max = self.params.max_tx_size as usize;
        if size > max {
            return Err(CardanoTxError::TransactionTooLarge { size, max });
        }

        debug!(
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            fee,
            size,
            "Built Cardano transaction"
        );
        Ok(tx)
    }
}

/// Complete transaction with an empty witness set, ready for a wallet to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedCardanoTx {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub fee: u64,
    pub auxiliary_data: Option<AuxiliaryData>,
}

impl UnsignedCardanoTx {
    fn encode_body(&self, enc: &mut CborEncoder) {
        let entries = if self.auxiliary_data.is_some() { 4 } else { 3 };
        enc.map(entries);

        enc.unsigned(BODY_INPUTS).array(self.inputs.len());
        for input in &self.inputs {
            enc.array(2)
                .bytes(&input.tx_hash)
                .unsigned(u64::from(input.index));
        }

        enc.unsigned(BODY_OUTPUTS).array(self.outputs.len());
        for output in &self.outputs {
            output.encode(enc);
        }

        enc.unsigned(BODY_FEE).unsigned(self.fee);

        if let Some(aux) = &self.auxiliary_data {
            enc.unsigned(BODY_AUX_HASH).bytes(&aux.hash());
        }
    }

    /// Distinct payment credentials that must sign the inputs
    fn signers(&self) -> BTreeSet<&[u8]> {
        self.inputs
            .iter()
            .filter_map(|i| payment_credential(&i.address))
            .collect()
    }

    fn encode(&self, enc: &mut CborEncoder, fake_witnesses: usize) {
        enc.array(4);
        self.encode_body(enc);

        if fake_witnesses == 0 {
            enc.map(0);
        } else {
            enc.map(1).unsigned(WITNESS_VKEYS).array(fake_witnesses);
            for _ in 0..fake_witnesses {
                enc.array(2).bytes(&[0u8; 32]).bytes(&[0u8; 64]);
            }
        }

        enc.bool(true);
        match &self.auxiliary_data {
            Some(aux) => enc.raw(aux.to_bytes()),
            None => enc.raw(&[0xf6]),
        };
    }

    /// Size of the transaction once every input is signed
    pub fn witnessed_size(&self) -> usize {
        let mut enc = CborEncoder::new();
        self.encode(&mut enc, self.signers().len());
        enc.len()
    }

    pub fn body_bytes(&self) -> Vec<u8> {
        let mut enc = CborEncoder::new();
        self.encode_body(&mut enc);
        enc.into_bytes()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut enc = CborEncoder::new();
        self.encode(&mut enc, 0);
        enc.into_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}
