//! Lock transaction metadata
//!
//! The bridge reads lock requests from metadata label `0`: a map of text
//! fields plus both addresses split into chunks of at most 64 bytes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use crate::cbor::CborEncoder;
use crate::error::CardanoTxError;

type Blake2b256 = Blake2b<U32>;

/// Metadata label carrying lock requests
pub const LOCK_METADATA_LABEL: u64 = 0;

/// Ledger limit for a single metadata text value, in bytes
pub const MAX_METADATA_TEXT_LEN: usize = 64;

/// Fields of a lock request as they appear in metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockMetadata {
    pub to_chain: String,
    pub to_address: String,
    /// Bech32 sender address
    pub from_address: String,
    pub network_fee: String,
    pub bridge_fee: String,
}

/// Split `s` into pieces of at most `size` bytes, never inside a UTF-8
/// sequence. A character wider than `size` becomes its own piece.
fn chunk_text(s: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let mut end = size.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

fn metadata_text(enc: &mut CborEncoder, value: &str) -> Result<(), CardanoTxError> {
    if value.len() > MAX_METADATA_TEXT_LEN {
        return Err(CardanoTxError::MetadataTextTooLong(value.to_string()));
    }
    enc.text(value);
    Ok(())
}

fn metadata_chunks(enc: &mut CborEncoder, value: &str) -> Result<(), CardanoTxError> {
    let chunks = chunk_text(value, MAX_METADATA_TEXT_LEN);
    enc.array(chunks.len());
    for chunk in chunks {
        metadata_text(enc, chunk)?;
    }
    Ok(())
}

/// Encoded auxiliary data attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryData {
    bytes: Vec<u8>,
}

impl AuxiliaryData {
    /// Auxiliary data for a lock request, in the plain metadata form
    pub fn for_lock(lock: &LockMetadata) -> Result<Self, CardanoTxError> {
        let fields = [
            ("to", lock.to_chain.as_str()),
            ("bridgeFee", lock.bridge_fee.as_str()),
            ("networkFee", lock.network_fee.as_str()),
        ];
        let addresses = [
            ("toAddress", lock.to_address.as_str()),
            ("fromAddress", lock.from_address.as_str()),
        ];

        let mut enc = CborEncoder::new();
        enc.map(1)
            .unsigned(LOCK_METADATA_LABEL)
            .map(fields.len() + addresses.len());
        for (key, value) in fields {
            metadata_text(&mut enc, key)?;
            metadata_text(&mut enc, value)?;
        }
        for (key, value) in addresses {
            metadata_text(&mut enc, key)?;
            metadata_chunks(&mut enc, value)?;
        }

        Ok(Self {
            bytes: enc.into_bytes(),
        })
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Blake2b-256 of the encoded data, committed to in the transaction body
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Blake2b256::new();
        hasher.update(&self.bytes);
        hasher.finalize().into()
    }
}
