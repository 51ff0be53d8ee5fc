//! Balance arithmetic over [`AssetBalance`]
//!
//! Both operations take their arguments by reference and return a fresh
//! balance, so callers never observe mutation of an input.

use num_bigint::BigUint;

use crate::errors::BalanceError;
use crate::types::{AssetBalance, TokenInfo};

/// Add two balances.
///
/// Tokens with the same id are merged; the resulting order is the order of
/// first appearance in `a.tokens` followed by `b.tokens`.
pub fn sum(a: &AssetBalance, b: &AssetBalance) -> AssetBalance {
    let mut tokens: Vec<TokenInfo> = Vec::with_capacity(a.tokens.len() + b.tokens.len());

    for token in a.tokens.iter().chain(b.tokens.iter()) {
        match tokens.iter_mut().find(|t| t.id == token.id) {
            Some(existing) => existing.value += &token.value,
            None => tokens.push(token.clone()),
        }
    }

    AssetBalance {
        native_token: &a.native_token + &b.native_token,
        tokens,
    }
}

/// Subtract `b` from `a`.
///
/// The native amount is reduced only while `a.native > b.native + minimum_native`.
/// Otherwise the result native is zero when `allow_negative_native` is set,
/// and the call fails with [`BalanceError::InsufficientNativeBalance`] when not.
/// Every token of `b` must be present in `a` with at least the same amount;
/// tokens reduced to exactly zero are removed.
pub fn subtract(
    a: &AssetBalance,
    b: &AssetBalance,
    minimum_native: &BigUint,
    allow_negative_native: bool,
) -> Result<AssetBalance, BalanceError> {
    let native_token = if a.native_token > &b.native_token + minimum_native {
        &a.native_token - &b.native_token
    } else if allow_negative_native {
        BigUint::default()
    } else {
        return Err(BalanceError::InsufficientNativeBalance {
            available: a.native_token.to_string(),
            required: b.native_token.to_string(),
            minimum: minimum_native.to_string(),
        });
    };

    let mut tokens = a.tokens.clone();
    for token in &b.tokens {
        let index = tokens
            .iter()
            .position(|t| t.id == token.id)
            .ok_or_else(|| BalanceError::TokenNotFound {
                token_id: token.id.clone(),
            })?;

        let current = &mut tokens[index];
        if current.value > token.value {
            current.value -= &token.value;
        } else if current.value == token.value {
            tokens.remove(index);
        } else {
            return Err(BalanceError::InsufficientTokenBalance {
                token_id: token.id.clone(),
                available: current.value.to_string(),
                required: token.value.to_string(),
            });
        }
    }

    Ok(AssetBalance {
        native_token,
        tokens,
    })
}
