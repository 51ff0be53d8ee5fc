//! UTXO coin selection
//!
//! Greedy, single-pass selection over a lazily pulled stream of UTXOs. The
//! stream is polled strictly one element at a time and never rewound.

use std::collections::{HashMap, HashSet};

use futures::{Stream, StreamExt};
use num_traits::Zero;
use tracing::{debug, warn};

use crate::types::{AssetBalance, TokenInfo, UtxoInfo};

// =============================================================================
// Selection result
// =============================================================================

/// Outcome of a selection call
#[derive(Debug, Clone)]
pub struct CoveringResult<U> {
    /// True when the selected boxes satisfy every required amount
    pub covered: bool,
    /// Selected boxes in pull order
    pub boxes: Vec<U>,
}

// =============================================================================
// Chaining
// =============================================================================

/// Follow the tracking map from `utxo` to its latest successor.
///
/// Returns `None` when the chain ends in "no successor" or loops back on
/// itself.
fn resolve_chained<U: UtxoInfo + Clone>(
    utxo: U,
    tracking: &HashMap<String, Option<U>>,
) -> Option<U> {
    let mut current = utxo;
    let mut visited = HashSet::new();

    loop {
        let id = current.utxo_id();
        match tracking.get(&id) {
            None => return Some(current),
            Some(None) => {
                debug!(utxo_id = %id, "Tracked UTXO has no successor, skipping");
                return None;
            }
            Some(Some(next)) => {
                if !visited.insert(id.clone()) {
                    warn!(utxo_id = %id, "Cycle in UTXO tracking map, skipping");
                    return None;
                }
                current = next.clone();
            }
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Select boxes from `utxos` until `required` is covered or the stream ends.
///
/// Boxes are taken in pull order. A box is selected when it still contributes
/// to the uncovered requirement: it carries a token that is still needed, or
/// native coverage is still missing. Selected boxes contribute their entire
/// balance. Ids in `forbidden` are skipped after chaining is resolved, and
/// boxes whose balance cannot be read are skipped with a warning.
pub async fn select_boxes<U, S>(
    required: &AssetBalance,
    forbidden: &HashSet<String>,
    tracking: &HashMap<String, Option<U>>,
    mut utxos: S,
) -> CoveringResult<U>
where
    U: UtxoInfo + Clone,
    S: Stream<Item = U> + Unpin,
{
    let mut uncovered_native = required.native_token.clone();
    let mut uncovered_tokens: Vec<TokenInfo> = required
        .tokens
        .iter()
        .filter(|t| !t.value.is_zero())
        .cloned()
        .collect();

    let mut boxes = Vec::new();

    while !uncovered_tokens.is_empty() || !uncovered_native.is_zero() {
        let Some(pulled) = utxos.next().await else {
            debug!("UTXO source exhausted before requirement was covered");
            break;
        };

        let Some(utxo) = resolve_chained(pulled, tracking) else {
            continue;
        };

        let id = utxo.utxo_id();
        if forbidden.contains(&id) {
            debug!(utxo_id = %id, "Skipping forbidden UTXO");
            continue;
        }

        let balance = match utxo.asset_balance() {
            Ok(balance) => balance,
            Err(e) => {
                warn!(utxo_id = %id, error = %e, "Skipping UTXO with unreadable balance");
                continue;
            }
        };

        let useful = !uncovered_native.is_zero()
            || balance
                .tokens
                .iter()
                .any(|t| uncovered_tokens.iter().any(|u| u.id == t.id));
        if !useful {
            continue;
        }

        let taken = std::cmp::min(&uncovered_native, &balance.native_token).clone();
        uncovered_native -= taken;
        for token in &balance.tokens {
            if let Some(index) = uncovered_tokens.iter().position(|u| u.id == token.id) {
                if uncovered_tokens[index].value > token.value {
                    uncovered_tokens[index].value -= &token.value;
                } else {
                    uncovered_tokens.remove(index);
                }
            }
        }

        debug!(utxo_id = %id, selected = boxes.len() + 1, "Selected UTXO");
        boxes.push(utxo);
    }

    CoveringResult {
        covered: uncovered_tokens.is_empty() && uncovered_native.is_zero(),
        boxes,
    }
}
