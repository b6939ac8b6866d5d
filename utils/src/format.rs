//! Display helpers for block spans and balance tables.

use swarm_types::{format_tokens, Address};

/// Format a span of blocks, e.g. `1 block`, `25 blocks`.
pub fn format_blocks(blocks: u64) -> String {
    if blocks == 1 {
        "1 block".to_string()
    } else {
        format!("{blocks} blocks")
    }
}

/// Render `(address, raw balance)` pairs as aligned lines, one per account.
pub fn format_balances(balances: &[(Address, u128)]) -> String {
    let width = balances
        .iter()
        .map(|(a, _)| a.as_str().len())
        .max()
        .unwrap_or(0);
    balances
        .iter()
        .map(|(addr, raw)| format!("{:<width$}  {} ({raw})", addr.as_str(), format_tokens(*raw)))
        .collect::<Vec<_>>()
        .join("\n")
}
