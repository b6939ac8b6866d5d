//! Standard fungible-token surface.

use crate::TokenError;
use swarm_types::Address;

/// Balance-transfer capability of the external value ledger.
///
/// Methods take `&self`; implementations serialize their own state. Every
/// mutating call is all-or-nothing: on `Err` no balance or allowance changed.
pub trait TokenLedger: Send + Sync {
    /// Current balance of `account`.
    fn balance_of(&self, account: &Address) -> u128;

    /// Total tokens in existence; no single balance can exceed it.
    fn total_supply(&self) -> u128;

    /// Move `amount` from `from` to `to` on `from`'s own authority.
    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on `spender`'s authority, consuming
    /// allowance previously granted by `from`.
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Let `spender` move up to `amount` of `owner`'s balance (replaces any
    /// previous allowance).
    fn approve(&self, owner: &Address, spender: &Address, amount: u128) -> Result<(), TokenError>;

    /// Remaining allowance of `spender` over `owner`'s balance.
    fn allowance(&self, owner: &Address, spender: &Address) -> u128;
}
