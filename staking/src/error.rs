//! Staking-specific errors.

use swarm_ledger::TokenError;
use swarm_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("staking is paused")]
    Paused,

    #[error("stake of {balance} would exceed the token supply of {cap}")]
    StakeCapExceeded { balance: u128, cap: u128 },

    #[error("insufficient withdrawable stake: requested {requested}, withdrawable {withdrawable}")]
    InsufficientWithdrawable { requested: u128, withdrawable: u128 },

    #[error("caller is not the staking owner")]
    NotOwner,

    #[error("caller is not the bounty registry")]
    NotRegistry,

    #[error("bounty registry is already set")]
    RegistryAlreadySet,

    #[error("arithmetic overflow in stake accounting")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),
}
