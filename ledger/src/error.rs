use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: String,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance for {spender} on {owner}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: String,
        spender: String,
        needed: u128,
        available: u128,
    },

    #[error("token transfers are not enabled yet")]
    TransfersDisabled,

    #[error("arithmetic overflow in token ledger")]
    Overflow,
}
