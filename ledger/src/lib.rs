//! Value ledger interface.
//!
//! The fungible token itself is an external collaborator. The marketplace only
//! moves balances through [`TokenLedger`]: pulling approved funds in when
//! bounties, assertions and stakes are posted, and pushing them out at
//! settlement and withdrawal.

pub mod error;
pub mod token;

pub use error::TokenError;
pub use token::TokenLedger;
