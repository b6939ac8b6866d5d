//! Nullable token ledger: in-memory balances and allowances.

use std::collections::HashMap;
use std::sync::Mutex;
use swarm_ledger::{TokenError, TokenLedger};
use swarm_types::Address;

#[derive(Default)]
struct Balances {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
    transfers_enabled: bool,
}

/// An in-memory fungible token for testing and simulation.
///
/// Starts with transfers enabled; `mint` is only available here, never on
/// the [`TokenLedger`] surface.
pub struct NullTokenLedger {
    inner: Mutex<Balances>,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Balances {
                transfers_enabled: true,
                ..Default::default()
            }),
        }
    }

    /// A ledger that rejects every transfer until [`enable_transfers`](Self::enable_transfers).
    pub fn locked() -> Self {
        Self {
            inner: Mutex::new(Balances::default()),
        }
    }

    /// Credit `amount` new tokens to `to`.
    pub fn mint(&self, to: &Address, amount: u128) {
        let mut inner = self.inner.lock().unwrap();
        *inner.balances.entry(to.clone()).or_default() += amount;
        inner.total_supply += amount;
    }

    pub fn enable_transfers(&self) {
        self.inner.lock().unwrap().transfers_enabled = true;
    }

    /// Every non-zero balance, sorted by address.
    pub fn balances(&self) -> Vec<(Address, u128)> {
        let inner = self.inner.lock().unwrap();
        let mut out: Vec<(Address, u128)> = inner
            .balances
            .iter()
            .filter(|(_, b)| **b > 0)
            .map(|(a, b)| (a.clone(), *b))
            .collect();
        out.sort();
        out
    }
}

impl Default for NullTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Balances {
    fn move_balance(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        if !self.transfers_enabled {
            return Err(TokenError::TransfersDisabled);
        }
        let available = self.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: from.to_string(),
                needed: amount,
                available,
            });
        }
        let credited = self
            .balances
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from.clone(), available - amount);
        // Re-read after the debit so a self-transfer nets to zero.
        let credited = if from == to { available } else { credited };
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}

impl TokenLedger for NullTokenLedger {
    fn balance_of(&self, account: &Address) -> u128 {
        self.inner
            .lock()
            .unwrap()
            .balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.inner.lock().unwrap().total_supply
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        self.inner.lock().unwrap().move_balance(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (from.clone(), spender.clone());
        let allowed = inner.allowances.get(&key).copied().unwrap_or(0);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                owner: from.to_string(),
                spender: spender.to_string(),
                needed: amount,
                available: allowed,
            });
        }
        inner.move_balance(from, to, amount)?;
        inner.allowances.insert(key, allowed - amount);
        Ok(())
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: u128) -> Result<(), TokenError> {
        self.inner
            .lock()
            .unwrap()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.inner
            .lock()
            .unwrap()
            .allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }
}
