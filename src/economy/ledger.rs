//! In-memory economy provider.
//!
//! A deterministic `EconomyProvider` keeping per-player balances in a
//! mutex-guarded map, with an unbounded, append-only history of every call. Rejects
//! non-positive amounts and overdrafts the way most economy plugins do.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::EconomyProvider;
use crate::types::{PlayerId, TransactionResponse};

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedgerOp {
    Deposit,
    Withdraw,
}

/// One deposit or withdraw call, successful or not.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub player: PlayerId,
    pub op: LedgerOp,
    pub amount: Decimal,
    pub succeeded: bool,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// InMemoryEconomy
// ---------------------------------------------------------------------------

#[derive(Default)]
struct LedgerState {
    balances: HashMap<PlayerId, Decimal>,
    history: Vec<LedgerEntry>,
}

pub struct InMemoryEconomy {
    name: String,
    state: Mutex<LedgerState>,
}

impl InMemoryEconomy {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Seed a balance directly. Not part of the provider contract and not
    /// recorded in the history.
    pub fn set_balance(&self, player: PlayerId, balance: Decimal) {
        self.state().balances.insert(player, balance);
    }

    /// Every call recorded so far. The history is unbounded; long-running
    /// callers should drain it with [`InMemoryEconomy::clear_history`].
    pub fn history(&self) -> Vec<LedgerEntry> {
        self.state().history.clone()
    }

    /// Drop all recorded history, returning how many entries were removed.
    /// Balances are untouched.
    pub fn clear_history(&self) -> usize {
        let mut state = self.state();
        let removed = state.history.len();
        state.history.clear();
        removed
    }

    /// History entries for a single player, oldest first.
    pub fn history_for(&self, player: PlayerId) -> Vec<LedgerEntry> {
        self.state()
            .history
            .iter()
            .filter(|e| e.player == player)
            .cloned()
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LedgerState {
    fn balance(&self, player: PlayerId) -> Decimal {
        self.balances.get(&player).copied().unwrap_or(Decimal::ZERO)
    }

    fn record(&mut self, player: PlayerId, op: LedgerOp, amount: Decimal, succeeded: bool) {
        self.history.push(LedgerEntry {
            player,
            op,
            amount,
            succeeded,
            at: Utc::now(),
        });
    }
}

impl EconomyProvider for InMemoryEconomy {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn balance(&self, player: PlayerId) -> Decimal {
        self.state().balance(player)
    }

    fn deposit(&self, player: PlayerId, amount: Decimal) -> TransactionResponse {
        let mut state = self.state();
        let current = state.balance(player);

        if amount <= Decimal::ZERO {
            state.record(player, LedgerOp::Deposit, amount, false);
            return TransactionResponse::failure(amount, current, "Cannot deposit a non-positive amount");
        }

        let balance = current + amount;
        state.balances.insert(player, balance);
        state.record(player, LedgerOp::Deposit, amount, true);
        debug!(%player, %amount, %balance, "Ledger deposit");
        TransactionResponse::success(amount, balance)
    }

    fn withdraw(&self, player: PlayerId, amount: Decimal) -> TransactionResponse {
        let mut state = self.state();
        let current = state.balance(player);

        if amount <= Decimal::ZERO {
            state.record(player, LedgerOp::Withdraw, amount, false);
            return TransactionResponse::failure(amount, current, "Cannot withdraw a non-positive amount");
        }
        if amount > current {
            state.record(player, LedgerOp::Withdraw, amount, false);
            return TransactionResponse::failure(amount, current, "Insufficient funds");
        }

        let balance = current - amount;
        state.balances.insert(player, balance);
        state.record(player, LedgerOp::Withdraw, amount, true);
        debug!(%player, %amount, %balance, "Ledger withdraw");
        TransactionResponse::success(amount, balance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
