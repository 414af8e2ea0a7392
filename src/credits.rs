//! Per-user credit accounting.
//!
//! The pipeline only consumes the [`CreditLedger`] trait; the bundled
//! [`InMemoryLedger`] is a demo store that serializes every read-modify-write
//! under one lock. Production deployments should back this trait with a
//! transactional store with per-user row locking.

use std::collections::HashMap;
use std::sync::Mutex;

/// Balance store gating how many jobs a user may submit.
///
/// Deduction happens only after a successful job outcome; a failed job
/// never consumes credits.
pub trait CreditLedger {
    /// Whether the user can afford `n` more jobs.
    fn has_sufficient_credits(&self, user: &str, n: u64) -> bool;

    /// Deduct `n` credits. Returns `false` (and deducts nothing) if the
    /// balance is insufficient.
    fn deduct(&self, user: &str, n: u64) -> bool;

    /// Current balance; zero for unknown users.
    fn balance(&self, user: &str) -> u64;

    /// Add credits (free-trial grant, completed purchase). Returns the new
    /// balance.
    fn grant(&self, user: &str, n: u64) -> u64;
}

/// Demo ledger: a process-local map, re-created on every restart and not
/// shared across instances.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<String, u64>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-seeded with the free-trial balance for one user.
    pub fn with_free_trial(user: &str, credits: u64) -> Self {
        let ledger = Self::new();
        ledger.grant(user, credits);
        ledger
    }
}

impl CreditLedger for InMemoryLedger {
    fn has_sufficient_credits(&self, user: &str, n: u64) -> bool {
        self.balance(user) >= n
    }

    fn deduct(&self, user: &str, n: u64) -> bool {
        let mut balances = self.balances.lock().expect("ledger poisoned");
        match balances.get_mut(user) {
            Some(balance) if *balance >= n => {
                *balance -= n;
                true
            }
            _ => false,
        }
    }

    fn balance(&self, user: &str) -> u64 {
        self.balances
            .lock()
            .expect("ledger poisoned")
            .get(user)
            .copied()
            .unwrap_or(0)
    }

    fn grant(&self, user: &str, n: u64) -> u64 {
        let mut balances = self.balances.lock().expect("ledger poisoned");
        let balance = balances.entry(user.to_string()).or_insert(0);
        *balance += n;
        *balance
    }
}
