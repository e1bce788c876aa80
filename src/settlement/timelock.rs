use serde::{Deserialize, Serialize};

use crate::{
    settlement::{
        error::{SettlementError, no_pending_request, timelock_not_expired},
        types::TIMELOCK_DELAY_SECS,
    },
    types::Timestamp,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange<T> {
    pub value: T,
    pub requested_at: Timestamp,
}

/// Two-phase mutation guard: Idle -> Requested on `request`, back to Idle
/// on `execute` (value applied) or `cancel` (value discarded). `now` is
/// ledger-observed time in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockedField<T> {
    current: T,
    pending: Option<PendingChange<T>>,
    delay_secs: u64,
}

impl<T: Clone> TimelockedField<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            pending: None,
            delay_secs: TIMELOCK_DELAY_SECS,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn pending(&self) -> Option<&PendingChange<T>> {
        self.pending.as_ref()
    }

    /// Overwrites any prior pending request; the delay restarts from `now`.
    pub fn request(&mut self, value: T, now: Timestamp) {
        self.pending = Some(PendingChange {
            value,
            requested_at: now,
        });
    }

    pub fn execute(&mut self, now: Timestamp) -> Result<&T, SettlementError> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(no_pending_request("no pending change to execute"));
        };
        let unlocks_at = pending.requested_at.saturating_add(self.delay_secs);
        if now < unlocks_at {
            return Err(timelock_not_expired(format!(
                "timelock active for another {} seconds",
                unlocks_at - now
            )));
        }
        let applied = self
            .pending
            .take()
            .map(|pending| pending.value)
            .ok_or_else(|| no_pending_request("no pending change to execute"))?;
        self.current = applied;
        Ok(&self.current)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }
}
