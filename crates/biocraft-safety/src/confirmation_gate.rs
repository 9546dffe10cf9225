//! [`ConfirmationGate`] – human-in-the-loop approval for risky commands.
//!
//! Commands below the configured [`RiskLevel`] threshold pass straight
//! through.  Anything at or above it is parked with a deadline until an
//! operator calls [`ConfirmationGate::confirm`] or [`ConfirmationGate::deny`].
//!
//! There is no background timer: an entry whose deadline has passed is
//! treated as denied the next time it is touched by [`confirm`], [`deny`],
//! [`poll`] or [`expire_overdue`], and every [`request`] that registers a new
//! entry drops all overdue ones first.  Absence of an answer never becomes an
//! approval.
//!
//! [`request`]: ConfirmationGate::request
//!
//! [`confirm`]: ConfirmationGate::confirm
//! [`deny`]: ConfirmationGate::deny
//! [`poll`]: ConfirmationGate::poll
//! [`expire_overdue`]: ConfirmationGate::expire_overdue

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use biocraft_types::{ConfirmationHandle, CraftError, RiskLevel, UnconfirmedReason};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of [`ConfirmationGate::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Risk is below the threshold; no human needed.
    AutoApproved,
    /// Waiting for an operator until `handle.deadline`.
    Pending(ConfirmationHandle),
}

/// Table of commands awaiting operator confirmation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use biocraft_safety::confirmation_gate::{ConfirmationGate, GateDecision};
/// use biocraft_types::RiskLevel;
/// use uuid::Uuid;
///
/// let gate = ConfirmationGate::new(RiskLevel::High, Duration::from_secs(30));
/// let id = Uuid::new_v4();
///
/// assert_eq!(gate.request(id, RiskLevel::Low, Duration::ZERO), GateDecision::AutoApproved);
///
/// let GateDecision::Pending(handle) = gate.request(id, RiskLevel::High, Duration::ZERO) else {
///     panic!("high risk must wait for an operator");
/// };
/// assert_eq!(handle.deadline, Duration::from_secs(30));
/// assert!(gate.confirm(id, Duration::from_secs(1)).is_ok());
/// ```
#[derive(Debug)]
pub struct ConfirmationGate {
    threshold: RiskLevel,
    timeout: Duration,
    /// command id → deadline
    pending: Mutex<HashMap<Uuid, Duration>>,
}

impl ConfirmationGate {
    pub fn new(threshold: RiskLevel, timeout: Duration) -> Self {
        Self {
            threshold,
            timeout,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn threshold(&self) -> RiskLevel {
        self.threshold
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `true` when `risk` is at or above the threshold.
    pub fn requires_confirmation(&self, risk: RiskLevel) -> bool {
        risk >= self.threshold
    }

    /// Auto-approve a low-risk command or register a pending confirmation
    /// expiring at `now + timeout`.
    ///
    /// Requesting an id that is already pending returns the existing handle;
    /// its deadline is not extended.  Entries already past their deadline are
    /// dropped first, so abandoned handles do not accumulate.
    pub fn request(&self, command_id: Uuid, risk: RiskLevel, now: Duration) -> GateDecision {
        if !self.requires_confirmation(risk) {
            debug!(%command_id, %risk, "confirmation not required");
            return GateDecision::AutoApproved;
        }

        let mut pending = self.lock();
        sweep(&mut pending, now);
        let deadline = *pending
            .entry(command_id)
            .or_insert_with(|| now.saturating_add(self.timeout));
        drop(pending);
        info!(%command_id, %risk, ?deadline, "awaiting operator confirmation");
        GateDecision::Pending(ConfirmationHandle {
            command_id,
            deadline,
        })
    }

    /// Approve a pending command.
    ///
    /// # Errors
    ///
    /// [`CraftError::UnknownOrExpiredConfirmation`] if `command_id` is not
    /// pending or its deadline has passed.
    pub fn confirm(&self, command_id: Uuid, now: Duration) -> Result<(), CraftError> {
        self.take_live(command_id, now)?;
        info!(%command_id, "operator confirmed command");
        Ok(())
    }

    /// Reject a pending command.
    ///
    /// # Errors
    ///
    /// [`CraftError::UnknownOrExpiredConfirmation`] if `command_id` is not
    /// pending or its deadline has passed.
    pub fn deny(&self, command_id: Uuid, now: Duration) -> Result<(), CraftError> {
        self.take_live(command_id, now)?;
        info!(%command_id, "operator denied command");
        Ok(())
    }

    /// Observe a pending command without resolving it.
    ///
    /// # Errors
    ///
    /// - [`CraftError::Unconfirmed`] (`TimedOut`) – the deadline passed; the
    ///   entry is removed.
    /// - [`CraftError::UnknownOrExpiredConfirmation`] – not pending.
    pub fn poll(&self, command_id: Uuid, now: Duration) -> Result<ConfirmationHandle, CraftError> {
        let mut pending = self.lock();
        match pending.get(&command_id).copied() {
            None => Err(CraftError::UnknownOrExpiredConfirmation(command_id)),
            Some(deadline) if now >= deadline => {
                pending.remove(&command_id);
                warn!(%command_id, ?deadline, "confirmation timed out; command denied");
                Err(CraftError::Unconfirmed {
                    command_id,
                    reason: UnconfirmedReason::TimedOut,
                })
            }
            Some(deadline) => Ok(ConfirmationHandle {
                command_id,
                deadline,
            }),
        }
    }

    /// Deny every entry whose deadline is at or before `now`; returns their ids.
    pub fn expire_overdue(&self, now: Duration) -> Vec<Uuid> {
        sweep(&mut self.lock(), now)
    }

    /// Number of commands currently awaiting an operator.
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Remove `command_id` and succeed only if it had not yet expired.
    fn take_live(&self, command_id: Uuid, now: Duration) -> Result<(), CraftError> {
        match self.lock().remove(&command_id) {
            Some(deadline) if now < deadline => Ok(()),
            Some(deadline) => {
                warn!(%command_id, ?deadline, "late operator response; command already timed out");
                Err(CraftError::UnknownOrExpiredConfirmation(command_id))
            }
            None => Err(CraftError::UnknownOrExpiredConfirmation(command_id)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Duration>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop every entry whose deadline is at or before `now`.
fn sweep(pending: &mut HashMap<Uuid, Duration>, now: Duration) -> Vec<Uuid> {
    let overdue: Vec<Uuid> = pending
        .iter()
        .filter(|(_, deadline)| now >= **deadline)
        .map(|(id, _)| *id)
        .collect();
    for command_id in &overdue {
        pending.remove(command_id);
        warn!(%command_id, "confirmation timed out; command denied");
    }
    overdue
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn gate() -> ConfirmationGate {
        ConfirmationGate::new(RiskLevel::High, TIMEOUT)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn pending(gate: &ConfirmationGate, id: Uuid, now: Duration) -> ConfirmationHandle {
        match gate.request(id, RiskLevel::Critical, now) {
            GateDecision::Pending(h) => h,
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn below_threshold_auto_approves() {
        let g = gate();
        assert_eq!(g.request(Uuid::new_v4(), RiskLevel::Low, secs(0)), GateDecision::AutoApproved);
        assert_eq!(
            g.request(Uuid::new_v4(), RiskLevel::Elevated, secs(0)),
            GateDecision::AutoApproved
        );
        assert_eq!(g.pending_count(), 0);
    }

    #[test]
    fn at_threshold_requires_confirmation() {
        let g = gate();
        let id = Uuid::new_v4();
        assert!(matches!(
            g.request(id, RiskLevel::High, secs(5)),
            GateDecision::Pending(ConfirmationHandle { command_id, deadline })
                if command_id == id && deadline == secs(35)
        ));
        assert_eq!(g.pending_count(), 1);
    }

    #[test]
    fn confirm_before_deadline_succeeds_once() {
        let g = gate();
        let id = Uuid::new_v4();
        pending(&g, id, secs(0));
        assert!(g.confirm(id, secs(29)).is_ok());
        assert_eq!(g.pending_count(), 0);
        // Already resolved.
        assert_eq!(
            g.confirm(id, secs(29)),
            Err(CraftError::UnknownOrExpiredConfirmation(id))
        );
    }

    #[test]
    fn deny_resolves_entry() {
        let g = gate();
        let id = Uuid::new_v4();
        pending(&g, id, secs(0));
        assert!(g.deny(id, secs(1)).is_ok());
        assert!(g.confirm(id, secs(2)).is_err());
        assert!(g.deny(id, secs(2)).is_err());
    }

    #[test]
    fn unknown_id_is_rejected() {
        let g = gate();
        let id = Uuid::new_v4();
        assert_eq!(g.confirm(id, secs(0)), Err(CraftError::UnknownOrExpiredConfirmation(id)));
        assert_eq!(g.deny(id, secs(0)), Err(CraftError::UnknownOrExpiredConfirmation(id)));
        assert_eq!(g.poll(id, secs(0)), Err(CraftError::UnknownOrExpiredConfirmation(id)));
    }

    #[test]
    fn confirm_after_deadline_is_rejected() {
        let g = gate();
        let id = Uuid::new_v4();
        pending(&g, id, secs(0));
        assert_eq!(
            g.confirm(id, TIMEOUT),
            Err(CraftError::UnknownOrExpiredConfirmation(id))
        );
        assert_eq!(g.pending_count(), 0);
    }

    #[test]
    fn unanswered_request_times_out_when_polled() {
        let g = gate();
        let id = Uuid::new_v4();
        let handle = pending(&g, id, secs(0));

        assert_eq!(g.poll(id, secs(10)), Ok(handle));
        assert_eq!(
            g.poll(id, secs(31)),
            Err(CraftError::Unconfirmed {
                command_id: id,
                reason: UnconfirmedReason::TimedOut,
            })
        );
        // The timed-out entry is gone for good.
        assert_eq!(g.poll(id, secs(31)), Err(CraftError::UnknownOrExpiredConfirmation(id)));
        assert!(g.confirm(id, secs(31)).is_err());
    }

    #[test]
    fn re_request_keeps_original_deadline() {
        let g = gate();
        let id = Uuid::new_v4();
        let first = pending(&g, id, secs(0));
        let second = pending(&g, id, secs(20));
        assert_eq!(first, second);
        assert_eq!(g.pending_count(), 1);
    }

    #[test]
    fn expire_overdue_sweeps_only_expired_entries() {
        let g = gate();
        let early = Uuid::new_v4();
        let late = Uuid::new_v4();
        pending(&g, early, secs(0));
        pending(&g, late, secs(20));

        let expired = g.expire_overdue(secs(30));
        assert_eq!(expired, vec![early]);
        assert_eq!(g.pending_count(), 1);
        assert!(g.confirm(late, secs(31)).is_ok());
    }

    #[test]
    fn new_request_drops_abandoned_entries() {
        let g = gate();
        let abandoned: Vec<Uuid> = (0..100).map(|_| Uuid::new_v4()).collect();
        for (i, id) in abandoned.iter().enumerate() {
            pending(&g, *id, secs(60 * i as u64));
        }
        // Only the most recent one is still inside its window.
        assert_eq!(g.pending_count(), 1);
        assert!(g.confirm(abandoned[99], secs(60 * 99 + 1)).is_ok());
        assert!(g.confirm(abandoned[0], secs(60 * 99 + 1)).is_err());
    }

    #[test]
    fn auto_approved_request_leaves_table_alone() {
        let g = gate();
        let id = Uuid::new_v4();
        pending(&g, id, secs(0));
        g.request(Uuid::new_v4(), RiskLevel::Low, secs(100));
        assert_eq!(g.pending_count(), 1);
    }

    #[test]
    fn racing_confirm_and_deny_resolve_once() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::thread;

        for _ in 0..20 {
            let g = Arc::new(gate());
            let id = Uuid::new_v4();
            pending(&g, id, secs(0));
            let resolved = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let g = Arc::clone(&g);
                    let resolved = Arc::clone(&resolved);
                    thread::spawn(move || {
                        let outcome = if i % 2 == 0 {
                            g.confirm(id, secs(1))
                        } else {
                            g.deny(id, secs(1))
                        };
                        match outcome {
                            Ok(()) => {
                                resolved.fetch_add(1, Ordering::SeqCst);
                            }
                            Err(e) => assert_eq!(e, CraftError::UnknownOrExpiredConfirmation(id)),
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }

            assert_eq!(resolved.load(Ordering::SeqCst), 1);
            assert_eq!(g.pending_count(), 0);
        }
    }

    #[test]
    fn huge_timeout_does_not_overflow() {
        let g = ConfirmationGate::new(RiskLevel::High, Duration::MAX);
        let handle = pending(&g, Uuid::new_v4(), secs(5));
        assert_eq!(handle.deadline, Duration::MAX);
    }
}
