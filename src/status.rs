//! Payroll run status state machine.
//!
//! Every explicit status change of a payroll run passes through the
//! transition table defined here. Anything not listed is rejected with
//! both the current and the requested state named.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The lifecycle status of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Freshly created or recomputed; editable.
    Draft,
    /// Figures checked and frozen for review.
    Prepared,
    /// Reviewers are working through the line items.
    UnderReview,
    /// Every reviewer signed off.
    Approved,
    /// Review found problems; back to the payroll team.
    Rejected,
    /// Frozen ahead of payment.
    Locked,
    /// Explicitly unfrozen again.
    Unlocked,
    /// Payments have gone out.
    Paid,
    /// Post-payment bookkeeping done. Terminal.
    Completed,
    /// Abandoned before payment.
    Cancelled,
}

impl RunStatus {
    /// The statuses this one may transition to.
    pub fn allowed_transitions(&self) -> &'static [RunStatus] {
        use RunStatus::*;
        match self {
            Draft => &[Prepared, UnderReview, Cancelled],
            Prepared => &[UnderReview, Draft, Cancelled],
            UnderReview => &[Approved, Rejected, Draft],
            Approved => &[Locked, Paid, Draft],
            Locked => &[Paid, Unlocked],
            Unlocked => &[Draft, Locked],
            Paid => &[Completed],
            Completed => &[],
            Cancelled => &[Draft],
            Rejected => &[Draft],
        }
    }

    /// Returns true if the machine permits moving to `target`.
    pub fn can_transition_to(&self, target: RunStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Checks a requested transition, returning the target on success.
    pub fn transition_to(&self, target: RunStatus) -> EngineResult<RunStatus> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(EngineError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Returns true if a run in this status may be deleted.
    pub fn is_deletable(&self) -> bool {
        matches!(self, RunStatus::Draft | RunStatus::Cancelled)
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Draft => "DRAFT",
            RunStatus::Prepared => "PREPARED",
            RunStatus::UnderReview => "UNDER_REVIEW",
            RunStatus::Approved => "APPROVED",
            RunStatus::Rejected => "REJECTED",
            RunStatus::Locked => "LOCKED",
            RunStatus::Unlocked => "UNLOCKED",
            RunStatus::Paid => "PAID",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RunStatus::*;

    const ALL: [RunStatus; 10] = [
        Draft, Prepared, UnderReview, Approved, Rejected, Locked, Unlocked, Paid, Completed,
        Cancelled,
    ];

    #[test]
    fn test_draft_transitions() {
        assert!(Draft.can_transition_to(Prepared));
        assert!(Draft.can_transition_to(UnderReview));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(!Draft.can_transition_to(Paid));
        assert!(!Draft.can_transition_to(Locked));
    }

    #[test]
    fn test_under_review_cannot_lock_directly() {
        let result = UnderReview.transition_to(Locked);
        match result.unwrap_err() {
            EngineError::InvalidTransition { from, to } => {
                assert_eq!(from, UnderReview);
                assert_eq!(to, Locked);
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn test_approved_can_lock_or_pay() {
        assert!(Approved.can_transition_to(Locked));
        assert!(Approved.can_transition_to(Paid));
        assert!(Approved.can_transition_to(Draft));
        assert!(!Approved.can_transition_to(Completed));
    }

    #[test]
    fn test_locked_can_pay_or_unlock() {
        assert!(Locked.can_transition_to(Paid));
        assert!(Locked.can_transition_to(Unlocked));
        assert!(!Locked.can_transition_to(Draft));
    }

    #[test]
    fn test_unlocked_can_return_to_draft_or_relock() {
        assert!(Unlocked.can_transition_to(Draft));
        assert!(Unlocked.can_transition_to(Locked));
        assert!(!Unlocked.can_transition_to(Paid));
    }

    #[test]
    fn test_paid_only_completes() {
        assert_eq!(Paid.allowed_transitions(), &[Completed]);
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(Completed.is_terminal());
        for target in ALL {
            assert!(!Completed.can_transition_to(target));
        }
    }

    #[test]
    fn test_rejected_and_cancelled_reopen_to_draft() {
        assert_eq!(Rejected.allowed_transitions(), &[Draft]);
        assert_eq!(Cancelled.allowed_transitions(), &[Draft]);
    }

    #[test]
    fn test_only_draft_and_cancelled_are_deletable() {
        for status in ALL {
            let expected = matches!(status, Draft | Cancelled);
            assert_eq!(status.is_deletable(), expected, "{status}");
        }
    }

    #[test]
    fn test_no_self_transitions() {
        for status in ALL {
            assert!(
                !status.can_transition_to(status),
                "{status} must not transition to itself"
            );
        }
    }

    #[test]
    fn test_transition_to_returns_target() {
        let next = Draft.transition_to(Prepared).unwrap();
        assert_eq!(next, Prepared);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(UnderReview.to_string(), "UNDER_REVIEW");
        assert_eq!(
            serde_json::to_string(&UnderReview).unwrap(),
            "\"UNDER_REVIEW\""
        );
    }

    #[test]
    fn test_full_table_is_exhaustive() {
        // Every (from, to) pair is either allowed or rejected; nothing panics.
        for from in ALL {
            for to in ALL {
                let allowed = from.can_transition_to(to);
                assert_eq!(from.transition_to(to).is_ok(), allowed);
            }
        }
    }
}
