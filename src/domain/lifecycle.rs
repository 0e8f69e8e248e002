//! Visit lifecycle state machine.
//!
//! A visit moves `pending -> approved -> checked-in -> checked-out`, with
//! `rejected` reachable from either pre-check-in state and terminal. The
//! transition table here is pure; the repository layer enforces it again at
//! the row level with guarded updates so concurrent attempts cannot both win.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall status of a visit. Exactly one value at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitStatus {
    Pending,
    Approved,
    CheckedIn,
    CheckedOut,
    Rejected,
}

impl VisitStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Rejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Target state for `event`, if legal from this state.
    #[must_use]
    pub const fn next(self, event: VisitEvent) -> Option<Self> {
        match (self, event) {
            (Self::Pending, VisitEvent::HostApprove) => Some(Self::Approved),
            (Self::Pending | Self::Approved, VisitEvent::HostReject) => Some(Self::Rejected),
            (Self::Approved, VisitEvent::CheckIn) => Some(Self::CheckedIn),
            (Self::CheckedIn, VisitEvent::CheckOut) => Some(Self::CheckedOut),
            _ => None,
        }
    }

    /// Whether `event` is legal from this state.
    #[must_use]
    pub const fn permits(self, event: VisitEvent) -> bool {
        self.next(event).is_some()
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CheckedOut | Self::Rejected)
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that drive a visit through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitEvent {
    HostApprove,
    HostReject,
    CheckIn,
    CheckOut,
}

impl fmt::Display for VisitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HostApprove => "host-approve",
            Self::HostReject => "host-reject",
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
        })
    }
}

/// The host's decision on a visit, tracked independently of [`VisitStatus`].
/// Host approval gates security check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostConfirmation {
    Pending,
    Approved,
    Rejected,
}

impl HostConfirmation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        [Self::Pending, Self::Approved, Self::Rejected]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

impl fmt::Display for HostConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert_eq!(
            VisitStatus::Pending.next(VisitEvent::HostApprove),
            Some(VisitStatus::Approved)
        );
        assert_eq!(
            VisitStatus::Approved.next(VisitEvent::CheckIn),
            Some(VisitStatus::CheckedIn)
        );
        assert_eq!(
            VisitStatus::CheckedIn.next(VisitEvent::CheckOut),
            Some(VisitStatus::CheckedOut)
        );
    }

    #[test]
    fn test_rejection_reachable_only_before_check_in() {
        assert_eq!(
            VisitStatus::Pending.next(VisitEvent::HostReject),
            Some(VisitStatus::Rejected)
        );
        assert_eq!(
            VisitStatus::Approved.next(VisitEvent::HostReject),
            Some(VisitStatus::Rejected)
        );
        assert_eq!(VisitStatus::CheckedIn.next(VisitEvent::HostReject), None);
        assert_eq!(VisitStatus::CheckedOut.next(VisitEvent::HostReject), None);
    }

    #[test]
    fn test_terminal_states_permit_nothing() {
        for event in [
            VisitEvent::HostApprove,
            VisitEvent::HostReject,
            VisitEvent::CheckIn,
            VisitEvent::CheckOut,
        ] {
            assert_eq!(VisitStatus::Rejected.next(event), None);
            assert_eq!(VisitStatus::CheckedOut.next(event), None);
        }
        assert!(VisitStatus::Rejected.is_terminal());
        assert!(VisitStatus::CheckedOut.is_terminal());
        assert!(!VisitStatus::Approved.is_terminal());
    }

    #[test]
    fn test_no_skipping_states() {
        assert_eq!(VisitStatus::Pending.next(VisitEvent::CheckIn), None);
        assert_eq!(VisitStatus::Pending.next(VisitEvent::CheckOut), None);
        assert_eq!(VisitStatus::Approved.next(VisitEvent::CheckOut), None);
        assert_eq!(VisitStatus::CheckedIn.next(VisitEvent::CheckIn), None);
        assert_eq!(VisitStatus::CheckedIn.next(VisitEvent::HostApprove), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in VisitStatus::ALL {
            assert_eq!(VisitStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(VisitStatus::parse("checked_in"), None);
        assert_eq!(VisitStatus::parse(""), None);
    }
}
