//! Domain events published on the broadcast event bus.
//!
//! Every committed lifecycle transition emits exactly one event after the
//! database write succeeds. Subscribers (the notifier, the SSE endpoint)
//! must never be able to block or roll back the transition that produced
//! the event.

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    VisitRegistered {
        visit_id: i32,
        pass_id: String,
        visitor_name: String,
        host_email: String,
    },
    VisitApproved {
        visit_id: i32,
        pass_id: String,
        visitor_name: String,
        host_email: String,
    },
    VisitRejected {
        visit_id: i32,
        pass_id: String,
        visitor_name: String,
        host_email: String,
        reason: String,
    },
    VisitCheckedIn {
        visit_id: i32,
        pass_id: String,
        visitor_name: String,
        host_email: String,
        check_in_time: String,
    },
    VisitCheckedOut {
        visit_id: i32,
        pass_id: String,
        visitor_name: String,
        host_email: String,
        check_out_time: String,
    },

    HostRegistered {
        host_id: i32,
        username: String,
    },
    HostApproved {
        host_id: i32,
        username: String,
    },
    HostRejected {
        host_id: i32,
        username: String,
    },
}

impl NotificationEvent {
    /// Short type tag used for the notifications outbox and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::VisitRegistered { .. } => "VisitRegistered",
            Self::VisitApproved { .. } => "VisitApproved",
            Self::VisitRejected { .. } => "VisitRejected",
            Self::VisitCheckedIn { .. } => "VisitCheckedIn",
            Self::VisitCheckedOut { .. } => "VisitCheckedOut",
            Self::HostRegistered { .. } => "HostRegistered",
            Self::HostApproved { .. } => "HostApproved",
            Self::HostRejected { .. } => "HostRejected",
        }
    }
}
