//! Which actions an event's status allows, and who may take them.

use serde::Serialize;

use crate::model::{Event, EventStatus, User};
use crate::permission::{can_create_events, is_admin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventAction {
    /// Owner edit. On a rejected event this is "edit and resubmit".
    Edit,
    /// Owner cancels an approved event.
    Cancel,
    Approve,
    Reject,
    /// Admin withdraws an earlier approval; the event goes back to review.
    Revoke,
}

impl EventAction {
    pub fn allowed_from(&self, status: EventStatus) -> bool {
        use EventStatus::*;
        match self {
            EventAction::Edit => matches!(status, Pending | Approved | Rejected),
            EventAction::Cancel => status == Approved,
            EventAction::Approve | EventAction::Reject => status == Pending,
            EventAction::Revoke => status == Approved,
        }
    }

    /// Status the event lands in after the action, if it is allowed.
    pub fn next_status(&self, status: EventStatus) -> Option<EventStatus> {
        if !self.allowed_from(status) {
            return None;
        }
        Some(match self {
            EventAction::Edit if status == EventStatus::Rejected => EventStatus::Pending,
            EventAction::Edit => status,
            EventAction::Cancel => EventStatus::Cancelled,
            EventAction::Approve => EventStatus::Approved,
            EventAction::Reject => EventStatus::Rejected,
            EventAction::Revoke => EventStatus::Pending,
        })
    }

    /// Whether `user` may take this action on `event` right now.
    pub fn permitted(&self, event: &Event, user: Option<&User>) -> bool {
        if !self.allowed_from(event.status) {
            return false;
        }
        match self {
            EventAction::Edit | EventAction::Cancel => user.is_some_and(|u| {
                (event.is_owned_by(&u.id) && can_create_events(Some(u))) || is_admin(Some(u))
            }),
            EventAction::Approve | EventAction::Reject | EventAction::Revoke => is_admin(user),
        }
    }
}
