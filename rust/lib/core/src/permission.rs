//! Capability checks derived from a user.
//!
//! Capability comes from two sources that are OR-ed together: the `role`
//! field and the permission tag set. The API moved from the first to the
//! second and may fill either one. All functions are total: an absent
//! user simply has no capability.

use serde::Serialize;

use crate::model::{Role, User};

pub const PROMOTER_TAG: &str = "promoter";
pub const ADMIN_TAG: &str = "admin";

pub fn is_promoter(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role == Role::Promoter || u.has_permission(PROMOTER_TAG))
}

pub fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role == Role::Admin || u.has_permission(ADMIN_TAG))
}

fn is_approved(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.approved_at.is_some())
}

/// Admins always may; promoters only once an admin approved them.
pub fn can_create_events(user: Option<&User>) -> bool {
    is_admin(user) || (is_promoter(user) && is_approved(user))
}

/// Composite promoter view used by profile screens and guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoterStatus {
    pub is_promoter: bool,
    pub is_approved: bool,
    pub can_create_events: bool,
    pub is_pending: bool,
}

pub fn get_promoter_status(user: Option<&User>) -> PromoterStatus {
    let promoter = is_promoter(user);
    let approved = is_approved(user);
    PromoterStatus {
        is_promoter: promoter,
        is_approved: approved,
        can_create_events: can_create_events(user),
        is_pending: promoter && !approved,
    }
}
