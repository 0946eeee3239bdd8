//! Agenda Cultural domain core.
//!
//! Everything here is synchronous and side-effect free (apart from
//! logging): the records the client works with, the capability checks
//! derived from a user, the translation between the API's wire shape and
//! the display shape, and the rules the form layer enforces before a
//! request leaves the client.

pub mod date;
pub mod error;
pub mod form;
pub mod lifecycle;
pub mod model;
pub mod normalize;
pub mod permission;
pub mod wire;

pub use date::{
    DatePattern, format_date, format_date_at, format_date_only, is_event_past, is_valid_date,
    parse_instant,
};
pub use error::ValidationError;
pub use form::{EventForm, EventPatch, LoginForm, RegisterForm, RejectionReason};
pub use lifecycle::EventAction;
pub use model::{
    Event, EventPage, EventStatus, Pagination, PromoterReview, PromoterSummary, Registration,
    Role, SavedEvent, User,
};
pub use normalize::{
    normalize_event, normalize_events, normalize_registration, normalize_saved_event,
    normalize_user, normalize_users,
};
pub use permission::{
    PromoterStatus, can_create_events, get_promoter_status, is_admin, is_promoter,
};
pub use wire::{CreateEventRequest, LoginRequest, RegisterRequest, UpdateEventRequest};
