//! Client session: who is logged in, what they may do, and the operations
//! that change it.
//!
//! A [`SessionStore`] is created once per client and shared by `Arc`. It is
//! the only writer of the session state and of the persisted token; every
//! other component reads a snapshot or subscribes to changes.

pub mod cell;
pub mod config;
pub mod error;
pub mod guard;
pub mod notify;
pub mod state;
pub mod store;

pub use cell::{SessionCell, SubscriptionId};
pub use config::SessionConfig;
pub use error::SessionError;
pub use guard::{Access, Requirement, guard};
pub use notify::{Notifier, TracingNotifier};
pub use state::{SessionPhase, SessionState};
pub use store::SessionStore;
