//! Durable client-side key-value storage.
//!
//! Plays the part browser `localStorage` plays for a web client: a small
//! string-keyed store that survives restarts. The session layer keeps the
//! bearer token here (see [`tokens`]).

pub mod error;
pub mod memory;
pub mod redb;
pub mod tokens;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryStore;
pub use redb::RedbStore;
pub use traits::KVStore;
