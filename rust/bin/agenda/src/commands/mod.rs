pub mod account;
pub mod app;
pub mod events;
pub mod output;
pub mod promoters;
pub mod registrations;
pub mod saved;
pub mod stats;
