//! One module per API resource.

pub mod auth;
pub mod eventos;
pub mod inscricoes;
pub mod promoters;
pub mod saved;
pub mod stats;
