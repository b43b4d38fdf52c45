//! Passwave background worker host

pub mod effects;
pub mod persistence;
pub mod transport;
pub mod worker;

pub use effects::TokioEffects;
pub use persistence::StatePersistence;
pub use transport::{handle_line, serve, Inbound, Outbound, SessionCommand};
pub use worker::Worker;
