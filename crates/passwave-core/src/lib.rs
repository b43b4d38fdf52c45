//! Passwave Core Library
//!
//! This crate provides shared types, errors, session access and configuration
//! for the password manager worker and its content/popup contexts.

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::WorkerConfig;
pub use error::{PasswaveError, PasswaveResult};
pub use session::{SessionProvider, SessionState, SessionStore};
pub use types::{ExtensionOrigin, MessageSender, ParsedSender, Realm, TabId, WorkerStatus};
