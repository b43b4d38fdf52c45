//! Cross-context message broker
//!
//! Content scripts, the popup and extension pages talk to the background
//! worker through typed [`WorkerMessage`]s. The [`MessageBroker`] keeps one
//! handler per message type; [`handlers`] wires the form tracker, session and
//! store handlers against a shared [`WorkerContext`].

pub mod broker;
pub mod context;
pub mod handlers;
pub mod messages;

pub use broker::{MessageBroker, MessageHandler};
pub use context::WorkerContext;
pub use messages::{StagePayload, WakeupResponse, WorkerMessage, WorkerMessageType, WorkerResponse};
