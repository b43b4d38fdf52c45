//! Message type registry and dispatch

use crate::messages::{WorkerMessage, WorkerMessageType, WorkerResponse};
use passwave_core::{MessageSender, PasswaveResult};
use std::collections::HashMap;
use tracing::{debug, warn};

pub type MessageHandler =
    Box<dyn Fn(WorkerMessage, &MessageSender) -> PasswaveResult<serde_json::Value> + Send + Sync>;

/// Routes each incoming [`WorkerMessage`] to the handler registered for its
/// type. Handlers run to completion one at a time.
#[derive(Default)]
pub struct MessageBroker {
    handlers: HashMap<WorkerMessageType, MessageHandler>,
}

impl MessageBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `message_type`, replacing any previous one
    pub fn register<F>(&mut self, message_type: WorkerMessageType, handler: F)
    where
        F: Fn(WorkerMessage, &MessageSender) -> PasswaveResult<serde_json::Value> + Send + Sync + 'static,
    {
        if self.handlers.insert(message_type, Box::new(handler)).is_some() {
            warn!("[Broker] replaced handler for {:?}", message_type);
        }
    }

    pub fn is_registered(&self, message_type: WorkerMessageType) -> bool {
        self.handlers.contains_key(&message_type)
    }

    pub fn dispatch(&self, message: WorkerMessage, sender: &MessageSender) -> Result<serde_json::Value, String> {
        let message_type = message.message_type();
        let handler = self
            .handlers
            .get(&message_type)
            .ok_or_else(|| format!("Unsupported message type {:?}", message_type))?;

        debug!("[Broker] {:?} from tab {:?}", message_type, sender.tab_id);
        handler(message, sender).map_err(|e| {
            debug!("[Broker] {:?} rejected: {}", message_type, e);
            e.to_string()
        })
    }

    pub fn respond(&self, message: WorkerMessage, sender: &MessageSender) -> WorkerResponse {
        self.dispatch(message, sender).into()
    }
}
