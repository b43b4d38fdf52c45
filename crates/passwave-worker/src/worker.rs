//! Background worker
//!
//! Owns the session, the store and the message broker, and drives the session
//! lifecycle: login boots the store from the persisted snapshot, logout clears
//! the form tracker, resets the store and removes the snapshot. While a session
//! is active every dispatched action rewrites the snapshot, including outcomes
//! dispatched by background effects.

use crate::persistence::StatePersistence;
use passwave_broker::{handlers, MessageBroker, WorkerContext, WorkerMessage, WorkerResponse};
use passwave_core::{MessageSender, SessionProvider, SessionStore, WorkerConfig, WorkerStatus};
use passwave_forms::{AutoSaveResolver, WebRequestEvent};
use passwave_store::{creators, Effects, StoreHandle};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct Worker {
    session: Arc<SessionStore>,
    context: Arc<WorkerContext>,
    broker: MessageBroker,
    persistence: StatePersistence,
}

impl Worker {
    pub fn new(config: WorkerConfig, effects: Option<Arc<dyn Effects>>) -> Self {
        let store = match effects {
            Some(effects) => StoreHandle::default().with_effects(effects),
            None => StoreHandle::default(),
        };

        let session = Arc::new(SessionStore::new());
        let persistence = StatePersistence::new(&config);
        subscribe_persistence(&store, session.clone(), persistence.clone());

        let autosave = AutoSaveResolver::new(config.autosave.clone(), Arc::new(store.clone()));
        let context = Arc::new(WorkerContext::new(session.clone(), store, autosave));

        let mut broker = MessageBroker::new();
        handlers::register_all(&mut broker, context.clone());

        Self {
            session,
            context,
            broker,
            persistence,
        }
    }

    pub fn context(&self) -> &Arc<WorkerContext> {
        &self.context
    }

    pub fn status(&self) -> WorkerStatus {
        self.session.status()
    }

    pub fn store(&self) -> &StoreHandle {
        &self.context.store
    }

    /// Log `user_id` in and boot the store from the persisted snapshot
    pub fn login(&self, user_id: &str) {
        self.session.set_status(WorkerStatus::Booting);
        self.store().dispatch(creators::boot_intent());

        match self.persistence.load() {
            Ok(snapshot) => {
                let snapshot = snapshot.unwrap_or(serde_json::Value::Null);
                self.store().dispatch(creators::boot_success(snapshot));
                self.session.login(user_id);
                info!("Worker ready");
            }
            Err(e) => {
                error!("Boot failed: {}", e);
                self.store().dispatch(creators::boot_failure(&e.to_string()));
                self.session.set_status(WorkerStatus::Error);
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
        self.context.forms().clear();
        self.store().dispatch(creators::signout_success());

        if let Err(e) = self.persistence.remove() {
            warn!("Failed to remove persisted state: {}", e);
        }
    }

    pub fn handle_message(&self, message: WorkerMessage, sender: &MessageSender) -> WorkerResponse {
        self.broker.respond(message, sender)
    }

    pub fn handle_event(&self, event: &WebRequestEvent) -> usize {
        self.context.observe(event)
    }
}

/// Write the state tree to disk after each action while a session is active.
/// Boot runs before the session is marked logged in and logout marks it logged
/// out before resetting, so neither rewrites the snapshot.
fn subscribe_persistence(store: &StoreHandle, session: Arc<SessionStore>, persistence: StatePersistence) {
    store.subscribe(move |state, _action| {
        if !session.logged_in() {
            return;
        }

        if let Err(e) = persistence.save(state) {
            warn!("Failed to persist state: {}", e);
        }
    });
}
