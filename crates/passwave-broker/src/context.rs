//! Worker context
//!
//! Everything a message handler may touch, passed explicitly to the handlers
//! at registration time.

use passwave_core::{PasswaveError, PasswaveResult, SessionProvider};
use passwave_forms::{AutoSaveResolver, FormSubmissionTracker, RequestObserver, WebRequestEvent};
use passwave_store::StoreHandle;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct WorkerContext {
    pub session: Arc<dyn SessionProvider>,
    pub store: StoreHandle,
    pub autosave: AutoSaveResolver,
    forms: Mutex<FormSubmissionTracker>,
    observer: RequestObserver,
}

impl WorkerContext {
    pub fn new(session: Arc<dyn SessionProvider>, store: StoreHandle, autosave: AutoSaveResolver) -> Self {
        Self {
            session,
            store,
            autosave,
            forms: Mutex::new(FormSubmissionTracker::new()),
            observer: RequestObserver::new(),
        }
    }

    pub fn forms(&self) -> MutexGuard<'_, FormSubmissionTracker> {
        self.forms.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fails with `message` unless a user is logged in
    pub fn ensure_logged_in(&self, message: &str) -> PasswaveResult<()> {
        if self.session.logged_in() {
            Ok(())
        } else {
            Err(PasswaveError::unauthorized(message))
        }
    }

    /// Feed a browser web-request event to the form tracker
    pub fn observe(&self, event: &WebRequestEvent) -> usize {
        self.observer.observe(&mut self.forms(), event)
    }
}
