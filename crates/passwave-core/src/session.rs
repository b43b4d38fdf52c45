//! Session state access
//!
//! Only the background worker holds the authoritative session. Components
//! receive a [`SessionProvider`] handle at construction instead of reaching
//! for a process-wide singleton.

use crate::types::WorkerStatus;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Snapshot of the worker session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: WorkerStatus,
    pub logged_in: bool,
    pub user_id: Option<String>,
}

/// Read access to the session state
pub trait SessionProvider: Send + Sync {
    fn state(&self) -> SessionState;

    fn logged_in(&self) -> bool {
        self.state().logged_in
    }

    fn status(&self) -> WorkerStatus {
        self.state().status
    }
}

/// In-memory session owned by the background worker
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, status: WorkerStatus) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        log::debug!("[Session] status {:?} -> {:?}", state.status, status);
        state.status = status;
    }

    pub fn login(&self, user_id: impl Into<String>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.logged_in = true;
        state.user_id = Some(user_id.into());
        state.status = WorkerStatus::Ready;
        log::info!("[Session] logged in");
    }

    pub fn logout(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SessionState {
            status: WorkerStatus::Unauthorized,
            logged_in: false,
            user_id: None,
        };
        log::info!("[Session] logged out");
    }
}

impl SessionProvider for SessionStore {
    fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let session = SessionStore::new();
        assert!(!session.logged_in());
        assert!(session.status().is_stale());

        session.login("user-1");
        assert!(session.logged_in());
        assert!(session.status().is_ready());
        assert_eq!(session.state().user_id.as_deref(), Some("user-1"));

        session.logout();
        assert!(!session.logged_in());
        assert!(session.status().is_logged_out());
        assert_eq!(session.state().user_id, None);
    }
}
