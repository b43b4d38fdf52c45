//! Request ledger
//!
//! Tracks the lifecycle of in-flight asynchronous operations. Each operation
//! is keyed by a request id derived from what the operation does (see
//! [`ids`]), so retries of the same logical operation land on one slot.

use crate::actions::{Action, ActionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Start,
    Success,
    Failure,
}

/// Request metadata attached to an action's `meta.request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    pub id: String,
    #[serde(rename = "type")]
    pub status: RequestStatus,
}

impl RequestMeta {
    pub fn start(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RequestStatus::Start,
        }
    }

    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RequestStatus::Success,
        }
    }

    pub fn failure(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RequestStatus::Failure,
        }
    }
}

/// id -> status, one slot per id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestState(BTreeMap<String, RequestStatus>);

impl RequestState {
    pub fn get(&self, id: &str) -> Option<RequestStatus> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.get(id) == Some(RequestStatus::Start)
    }

    fn set(mut self, id: &str, status: RequestStatus) -> Self {
        self.0.insert(id.to_string(), status);
        self
    }

    pub fn start(self, id: &str) -> Self {
        self.set(id, RequestStatus::Start)
    }

    pub fn success(self, id: &str) -> Self {
        self.set(id, RequestStatus::Success)
    }

    pub fn failure(self, id: &str) -> Self {
        self.set(id, RequestStatus::Failure)
    }

    pub fn acknowledge(mut self, id: &str) -> Self {
        self.0.remove(id);
        self
    }

    /// Drop every pending slot, keeping terminal statuses
    pub fn settled(mut self) -> Self {
        self.0.retain(|_, status| *status != RequestStatus::Start);
        self
    }
}

/// Ledger slice reducer
pub fn reduce(state: RequestState, action: &Action) -> RequestState {
    if let ActionKind::Acknowledge { request_id } = &action.kind {
        return state.acknowledge(request_id);
    }

    match action.meta.request.as_ref() {
        Some(RequestMeta { id, status }) => match status {
            RequestStatus::Start => state.start(id),
            RequestStatus::Success => state.success(id),
            RequestStatus::Failure => state.failure(id),
        },
        None => state,
    }
}

/// Deterministic request ids
pub mod ids {
    use passwave_core::{ExtensionOrigin, TabId};

    pub fn boot() -> String {
        "boot".to_string()
    }

    pub fn syncing() -> String {
        "syncing".to_string()
    }

    pub fn wakeup(origin: ExtensionOrigin, tab_id: TabId) -> String {
        format!("wakeup-{}-{}", origin, tab_id)
    }

    pub fn shares() -> String {
        "shares".to_string()
    }

    pub fn vault_create(vault_id: &str) -> String {
        format!("vault-create-request-{}", vault_id)
    }

    pub fn vault_edit(vault_id: &str) -> String {
        format!("vault-edit-request-{}", vault_id)
    }

    pub fn vault_delete(vault_id: &str) -> String {
        format!("vault-delete-request-{}", vault_id)
    }

    pub fn items() -> String {
        "items".to_string()
    }

    pub fn import_items() -> String {
        "import-items".to_string()
    }

    pub fn alias_options() -> String {
        "alias-options".to_string()
    }

    pub fn alias_details(alias_email: &str) -> String {
        format!("alias-details-{}", alias_email)
    }
}
