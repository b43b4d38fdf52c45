//! Worker message vocabulary
//!
//! Messages travel as JSON tagged by `"type"`; field names are camelCase.

use passwave_core::{ExtensionOrigin, PasswaveResult, TabId, WorkerStatus};
use passwave_forms::{FormDataUpdate, FormType};
use passwave_store::{creators, Action};
use serde::{Deserialize, Serialize};

/// Message sent by a content script, popup or page to the background worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum WorkerMessage {
    // Form submissions
    StageFormSubmission {
        payload: StagePayload,
        #[serde(default)]
        reason: String,
    },
    StashFormSubmission {
        #[serde(default)]
        reason: String,
    },
    CommitFormSubmission {
        #[serde(default)]
        reason: String,
    },
    RequestFormSubmission,

    // Worker lifecycle
    Wakeup {
        origin: ExtensionOrigin,
    },
    ResolveWorkerStatus,

    /// Action dispatched by another context into the worker store
    StoreAction {
        action: Action,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePayload {
    #[serde(rename = "type")]
    pub form_type: FormType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub data: FormDataUpdate,
}

/// Registry key of a [`WorkerMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessageType {
    StageFormSubmission,
    StashFormSubmission,
    CommitFormSubmission,
    RequestFormSubmission,
    Wakeup,
    ResolveWorkerStatus,
    StoreAction,
}

impl WorkerMessage {
    pub fn message_type(&self) -> WorkerMessageType {
        match self {
            Self::StageFormSubmission { .. } => WorkerMessageType::StageFormSubmission,
            Self::StashFormSubmission { .. } => WorkerMessageType::StashFormSubmission,
            Self::CommitFormSubmission { .. } => WorkerMessageType::CommitFormSubmission,
            Self::RequestFormSubmission => WorkerMessageType::RequestFormSubmission,
            Self::Wakeup { .. } => WorkerMessageType::Wakeup,
            Self::ResolveWorkerStatus => WorkerMessageType::ResolveWorkerStatus,
            Self::StoreAction { .. } => WorkerMessageType::StoreAction,
        }
    }
}

/// Response returned to the sending context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerResponse {
    Success { data: serde_json::Value },
    Error { message: String },
}

impl WorkerResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        WorkerResponse::Success {
            data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        WorkerResponse::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WorkerResponse::Success { .. })
    }
}

impl From<Result<serde_json::Value, String>> for WorkerResponse {
    fn from(result: Result<serde_json::Value, String>) -> Self {
        match result {
            Ok(data) => WorkerResponse::Success { data },
            Err(message) => WorkerResponse::Error { message },
        }
    }
}

/// Data of a successful `WAKEUP` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeupResponse {
    pub status: WorkerStatus,
    pub state: serde_json::Value,
}

impl WakeupResponse {
    /// Action the waking context dispatches into its own store
    pub fn into_action(self, origin: ExtensionOrigin, tab_id: TabId) -> Action {
        creators::wakeup_success(origin, tab_id, self.state)
    }

    pub fn from_data(data: serde_json::Value) -> PasswaveResult<Self> {
        Ok(serde_json::from_value(data)?)
    }
}
