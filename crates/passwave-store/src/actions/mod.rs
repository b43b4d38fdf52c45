//! Action envelope and decoration pipeline
//!
//! A base action `{type, payload}` is enriched by decorators that each own
//! one slice of `meta`:
//!
//! 1. `meta.request`     : ledger transition ([`Action::with_request`])
//! 2. `meta.optimisticId`: optimistic history id ([`Action::with_optimistic_id`])
//! 3. `meta.notification`: user-facing notice ([`Action::with_notification`])
//! 4. `meta.callback`    : completion hook, never serialized ([`Action::with_callback`])
//!
//! Request decoration must run before notification decoration when both are
//! used: the notification copies the attached request id so a failure notice
//! can be matched to its ledger slot.

pub mod creators;

use crate::model::{AliasMailbox, AliasOptions, Address, Item, ItemContent, Share, User, VaultContent};
use crate::request::RequestMeta;
use passwave_core::{ExtensionOrigin, TabId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ActionKind {
    BootIntent,
    BootSuccess {
        state: serde_json::Value,
    },
    BootFailure,

    WakeupIntent {
        origin: ExtensionOrigin,
        tab_id: TabId,
    },
    WakeupSuccess {
        origin: ExtensionOrigin,
        tab_id: TabId,
        state: serde_json::Value,
    },
    WakeupFailure {
        origin: ExtensionOrigin,
        tab_id: TabId,
    },

    SignoutIntent,
    SignoutSuccess,

    Acknowledge {
        request_id: String,
    },

    VaultCreationIntent {
        id: String,
        content: VaultContent,
    },
    VaultCreationSuccess {
        id: String,
        share: Share,
    },
    VaultCreationFailure {
        id: String,
        content: VaultContent,
    },

    VaultEditIntent {
        share_id: String,
        content: VaultContent,
    },
    VaultEditSuccess {
        share_id: String,
        share: Share,
    },
    VaultEditFailure {
        share_id: String,
    },

    VaultDeleteIntent {
        share_id: String,
    },
    VaultDeleteSuccess {
        share_id: String,
    },
    VaultDeleteFailure {
        share_id: String,
    },

    ItemCreationIntent {
        share_id: String,
        optimistic_id: String,
        content: ItemContent,
    },
    ItemCreationSuccess {
        share_id: String,
        optimistic_id: String,
        item: Item,
    },
    ItemCreationFailure {
        share_id: String,
        optimistic_id: String,
    },
    ItemCreationDismiss {
        share_id: String,
        optimistic_id: String,
    },
    ItemsSynced {
        items: Vec<Item>,
    },

    AliasOptionsRequested {
        share_id: String,
    },
    AliasOptionsSuccess {
        options: AliasOptions,
    },
    AliasOptionsFailure,

    AliasDetailsRequested {
        share_id: String,
        item_id: String,
        alias_email: String,
    },
    AliasDetailsSuccess {
        alias_email: String,
        mailboxes: Vec<AliasMailbox>,
    },
    AliasDetailsFailure {
        alias_email: String,
    },
    AliasDetailsEditSuccess {
        alias_email: String,
        mailboxes: Vec<AliasMailbox>,
    },

    UserSynced {
        user: User,
    },
    AddressesSynced {
        addresses: Vec<Address>,
    },
    EventsCursorUpdated {
        event_id: String,
    },
}

impl ActionKind {
    /// Wire name of the action type
    pub fn name(&self) -> &'static str {
        match self {
            Self::BootIntent => "bootIntent",
            Self::BootSuccess { .. } => "bootSuccess",
            Self::BootFailure => "bootFailure",
            Self::WakeupIntent { .. } => "wakeupIntent",
            Self::WakeupSuccess { .. } => "wakeupSuccess",
            Self::WakeupFailure { .. } => "wakeupFailure",
            Self::SignoutIntent => "signoutIntent",
            Self::SignoutSuccess => "signoutSuccess",
            Self::Acknowledge { .. } => "acknowledge",
            Self::VaultCreationIntent { .. } => "vaultCreationIntent",
            Self::VaultCreationSuccess { .. } => "vaultCreationSuccess",
            Self::VaultCreationFailure { .. } => "vaultCreationFailure",
            Self::VaultEditIntent { .. } => "vaultEditIntent",
            Self::VaultEditSuccess { .. } => "vaultEditSuccess",
            Self::VaultEditFailure { .. } => "vaultEditFailure",
            Self::VaultDeleteIntent { .. } => "vaultDeleteIntent",
            Self::VaultDeleteSuccess { .. } => "vaultDeleteSuccess",
            Self::VaultDeleteFailure { .. } => "vaultDeleteFailure",
            Self::ItemCreationIntent { .. } => "itemCreationIntent",
            Self::ItemCreationSuccess { .. } => "itemCreationSuccess",
            Self::ItemCreationFailure { .. } => "itemCreationFailure",
            Self::ItemCreationDismiss { .. } => "itemCreationDismiss",
            Self::ItemsSynced { .. } => "itemsSynced",
            Self::AliasOptionsRequested { .. } => "aliasOptionsRequested",
            Self::AliasOptionsSuccess { .. } => "aliasOptionsSuccess",
            Self::AliasOptionsFailure => "aliasOptionsFailure",
            Self::AliasDetailsRequested { .. } => "aliasDetailsRequested",
            Self::AliasDetailsSuccess { .. } => "aliasDetailsSuccess",
            Self::AliasDetailsFailure { .. } => "aliasDetailsFailure",
            Self::AliasDetailsEditSuccess { .. } => "aliasDetailsEditSuccess",
            Self::UserSynced { .. } => "userSynced",
            Self::AddressesSynced { .. } => "addressesSynced",
            Self::EventsCursorUpdated { .. } => "eventsCursorUpdated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Ledger slot of the request this notice reports on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl Notification {
    pub fn error(text: impl Into<String>, error: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
            error,
            request_id: None,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
            error: None,
            request_id: None,
        }
    }
}

/// Completion hook carried by intent actions. Lives only in the dispatching
/// context and is dropped when the action is serialized.
#[derive(Clone)]
pub struct ActionCallback(Arc<dyn Fn(&Action) + Send + Sync>);

impl ActionCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Action) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, action: &Action) {
        (self.0)(action)
    }
}

impl fmt::Debug for ActionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionCallback")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimistic_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip)]
    pub callback: Option<ActionCallback>,
}

impl PartialEq for ActionMeta {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request
            && self.optimistic_id == other.optimistic_id
            && self.notification == other.notification
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(default)]
    pub meta: ActionMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Self::new(kind)
    }
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            meta: ActionMeta::default(),
            error: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn with_request(mut self, request: RequestMeta) -> Self {
        self.meta.request = Some(request);
        self
    }

    pub fn with_optimistic_id(mut self, id: impl Into<String>) -> Self {
        self.meta.optimistic_id = Some(id.into());
        self
    }

    pub fn with_notification(mut self, mut notification: Notification) -> Self {
        if notification.request_id.is_none() {
            notification.request_id = self.meta.request.as_ref().map(|r| r.id.clone());
        }
        self.meta.notification = Some(notification);
        self
    }

    pub fn with_callback(mut self, callback: Option<ActionCallback>) -> Self {
        self.meta.callback = callback;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn request_id(&self) -> Option<&str> {
        self.meta.request.as_ref().map(|r| r.id.as_str())
    }

    pub fn callback(&self) -> Option<&ActionCallback> {
        self.meta.callback.as_ref()
    }

    /// Copy suitable for storing in history or shipping to another context
    pub fn without_callback(&self) -> Self {
        let mut action = self.clone();
        action.meta.callback = None;
        action
    }
}

/// A single decoration stage
pub type Decorator = Box<dyn FnOnce(Action) -> Action + Send>;

pub fn with_request(request: RequestMeta) -> Decorator {
    Box::new(move |action| action.with_request(request))
}

pub fn with_optimistic_id(id: impl Into<String>) -> Decorator {
    let id = id.into();
    Box::new(move |action| action.with_optimistic_id(id))
}

pub fn with_notification(notification: Notification) -> Decorator {
    Box::new(move |action| action.with_notification(notification))
}

pub fn with_callback(callback: Option<ActionCallback>) -> Decorator {
    Box::new(move |action| action.with_callback(callback))
}

/// Compose decorators left to right
pub fn pipe(decorators: Vec<Decorator>) -> Decorator {
    Box::new(move |action| decorators.into_iter().fold(action, |acc, decorate| decorate(acc)))
}

/// Fresh id for an optimistic mutation
pub fn new_optimistic_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
