//! Action creators
//!
//! Each asynchronous domain operation comes as an intent / success / failure
//! triple sharing one deterministic request id.

use super::{Action, ActionCallback, ActionKind, Notification};
use crate::model::{Address, AliasMailbox, AliasOptions, Item, ItemContent, Share, User, VaultContent};
use crate::request::{ids, RequestMeta};
use passwave_core::{ExtensionOrigin, TabId};

fn error_notification(text: &str, error: &str) -> Notification {
    Notification::error(text, Some(error.to_string()))
}

pub fn acknowledge(request_id: impl Into<String>) -> Action {
    Action::new(ActionKind::Acknowledge {
        request_id: request_id.into(),
    })
}

// Boot / wakeup / signout

pub fn boot_intent() -> Action {
    Action::new(ActionKind::BootIntent).with_request(RequestMeta::start(ids::boot()))
}

pub fn boot_success(state: serde_json::Value) -> Action {
    Action::new(ActionKind::BootSuccess { state }).with_request(RequestMeta::success(ids::boot()))
}

pub fn boot_failure(error: &str) -> Action {
    Action::new(ActionKind::BootFailure)
        .with_request(RequestMeta::failure(ids::boot()))
        .with_notification(error_notification("Unable to boot", error))
        .with_error(error)
}

pub fn wakeup_intent(origin: ExtensionOrigin, tab_id: TabId) -> Action {
    Action::new(ActionKind::WakeupIntent { origin, tab_id })
        .with_request(RequestMeta::start(ids::wakeup(origin, tab_id)))
}

pub fn wakeup_success(origin: ExtensionOrigin, tab_id: TabId, state: serde_json::Value) -> Action {
    Action::new(ActionKind::WakeupSuccess {
        origin,
        tab_id,
        state,
    })
    .with_request(RequestMeta::success(ids::wakeup(origin, tab_id)))
}

pub fn wakeup_failure(origin: ExtensionOrigin, tab_id: TabId, error: &str) -> Action {
    Action::new(ActionKind::WakeupFailure { origin, tab_id })
        .with_request(RequestMeta::failure(ids::wakeup(origin, tab_id)))
        .with_error(error)
}

pub fn signout_intent() -> Action {
    Action::new(ActionKind::SignoutIntent)
}

pub fn signout_success() -> Action {
    Action::new(ActionKind::SignoutSuccess)
}

// Vaults

pub fn vault_creation_intent(
    id: impl Into<String>,
    content: VaultContent,
    callback: Option<ActionCallback>,
) -> Action {
    let id = id.into();
    Action::new(ActionKind::VaultCreationIntent {
        id: id.clone(),
        content,
    })
    .with_request(RequestMeta::start(ids::vault_create(&id)))
    .with_optimistic_id(id)
    .with_callback(callback)
}

pub fn vault_creation_success(id: impl Into<String>, share: Share) -> Action {
    let id = id.into();
    let name = share.content.name.clone();
    Action::new(ActionKind::VaultCreationSuccess {
        id: id.clone(),
        share,
    })
    .with_request(RequestMeta::success(ids::vault_create(&id)))
    .with_optimistic_id(id)
    .with_notification(Notification::success(format!("Vault \"{}\" successfully created", name)))
}

pub fn vault_creation_failure(id: impl Into<String>, content: VaultContent, error: &str) -> Action {
    let id = id.into();
    let text = format!("Creating vault \"{}\" failed", content.name);
    Action::new(ActionKind::VaultCreationFailure {
        id: id.clone(),
        content,
    })
    .with_request(RequestMeta::failure(ids::vault_create(&id)))
    .with_optimistic_id(id)
    .with_notification(error_notification(&text, error))
    .with_error(error)
}

pub fn vault_edit_intent(share_id: impl Into<String>, content: VaultContent) -> Action {
    let share_id = share_id.into();
    Action::new(ActionKind::VaultEditIntent {
        share_id: share_id.clone(),
        content,
    })
    .with_request(RequestMeta::start(ids::vault_edit(&share_id)))
    .with_optimistic_id(ids::vault_edit(&share_id))
}

pub fn vault_edit_success(share: Share) -> Action {
    let share_id = share.share_id.clone();
    Action::new(ActionKind::VaultEditSuccess {
        share_id: share_id.clone(),
        share,
    })
    .with_request(RequestMeta::success(ids::vault_edit(&share_id)))
    .with_optimistic_id(ids::vault_edit(&share_id))
}

pub fn vault_edit_failure(share_id: impl Into<String>, error: &str) -> Action {
    let share_id = share_id.into();
    Action::new(ActionKind::VaultEditFailure {
        share_id: share_id.clone(),
    })
    .with_request(RequestMeta::failure(ids::vault_edit(&share_id)))
    .with_optimistic_id(ids::vault_edit(&share_id))
    .with_notification(error_notification("Updating vault failed", error))
    .with_error(error)
}

pub fn vault_delete_intent(share_id: impl Into<String>) -> Action {
    let share_id = share_id.into();
    Action::new(ActionKind::VaultDeleteIntent {
        share_id: share_id.clone(),
    })
    .with_request(RequestMeta::start(ids::vault_delete(&share_id)))
    .with_optimistic_id(ids::vault_delete(&share_id))
}

pub fn vault_delete_success(share_id: impl Into<String>) -> Action {
    let share_id = share_id.into();
    Action::new(ActionKind::VaultDeleteSuccess {
        share_id: share_id.clone(),
    })
    .with_request(RequestMeta::success(ids::vault_delete(&share_id)))
    .with_optimistic_id(ids::vault_delete(&share_id))
}

pub fn vault_delete_failure(share_id: impl Into<String>, error: &str) -> Action {
    let share_id = share_id.into();
    Action::new(ActionKind::VaultDeleteFailure {
        share_id: share_id.clone(),
    })
    .with_request(RequestMeta::failure(ids::vault_delete(&share_id)))
    .with_optimistic_id(ids::vault_delete(&share_id))
    .with_notification(error_notification("Deleting vault failed", error))
    .with_error(error)
}

// Items

pub fn item_creation_intent(
    share_id: impl Into<String>,
    optimistic_id: impl Into<String>,
    content: ItemContent,
    callback: Option<ActionCallback>,
) -> Action {
    let optimistic_id = optimistic_id.into();
    Action::new(ActionKind::ItemCreationIntent {
        share_id: share_id.into(),
        optimistic_id: optimistic_id.clone(),
        content,
    })
    .with_optimistic_id(optimistic_id)
    .with_callback(callback)
}

pub fn item_creation_success(optimistic_id: impl Into<String>, item: Item) -> Action {
    let optimistic_id = optimistic_id.into();
    Action::new(ActionKind::ItemCreationSuccess {
        share_id: item.share_id.clone(),
        optimistic_id: optimistic_id.clone(),
        item,
    })
    .with_optimistic_id(optimistic_id)
}

pub fn item_creation_failure(
    share_id: impl Into<String>,
    optimistic_id: impl Into<String>,
    error: &str,
) -> Action {
    let optimistic_id = optimistic_id.into();
    Action::new(ActionKind::ItemCreationFailure {
        share_id: share_id.into(),
        optimistic_id: optimistic_id.clone(),
    })
    .with_optimistic_id(optimistic_id)
    .with_notification(error_notification("Item creation failed", error))
    .with_error(error)
}

pub fn item_creation_dismiss(share_id: impl Into<String>, optimistic_id: impl Into<String>) -> Action {
    let optimistic_id = optimistic_id.into();
    Action::new(ActionKind::ItemCreationDismiss {
        share_id: share_id.into(),
        optimistic_id: optimistic_id.clone(),
    })
    .with_optimistic_id(optimistic_id)
}

pub fn items_synced(items: Vec<Item>) -> Action {
    Action::new(ActionKind::ItemsSynced { items }).with_request(RequestMeta::success(ids::items()))
}

// Aliases

pub fn alias_options_requested(share_id: impl Into<String>, callback: Option<ActionCallback>) -> Action {
    Action::new(ActionKind::AliasOptionsRequested {
        share_id: share_id.into(),
    })
    .with_request(RequestMeta::start(ids::alias_options()))
    .with_callback(callback)
}

pub fn alias_options_success(options: AliasOptions) -> Action {
    Action::new(ActionKind::AliasOptionsSuccess { options })
        .with_request(RequestMeta::success(ids::alias_options()))
}

pub fn alias_options_failure(error: &str) -> Action {
    Action::new(ActionKind::AliasOptionsFailure)
        .with_request(RequestMeta::failure(ids::alias_options()))
        .with_notification(error_notification("Requesting alias options failed", error))
        .with_error(error)
}

pub fn alias_details_requested(
    share_id: impl Into<String>,
    item_id: impl Into<String>,
    alias_email: impl Into<String>,
) -> Action {
    let alias_email = alias_email.into();
    Action::new(ActionKind::AliasDetailsRequested {
        share_id: share_id.into(),
        item_id: item_id.into(),
        alias_email: alias_email.clone(),
    })
    .with_request(RequestMeta::start(ids::alias_details(&alias_email)))
}

pub fn alias_details_success(alias_email: impl Into<String>, mailboxes: Vec<AliasMailbox>) -> Action {
    let alias_email = alias_email.into();
    Action::new(ActionKind::AliasDetailsSuccess {
        alias_email: alias_email.clone(),
        mailboxes,
    })
    .with_request(RequestMeta::success(ids::alias_details(&alias_email)))
}

pub fn alias_details_failure(alias_email: impl Into<String>, error: &str) -> Action {
    let alias_email = alias_email.into();
    Action::new(ActionKind::AliasDetailsFailure {
        alias_email: alias_email.clone(),
    })
    .with_request(RequestMeta::failure(ids::alias_details(&alias_email)))
    .with_notification(error_notification("Requesting alias details failed", error))
    .with_error(error)
}

pub fn alias_details_edit_success(alias_email: impl Into<String>, mailboxes: Vec<AliasMailbox>) -> Action {
    Action::new(ActionKind::AliasDetailsEditSuccess {
        alias_email: alias_email.into(),
        mailboxes,
    })
}

// Sync

pub fn user_synced(user: User) -> Action {
    Action::new(ActionKind::UserSynced { user })
}

pub fn addresses_synced(addresses: Vec<Address>) -> Action {
    Action::new(ActionKind::AddressesSynced { addresses })
}

pub fn events_cursor_updated(event_id: impl Into<String>) -> Action {
    Action::new(ActionKind::EventsCursorUpdated {
        event_id: event_id.into(),
    })
}
