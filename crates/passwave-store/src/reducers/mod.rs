//! Root reducer
//!
//! Combines the per-domain slice reducers into one state tree. Two actions
//! bypass plain slice reduction:
//!
//! * `BootSuccess` / `WakeupSuccess` carry an authoritative state snapshot that
//!   is deep-merged into the current tree (snapshot wins on shared keys)
//!   before the slices see the action. This is how a freshly opened popup or
//!   content script catches up with the background worker. Optimistic history
//!   never survives the merge, and on boot neither do pending requests: no
//!   effect is left running to settle them.
//! * `SignoutSuccess` resets every slice to its initial value, dropping all
//!   pending optimistic history.

pub mod addresses;
pub mod alias;
pub mod events;
pub mod items;
pub mod shares;
pub mod user;

use crate::actions::{Action, ActionKind};
use crate::request::{self, RequestState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use addresses::AddressesState;
pub use alias::AliasState;
pub use events::EventsState;
pub use items::{ItemsState, OptimisticItems, ITEMS};
pub use shares::{OptimisticShares, SharesState, SHARES};
pub use user::UserState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub alias: AliasState,
    pub addresses: AddressesState,
    pub events: EventsState,
    pub items: OptimisticItems,
    pub request: RequestState,
    pub shares: OptimisticShares,
    pub user: UserState,
}

impl State {
    /// Serialized copy handed to other contexts
    pub fn snapshot(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            log::error!("[Store::Snapshot] failed to serialize state: {}", e);
            Value::Null
        })
    }
}

fn combine(state: State, action: &Action) -> State {
    State {
        alias: alias::reduce(state.alias, action),
        addresses: addresses::reduce(state.addresses, action),
        events: events::reduce(state.events, action),
        items: ITEMS.reduce(state.items, action),
        request: request::reduce(state.request, action),
        shares: SHARES.reduce(state.shares, action),
        user: user::reduce(state.user, action),
    }
}

pub fn root_reducer(state: State, action: &Action) -> State {
    match &action.kind {
        ActionKind::SignoutSuccess => combine(State::default(), action),
        ActionKind::BootSuccess { state: snapshot } => {
            let mut merged = without_history(merge_snapshot(state, snapshot));
            merged.request = merged.request.settled();
            combine(merged, action)
        }
        ActionKind::WakeupSuccess {
            state: snapshot, ..
        } => combine(without_history(merge_snapshot(state, snapshot)), action),
        _ => combine(state, action),
    }
}

fn without_history(mut state: State) -> State {
    state.items.history.clear();
    state.shares.history.clear();
    state
}

/// Deep-merge `snapshot` over `state`. Objects merge key by key; any other
/// value in the snapshot (arrays included) replaces the local one. A snapshot
/// that does not fit the state shape is discarded.
pub fn merge_snapshot(state: State, snapshot: &Value) -> State {
    if snapshot.is_null() {
        return state;
    }

    let mut merged = match serde_json::to_value(&state) {
        Ok(value) => value,
        Err(e) => {
            log::error!("[Store::Merge] failed to serialize state: {}", e);
            return state;
        }
    };

    deep_merge(&mut merged, snapshot);

    match serde_json::from_value(merged) {
        Ok(next) => next,
        Err(e) => {
            log::error!("[Store::Merge] discarding incompatible snapshot: {}", e);
            state
        }
    }
}

fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::creators;
    use crate::model::{Share, ShareType, User, VaultContent};
    use crate::request::{ids, RequestStatus};
    use passwave_core::{ExtensionOrigin, TabId};
    use serde_json::json;

    fn vault(id: &str, name: &str) -> Share {
        Share {
            share_id: id.into(),
            vault_id: id.into(),
            share_type: ShareType::Vault,
            content: VaultContent {
                name: name.into(),
                description: String::new(),
            },
            owner: true,
            optimistic: false,
        }
    }

    #[test]
    fn test_unknown_action_reaches_every_slice_unchanged() {
        let state = root_reducer(State::default(), &creators::events_cursor_updated("e1"));
        assert_eq!(state.events.event_id.as_deref(), Some("e1"));
        assert_eq!(state.items, OptimisticItems::default());
        assert_eq!(state.shares, OptimisticShares::default());
    }

    #[test]
    fn test_boot_success_merges_snapshot() {
        let local = root_reducer(State::default(), &creators::events_cursor_updated("local"));
        let local = root_reducer(
            local,
            &creators::user_synced(User {
                id: "u1".into(),
                email: "u1@example.com".into(),
                display_name: None,
            }),
        );

        let mut remote = State::default();
        remote.shares.checkpoint.0.insert("s1".into(), vault("s1", "Personal"));
        remote.events.event_id = Some("remote".into());
        let snapshot = serde_json::to_value(&remote).unwrap();

        let state = root_reducer(local, &creators::boot_success(json!({
            "shares": snapshot["shares"].clone(),
            "events": snapshot["events"].clone(),
        })));

        assert_eq!(state.events.event_id.as_deref(), Some("remote"));
        assert!(state.shares.checkpoint.get("s1").is_some());
        assert_eq!(state.user.0.as_ref().unwrap().id, "u1");
        assert_eq!(state.request.get(&ids::boot()), Some(RequestStatus::Success));
    }

    #[test]
    fn test_wakeup_success_replaces_history() {
        let local = root_reducer(
            State::default(),
            &creators::vault_creation_intent("tmp", VaultContent::default(), None),
        );
        assert_eq!(local.shares.history.len(), 1);

        let remote = State::default();
        let state = root_reducer(
            local,
            &creators::wakeup_success(ExtensionOrigin::Popup, TabId(2), remote.snapshot()),
        );
        assert!(state.shares.history.is_empty());
    }

    #[test]
    fn test_boot_from_snapshot_with_pending_intent() {
        let saved = root_reducer(
            State::default(),
            &creators::vault_creation_intent("tmp", VaultContent::default(), None),
        );
        assert_eq!(saved.shares.history.len(), 1);
        assert!(saved.request.is_pending(&ids::vault_create("tmp")));

        let state = root_reducer(State::default(), &creators::boot_success(saved.snapshot()));
        assert!(state.shares.history.is_empty());
        assert!(state.items.history.is_empty());
        assert_eq!(state.request.get(&ids::vault_create("tmp")), None);
        assert_eq!(state.request.get(&ids::boot()), Some(RequestStatus::Success));
    }

    #[test]
    fn test_wakeup_snapshot_history_is_dropped() {
        let remote = root_reducer(
            State::default(),
            &creators::vault_creation_intent("tmp", VaultContent::default(), None),
        );

        let state = root_reducer(
            State::default(),
            &creators::wakeup_success(ExtensionOrigin::Popup, TabId(2), remote.snapshot()),
        );
        assert!(state.shares.history.is_empty());
        assert!(state.request.is_pending(&ids::vault_create("tmp")));
    }

    #[test]
    fn test_late_confirmation_after_signout_is_ignored() {
        let state = root_reducer(
            State::default(),
            &creators::vault_creation_intent("tmp", VaultContent::default(), None),
        );
        let state = root_reducer(state, &creators::signout_success());

        let state = root_reducer(state, &creators::vault_creation_success("tmp", vault("old-share", "Old")));
        assert!(state.shares.checkpoint.get("old-share").is_none());
        assert!(state.shares.history.is_empty());

        // the saga acknowledges right after dispatching the outcome
        let state = root_reducer(state, &creators::acknowledge(ids::vault_create("tmp")));
        assert_eq!(state, State::default());
    }

    #[test]
    fn test_incompatible_snapshot_is_discarded() {
        let local = root_reducer(State::default(), &creators::events_cursor_updated("keep"));
        let state = root_reducer(
            local,
            &creators::boot_success(json!({ "events": { "eventId": 42 } })),
        );
        assert_eq!(state.events.event_id.as_deref(), Some("keep"));
    }

    #[test]
    fn test_signout_resets_everything() {
        let state = root_reducer(
            State::default(),
            &creators::vault_creation_intent("tmp", VaultContent::default(), None),
        );
        let state = root_reducer(state, &creators::events_cursor_updated("e1"));

        let state = root_reducer(state, &creators::signout_success());
        assert_eq!(state, State::default());
    }

    #[test]
    fn test_deep_merge_keeps_local_only_keys() {
        let mut target = json!({ "a": { "x": 1, "y": 2 }, "list": [1, 2, 3] });
        deep_merge(&mut target, &json!({ "a": { "y": 20, "z": 30 }, "list": [9] }));
        assert_eq!(target, json!({ "a": { "x": 1, "y": 20, "z": 30 }, "list": [9] }));
    }
}
