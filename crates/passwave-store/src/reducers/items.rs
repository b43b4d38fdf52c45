//! Items, grouped by share

use crate::actions::{Action, ActionKind};
use crate::model::{Item, ItemContent};
use crate::optimistic::{OptimisticMatchers, OptimisticReducer, OptimisticState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// share id -> item id -> item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemsState(pub BTreeMap<String, BTreeMap<String, Item>>);

impl ItemsState {
    pub fn get(&self, share_id: &str, item_id: &str) -> Option<&Item> {
        self.0.get(share_id).and_then(|items| items.get(item_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.0.values().flat_map(|items| items.values())
    }

    pub fn logins(&self) -> impl Iterator<Item = &Item> {
        self.iter()
            .filter(|item| matches!(item.content, ItemContent::Login { .. }))
    }

    fn insert(&mut self, item: Item) {
        self.0
            .entry(item.share_id.clone())
            .or_default()
            .insert(item.item_id.clone(), item);
    }

    fn remove(&mut self, share_id: &str, item_id: &str) {
        if let Some(items) = self.0.get_mut(share_id) {
            items.remove(item_id);
            if items.is_empty() {
                self.0.remove(share_id);
            }
        }
    }
}

pub type OptimisticItems = OptimisticState<ItemsState, Action>;

fn reduce(mut state: ItemsState, action: &Action) -> ItemsState {
    match &action.kind {
        ActionKind::ItemCreationIntent {
            share_id,
            optimistic_id,
            content,
        } => state.insert(Item {
            item_id: optimistic_id.clone(),
            share_id: share_id.clone(),
            revision: 0,
            content: content.clone(),
            optimistic: true,
        }),
        ActionKind::ItemCreationSuccess {
            share_id,
            optimistic_id,
            item,
        } => {
            state.remove(share_id, optimistic_id);
            state.insert(item.clone());
        }
        ActionKind::ItemsSynced { items } => {
            state = ItemsState::default();
            for item in items {
                state.insert(item.clone());
            }
        }
        ActionKind::VaultDeleteSuccess { share_id } => {
            state.0.remove(share_id);
        }
        _ => {}
    }
    state
}

pub const ITEMS: OptimisticReducer<ItemsState> = OptimisticReducer {
    matchers: OptimisticMatchers {
        initiate: |kind| matches!(kind, ActionKind::ItemCreationIntent { .. }),
        commit: |kind| matches!(kind, ActionKind::ItemCreationSuccess { .. }),
        fail: |kind| matches!(kind, ActionKind::ItemCreationFailure { .. }),
        revert: |kind| matches!(kind, ActionKind::ItemCreationDismiss { .. }),
        skip_failed: |_| false,
    },
    reducer: reduce,
};
