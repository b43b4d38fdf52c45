//! Shares (vaults)

use crate::actions::{Action, ActionKind};
use crate::model::{Share, ShareType};
use crate::optimistic::{OptimisticMatchers, OptimisticReducer, OptimisticState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharesState(pub BTreeMap<String, Share>);

impl SharesState {
    pub fn get(&self, share_id: &str) -> Option<&Share> {
        self.0.get(share_id)
    }

    pub fn vaults(&self) -> impl Iterator<Item = &Share> {
        self.0
            .values()
            .filter(|share| share.share_type == ShareType::Vault)
    }
}

pub type OptimisticShares = OptimisticState<SharesState, Action>;

fn reduce(mut state: SharesState, action: &Action) -> SharesState {
    match &action.kind {
        ActionKind::VaultCreationIntent { id, content } => {
            state.0.insert(
                id.clone(),
                Share {
                    share_id: id.clone(),
                    vault_id: id.clone(),
                    share_type: ShareType::Vault,
                    content: content.clone(),
                    owner: true,
                    optimistic: true,
                },
            );
        }
        ActionKind::VaultCreationSuccess { id, share } => {
            state.0.remove(id);
            state.0.insert(share.share_id.clone(), share.clone());
        }
        ActionKind::VaultEditIntent { share_id, content } => {
            if let Some(share) = state.0.get_mut(share_id) {
                share.content = content.clone();
            }
        }
        ActionKind::VaultEditSuccess { share_id, share } => {
            state.0.insert(share_id.clone(), share.clone());
        }
        ActionKind::VaultDeleteIntent { share_id } | ActionKind::VaultDeleteSuccess { share_id } => {
            state.0.remove(share_id);
        }
        _ => {}
    }
    state
}

/// Vault creation, edit and delete run optimistically. A failed edit or
/// delete is kept out of the fold so the vault shows its confirmed state;
/// a failed creation stays visible for the retry/dismiss affordance.
pub const SHARES: OptimisticReducer<SharesState> = OptimisticReducer {
    matchers: OptimisticMatchers {
        initiate: |kind| {
            matches!(
                kind,
                ActionKind::VaultCreationIntent { .. }
                    | ActionKind::VaultEditIntent { .. }
                    | ActionKind::VaultDeleteIntent { .. }
            )
        },
        commit: |kind| {
            matches!(
                kind,
                ActionKind::VaultCreationSuccess { .. }
                    | ActionKind::VaultEditSuccess { .. }
                    | ActionKind::VaultDeleteSuccess { .. }
            )
        },
        fail: |kind| {
            matches!(
                kind,
                ActionKind::VaultCreationFailure { .. }
                    | ActionKind::VaultEditFailure { .. }
                    | ActionKind::VaultDeleteFailure { .. }
            )
        },
        revert: |_| false,
        skip_failed: |kind| {
            matches!(
                kind,
                ActionKind::VaultEditIntent { .. } | ActionKind::VaultDeleteIntent { .. }
            )
        },
    },
    reducer: reduce,
};
