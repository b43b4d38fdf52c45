//! Alias options and per-alias mailbox details

use crate::actions::{Action, ActionKind};
use crate::model::{AliasMailbox, AliasOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AliasState {
    pub alias_options: Option<AliasOptions>,
    pub alias_details: BTreeMap<String, Vec<AliasMailbox>>,
}

pub fn reduce(mut state: AliasState, action: &Action) -> AliasState {
    match &action.kind {
        ActionKind::AliasOptionsSuccess { options } => {
            state.alias_options = Some(options.clone());
        }
        ActionKind::AliasDetailsSuccess {
            alias_email,
            mailboxes,
        }
        | ActionKind::AliasDetailsEditSuccess {
            alias_email,
            mailboxes,
        } => {
            state
                .alias_details
                .insert(alias_email.clone(), mailboxes.clone());
        }
        _ => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::creators;

    #[test]
    fn test_edit_overwrites_details() {
        let mailbox = |id: u64| AliasMailbox {
            id,
            email: format!("box{}@proton.me", id),
        };

        let state = reduce(
            AliasState::default(),
            &creators::alias_details_success("a@alias.dev", vec![mailbox(1)]),
        );
        let state = reduce(
            state,
            &creators::alias_details_edit_success("a@alias.dev", vec![mailbox(2), mailbox(3)]),
        );

        assert_eq!(state.alias_details["a@alias.dev"].len(), 2);
        assert_eq!(state.alias_options, None);
    }
}
