use crate::actions::{Action, ActionKind};
use crate::model::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserState(pub Option<User>);

pub fn reduce(state: UserState, action: &Action) -> UserState {
    match &action.kind {
        ActionKind::UserSynced { user } => UserState(Some(user.clone())),
        _ => state,
    }
}
