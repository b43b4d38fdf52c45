//! Read helpers over the state tree

use crate::model::{Item, ItemContent};
use crate::reducers::{ItemsState, SharesState, State, ITEMS, SHARES};
use crate::request::RequestStatus;
use passwave_core::types::realm_of;
use passwave_core::Realm;

pub fn request_status(state: &State, request_id: &str) -> Option<RequestStatus> {
    state.request.get(request_id)
}

pub fn visible_shares(state: &State) -> SharesState {
    SHARES.visible(&state.shares)
}

pub fn visible_items(state: &State) -> ItemsState {
    ITEMS.visible(&state.items)
}

/// Optimistic ids whose mutation failed and awaits retry or dismissal
pub fn failed_optimistic_ids(state: &State) -> Vec<String> {
    state
        .shares
        .failed_ids()
        .into_iter()
        .chain(state.items.failed_ids())
        .map(str::to_string)
        .collect()
}

/// Login items with at least one url on `realm`
pub fn logins_for_realm(state: &State, realm: &Realm) -> Vec<Item> {
    visible_items(state)
        .logins()
        .filter(|item| match &item.content {
            ItemContent::Login { urls, .. } => urls
                .iter()
                .any(|url| realm_of(url).map(|r| &r == realm).unwrap_or(false)),
            _ => false,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::creators;
    use crate::reducers::root_reducer;

    #[test]
    fn test_logins_for_realm_matches_subdomains() {
        let content = ItemContent::Login {
            name: "Example".into(),
            username: "bob".into(),
            password: "pw".into(),
            urls: vec!["https://accounts.example.com/login".into()],
        };
        let other = ItemContent::Login {
            name: "Other".into(),
            username: "alice".into(),
            password: "pw".into(),
            urls: vec!["https://other.org".into(), "not a url".into()],
        };

        let state = root_reducer(
            State::default(),
            &creators::item_creation_intent("s1", "a", content, None),
        );
        let state = root_reducer(state, &creators::item_creation_intent("s1", "b", other, None));

        let logins = logins_for_realm(&state, &Realm::new("example.com"));
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0].content.name(), "Example");
        assert!(failed_optimistic_ids(&state).is_empty());
    }
}
