//! Autosave prompt resolution

use crate::submission::FormSubmission;
use passwave_core::config::AutoSaveConfig;
use passwave_core::Realm;
use passwave_store::model::ItemContent;
use passwave_store::{selectors, StoreHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoSaveAction {
    New,
    Update,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSavePromptOptions {
    pub should_prompt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AutoSaveAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

impl AutoSavePromptOptions {
    pub fn skip() -> Self {
        Self::default()
    }

    pub fn new_login() -> Self {
        Self {
            should_prompt: true,
            action: Some(AutoSaveAction::New),
            item_id: None,
        }
    }

    pub fn update(item_id: impl Into<String>) -> Self {
        Self {
            should_prompt: true,
            action: Some(AutoSaveAction::Update),
            item_id: Some(item_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLogin {
    pub item_id: String,
    pub username: String,
    pub password: String,
}

/// Source of the logins already saved for a realm
pub trait LoginLookup: Send + Sync {
    fn logins_for_realm(&self, realm: &Realm) -> Vec<SavedLogin>;
}

impl LoginLookup for StoreHandle {
    fn logins_for_realm(&self, realm: &Realm) -> Vec<SavedLogin> {
        self.select(|state| selectors::logins_for_realm(state, realm))
            .into_iter()
            .filter_map(|item| match item.content {
                ItemContent::Login {
                    username, password, ..
                } => Some(SavedLogin {
                    item_id: item.item_id,
                    username,
                    password,
                }),
                _ => None,
            })
            .collect()
    }
}

pub struct AutoSaveResolver {
    config: AutoSaveConfig,
    logins: Arc<dyn LoginLookup>,
}

impl AutoSaveResolver {
    pub fn new(config: AutoSaveConfig, logins: Arc<dyn LoginLookup>) -> Self {
        Self { config, logins }
    }

    pub fn resolve(&self, submission: &FormSubmission) -> AutoSavePromptOptions {
        if !self.config.enabled {
            return AutoSavePromptOptions::skip();
        }

        let password = submission.data.password.as_deref().unwrap_or_default();
        let username = submission.data.username.trim();
        let saved = self.logins.logins_for_realm(&submission.realm);

        let same_user: Vec<&SavedLogin> = saved
            .iter()
            .filter(|login| login.username.trim() == username)
            .collect();

        if same_user.is_empty() {
            return AutoSavePromptOptions::new_login();
        }

        if same_user.iter().any(|login| login.password == password) {
            return AutoSavePromptOptions::skip();
        }

        if !self.config.prompt_updates {
            return AutoSavePromptOptions::skip();
        }

        log::debug!(
            "[AutoSave] password changed for an existing login on \"{}\"",
            submission.realm
        );
        AutoSavePromptOptions::update(same_user[0].item_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{FormData, FormStatus, FormType};
    use passwave_store::creators;
    use passwave_store::model::Item;

    struct FixedLogins(Vec<SavedLogin>);

    impl LoginLookup for FixedLogins {
        fn logins_for_realm(&self, _realm: &Realm) -> Vec<SavedLogin> {
            self.0.clone()
        }
    }

    fn committed(username: &str, password: &str) -> FormSubmission {
        FormSubmission {
            realm: Realm::new("example.com"),
            subdomain: None,
            url: "https://example.com/login".into(),
            form_type: FormType::Login,
            action: None,
            data: FormData {
                username: username.into(),
                password: Some(password.into()),
            },
            status: FormStatus::Committed,
            partial: false,
        }
    }

    fn resolver_with(config: AutoSaveConfig) -> AutoSaveResolver {
        AutoSaveResolver::new(
            config,
            Arc::new(FixedLogins(vec![SavedLogin {
                item_id: "item-1".into(),
                username: "bob".into(),
                password: "old".into(),
            }])),
        )
    }

    #[test]
    fn test_resolve_prompt_options() {
        let resolver = resolver_with(AutoSaveConfig::default());

        assert_eq!(resolver.resolve(&committed("alice", "pw")), AutoSavePromptOptions::new_login());
        assert_eq!(resolver.resolve(&committed("bob", "new")), AutoSavePromptOptions::update("item-1"));
        assert_eq!(resolver.resolve(&committed("bob", "old")), AutoSavePromptOptions::skip());
    }

    #[test]
    fn test_disabled_autosave_never_prompts() {
        let resolver = resolver_with(AutoSaveConfig {
            enabled: false,
            prompt_updates: true,
        });
        assert!(!resolver.resolve(&committed("alice", "pw")).should_prompt);

        let resolver = resolver_with(AutoSaveConfig {
            enabled: true,
            prompt_updates: false,
        });
        assert!(!resolver.resolve(&committed("bob", "new")).should_prompt);
    }

    #[test]
    fn test_store_lookup() {
        let store = StoreHandle::default();
        store.dispatch(creators::items_synced(vec![Item {
            item_id: "item-9".into(),
            share_id: "s1".into(),
            revision: 1,
            content: ItemContent::Login {
                name: "Example".into(),
                username: "bob".into(),
                password: "old".into(),
                urls: vec!["https://www.example.com".into()],
            },
            optimistic: false,
        }]));

        let resolver = AutoSaveResolver::new(AutoSaveConfig::default(), Arc::new(store));
        assert_eq!(resolver.resolve(&committed("bob", "new")), AutoSavePromptOptions::update("item-9"));
    }

    #[test]
    fn test_prompt_options_wire_shape() {
        let value = serde_json::to_value(AutoSavePromptOptions::update("item-1")).unwrap();
        assert_eq!(value, serde_json::json!({ "shouldPrompt": true, "action": "update", "itemId": "item-1" }));
        let value = serde_json::to_value(AutoSavePromptOptions::skip()).unwrap();
        assert_eq!(value, serde_json::json!({ "shouldPrompt": false }));
    }
}
