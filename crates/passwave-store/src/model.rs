//! Domain entities held in the state tree

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultContent {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    #[default]
    Vault,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub share_id: String,
    pub vault_id: String,
    #[serde(default)]
    pub share_type: ShareType,
    pub content: VaultContent,
    #[serde(default)]
    pub owner: bool,
    /// Present only while the share exists solely as an optimistic entry
    #[serde(default)]
    pub optimistic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemContent {
    Login {
        name: String,
        username: String,
        password: String,
        #[serde(default)]
        urls: Vec<String>,
    },
    Note {
        name: String,
        note: String,
    },
    Alias {
        name: String,
        alias_email: String,
    },
}

impl ItemContent {
    pub fn name(&self) -> &str {
        match self {
            Self::Login { name, .. } | Self::Note { name, .. } | Self::Alias { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,
    pub share_id: String,
    pub revision: u64,
    pub content: ItemContent,
    #[serde(default)]
    pub optimistic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasMailbox {
    pub id: u64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasSuffix {
    pub suffix: String,
    pub signed_suffix: String,
    pub is_custom: bool,
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasOptions {
    pub suffixes: Vec<AliasSuffix>,
    pub mailboxes: Vec<AliasMailbox>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub enabled: bool,
}
