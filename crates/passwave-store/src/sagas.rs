//! Asynchronous workers for intent actions
//!
//! Each worker performs the remote operation for one intent, dispatches the
//! matching success or failure action, hands that result to the intent's
//! callback and finally acknowledges the request so its ledger slot is freed.

use crate::actions::{creators, Action, ActionKind};
use crate::model::{AliasMailbox, AliasOptions, Item, ItemContent, Share, VaultContent};
use crate::store::StoreHandle;
use async_trait::async_trait;
use passwave_core::{PasswaveError, PasswaveResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CONTENT_FORMAT_VERSION: u32 = 1;

/// Opaque encryption capability. The algorithm is the implementor's concern.
#[async_trait]
pub trait EncryptionCapability: Send + Sync {
    async fn encrypt(&self, plaintext: &[u8]) -> PasswaveResult<Vec<u8>>;
    async fn decrypt(&self, ciphertext: &[u8]) -> PasswaveResult<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedContent {
    pub content: Vec<u8>,
    pub content_format_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRevision {
    pub item_id: String,
    pub revision: u64,
}

/// Request/response shape of the remote API
#[async_trait]
pub trait PassApi: Send + Sync {
    async fn create_vault(&self, content: EncryptedContent) -> PasswaveResult<Share>;
    async fn edit_vault(&self, share_id: &str, content: EncryptedContent) -> PasswaveResult<Share>;
    async fn delete_vault(&self, share_id: &str) -> PasswaveResult<()>;
    async fn create_item(&self, share_id: &str, content: EncryptedContent) -> PasswaveResult<ItemRevision>;
    async fn alias_options(&self, share_id: &str) -> PasswaveResult<AliasOptions>;
    async fn alias_details(&self, share_id: &str, item_id: &str) -> PasswaveResult<Vec<AliasMailbox>>;
}

#[derive(Clone)]
pub struct SagaContext {
    pub api: Arc<dyn PassApi>,
    pub crypto: Arc<dyn EncryptionCapability>,
}

impl SagaContext {
    async fn seal<T: Serialize>(&self, value: &T) -> PasswaveResult<EncryptedContent> {
        let plaintext = serde_json::to_vec(value)?;
        let content = self.crypto.encrypt(&plaintext).await?;
        Ok(EncryptedContent {
            content,
            content_format_version: CONTENT_FORMAT_VERSION,
        })
    }
}

/// Whether `action` starts an asynchronous worker
pub fn handles(action: &Action) -> bool {
    matches!(
        action.kind,
        ActionKind::VaultCreationIntent { .. }
            | ActionKind::VaultEditIntent { .. }
            | ActionKind::VaultDeleteIntent { .. }
            | ActionKind::ItemCreationIntent { .. }
            | ActionKind::AliasOptionsRequested { .. }
            | ActionKind::AliasDetailsRequested { .. }
    )
}

/// Run the worker for `action`, if any
pub async fn run(ctx: SagaContext, store: StoreHandle, action: Action) {
    let outcome = match &action.kind {
        ActionKind::VaultCreationIntent { id, content } => create_vault(&ctx, id, content).await,
        ActionKind::VaultEditIntent { share_id, content } => edit_vault(&ctx, share_id, content).await,
        ActionKind::VaultDeleteIntent { share_id } => delete_vault(&ctx, share_id).await,
        ActionKind::ItemCreationIntent {
            share_id,
            optimistic_id,
            content,
        } => create_item(&ctx, share_id, optimistic_id, content).await,
        ActionKind::AliasOptionsRequested { share_id } => alias_options(&ctx, share_id).await,
        ActionKind::AliasDetailsRequested {
            share_id,
            item_id,
            alias_email,
        } => alias_details(&ctx, share_id, item_id, alias_email).await,
        _ => return,
    };

    store.dispatch(outcome.clone());

    if let Some(callback) = action.callback() {
        callback.call(&outcome);
    }

    if let Some(request_id) = action.request_id() {
        store.dispatch(creators::acknowledge(request_id));
    }
}

fn report(operation: &str, error: &PasswaveError) -> String {
    log::warn!("[Saga::{}] {}", operation, error);
    error.to_string()
}

async fn create_vault(ctx: &SagaContext, id: &str, content: &VaultContent) -> Action {
    let result = async {
        let sealed = ctx.seal(content).await?;
        let mut share = ctx.api.create_vault(sealed).await?;
        share.content = content.clone();
        share.optimistic = false;
        Ok::<_, PasswaveError>(share)
    }
    .await;

    match result {
        Ok(share) => creators::vault_creation_success(id, share),
        Err(e) => creators::vault_creation_failure(id, content.clone(), &report("CreateVault", &e)),
    }
}

async fn edit_vault(ctx: &SagaContext, share_id: &str, content: &VaultContent) -> Action {
    let result = async {
        let sealed = ctx.seal(content).await?;
        let mut share = ctx.api.edit_vault(share_id, sealed).await?;
        share.content = content.clone();
        Ok::<_, PasswaveError>(share)
    }
    .await;

    match result {
        Ok(share) => creators::vault_edit_success(share),
        Err(e) => creators::vault_edit_failure(share_id, &report("EditVault", &e)),
    }
}

async fn delete_vault(ctx: &SagaContext, share_id: &str) -> Action {
    match ctx.api.delete_vault(share_id).await {
        Ok(()) => creators::vault_delete_success(share_id),
        Err(e) => creators::vault_delete_failure(share_id, &report("DeleteVault", &e)),
    }
}

async fn create_item(
    ctx: &SagaContext,
    share_id: &str,
    optimistic_id: &str,
    content: &ItemContent,
) -> Action {
    let result = async {
        let sealed = ctx.seal(content).await?;
        ctx.api.create_item(share_id, sealed).await
    }
    .await;

    match result {
        Ok(revision) => creators::item_creation_success(
            optimistic_id,
            Item {
                item_id: revision.item_id,
                share_id: share_id.to_string(),
                revision: revision.revision,
                content: content.clone(),
                optimistic: false,
            },
        ),
        Err(e) => creators::item_creation_failure(share_id, optimistic_id, &report("CreateItem", &e)),
    }
}

async fn alias_options(ctx: &SagaContext, share_id: &str) -> Action {
    match ctx.api.alias_options(share_id).await {
        Ok(options) => creators::alias_options_success(options),
        Err(e) => creators::alias_options_failure(&report("AliasOptions", &e)),
    }
}

async fn alias_details(ctx: &SagaContext, share_id: &str, item_id: &str, alias_email: &str) -> Action {
    match ctx.api.alias_details(share_id, item_id).await {
        Ok(mailboxes) => creators::alias_details_success(alias_email, mailboxes),
        Err(e) => creators::alias_details_failure(alias_email, &report("AliasDetails", &e)),
    }
}
