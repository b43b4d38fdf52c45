use async_trait::async_trait;
use passwave_core::{PasswaveError, PasswaveResult, WorkerConfig, WorkerStatus};
use passwave_store::model::{AliasMailbox, AliasOptions, Share, ShareType, VaultContent};
use passwave_store::request::ids;
use passwave_store::sagas::{EncryptedContent, EncryptionCapability, ItemRevision, PassApi, SagaContext};
use passwave_store::selectors;
use passwave_worker::{handle_line, serve, TokioEffects, Worker};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn config(dir: &Path) -> WorkerConfig {
    WorkerConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

fn line(value: Value) -> String {
    value.to_string()
}

fn response(worker: &Worker, value: Value) -> Value {
    serde_json::to_value(handle_line(worker, &line(value))).unwrap()
}

const PAGE: &str = "https://login.example.com/session";

#[test]
fn test_form_flow_over_transport() {
    let dir = tempdir().unwrap();
    let worker = Worker::new(config(dir.path()), None);
    let sender = json!({ "tabId": 5, "url": PAGE });

    // logged out: rejected
    let out = response(
        &worker,
        json!({ "id": 1, "sender": sender, "message": { "type": "REQUEST_FORM_SUBMISSION" } }),
    );
    assert_eq!(out["id"], 1);
    assert_eq!(out["response"]["type"], "error");

    let out = response(&worker, json!({ "session": { "type": "LOGIN", "userId": "u1" } }));
    assert_eq!(out["response"]["data"]["status"], "ready");

    let out = response(
        &worker,
        json!({
            "id": 2,
            "sender": sender,
            "message": {
                "type": "STAGE_FORM_SUBMISSION",
                "payload": { "type": "login", "data": { "username": "bob", "password": "hunter2" } },
                "reason": "FORM_SUBMIT"
            }
        }),
    );
    assert_eq!(out["response"]["data"]["staged"]["status"], "STAGING");

    let out = response(
        &worker,
        json!({ "id": 3, "sender": sender, "message": { "type": "COMMIT_FORM_SUBMISSION", "reason": "FORM_SUBMIT" } }),
    );
    assert_eq!(out["response"]["data"]["committed"]["autosave"]["action"], "new");

    // a failed login request drops the committed entry
    let out = response(
        &worker,
        json!({ "event": { "type": "REQUEST_COMPLETED", "tabId": 5, "url": PAGE, "statusCode": 401 } }),
    );
    assert_eq!(out["response"]["data"]["stashed"], 1);

    let out = response(
        &worker,
        json!({ "sender": sender, "message": { "type": "REQUEST_FORM_SUBMISSION" } }),
    );
    assert_eq!(out["response"], json!({ "type": "success", "data": { "submission": null } }));
}

#[test]
fn test_malformed_envelope() {
    let dir = tempdir().unwrap();
    let worker = Worker::new(config(dir.path()), None);

    let out = serde_json::to_value(handle_line(&worker, "{\"nope\": true}")).unwrap();
    assert_eq!(out["response"]["type"], "error");
    assert!(out.get("id").is_none());
}

#[test]
fn test_state_survives_restart_until_logout() {
    let dir = tempdir().unwrap();

    {
        let worker = Worker::new(config(dir.path()), None);
        response(&worker, json!({ "session": { "type": "LOGIN", "userId": "u1" } }));
        response(
            &worker,
            json!({
                "message": {
                    "type": "STORE_ACTION",
                    "action": { "type": "eventsCursorUpdated", "payload": { "eventId": "e7" } }
                }
            }),
        );
        assert!(dir.path().join("state.json").exists());
    }

    let worker = Worker::new(config(dir.path()), None);
    worker.login("u1");
    assert_eq!(worker.status(), WorkerStatus::Ready);
    assert_eq!(worker.store().state().events.event_id.as_deref(), Some("e7"));

    worker.logout();
    assert_eq!(worker.status(), WorkerStatus::Unauthorized);
    assert_eq!(worker.store().state().events.event_id, None);
    assert!(!dir.path().join("state.json").exists());
}

#[tokio::test]
async fn test_serve_writes_one_line_per_envelope() {
    let dir = tempdir().unwrap();
    let worker = Worker::new(config(dir.path()), None);

    let input = [
        line(json!({ "id": 1, "message": { "type": "RESOLVE_WORKER_STATUS" } })),
        String::new(),
        line(json!({ "id": 2, "message": { "type": "WAKEUP", "origin": "popup" } })),
    ]
    .join("\n");

    let mut output = Vec::new();
    serve(&worker, input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["response"]["data"]["status"], "idle");
    assert_eq!(lines[1]["id"], 2);
    assert!(lines[1]["response"]["data"]["state"].is_object());
}

struct PlainCipher;

#[async_trait]
impl EncryptionCapability for PlainCipher {
    async fn encrypt(&self, plaintext: &[u8]) -> PasswaveResult<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> PasswaveResult<Vec<u8>> {
        Ok(ciphertext.to_vec())
    }
}

struct VaultApi;

#[async_trait]
impl PassApi for VaultApi {
    async fn create_vault(&self, content: EncryptedContent) -> PasswaveResult<Share> {
        let content: VaultContent = serde_json::from_slice(&content.content)?;
        Ok(Share {
            share_id: "remote-share".into(),
            vault_id: "remote-vault".into(),
            share_type: ShareType::Vault,
            content,
            owner: true,
            optimistic: false,
        })
    }

    async fn edit_vault(&self, _share_id: &str, _content: EncryptedContent) -> PasswaveResult<Share> {
        Err(PasswaveError::api("unsupported"))
    }

    async fn delete_vault(&self, _share_id: &str) -> PasswaveResult<()> {
        Err(PasswaveError::api("unsupported"))
    }

    async fn create_item(&self, _share_id: &str, _content: EncryptedContent) -> PasswaveResult<ItemRevision> {
        Err(PasswaveError::api("unsupported"))
    }

    async fn alias_options(&self, _share_id: &str) -> PasswaveResult<AliasOptions> {
        Err(PasswaveError::api("unsupported"))
    }

    async fn alias_details(&self, _share_id: &str, _item_id: &str) -> PasswaveResult<Vec<AliasMailbox>> {
        Err(PasswaveError::api("unsupported"))
    }
}

#[tokio::test]
async fn test_vault_creation_runs_through_effects() {
    let dir = tempdir().unwrap();
    let effects = TokioEffects::new(SagaContext {
        api: Arc::new(VaultApi),
        crypto: Arc::new(PlainCipher),
    })
    .unwrap();
    let worker = Worker::new(config(dir.path()), Some(Arc::new(effects)));
    worker.login("u1");

    let out = response(
        &worker,
        json!({
            "message": {
                "type": "STORE_ACTION",
                "action": {
                    "type": "vaultCreationIntent",
                    "payload": { "id": "tmp-1", "content": { "name": "Work", "description": "" } },
                    "meta": {
                        "request": { "id": ids::vault_create("tmp-1"), "type": "start" },
                        "optimisticId": "tmp-1"
                    }
                }
            }
        }),
    );
    assert_eq!(out["response"], json!({ "type": "success", "data": null }));

    // optimistic vault is visible immediately
    let visible = worker.store().select(selectors::visible_shares);
    assert_eq!(visible.vaults().count(), 1);

    for _ in 0..50 {
        if worker.store().state().request.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let state = worker.store().state();
    assert!(state.request.is_empty());
    assert!(state.shares.history.is_empty());
    assert_eq!(state.shares.checkpoint.get("remote-share").unwrap().content.name, "Work");

    // the confirmed vault reached disk without another envelope
    let saved = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["shares"]["checkpoint"]["remote-share"]["content"]["name"], "Work");
    assert_eq!(saved["request"], json!({}));
}

#[test]
fn test_direct_dispatch_is_persisted() {
    let dir = tempdir().unwrap();
    let worker = Worker::new(config(dir.path()), None);
    let path = dir.path().join("state.json");

    worker.store().dispatch(passwave_store::creators::events_cursor_updated("early"));
    assert!(!path.exists());

    worker.login("u1");
    worker.store().dispatch(passwave_store::creators::events_cursor_updated("e3"));
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["events"]["eventId"], "e3");
}
