//! Worker message handlers
//!
//! Form handlers refuse to run while logged out and take the tab and realm
//! from the transport sender only.

use crate::broker::MessageBroker;
use crate::context::WorkerContext;
use crate::messages::{WakeupResponse, WorkerMessage, WorkerMessageType};
use passwave_core::types::parse_sender;
use passwave_core::{MessageSender, PasswaveError, PasswaveResult};
use passwave_forms::{AutoSavePromptOptions, StagedSubmission};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Register every worker message handler on `broker`
pub fn register_all(broker: &mut MessageBroker, ctx: Arc<WorkerContext>) {
    register_form_handlers(broker, ctx.clone());
    register_worker_handlers(broker, ctx);
}

pub fn register_form_handlers(broker: &mut MessageBroker, ctx: Arc<WorkerContext>) {
    let c = ctx.clone();
    broker.register(WorkerMessageType::StageFormSubmission, move |message, sender| {
        handle_stage(&c, message, sender)
    });

    let c = ctx.clone();
    broker.register(WorkerMessageType::StashFormSubmission, move |message, sender| {
        handle_stash(&c, message, sender)
    });

    let c = ctx.clone();
    broker.register(WorkerMessageType::CommitFormSubmission, move |message, sender| {
        handle_commit(&c, message, sender)
    });

    broker.register(WorkerMessageType::RequestFormSubmission, move |_, sender| {
        handle_request(&ctx, sender)
    });
}

pub fn register_worker_handlers(broker: &mut MessageBroker, ctx: Arc<WorkerContext>) {
    let c = ctx.clone();
    broker.register(WorkerMessageType::Wakeup, move |message, sender| {
        handle_wakeup(&c, message, sender)
    });

    let c = ctx.clone();
    broker.register(WorkerMessageType::ResolveWorkerStatus, move |_, _| {
        Ok(json!({ "status": c.session.status() }))
    });

    broker.register(WorkerMessageType::StoreAction, move |message, _| {
        handle_store_action(&ctx, message)
    });
}

fn unexpected(message: &WorkerMessage) -> PasswaveError {
    PasswaveError::broker(format!("Unexpected message {:?}", message.message_type()))
}

fn handle_stage(ctx: &WorkerContext, message: WorkerMessage, sender: &MessageSender) -> PasswaveResult<Value> {
    ctx.ensure_logged_in("Cannot stage submission while logged out")?;

    let (payload, reason) = match message {
        WorkerMessage::StageFormSubmission { payload, reason } => (payload, reason),
        other => return Err(unexpected(&other)),
    };

    let sender = parse_sender(sender)?;
    let staged = ctx.forms().stage(
        sender.tab_id,
        StagedSubmission {
            realm: sender.realm,
            subdomain: sender.subdomain,
            url: sender.url,
            form_type: payload.form_type,
            action: payload.action,
            data: payload.data,
        },
        &reason,
    );

    Ok(json!({ "staged": staged }))
}

fn handle_stash(ctx: &WorkerContext, message: WorkerMessage, sender: &MessageSender) -> PasswaveResult<Value> {
    ctx.ensure_logged_in("Cannot stash submission while logged out")?;

    let reason = match message {
        WorkerMessage::StashFormSubmission { reason } => reason,
        other => return Err(unexpected(&other)),
    };

    let sender = parse_sender(sender)?;
    let stashed = ctx.forms().stash(sender.tab_id, &sender.realm, &reason);

    Ok(json!({ "stashed": stashed }))
}

fn handle_commit(ctx: &WorkerContext, message: WorkerMessage, sender: &MessageSender) -> PasswaveResult<Value> {
    ctx.ensure_logged_in("Cannot commit submission while logged out")?;

    let reason = match message {
        WorkerMessage::CommitFormSubmission { reason } => reason,
        other => return Err(unexpected(&other)),
    };

    let sender = parse_sender(sender)?;
    let committed = ctx.forms().commit(sender.tab_id, &sender.realm, &reason);

    let Some(committed) = committed else {
        debug!(
            "[FormTracker::Commit] nothing to commit for tab {} on realm \"{}\"",
            sender.tab_id, sender.realm
        );
        return Ok(json!({ "committed": null }));
    };

    let autosave = ctx.autosave.resolve(&committed);
    if autosave.should_prompt {
        info!("[AutoSave] prompting on tab {} for realm \"{}\"", sender.tab_id, sender.realm);
        Ok(json!({ "committed": committed.with_autosave(autosave) }))
    } else {
        Ok(json!({ "committed": null }))
    }
}

fn handle_request(ctx: &WorkerContext, sender: &MessageSender) -> PasswaveResult<Value> {
    ctx.ensure_logged_in("Cannot request submission while logged out")?;

    let sender = parse_sender(sender)?;
    let submission = ctx.forms().get(sender.tab_id, &sender.realm).cloned();

    match submission {
        Some(submission) => {
            let autosave = if submission.is_committed() {
                ctx.autosave.resolve(&submission)
            } else {
                AutoSavePromptOptions::skip()
            };
            Ok(json!({ "submission": submission.with_autosave(autosave) }))
        }
        None => Ok(json!({ "submission": null })),
    }
}

fn handle_wakeup(ctx: &WorkerContext, message: WorkerMessage, sender: &MessageSender) -> PasswaveResult<Value> {
    let origin = match message {
        WorkerMessage::Wakeup { origin } => origin,
        other => return Err(unexpected(&other)),
    };

    debug!("[Wakeup] {} context on tab {:?}", origin, sender.tab_id);
    let response = WakeupResponse {
        status: ctx.session.status(),
        state: ctx.store.state().snapshot(),
    };

    Ok(serde_json::to_value(response)?)
}

fn handle_store_action(ctx: &WorkerContext, message: WorkerMessage) -> PasswaveResult<Value> {
    ctx.ensure_logged_in("Cannot dispatch actions while logged out")?;

    match message {
        WorkerMessage::StoreAction { action } => {
            ctx.store.dispatch(action);
            Ok(Value::Null)
        }
        other => Err(unexpected(&other)),
    }
}
