//! Newline-delimited JSON transport
//!
//! Each input line is one [`Inbound`] envelope; each produces exactly one
//! [`Outbound`] line.

use crate::worker::Worker;
use passwave_broker::{WorkerMessage, WorkerResponse};
use passwave_core::{MessageSender, PasswaveResult};
use passwave_forms::WebRequestEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Inbound {
    Message {
        #[serde(default)]
        id: Option<u64>,
        #[serde(default)]
        sender: MessageSender,
        message: WorkerMessage,
    },
    WebRequest {
        #[serde(default)]
        id: Option<u64>,
        event: WebRequestEvent,
    },
    Session {
        #[serde(default)]
        id: Option<u64>,
        session: SessionCommand,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SessionCommand {
    Login { user_id: String },
    Logout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outbound {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub response: WorkerResponse,
}

impl Inbound {
    fn id(&self) -> Option<u64> {
        match self {
            Inbound::Message { id, .. } | Inbound::WebRequest { id, .. } | Inbound::Session { id, .. } => *id,
        }
    }
}

/// Handle one raw input line
pub fn handle_line(worker: &Worker, line: &str) -> Outbound {
    let inbound: Inbound = match serde_json::from_str(line) {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!("[Transport] malformed envelope: {}", e);
            return Outbound {
                id: None,
                response: WorkerResponse::error(format!("Malformed envelope: {}", e)),
            };
        }
    };

    let id = inbound.id();
    let response = match inbound {
        Inbound::Message { sender, message, .. } => worker.handle_message(message, &sender),
        Inbound::WebRequest { event, .. } => {
            WorkerResponse::success(json!({ "stashed": worker.handle_event(&event) }))
        }
        Inbound::Session { session, .. } => {
            match session {
                SessionCommand::Login { user_id } => worker.login(&user_id),
                SessionCommand::Logout => worker.logout(),
            }
            WorkerResponse::success(json!({ "status": worker.status() }))
        }
    };

    Outbound { id, response }
}

/// Serve envelopes from `reader` until end of input
pub async fn serve<R, W>(worker: &Worker, reader: R, mut writer: W) -> PasswaveResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let outbound = handle_line(worker, &line);
        let mut data = serde_json::to_vec(&outbound)?;
        data.push(b'\n');
        writer.write_all(&data).await?;
        writer.flush().await?;

        // let spawned workers make progress between envelopes
        tokio::task::yield_now().await;
    }

    tracing::info!("[Transport] input closed");
    Ok(())
}
