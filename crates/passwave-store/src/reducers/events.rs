use crate::actions::{Action, ActionKind};
use serde::{Deserialize, Serialize};

/// Cursor into the server event stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventsState {
    pub event_id: Option<String>,
}

pub fn reduce(state: EventsState, action: &Action) -> EventsState {
    match &action.kind {
        ActionKind::EventsCursorUpdated { event_id } => EventsState {
            event_id: Some(event_id.clone()),
        },
        _ => state,
    }
}
