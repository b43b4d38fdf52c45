//! Network and tab signals that invalidate staged submissions

use crate::tracker::FormSubmissionTracker;
use passwave_core::types::realm_of;
use passwave_core::{Realm, TabId};
use serde::{Deserialize, Serialize};

pub const TAB_DELETED: &str = "TAB_DELETED";
pub const TAB_ERRORED: &str = "TAB_ERRORED";
pub const XMLHTTP_ERROR_DETECTED: &str = "XMLHTTP_ERROR_DETECTED";

/// Browser web-request and tab events forwarded by the extension runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum WebRequestEvent {
    TabRemoved { tab_id: TabId },
    MainFrameError { tab_id: TabId, url: String },
    RequestCompleted { tab_id: TabId, url: String, status_code: u16 },
    RequestErrored { tab_id: TabId, url: String },
}

impl WebRequestEvent {
    pub fn tab_id(&self) -> TabId {
        match self {
            Self::TabRemoved { tab_id }
            | Self::MainFrameError { tab_id, .. }
            | Self::RequestCompleted { tab_id, .. }
            | Self::RequestErrored { tab_id, .. } => *tab_id,
        }
    }
}

/// Turns [`WebRequestEvent`]s into tracker stashes.
///
/// A failed XHR only stashes when a submission is staged for that tab and
/// realm, so unrelated background requests failing on a page do not drop
/// credentials the user is typing elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestObserver;

impl RequestObserver {
    pub fn new() -> Self {
        Self
    }

    /// Returns the number of stashed entries.
    pub fn observe(&self, tracker: &mut FormSubmissionTracker, event: &WebRequestEvent) -> usize {
        match event {
            WebRequestEvent::TabRemoved { tab_id } => tracker.remove_tab(*tab_id, TAB_DELETED),
            WebRequestEvent::MainFrameError { tab_id, url } => match realm(url) {
                Some(realm) => tracker.stash(*tab_id, &realm, TAB_ERRORED) as usize,
                None => 0,
            },
            WebRequestEvent::RequestCompleted {
                tab_id,
                url,
                status_code,
            } if *status_code >= 400 => Self::failed_request(tracker, *tab_id, url),
            WebRequestEvent::RequestCompleted { .. } => 0,
            WebRequestEvent::RequestErrored { tab_id, url } => Self::failed_request(tracker, *tab_id, url),
        }
    }

    fn failed_request(tracker: &mut FormSubmissionTracker, tab_id: TabId, url: &str) -> usize {
        match realm(url) {
            Some(realm) if tracker.contains(tab_id, &realm) => {
                tracker.stash(tab_id, &realm, XMLHTTP_ERROR_DETECTED) as usize
            }
            _ => 0,
        }
    }
}

fn realm(url: &str) -> Option<Realm> {
    realm_of(url)
        .map_err(|e| log::debug!("[RequestObserver] ignoring request to {}: {}", url, e))
        .ok()
}
