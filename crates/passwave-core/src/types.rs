//! Common types used throughout Passwave

use crate::error::{PasswaveError, PasswaveResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::{Host, Url};

/// Browser tab identifier as reported by the extension runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Effective domain used to group form submissions and logins
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Realm(String);

impl Realm {
    pub fn new(realm: impl Into<String>) -> Self {
        Self(realm.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Realm {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Realm {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Execution context a message originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionOrigin {
    Background,
    Content,
    Popup,
    Page,
}

impl fmt::Display for ExtensionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Background => "background",
            Self::Content => "content",
            Self::Popup => "popup",
            Self::Page => "page",
        };
        f.write_str(name)
    }
}

/// Lifecycle status of the background worker session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    #[default]
    Idle,
    Authorizing,
    Booting,
    Ready,
    Unauthorized,
    Resuming,
    ResumingFailed,
    Locked,
    Error,
}

impl WorkerStatus {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_logged_out(self) -> bool {
        matches!(self, Self::Unauthorized | Self::ResumingFailed)
    }

    pub fn is_errored(self) -> bool {
        matches!(self, Self::Error | Self::ResumingFailed)
    }

    pub fn is_stale(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, Self::Authorizing | Self::Booting | Self::Resuming)
    }
}

/// Sender metadata attached by the transport to every cross-context message.
///
/// Never built from message payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    pub tab_id: Option<TabId>,
    pub url: Option<String>,
    #[serde(default)]
    pub frame_id: u64,
}

impl MessageSender {
    pub fn tab(tab_id: u64, url: impl Into<String>) -> Self {
        Self {
            tab_id: Some(TabId(tab_id)),
            url: Some(url.into()),
            frame_id: 0,
        }
    }
}

/// Sender identity resolved from [`MessageSender`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSender {
    pub tab_id: TabId,
    pub realm: Realm,
    pub subdomain: Option<String>,
    pub url: String,
}

/// Resolve the tab, realm and subdomain of a message sender.
pub fn parse_sender(sender: &MessageSender) -> PasswaveResult<ParsedSender> {
    let tab_id = sender
        .tab_id
        .ok_or_else(|| PasswaveError::sender("Sender has no tab"))?;
    let raw_url = sender
        .url
        .as_deref()
        .ok_or_else(|| PasswaveError::sender("Sender has no url"))?;

    let url = Url::parse(raw_url)?;
    let (realm, subdomain) = resolve_realm(&url)?;

    Ok(ParsedSender {
        tab_id,
        realm,
        subdomain,
        url: strip_url(&url),
    })
}

/// Resolve the realm of an arbitrary url (network observers use this for
/// request urls).
pub fn realm_of(raw_url: &str) -> PasswaveResult<Realm> {
    let url = Url::parse(raw_url)?;
    resolve_realm(&url).map(|(realm, _)| realm)
}

fn resolve_realm(url: &Url) -> PasswaveResult<(Realm, Option<String>)> {
    let host = url
        .host()
        .ok_or_else(|| PasswaveError::sender(format!("URL has no host: {}", url)))?;

    let hostname = match host {
        Host::Domain(domain) => domain.trim_end_matches('.').to_ascii_lowercase(),
        Host::Ipv4(addr) => return Ok((Realm::new(addr.to_string()), None)),
        Host::Ipv6(addr) => return Ok((Realm::new(format!("[{}]", addr)), None)),
    };

    // Registrable domain against the public suffix list, private section
    // included. Bare suffixes and single labels are their own realm.
    let realm = match psl::domain_str(&hostname) {
        Some(domain) => domain.to_string(),
        None => return Ok((Realm::new(hostname), None)),
    };

    let subdomain = (realm != hostname).then_some(hostname);
    Ok((Realm::new(realm), subdomain))
}

fn strip_url(url: &Url) -> String {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);
    let _ = stripped.set_username("");
    let _ = stripped.set_password(None);
    stripped.to_string()
}
