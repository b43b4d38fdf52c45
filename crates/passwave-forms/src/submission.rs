//! Form submission records

use crate::autosave::AutoSavePromptOptions;
use passwave_core::Realm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStatus {
    Staging,
    Committed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Partial form data as reported by a content script. Absent fields keep
/// whatever was staged before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDataUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl FormDataUpdate {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: None,
        }
    }

    pub fn password(password: impl Into<String>) -> Self {
        Self {
            username: None,
            password: Some(password.into()),
        }
    }

    pub fn credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Input to [`crate::FormSubmissionTracker::stage`]. Identity fields come from
/// the parsed sender, `form_type`, `action` and `data` from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSubmission {
    pub realm: Realm,
    pub subdomain: Option<String>,
    pub url: String,
    pub form_type: FormType,
    pub action: Option<String>,
    pub data: FormDataUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub realm: Realm,
    pub subdomain: Option<String>,
    pub url: String,
    #[serde(rename = "type")]
    pub form_type: FormType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub data: FormData,
    pub status: FormStatus,
    pub partial: bool,
}

impl FormSubmission {
    pub(crate) fn create(staged: StagedSubmission) -> Self {
        let mut submission = Self {
            realm: staged.realm,
            subdomain: staged.subdomain,
            url: staged.url,
            form_type: staged.form_type,
            action: staged.action,
            data: FormData {
                username: staged.data.username.unwrap_or_default(),
                password: staged.data.password,
            },
            status: FormStatus::Staging,
            partial: false,
        };
        submission.partial = submission.is_partial();
        submission
    }

    /// Field-level merge of a newer staging event
    pub(crate) fn merge(&mut self, staged: StagedSubmission) {
        self.subdomain = staged.subdomain.or(self.subdomain.take());
        self.url = staged.url;
        self.form_type = staged.form_type;
        self.action = staged.action.or(self.action.take());

        if let Some(username) = staged.data.username {
            self.data.username = username;
        }
        if let Some(password) = staged.data.password {
            self.data.password = Some(password);
        }

        self.status = FormStatus::Staging;
        self.partial = self.is_partial();
    }

    /// A login submission without a usable password is partial. Register
    /// forms may legitimately post the username step alone and never are.
    pub fn is_partial(&self) -> bool {
        match self.form_type {
            FormType::Login => !has_text(self.data.password.as_deref()),
            FormType::Register => false,
        }
    }

    pub fn can_commit(&self) -> bool {
        let has_password = has_text(self.data.password.as_deref());
        match self.form_type {
            FormType::Login => has_password && has_text(Some(&self.data.username)),
            FormType::Register => has_password,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.status == FormStatus::Committed
    }

    pub fn with_autosave(self, autosave: AutoSavePromptOptions) -> PromptedSubmission {
        PromptedSubmission {
            submission: self,
            autosave,
        }
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Submission returned to content scripts together with the autosave decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptedSubmission {
    #[serde(flatten)]
    pub submission: FormSubmission,
    pub autosave: AutoSavePromptOptions,
}
