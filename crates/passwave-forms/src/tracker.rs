//! Per-tab form submission index
//!
//! Entries move from absent to `STAGING` on the first stage event, to
//! `COMMITTED` once the page reports a submit with complete credentials, and
//! back to absent when stashed. Entries are keyed by `(TabId, Realm)` so a tab
//! may track several realms at once (SSO redirects, embedded login frames).

use crate::submission::{FormStatus, FormSubmission, StagedSubmission};
use passwave_core::{Realm, TabId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FormSubmissionTracker {
    submissions: HashMap<(TabId, Realm), FormSubmission>,
}

impl FormSubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub fn contains(&self, tab_id: TabId, realm: &Realm) -> bool {
        self.submissions.contains_key(&(tab_id, realm.clone()))
    }

    pub fn get(&self, tab_id: TabId, realm: &Realm) -> Option<&FormSubmission> {
        self.submissions
            .get(&(tab_id, realm.clone()))
            .filter(|submission| &submission.realm == realm)
    }

    /// Create a staging entry or merge into the existing one. A committed
    /// entry is replaced by a fresh staging entry.
    pub fn stage(&mut self, tab_id: TabId, staged: StagedSubmission, reason: &str) -> FormSubmission {
        log::info!(
            "[FormTracker::Stage] on tab {} for realm \"{}\" {{{}}}",
            tab_id,
            staged.realm,
            reason
        );

        let key = (tab_id, staged.realm.clone());
        match self.submissions.get_mut(&key) {
            Some(pending) if pending.status == FormStatus::Staging => {
                pending.merge(staged);
                pending.clone()
            }
            _ => {
                let submission = FormSubmission::create(staged);
                self.submissions.insert(key, submission.clone());
                submission
            }
        }
    }

    /// Commit a staging entry. Returns `None` and leaves the entry untouched
    /// when nothing is staged or the credentials are incomplete.
    pub fn commit(&mut self, tab_id: TabId, realm: &Realm, reason: &str) -> Option<FormSubmission> {
        let pending = self.submissions.get_mut(&(tab_id, realm.clone()))?;
        if pending.status != FormStatus::Staging {
            return None;
        }

        log::info!(
            "[FormTracker::Commit] on tab {} for realm \"{}\" {{{}}}",
            tab_id,
            realm,
            reason
        );

        if !pending.can_commit() {
            log::debug!("[FormTracker::Commit] incomplete credentials on tab {}", tab_id);
            return None;
        }

        pending.status = FormStatus::Committed;
        Some(pending.clone())
    }

    /// Remove the entry if present. Returns whether anything was removed.
    pub fn stash(&mut self, tab_id: TabId, realm: &Realm, reason: &str) -> bool {
        if self.submissions.remove(&(tab_id, realm.clone())).is_some() {
            log::info!(
                "[FormTracker::Stash] on tab {} for realm \"{}\" {{{}}}",
                tab_id,
                realm,
                reason
            );
            true
        } else {
            false
        }
    }

    /// Stash every entry of `tab_id`. Returns the number of entries removed.
    pub fn remove_tab(&mut self, tab_id: TabId, reason: &str) -> usize {
        let realms: Vec<Realm> = self
            .submissions
            .keys()
            .filter(|(tab, _)| *tab == tab_id)
            .map(|(_, realm)| realm.clone())
            .collect();

        realms
            .iter()
            .filter(|realm| self.stash(tab_id, realm, reason))
            .count()
    }

    pub fn clear(&mut self) {
        log::info!("[FormTracker::Clear] removing every submission");
        self.submissions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{FormDataUpdate, FormType};

    fn staged(realm: &str, data: FormDataUpdate) -> StagedSubmission {
        StagedSubmission {
            realm: Realm::new(realm),
            subdomain: None,
            url: format!("https://{}/login", realm),
            form_type: FormType::Login,
            action: None,
            data,
        }
    }

    #[test]
    fn test_stage_merges_fields() {
        let mut tracker = FormSubmissionTracker::new();
        let tab = TabId(3);

        let first = tracker.stage(tab, staged("example.com", FormDataUpdate::username("bob")), "username");
        assert!(first.partial);

        let second = tracker.stage(tab, staged("example.com", FormDataUpdate::password("secret")), "password");
        assert_eq!(second.data.username, "bob");
        assert_eq!(second.data.password.as_deref(), Some("secret"));
        assert!(!second.partial);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_commit_gating() {
        let mut tracker = FormSubmissionTracker::new();
        let tab = TabId(3);
        let realm = Realm::new("example.com");

        tracker.stage(tab, staged("example.com", FormDataUpdate::credentials("bob", "")), "submit");
        assert!(tracker.commit(tab, &realm, "submit").is_none());
        assert_eq!(tracker.get(tab, &realm).unwrap().status, FormStatus::Staging);

        tracker.stage(tab, staged("example.com", FormDataUpdate::password("pw")), "retype");
        let committed = tracker.commit(tab, &realm, "submit").unwrap();
        assert_eq!(committed.status, FormStatus::Committed);
        assert_eq!(committed.data.username, "bob");

        // only STAGING entries commit
        assert!(tracker.commit(tab, &realm, "submit").is_none());
        assert!(tracker.get(tab, &realm).unwrap().is_committed());
    }

    #[test]
    fn test_commit_unknown_entry() {
        let mut tracker = FormSubmissionTracker::new();
        assert!(tracker.commit(TabId(1), &Realm::new("example.com"), "submit").is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_stage_after_commit_restarts() {
        let mut tracker = FormSubmissionTracker::new();
        let tab = TabId(3);
        let realm = Realm::new("example.com");

        tracker.stage(tab, staged("example.com", FormDataUpdate::credentials("bob", "pw")), "submit");
        tracker.commit(tab, &realm, "submit").unwrap();

        let restaged = tracker.stage(tab, staged("example.com", FormDataUpdate::username("alice")), "again");
        assert_eq!(restaged.status, FormStatus::Staging);
        assert_eq!(restaged.data.password, None);
    }

    #[test]
    fn test_stash_is_idempotent() {
        let mut tracker = FormSubmissionTracker::new();
        let tab = TabId(3);
        let realm = Realm::new("example.com");

        tracker.stage(tab, staged("example.com", FormDataUpdate::username("bob")), "username");
        assert!(tracker.stash(tab, &realm, "navigate"));
        assert!(!tracker.stash(tab, &realm, "navigate"));
        assert!(tracker.get(tab, &realm).is_none());
    }

    #[test]
    fn test_remove_tab_stashes_every_realm() {
        let mut tracker = FormSubmissionTracker::new();
        for realm in ["a.com", "b.com", "c.com"] {
            tracker.stage(TabId(7), staged(realm, FormDataUpdate::username("bob")), "username");
        }
        tracker.stage(TabId(8), staged("a.com", FormDataUpdate::username("eve")), "username");

        assert_eq!(tracker.remove_tab(TabId(7), "TAB_DELETED"), 3);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.contains(TabId(8), &Realm::new("a.com")));
    }

    #[test]
    fn test_remove_tab_does_not_prefix_match() {
        let mut tracker = FormSubmissionTracker::new();
        tracker.stage(TabId(1), staged("a.com", FormDataUpdate::username("bob")), "username");
        tracker.stage(TabId(12), staged("a.com", FormDataUpdate::username("bob")), "username");

        tracker.remove_tab(TabId(1), "TAB_DELETED");
        assert!(tracker.get(TabId(12), &Realm::new("a.com")).is_some());
        assert!(tracker.get(TabId(1), &Realm::new("a.com")).is_none());
    }

    #[test]
    fn test_clear() {
        let mut tracker = FormSubmissionTracker::new();
        tracker.stage(TabId(1), staged("a.com", FormDataUpdate::username("bob")), "username");
        tracker.clear();
        assert!(tracker.is_empty());
    }
}
