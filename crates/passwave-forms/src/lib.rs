//! Form submission tracking
//!
//! Content scripts report login and registration form activity to the
//! background worker, which keeps one submission per `(tab, realm)` until it
//! is either committed (and possibly offered for autosave) or stashed because
//! the tab went away or the login request failed.

pub mod autosave;
pub mod observer;
pub mod submission;
pub mod tracker;

pub use autosave::{AutoSaveAction, AutoSavePromptOptions, AutoSaveResolver, LoginLookup, SavedLogin};
pub use observer::{RequestObserver, WebRequestEvent};
pub use submission::{
    FormData, FormDataUpdate, FormStatus, FormSubmission, FormType, PromptedSubmission, StagedSubmission,
};
pub use tracker::FormSubmissionTracker;
