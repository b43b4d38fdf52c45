//! Optimistic client state for the Passwave worker and its UI contexts
//!
//! Actions are decorated by the [`actions`] pipeline, reduced by the
//! [`reducers`] into a state tree whose mutable domains are backed by the
//! [`optimistic`] history engine, and tracked in the [`request`] ledger while
//! their asynchronous [`sagas`] run.

pub mod actions;
pub mod model;
pub mod optimistic;
pub mod reducers;
pub mod request;
pub mod sagas;
pub mod selectors;
pub mod store;

pub use actions::{creators, Action, ActionCallback, ActionKind, ActionMeta, Notification};
pub use optimistic::{OptimisticHistoryItem, OptimisticState};
pub use reducers::{root_reducer, State};
pub use request::{RequestMeta, RequestState, RequestStatus};
pub use sagas::{EncryptionCapability, PassApi, SagaContext};
pub use store::{Effects, Store, StoreHandle};
