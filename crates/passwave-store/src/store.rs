//! State container
//!
//! [`Store`] owns one context's state tree and runs the root reducer.
//! [`StoreHandle`] is the cloneable handle components receive; it also runs
//! the optional [`Effects`] hook after each reduction, which is where
//! asynchronous workers (see [`crate::sagas`]) are started.

use crate::actions::Action;
use crate::reducers::{root_reducer, State};
use std::sync::{Arc, Mutex, MutexGuard};

/// Side effects started by dispatched actions
pub trait Effects: Send + Sync {
    fn run(&self, store: &StoreHandle, action: &Action);
}

type Listener = Box<dyn Fn(&State, &Action) + Send + Sync>;

#[derive(Default)]
pub struct Store {
    state: State,
    listeners: Vec<Listener>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: State) -> Self {
        Self {
            state,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn dispatch(&mut self, action: &Action) {
        log::debug!("[Store::Dispatch] {}", action.name());
        let state = std::mem::take(&mut self.state);
        self.state = root_reducer(state, action);

        for listener in &self.listeners {
            listener(&self.state, action);
        }
    }

    /// Listeners run with the store locked and must not dispatch.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&State, &Action) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }
}

#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<Store>>,
    effects: Option<Arc<dyn Effects>>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new(Store::new())
    }
}

impl StoreHandle {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            effects: None,
        }
    }

    pub fn with_effects(mut self, effects: Arc<dyn Effects>) -> Self {
        self.effects = Some(effects);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn dispatch(&self, action: Action) {
        self.lock().dispatch(&action);

        if let Some(effects) = &self.effects {
            effects.run(self, &action);
        }
    }

    pub fn state(&self) -> State {
        self.lock().state().clone()
    }

    pub fn select<R, F>(&self, selector: F) -> R
    where
        F: FnOnce(&State) -> R,
    {
        selector(self.lock().state())
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&State, &Action) + Send + Sync + 'static,
    {
        self.lock().subscribe(listener);
    }
}
