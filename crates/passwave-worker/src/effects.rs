//! Runs async workers on the tokio runtime

use passwave_core::{PasswaveError, PasswaveResult};
use passwave_store::sagas::{self, SagaContext};
use passwave_store::{Action, Effects, StoreHandle};
use tokio::runtime::Handle;

pub struct TokioEffects {
    sagas: SagaContext,
    runtime: Handle,
}

impl TokioEffects {
    /// Bind to the runtime of the calling task
    pub fn new(sagas: SagaContext) -> PasswaveResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| PasswaveError::config(format!("No tokio runtime: {}", e)))?;
        Ok(Self { sagas, runtime })
    }
}

impl Effects for TokioEffects {
    fn run(&self, store: &StoreHandle, action: &Action) {
        if !sagas::handles(action) {
            return;
        }

        tracing::debug!("[Effects] spawning worker for {}", action.name());
        self.runtime
            .spawn(sagas::run(self.sagas.clone(), store.clone(), action.clone()));
    }
}
