//! Settings delivery
//!
//! Parameter writes from outside the path manager (a ground station, a test)
//! go through [`SettingsHandle`]. Each accepted write publishes a fresh
//! snapshot of the store on a `watch` channel; the runner picks the latest
//! snapshot up at the top of its next cycle.

use std::sync::Arc;

use tokio::sync::watch;

use path_manager_core::parameters::ParameterStore;

use crate::config::set_parameter;
use crate::error::SitlError;

/// Shared writer side of the parameter store
#[derive(Clone)]
pub struct SettingsHandle {
    tx: Arc<watch::Sender<ParameterStore>>,
}

impl SettingsHandle {
    pub fn new(store: ParameterStore) -> Self {
        let (tx, _rx) = watch::channel(store);
        Self { tx: Arc::new(tx) }
    }

    /// Receiver that sees every snapshot published after this call
    pub fn subscribe(&self) -> watch::Receiver<ParameterStore> {
        self.tx.subscribe()
    }

    /// Copy of the current store
    pub fn snapshot(&self) -> ParameterStore {
        self.tx.borrow().clone()
    }

    /// Write one parameter and publish the new store
    ///
    /// Rejected writes leave the published store untouched.
    pub fn set(&self, name: &str, value: f64) -> Result<(), SitlError> {
        let mut next = self.snapshot();
        set_parameter(&mut next, name, value)?;
        log::info!("Parameter {} set to {}", name, value);
        self.tx.send_replace(next);
        Ok(())
    }
}
