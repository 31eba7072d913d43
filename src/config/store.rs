//! Lock-free configuration store
//!
//! Single writer (the control plane), any number of readers. Writers replace
//! the whole record; readers load an `Arc` snapshot and never block.

use super::Configuration;
use arc_swap::ArcSwapOption;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct ConfigStore {
    current: ArcSwapOption<Configuration>,
}

impl ConfigStore {
    /// Empty store; evaluations that need the local address abort until set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local_address(addr: Ipv4Addr) -> Self {
        let store = Self::new();
        store.replace(Configuration::new(addr));
        store
    }

    /// Replace the record with one holding `addr`
    pub fn set_local_address(&self, addr: Ipv4Addr) {
        self.replace(Configuration::new(addr));
    }

    /// Atomically swap in a new record
    pub fn replace(&self, config: Configuration) {
        info!(local_address = %config.local_address, "configuration updated");
        self.current.store(Some(Arc::new(config)));
    }

    /// Back to the uninitialized state
    pub fn clear(&self) {
        info!("configuration cleared");
        self.current.store(None);
    }

    /// Current record, if any
    pub fn snapshot(&self) -> Option<Arc<Configuration>> {
        self.current.load_full()
    }

    pub fn is_configured(&self) -> bool {
        self.current.load().is_some()
    }
}
