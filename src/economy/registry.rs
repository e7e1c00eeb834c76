//! In-process service registry.
//!
//! Stands in for the host's service manager: plugins announce themselves,
//! an economy plugin registers its provider, and lookups can be made
//! contingent on a companion plugin (usually Vault) being loaded.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use super::{EconomyProvider, ServiceRegistry};

#[derive(Default)]
pub struct HostServices {
    plugins: Mutex<HashSet<String>>,
    provider: Mutex<Option<Arc<dyn EconomyProvider>>>,
    /// Plugin that must be loaded before a provider is handed out.
    companion: Option<String>,
    lookups: AtomicUsize,
}

impl HostServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only hand out a provider while `plugin` is loaded.
    pub fn require_companion(mut self, plugin: impl Into<String>) -> Self {
        self.companion = Some(plugin.into());
        self
    }

    pub fn register_plugin(&self, name: impl Into<String>) {
        self.plugins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into());
    }

    pub fn is_plugin_loaded(&self, name: &str) -> bool {
        self.plugins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Register (or replace) the economy provider.
    pub fn register_provider(&self, provider: Arc<dyn EconomyProvider>) {
        debug!(provider = %provider.name(), "Economy provider registered");
        *self.provider.lock().unwrap_or_else(PoisonError::into_inner) = Some(provider);
    }

    /// Number of provider lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ServiceRegistry for HostServices {
    fn lookup_provider(&self) -> Option<Arc<dyn EconomyProvider>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(companion) = &self.companion {
            if !self.is_plugin_loaded(companion) {
                debug!(plugin = %companion, "Companion plugin not loaded, no economy available");
                return None;
            }
        }

        self.provider
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
