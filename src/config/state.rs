// Application state module
// Immutable per-process state shared by every request

use super::types::Config;
use crate::page::PageStore;
use crate::template::{TemplateError, TemplateRegistry};

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: PageStore,
    pub templates: TemplateRegistry,
}

impl AppState {
    pub const fn new(config: Config, store: PageStore, templates: TemplateRegistry) -> Self {
        Self {
            config,
            store,
            templates,
        }
    }

    /// Build state from configuration, loading templates from disk.
    /// Template failures are returned so the caller can refuse to start.
    pub fn from_config(config: Config) -> Result<Self, TemplateError> {
        let templates = TemplateRegistry::load(&config.templates_dir(), config.templates.dev_mode)?;
        let store = PageStore::new(config.data_dir());
        Ok(Self::new(config, store, templates))
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
