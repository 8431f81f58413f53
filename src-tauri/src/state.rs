//! Application state management
use devshell_core::{Browser, Config, Result};
use std::sync::Arc;

/// Thread-safe application state wrapper
pub struct AppState {
    browser: Arc<Browser>,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = Config::load(&Config::data_dir())?;
        let browser = Browser::new(config)?;

        Ok(Self {
            browser: Arc::new(browser),
        })
    }

    /// Shared handle, usable across `.await` points
    pub fn browser(&self) -> Arc<Browser> {
        Arc::clone(&self.browser)
    }

    pub fn with_browser<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Browser) -> T,
    {
        f(&self.browser)
    }
}
