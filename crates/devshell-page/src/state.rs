//! Page state reducer
//!
//! ```text
//! PageStarted(url)            → url, title = "Loading...", progress = 0, loading
//! ProgressChanged(p)          → progress
//! TitleReceived(title)        → title (ignored while loading)
//! PageFinished(url, title)    → url, title, not loading
//! NavigationStateChanged(b,f) → can_go_back, can_go_forward
//! ```

use serde::{Deserialize, Serialize};

/// Title shown while a page is loading
pub const LOADING_TITLE: &str = "Loading...";

pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub url: Option<String>,
    pub title: Option<String>,
    /// Load progress, always within 0..=100
    pub progress: u8,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Renderer event applied to the page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    PageStarted {
        url: String,
    },
    PageFinished {
        url: String,
        title: Option<String>,
    },
    ProgressChanged {
        progress: u8,
    },
    TitleReceived {
        title: String,
    },
    NavigationStateChanged {
        can_go_back: bool,
        can_go_forward: bool,
    },
}

impl PageState {
    /// Produce the next state for an event
    pub fn reduce(self, event: PageEvent) -> PageState {
        match event {
            PageEvent::PageStarted { url } => self.on_page_started(url),
            PageEvent::PageFinished { url, title } => self.on_page_finished(url, title),
            PageEvent::ProgressChanged { progress } => self.on_progress_changed(progress),
            PageEvent::TitleReceived { title } => self.on_title_received(title),
            PageEvent::NavigationStateChanged {
                can_go_back,
                can_go_forward,
            } => self.on_navigation_state_changed(can_go_back, can_go_forward),
        }
    }

    pub fn on_page_started(self, url: String) -> PageState {
        PageState {
            url: Some(url),
            title: Some(LOADING_TITLE.to_string()),
            progress: 0,
            is_loading: true,
            ..self
        }
    }

    /// Progress is left untouched
    pub fn on_page_finished(self, url: String, title: Option<String>) -> PageState {
        PageState {
            url: Some(url),
            title,
            is_loading: false,
            ..self
        }
    }

    pub fn on_progress_changed(self, progress: u8) -> PageState {
        PageState {
            progress: progress.min(MAX_PROGRESS),
            ..self
        }
    }

    pub fn on_title_received(self, title: String) -> PageState {
        if self.is_loading {
            return self;
        }

        PageState {
            title: Some(title),
            ..self
        }
    }

    pub fn on_navigation_state_changed(self, can_go_back: bool, can_go_forward: bool) -> PageState {
        PageState {
            can_go_back,
            can_go_forward,
            ..self
        }
    }
}
