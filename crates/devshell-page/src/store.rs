//! Page Store
//!
//! Holds the current `PageState` for one browsing session and publishes each
//! new value to subscribers.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

use crate::history::{NavigationHistory, Traversal};
use crate::state::{PageEvent, PageState};

pub struct PageStore {
    state: Arc<watch::Sender<PageState>>,
    history: Arc<Mutex<NavigationHistory>>,
}

impl PageStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(PageState::default());
        Self {
            state: Arc::new(state),
            history: Arc::new(Mutex::new(NavigationHistory::new())),
        }
    }

    /// Snapshot of the current state
    pub fn current(&self) -> PageState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.state.subscribe()
    }

    /// Apply one event as a read-modify-write of the whole state.
    ///
    /// Subscribers are only notified when the state actually changed.
    pub fn dispatch(&self, event: PageEvent) -> PageState {
        tracing::trace!(?event, "Page event");

        self.state.send_if_modified(|state| {
            let next = state.clone().reduce(event);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });

        self.current()
    }

    /// A main-frame load started; also commits the URL to the history.
    pub fn page_started(&self, url: &str) -> PageState {
        let (can_go_back, can_go_forward) = {
            let mut history = self.history.lock();
            history.commit(url);
            (history.can_go_back(), history.can_go_forward())
        };

        self.dispatch(PageEvent::PageStarted {
            url: url.to_string(),
        });
        self.dispatch(PageEvent::NavigationStateChanged {
            can_go_back,
            can_go_forward,
        })
    }

    pub fn page_finished(&self, url: &str, title: Option<String>) -> PageState {
        self.dispatch(PageEvent::PageFinished {
            url: url.to_string(),
            title,
        })
    }

    pub fn progress_changed(&self, progress: u8) -> PageState {
        self.dispatch(PageEvent::ProgressChanged { progress })
    }

    pub fn title_received(&self, title: String) -> PageState {
        self.dispatch(PageEvent::TitleReceived { title })
    }

    /// Record a user traversal and return the URL it leads to.
    ///
    /// `None` when the traversal is not possible.
    pub fn request_traversal(&self, traversal: Traversal) -> Option<String> {
        let mut history = self.history.lock();
        let target = history.target(traversal).map(str::to_string)?;
        history.request(traversal);
        Some(target)
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PageStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            history: Arc::clone(&self.history),
        }
    }
}
