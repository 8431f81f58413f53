//! DevShell Page State
//!
//! Reflects renderer navigation and loading events into one small,
//! immutable UI state value. Each event produces a new `PageState` from the
//! previous one; the `PageStore` applies events serially and publishes every
//! new value to its subscribers.

mod history;
mod state;
mod store;

pub use history::{NavigationHistory, Traversal};
pub use state::{PageEvent, PageState, LOADING_TITLE, MAX_PROGRESS};
pub use store::PageStore;
