//! DevShell Navigation
//!
//! Address bar input resolution:
//!   1. Empty input → blank page
//!   2. Explicit `http://` / `https://` URL → navigate unchanged
//!   3. Bare domain with a well-known TLD → `https://www.` prefix
//!   4. Anything else → search engine query
//!
//! Also classifies navigation requests by scheme so the shell knows which
//! URLs the renderer handles and which go to the operating system.

mod error;
mod input;
mod scheme;

pub use error::NavigationError;
pub use input::{
    is_http_url, InputKind, InputResolution, InputResolver, BLANK_PAGE, DEFAULT_SEARCH_ENGINE,
};
pub use scheme::{NavigationTarget, PROXY_SCHEME};

pub type Result<T> = std::result::Result<T, NavigationError>;
