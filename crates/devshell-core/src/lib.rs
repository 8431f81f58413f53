//! DevShell Core
//!
//! Central coordination layer for the DevShell browser.
//! The renderer only displays pages; address bar resolution, page state,
//! navigation policy and console injection all live here.

mod browser;
mod config;
mod console;
mod error;
mod inject;
mod proxy;

pub use browser::{Browser, InputPlan, NavigationDecision};
pub use config::Config;
pub use console::{ConsoleLevel, ConsoleMessage};
pub use error::CoreError;
pub use inject::console_injection_script;
pub use proxy::{is_proxy_url, original_url, proxy_url};

// Re-export core components
pub use devshell_navigation::{
    InputKind, InputResolution, InputResolver, NavigationError, NavigationTarget, BLANK_PAGE,
    PROXY_SCHEME,
};
pub use devshell_net::{
    inject_base_href, CspInterceptor, InterceptedResponse, NetError, ResourceRequest,
};
pub use devshell_page::{PageState, PageStore, Traversal};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
