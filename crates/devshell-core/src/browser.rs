//! Main browser state container

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use devshell_navigation::{InputKind, InputResolution, InputResolver, NavigationTarget};
use devshell_net::{CspInterceptor, InterceptedResponse, ResourceRequest};
use devshell_page::{PageState, PageStore, Traversal};

use crate::config::Config;
use crate::console::ConsoleMessage;
use crate::inject::console_injection_script;
use crate::proxy;
use crate::Result;

/// How long a passthrough grant stays usable
const PASSTHROUGH_TTL: Duration = Duration::from_secs(10);

/// What to do with a navigation the renderer is about to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the renderer load the URL itself
    Allow,
    /// Load this proxy URL instead
    Proxy(Url),
    /// Hand the URL to the operating system and drop the navigation
    OpenExternal,
}

/// Address bar input, resolved and checked against the navigation policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPlan {
    pub kind: InputKind,
    pub url: Url,
    pub decision: NavigationDecision,
}

/// Main browser instance
///
/// One browsing session: the address bar resolver, the page state observed
/// by the toolbar, and the main-frame interception policy.
pub struct Browser {
    config: Config,
    input_resolver: InputResolver,
    page: PageStore,
    /// Present only when CSP stripping is enabled
    interceptor: Option<CspInterceptor>,
    /// URLs the renderer may load directly once, keyed without fragment
    passthrough: Arc<Mutex<HashMap<String, Instant>>>,
    passthrough_ttl: Duration,
    /// Latest document title reported by the renderer
    document_title: Arc<Mutex<Option<String>>>,
}

impl Browser {
    pub fn new(config: Config) -> Result<Self> {
        let input_resolver = InputResolver::with_search_engine(config.search_engine.clone());

        let interceptor = if config.strip_csp {
            Some(CspInterceptor::new(config.interceptor_config())?)
        } else {
            None
        };

        tracing::info!(strip_csp = config.strip_csp, "Browser initialized");

        Ok(Self {
            config,
            input_resolver,
            page: PageStore::new(),
            interceptor,
            passthrough: Arc::new(Mutex::new(HashMap::new())),
            passthrough_ttl: PASSTHROUGH_TTL,
            document_title: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === Address bar ===

    pub fn resolve_input(&self, input: &str) -> InputResolution {
        let resolution = self.input_resolver.resolve(input);
        tracing::debug!(kind = ?resolution.kind, url = %resolution.url, "Resolved input");
        resolution
    }

    /// Resolve address bar input and decide how to load it.
    pub fn plan_input(&self, input: &str) -> Result<InputPlan> {
        let resolution = self.resolve_input(input);
        let (url, _) = NavigationTarget::parse(&resolution.url)?;
        let decision = self.decide_navigation(&url);

        Ok(InputPlan {
            kind: resolution.kind,
            url,
            decision,
        })
    }

    // === Page state ===

    pub fn page_store(&self) -> &PageStore {
        &self.page
    }

    pub fn page_state(&self) -> PageState {
        self.page.current()
    }

    /// A direct page load consumes every outstanding passthrough grant.
    pub fn on_page_started(&self, url: &str) -> PageState {
        let is_proxied = Url::parse(url).is_ok_and(|parsed| proxy::is_proxy_url(&parsed));
        if !is_proxied {
            self.passthrough.lock().clear();
        }

        let url = proxy::original_url(url);
        *self.document_title.lock() = None;
        self.page.page_started(&url)
    }

    /// The renderer reports no title with the finish event, so the most
    /// recent document title is used.
    pub fn on_page_finished(&self, url: &str) -> PageState {
        let url = proxy::original_url(url);
        let title = self.document_title.lock().clone();
        self.page.page_finished(&url, title)
    }

    pub fn on_progress_changed(&self, progress: u8) -> PageState {
        self.page.progress_changed(progress)
    }

    pub fn on_title_changed(&self, title: String) -> PageState {
        tracing::debug!(title = %title, "Page title");
        *self.document_title.lock() = Some(title.clone());
        self.page.title_received(title)
    }

    /// Record a back/forward/reload the renderer is asked to perform.
    ///
    /// The renderer revisits the entry on its own, so the target may load
    /// directly. Returns false when the traversal is not possible.
    pub fn request_traversal(&self, traversal: Traversal) -> bool {
        match self.page.request_traversal(traversal) {
            Some(target) => {
                self.allow_passthrough(&target);
                true
            }
            None => false,
        }
    }

    // === Navigation policy ===

    pub fn decide_navigation(&self, url: &Url) -> NavigationDecision {
        if proxy::is_proxy_url(url) {
            return NavigationDecision::Allow;
        }

        match NavigationTarget::classify(url) {
            NavigationTarget::Internal => NavigationDecision::Allow,
            NavigationTarget::External => NavigationDecision::OpenExternal,
            NavigationTarget::Web => {
                if self.interceptor.is_none() || self.take_passthrough(url) {
                    return NavigationDecision::Allow;
                }

                match proxy::proxy_url(url.as_str()) {
                    Some(proxied) => NavigationDecision::Proxy(proxied),
                    None => NavigationDecision::Allow,
                }
            }
        }
    }

    /// Let the renderer load `url` directly the next time it navigates there.
    pub fn allow_passthrough(&self, url: &str) {
        let Ok(parsed) = Url::parse(url) else {
            tracing::debug!(url = %url, "Ignoring passthrough for invalid URL");
            return;
        };

        let ttl = self.passthrough_ttl;
        let mut passthrough = self.passthrough.lock();
        passthrough.retain(|_, granted| granted.elapsed() < ttl);
        passthrough.insert(passthrough_key(&parsed), Instant::now());
    }

    /// A page is about to POST a form to `action`.
    ///
    /// The body cannot be replayed through the proxy, so the renderer submits
    /// it itself.
    pub fn allow_form_submission(&self, action: &str) {
        match NavigationTarget::parse(action) {
            Ok((url, NavigationTarget::Web)) => {
                tracing::debug!(url = %url, "Form submission loads directly");
                self.allow_passthrough(url.as_str());
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Ignoring form submission"),
        }
    }

    fn take_passthrough(&self, url: &Url) -> bool {
        self.passthrough
            .lock()
            .remove(&passthrough_key(url))
            .is_some_and(|granted| granted.elapsed() < self.passthrough_ttl)
    }

    /// Fetch a main-frame document without its CSP header.
    ///
    /// `None` means the renderer should make the request itself.
    pub async fn intercept(&self, request: &ResourceRequest) -> Option<InterceptedResponse> {
        match &self.interceptor {
            Some(interceptor) => interceptor.intercept(request).await,
            None => None,
        }
    }

    // === Debugging console ===

    /// Script to evaluate once a page finished loading, if the page gets one.
    pub fn console_script_for(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let is_page = proxy::is_proxy_url(&parsed)
            || NavigationTarget::classify(&parsed) == NavigationTarget::Web;

        is_page.then(|| console_injection_script(&self.config.console_script_url))
    }

    pub fn on_console_message(&self, message: &ConsoleMessage) {
        message.log();
    }
}

fn passthrough_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.into()
}
