//! Input resolution for the address bar

use serde::{Deserialize, Serialize};

/// Page loaded for empty address bar input
pub const BLANK_PAGE: &str = "about:blank";

/// Search engine URL template (`%s` replaced with the encoded query)
pub const DEFAULT_SEARCH_ENGINE: &str = "https://www.google.com/search?q=%s";

/// Substrings that mark input as a probable bare domain
const DOMAIN_HINTS: &[&str] = &[
    ".com", ".io", ".me", ".org", ".net", ".tv", ".cn", ".co", ".app",
];

/// How the input was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Empty input, resolves to the blank page
    Blank,
    /// Already a fully-qualified http(s) URL
    Url,
    /// Bare domain, upgraded to https
    Domain,
    /// Free text sent to the search engine
    Search,
}

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputResolution {
    pub kind: InputKind,
    pub url: String,
}

impl InputResolution {
    fn new(kind: InputKind, url: String) -> Self {
        Self { kind, url }
    }
}

/// Returns true if the text starts with a lowercase `http://` or `https://` scheme.
pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Self {
        Self {
            search_template: template,
        }
    }

    /// Resolve user input into a URL to load. Total over all inputs.
    pub fn resolve(&self, input: &str) -> InputResolution {
        let input = input.trim();

        if input.is_empty() {
            return InputResolution::new(InputKind::Blank, BLANK_PAGE.to_string());
        }

        if is_http_url(input) {
            return InputResolution::new(InputKind::Url, input.to_string());
        }

        if Self::looks_like_domain(input) {
            let url = if input.starts_with("www.") {
                format!("https://{}", input)
            } else {
                format!("https://www.{}", input)
            };
            return InputResolution::new(InputKind::Domain, url);
        }

        InputResolution::new(InputKind::Search, self.build_search_url(input))
    }

    fn looks_like_domain(input: &str) -> bool {
        if input.chars().any(char::is_whitespace) {
            return false;
        }

        let lowered = input.to_ascii_lowercase();
        DOMAIN_HINTS.iter().any(|hint| lowered.contains(hint))
    }

    fn build_search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        self.search_template.replace("%s", &encoded)
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}
