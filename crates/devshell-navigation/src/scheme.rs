//! Scheme classification for navigation requests

use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Custom scheme served by the shell itself
pub const PROXY_SCHEME: &str = "devshell";

/// Schemes the renderer handles on its own
const INTERNAL_SCHEMES: &[&str] = &[
    "about",
    "data",
    "blob",
    "tauri",
    "ipc",
    "asset",
    PROXY_SCHEME,
];

/// Where a navigation request should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Regular http(s) page, loaded by the renderer
    Web,
    /// Renderer-internal or shell-owned page
    Internal,
    /// App link or other scheme, handed to the operating system
    External,
}

impl NavigationTarget {
    pub fn classify(url: &Url) -> Self {
        let scheme = url.scheme();
        if scheme == "http" || scheme == "https" {
            NavigationTarget::Web
        } else if INTERNAL_SCHEMES.contains(&scheme) {
            NavigationTarget::Internal
        } else {
            NavigationTarget::External
        }
    }

    /// Parse and classify in one step
    pub fn parse(url: &str) -> Result<(Url, Self)> {
        let parsed = Url::parse(url).map_err(|e| {
            tracing::debug!(url = %url, error = %e, "Unparseable navigation URL");
            NavigationError::InvalidUrl(url.to_string())
        })?;
        let target = Self::classify(&parsed);
        Ok((parsed, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(url: &str) -> NavigationTarget {
        NavigationTarget::parse(url).unwrap().1
    }

    #[test]
    fn test_web_schemes() {
        assert_eq!(classify("https://example.com"), NavigationTarget::Web);
        assert_eq!(classify("http://127.0.0.1:8080/"), NavigationTarget::Web);
    }

    #[test]
    fn test_internal_schemes() {
        assert_eq!(classify("about:blank"), NavigationTarget::Internal);
        assert_eq!(classify("data:text/html,hi"), NavigationTarget::Internal);
        assert_eq!(
            classify("devshell://localhost/?url=https%3A%2F%2Fexample.com"),
            NavigationTarget::Internal
        );
    }

    #[test]
    fn test_external_schemes() {
        for url in [
            "mailto:someone@example.com",
            "intent://scan/#Intent;scheme=zxing;end",
            "tg://resolve?domain=example",
        ] {
            assert_eq!(classify(url), NavigationTarget::External);
        }
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            NavigationTarget::parse("not a url"),
            Err(NavigationError::InvalidUrl(_))
        ));
    }
}
