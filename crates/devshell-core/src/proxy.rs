//! URLs of the CSP-stripping proxy scheme
//!
//! A proxied page is addressed as `devshell://localhost/?url=<target>`.
//! Windows webviews expose custom schemes as `http://devshell.localhost/`.

use devshell_navigation::PROXY_SCHEME;
use url::Url;

#[cfg(not(windows))]
const PROXY_BASE: &str = "devshell://localhost/";
#[cfg(windows)]
const PROXY_BASE: &str = "http://devshell.localhost/";

const PROXY_HOST: &str = "devshell.localhost";
const TARGET_PARAM: &str = "url";

/// Proxy URL that serves `target` without its CSP header
pub fn proxy_url(target: &str) -> Option<Url> {
    Url::parse_with_params(PROXY_BASE, &[(TARGET_PARAM, target)]).ok()
}

pub fn is_proxy_url(url: &Url) -> bool {
    url.scheme() == PROXY_SCHEME || url.host_str() == Some(PROXY_HOST)
}

/// The page a proxy URL stands for; other URLs map to themselves.
pub fn original_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .filter(is_proxy_url)
        .and_then(|parsed| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == TARGET_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| url.to_string())
}
