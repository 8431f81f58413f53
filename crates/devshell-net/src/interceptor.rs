//! Content-Security-Policy interceptor

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

use crate::error::NetError;
use crate::Result;

pub const CSP_HEADER: &str = "content-security-policy";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const DEFAULT_MIME_TYPE: &str = "text/html";
const DEFAULT_ENCODING: &str = "utf-8";

#[derive(Debug, Clone, Copy)]
pub struct InterceptorConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// A request the renderer is about to make
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub url: String,
    pub is_main_frame: bool,
    pub headers: Vec<(String, String)>,
    /// Cookies the renderer holds for the URL
    pub cookie: Option<String>,
}

impl ResourceRequest {
    pub fn main_frame(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_main_frame: true,
            headers: Vec::new(),
            cookie: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie.filter(|c| !c.is_empty());
        self
    }

    /// First header value with the given name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Replacement response handed to the renderer
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    pub status: u16,
    pub mime_type: String,
    pub encoding: String,
    /// Response headers without `content-security-policy`
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl InterceptedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_html(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("text/html")
    }
}

#[derive(Clone)]
pub struct CspInterceptor {
    client: reqwest::Client,
}

impl CspInterceptor {
    pub fn new(config: InterceptorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(config.connect_timeout)
            .timeout(config.connect_timeout + config.read_timeout)
            .build()?;

        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client. It should not follow redirects.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Cheap checks made before any network traffic
    pub fn should_intercept(request: &ResourceRequest) -> bool {
        if !request.is_main_frame {
            return false;
        }

        let Ok(url) = Url::parse(&request.url) else {
            return false;
        };
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        !request
            .header(CONTENT_TYPE.as_str())
            .is_some_and(|value| value.eq_ignore_ascii_case(FORM_CONTENT_TYPE))
    }

    /// Re-fetch the document and strip its CSP header.
    ///
    /// `None` means "do not intercept": the renderer performs its own request.
    pub async fn intercept(&self, request: &ResourceRequest) -> Option<InterceptedResponse> {
        if !Self::should_intercept(request) {
            return None;
        }

        tracing::debug!(url = %request.url, "Checking CSP");

        match self.fetch_without_csp(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %request.url, error = %e, "Error intercepting request");
                None
            }
        }
    }

    async fn fetch_without_csp(
        &self,
        request: &ResourceRequest,
    ) -> Result<Option<InterceptedResponse>> {
        let url =
            Url::parse(&request.url).map_err(|_| NetError::InvalidUrl(request.url.clone()))?;

        // The re-fetch is always a plain GET of the document
        let response = self
            .client
            .get(url)
            .headers(forwarded_headers(request))
            .send()
            .await?;

        if !response.headers().contains_key(CSP_HEADER) {
            return Ok(None);
        }

        tracing::info!(url = %request.url, "Removing CSP");

        let status = response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter(|(name, _)| name.as_str() != CSP_HEADER)
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?.to_vec();

        Ok(Some(InterceptedResponse {
            status: status.as_u16(),
            mime_type: mime_type(content_type.as_deref()),
            encoding: charset(content_type.as_deref()),
            headers,
            body,
        }))
    }
}

fn forwarded_headers(request: &ResourceRequest) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in &request.headers {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            tracing::debug!(header = %name, "Skipping unforwardable header");
            continue;
        };
        headers.append(name, value);
    }

    if let Some(cookie) = request
        .cookie
        .as_deref()
        .and_then(|c| HeaderValue::from_str(c).ok())
    {
        headers.insert(COOKIE, cookie);
    }

    headers
}

fn mime_type(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

fn charset(content_type: Option<&str>) -> String {
    content_type
        .into_iter()
        .flat_map(|ct| ct.split(';').skip(1))
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_intercept_main_frame_http() {
        assert!(CspInterceptor::should_intercept(&ResourceRequest::main_frame(
            "https://example.com"
        )));
        assert!(CspInterceptor::should_intercept(&ResourceRequest::main_frame(
            "http://127.0.0.1:3000/"
        )));
    }

    #[test]
    fn test_skips_sub_resources_and_other_schemes() {
        let sub_resource = ResourceRequest {
            is_main_frame: false,
            ..ResourceRequest::main_frame("https://example.com/app.js")
        };
        assert!(!CspInterceptor::should_intercept(&sub_resource));
        assert!(!CspInterceptor::should_intercept(&ResourceRequest::main_frame(
            "about:blank"
        )));
        assert!(!CspInterceptor::should_intercept(&ResourceRequest::main_frame(
            "not a url"
        )));
    }

    #[test]
    fn test_skips_form_posts() {
        let request = ResourceRequest::main_frame("https://example.com/login")
            .with_header("Content-Type", "application/x-www-form-urlencoded");
        assert!(!CspInterceptor::should_intercept(&request));

        let request = ResourceRequest::main_frame("https://example.com/api")
            .with_header("content-type", "application/json");
        assert!(CspInterceptor::should_intercept(&request));
    }

    #[test]
    fn test_forwarded_headers_include_cookie() {
        let request = ResourceRequest::main_frame("https://example.com")
            .with_header("Accept-Language", "en")
            .with_header("bad header", "x")
            .with_cookie(Some("sid=1; theme=dark".into()));

        let headers = forwarded_headers(&request);
        assert_eq!(headers.get("accept-language").unwrap(), "en");
        assert_eq!(headers.get(COOKIE).unwrap(), "sid=1; theme=dark");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_empty_cookie_is_dropped() {
        let request =
            ResourceRequest::main_frame("https://example.com").with_cookie(Some(String::new()));
        assert!(request.cookie.is_none());
    }

    #[test]
    fn test_mime_type_and_charset() {
        assert_eq!(mime_type(Some("text/html; charset=ISO-8859-1")), "text/html");
        assert_eq!(mime_type(Some("application/xhtml+xml")), "application/xhtml+xml");
        assert_eq!(mime_type(None), "text/html");

        assert_eq!(charset(Some("text/html; charset=ISO-8859-1")), "ISO-8859-1");
        assert_eq!(charset(Some("text/html;Charset=\"utf-16\"")), "utf-16");
        assert_eq!(charset(Some("text/html")), "utf-8");
        assert_eq!(charset(None), "utf-8");
    }
}
