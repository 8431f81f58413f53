//! `devshell://` scheme: serves main-frame documents without their CSP
//!
//! Pages the interceptor declines are answered with a redirect to the real
//! URL, which the renderer then loads on its own.

use tauri::http::{header, Request, Response, StatusCode};
use tauri::{Manager, Runtime, UriSchemeContext, UriSchemeResponder};
use url::Url;

use devshell_core::{inject_base_href, original_url, InterceptedResponse, ResourceRequest};

use crate::state::AppState;

/// Request headers worth repeating on the re-fetch
const FORWARDED_HEADERS: &[&str] = &["user-agent", "accept", "accept-language", "content-type"];

/// Response headers that no longer describe the served body. Cookies would
/// land on the proxy origin instead of the page's own site.
const DROPPED_HEADERS: &[&str] = &[
    "content-length",
    "transfer-encoding",
    "connection",
    "set-cookie",
];

pub fn handle<R: Runtime>(
    ctx: UriSchemeContext<'_, R>,
    request: Request<Vec<u8>>,
    responder: UriSchemeResponder,
) {
    let app = ctx.app_handle().clone();
    let webview_label = ctx.webview_label().to_string();

    tauri::async_runtime::spawn(async move {
        let response = serve(&app, &webview_label, &request).await;
        responder.respond(response);
    });
}

async fn serve<R: Runtime>(
    app: &tauri::AppHandle<R>,
    webview_label: &str,
    request: &Request<Vec<u8>>,
) -> Response<Vec<u8>> {
    let proxy_uri = request.uri().to_string();
    let target = original_url(&proxy_uri);
    let Ok(target_url) = Url::parse(&target) else {
        tracing::warn!(uri = %proxy_uri, "Proxy request without a target");
        return status_only(StatusCode::BAD_REQUEST);
    };
    if target == proxy_uri {
        return status_only(StatusCode::BAD_REQUEST);
    }

    let Some(state) = app.try_state::<AppState>() else {
        return status_only(StatusCode::SERVICE_UNAVAILABLE);
    };
    let browser = state.browser();

    let mut resource = ResourceRequest::main_frame(target_url.as_str())
        .with_cookie(renderer_cookies(app, webview_label, &target_url));
    for name in FORWARDED_HEADERS {
        if let Some(value) = request.headers().get(*name).and_then(|v| v.to_str().ok()) {
            resource = resource.with_header(*name, value);
        }
    }

    match browser.intercept(&resource).await {
        Some(intercepted) => stripped_response(intercepted, target_url.as_str()),
        None => {
            browser.allow_passthrough(target_url.as_str());
            redirect_to(target_url.as_str())
        }
    }
}

/// Cookies the renderer holds for `url`, as a `Cookie` header value
fn renderer_cookies<R: Runtime>(
    app: &tauri::AppHandle<R>,
    webview_label: &str,
    url: &Url,
) -> Option<String> {
    let webview = app.get_webview(webview_label)?;
    let cookies = match webview.cookies_for_url(url.clone()) {
        Ok(cookies) => cookies,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Could not read renderer cookies");
            return None;
        }
    };

    let header = cookies
        .iter()
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect::<Vec<_>>()
        .join("; ");
    Some(header)
}

fn stripped_response(intercepted: InterceptedResponse, target: &str) -> Response<Vec<u8>> {
    let plain_utf8_html = intercepted.is_html()
        && intercepted.header("content-encoding").is_none()
        && matches!(
            intercepted.encoding.to_ascii_lowercase().as_str(),
            "utf-8" | "utf8"
        );

    let body = if plain_utf8_html {
        inject_base_href(&String::from_utf8_lossy(&intercepted.body), target).into_bytes()
    } else {
        intercepted.body
    };

    let mut builder = Response::builder().status(intercepted.status);
    for (name, value) in &intercepted.headers {
        let lowered = name.to_ascii_lowercase();
        if DROPPED_HEADERS.contains(&lowered.as_str()) || lowered == "content-type" {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder = builder.header(
        header::CONTENT_TYPE,
        format!("{}; charset={}", intercepted.mime_type, intercepted.encoding),
    );

    builder.body(body).unwrap_or_else(|e| {
        tracing::error!(url = %target, error = %e, "Failed to build proxy response");
        status_only(StatusCode::BAD_GATEWAY)
    })
}

fn redirect_to(target: &str) -> Response<Vec<u8>> {
    Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(header::LOCATION, target)
        .body(Vec::new())
        .unwrap_or_else(|_| status_only(StatusCode::BAD_GATEWAY))
}

fn status_only(status: StatusCode) -> Response<Vec<u8>> {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intercepted(headers: &[(&str, &str)], body: &str) -> InterceptedResponse {
        InterceptedResponse {
            status: 200,
            mime_type: "text/html".into(),
            encoding: "utf-8".into(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_stripped_response_rewrites_html() {
        let response = stripped_response(
            intercepted(
                &[
                    ("content-type", "text/html"),
                    ("content-length", "26"),
                    ("x-frame-options", "DENY"),
                ],
                "<html><head></head></html>",
            ),
            "https://example.com/a",
        );

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(
            String::from_utf8(response.into_body()).unwrap(),
            "<html><head><base href=\"https://example.com/a\"></head></html>"
        );
    }

    #[test]
    fn test_set_cookie_is_not_served() {
        let response = stripped_response(
            intercepted(
                &[("set-cookie", "sid=1; Path=/"), ("Set-Cookie", "theme=dark")],
                "<head></head>",
            ),
            "https://example.com/",
        );
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn test_compressed_body_is_left_alone() {
        let response = stripped_response(
            intercepted(&[("content-encoding", "gzip")], "<head></head>"),
            "https://example.com/",
        );
        assert_eq!(response.into_body(), b"<head></head>".to_vec());
    }

    #[test]
    fn test_redirect_points_at_target() {
        let response = redirect_to("https://example.com/");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/");
    }
}
