use std::net::SocketAddr;

use devshell_net::{CspInterceptor, ResourceRequest};
use reqwest::redirect::Policy;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve exactly one canned HTTP response; the raw request is sent back.
async fn serve_once(response: &'static str) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    (addr, rx)
}

fn interceptor() -> CspInterceptor {
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .no_proxy()
        .build()
        .unwrap();
    CspInterceptor::with_client(client)
}

#[tokio::test]
async fn test_strips_csp_header() {
    let (addr, request_rx) = serve_once(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/html; charset=ISO-8859-1\r\n\
         Content-Security-Policy: script-src 'self'\r\n\
         X-Frame-Options: DENY\r\n\
         Content-Length: 13\r\n\
         Connection: close\r\n\
         \r\n\
         <p>hello</p>\n",
    )
    .await;

    let request = ResourceRequest::main_frame(format!("http://{}/page", addr))
        .with_header("Accept-Language", "fr")
        .with_cookie(Some("sid=42".into()));

    let response = interceptor().intercept(&request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.mime_type, "text/html");
    assert_eq!(response.encoding, "ISO-8859-1");
    assert!(response.is_html());
    assert!(response.header("content-security-policy").is_none());
    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.body, b"<p>hello</p>\n");

    let raw = request_rx.await.unwrap().to_ascii_lowercase();
    assert!(raw.starts_with("get /page http/1.1"));
    assert!(raw.contains("accept-language: fr"));
    assert!(raw.contains("cookie: sid=42"));
}

#[tokio::test]
async fn test_no_csp_means_no_interception() {
    let (addr, _request_rx) = serve_once(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/html\r\n\
         Content-Length: 2\r\n\
         Connection: close\r\n\
         \r\n\
         ok",
    )
    .await;

    let request = ResourceRequest::main_frame(format!("http://{}/", addr));
    assert!(interceptor().intercept(&request).await.is_none());
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let (addr, _request_rx) = serve_once(
        "HTTP/1.1 302 Found\r\n\
         Location: http://127.0.0.1:9/elsewhere\r\n\
         Content-Security-Policy: default-src 'none'\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n",
    )
    .await;

    let request = ResourceRequest::main_frame(format!("http://{}/", addr));
    let response = interceptor().intercept(&request).await.unwrap();
    assert_eq!(response.status, 302);
    assert_eq!(response.header("location"), Some("http://127.0.0.1:9/elsewhere"));
    assert!(response.header("content-security-policy").is_none());
}

#[tokio::test]
async fn test_fetch_failure_falls_back() {
    // Bind then drop to get a port with nothing listening
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let request = ResourceRequest::main_frame(format!("http://{}/", addr));
    assert!(interceptor().intercept(&request).await.is_none());
}

#[tokio::test]
async fn test_form_post_is_never_fetched() {
    let request = ResourceRequest::main_frame("http://127.0.0.1:9/submit")
        .with_header("content-type", "application/x-www-form-urlencoded");
    assert!(interceptor().intercept(&request).await.is_none());
}
