//! Content webview management
//!
//! The window holds two child webviews: the toolbar UI on top and the page
//! content below it. Renderer callbacks of the content webview feed the
//! browser core; page state changes are pushed back to the toolbar.

use std::sync::Arc;
use tauri::webview::{PageLoadEvent, WebviewBuilder};
use tauri::{
    AppHandle, Emitter, LogicalPosition, LogicalSize, Manager, Runtime, Webview, WebviewUrl,
    Window,
};
use url::Url;

use devshell_core::{Browser, NavigationDecision};

use super::content::CONTENT_INIT_SCRIPT;
use super::{content_webview_label, ui_webview_label};

/// Height of the toolbar webview in logical pixels
pub const TOOLBAR_HEIGHT: f64 = 48.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentBounds {
    /// Content area for a window of the given logical size
    pub fn below_toolbar(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: TOOLBAR_HEIGHT,
            width,
            height: (height - TOOLBAR_HEIGHT).max(0.0),
        }
    }
}

fn logical_window_size<R: Runtime>(window: &Window<R>) -> tauri::Result<(f64, f64)> {
    let scale = window.scale_factor()?;
    let size = window.inner_size()?.to_logical::<f64>(scale);
    Ok((size.width, size.height))
}

/// Re-position toolbar and content after the window changed size
pub fn layout<R: Runtime>(app: &AppHandle<R>, window: &Window<R>) {
    let (width, height) = match logical_window_size(window) {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read window size");
            return;
        }
    };

    let label = window.label();
    if let Some(ui) = app.get_webview(&ui_webview_label(label)) {
        let _ = ui.set_position(LogicalPosition::new(0.0, 0.0));
        let _ = ui.set_size(LogicalSize::new(width, TOOLBAR_HEIGHT));
    }

    let bounds = ContentBounds::below_toolbar(width, height);
    if let Some(content) = app.get_webview(&content_webview_label(label)) {
        let _ = content.set_position(LogicalPosition::new(bounds.x, bounds.y));
        let _ = content.set_size(LogicalSize::new(bounds.width, bounds.height));
    }
}

/// The content webview of the main window
pub fn content_webview<R: Runtime>(app: &AppHandle<R>) -> Result<Webview<R>, String> {
    let label = content_webview_label("main");
    app.get_webview(&label)
        .ok_or_else(|| format!("Webview not found: {}", label))
}

/// Hand a URL to the operating system; failures are logged and swallowed.
pub fn open_external(url: &Url) {
    match tauri_plugin_opener::open_url(url.as_str(), None::<&str>) {
        Ok(()) => tracing::info!(url = %url, "Opened external URL"),
        Err(e) => tracing::error!(url = %url, error = %e, "Failed to handle URL"),
    }
}

pub fn create_content_webview<R: Runtime>(
    app: &AppHandle<R>,
    window: &Window<R>,
    browser: Arc<Browser>,
    start: Url,
) -> tauri::Result<Webview<R>> {
    let window_label = window.label().to_string();
    let webview_label = content_webview_label(&window_label);
    let start_for_log = start.to_string();

    let browser_for_navigation = Arc::clone(&browser);
    let app_for_navigation = app.clone();
    let label_for_navigation = webview_label.clone();
    let browser_for_load = Arc::clone(&browser);
    let browser_for_title = Arc::clone(&browser);

    let webview_builder = WebviewBuilder::new(&webview_label, WebviewUrl::External(start))
        .transparent(false)
        .enable_clipboard_access()
        .zoom_hotkeys_enabled(true)
        .devtools(browser.config().devtools)
        .initialization_script(CONTENT_INIT_SCRIPT)
        .on_navigation(move |url| {
            match browser_for_navigation.decide_navigation(url) {
                NavigationDecision::Allow => true,
                NavigationDecision::OpenExternal => {
                    open_external(url);
                    false
                }
                NavigationDecision::Proxy(proxied) => {
                    // Navigating from inside the navigation callback is not
                    // reentrant on every platform
                    let app = app_for_navigation.clone();
                    let label = label_for_navigation.clone();
                    tauri::async_runtime::spawn(async move {
                        if let Some(webview) = app.get_webview(&label) {
                            if let Err(e) = webview.navigate(proxied) {
                                tracing::error!(error = %e, "Failed to load proxied page");
                            }
                        }
                    });
                    false
                }
            }
        })
        .on_page_load(move |webview, payload| {
            let url = payload.url().as_str();
            match payload.event() {
                PageLoadEvent::Started => {
                    browser_for_load.on_page_started(url);
                }
                PageLoadEvent::Finished => {
                    browser_for_load.on_progress_changed(100);
                    browser_for_load.on_page_finished(url);

                    if let Some(script) = browser_for_load.console_script_for(url) {
                        if let Err(e) = webview.eval(&script) {
                            tracing::warn!(url = %url, error = %e, "Console injection failed");
                        }
                    }
                }
            }
        })
        .on_document_title_changed(move |_webview, title| {
            browser_for_title.on_title_changed(title);
        });

    let (width, height) = logical_window_size(window)?;
    let bounds = ContentBounds::below_toolbar(width, height);

    let webview = window.add_child(
        webview_builder,
        LogicalPosition::new(bounds.x, bounds.y),
        LogicalSize::new(bounds.width, bounds.height),
    )?;

    tracing::info!(label = %webview_label, url = %start_for_log, "Created content webview");
    Ok(webview)
}

/// Forward every page state change to the toolbar of `window_label`
pub fn publish_page_state<R: Runtime>(app: &AppHandle<R>, browser: &Browser, window_label: &str) {
    let mut rx = browser.page_store().subscribe();
    let app = app.clone();
    let ui_label = ui_webview_label(window_label);

    tauri::async_runtime::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if let Err(e) = app.emit_to(ui_label.as_str(), "page-state", state) {
                tracing::warn!(error = %e, "Failed to publish page state");
            }
        }
    });
}
