//! DevShell - Tauri Application
//!
//! A single window with a toolbar webview on top and the browsed page below.
//! Every web page gets the debugging console injected once it has loaded.

mod commands;
mod proxy;
mod state;

use commands::webview::{create_content_webview, layout, publish_page_state, TOOLBAR_HEIGHT};
use devshell_core::{BLANK_PAGE, PROXY_SCHEME};
use state::AppState;
use tauri::webview::WebviewBuilder;
use tauri::window::WindowBuilder;
use tauri::{LogicalPosition, LogicalSize, Manager, Theme, WebviewUrl, WindowEvent};
use url::Url;

const WINDOW_WIDTH: f64 = 1280.0;
const WINDOW_HEIGHT: f64 = 800.0;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    devshell_core::init_logging();

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .register_asynchronous_uri_scheme_protocol(PROXY_SCHEME, |ctx, request, responder| {
            proxy::handle(ctx, request, responder)
        })
        .setup(|app| {
            let state = AppState::new()?;
            let browser = state.browser();
            app.manage(state);

            let window_label = "main";
            let config = browser.config();

            let mut window_builder = WindowBuilder::new(app, window_label)
                .title("DevShell")
                .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
                .min_inner_size(480.0, 320.0)
                .center();
            if config.dark_mode {
                window_builder = window_builder.theme(Some(Theme::Dark));
            }
            let window = window_builder.build()?;

            let ui_webview = WebviewBuilder::new(
                commands::ui_webview_label(window_label),
                WebviewUrl::App("index.html".into()),
            )
            .enable_clipboard_access();

            let ui_webview = window.add_child(
                ui_webview,
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(WINDOW_WIDTH, TOOLBAR_HEIGHT),
            )?;
            let _ = ui_webview.show();

            let start = match Url::parse(&config.homepage) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(homepage = %config.homepage, error = %e, "Invalid homepage");
                    Url::parse(BLANK_PAGE)?
                }
            };

            let handle = app.handle().clone();
            publish_page_state(&handle, &browser, window_label);
            create_content_webview(&handle, &window, browser, start)?;

            let resize_handle = handle.clone();
            let resize_window = window.clone();
            window.on_window_event(move |event| {
                if let WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } = event {
                    layout(&resize_handle, &resize_window);
                }
            });

            tracing::info!("DevShell started");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Diagnostics
            commands::diagnostics::frontend_ready,
            // Navigation commands
            commands::navigation::submit_input,
            commands::navigation::reload_page,
            commands::navigation::go_back,
            commands::navigation::go_forward,
            commands::navigation::get_page_state,
            // Content page reports
            commands::content::report_console_message,
            commands::content::report_page_icon,
            commands::content::report_form_submission,
            commands::content::report_load_progress,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!(error = %e, "DevShell exited with an error");
        std::process::exit(1);
    }
}
