/// Every app command. Each one gets an `allow-<name>` permission that the
/// capability files hand out per webview.
const COMMANDS: &[&str] = &[
    // Toolbar UI
    "frontend_ready",
    "submit_input",
    "reload_page",
    "go_back",
    "go_forward",
    "get_page_state",
    // Web pages in the content webview
    "report_console_message",
    "report_page_icon",
    "report_form_submission",
    "report_load_progress",
];

fn main() {
    let manifest = tauri_build::AppManifest::new().commands(COMMANDS);
    tauri_build::try_build(tauri_build::Attributes::new().app_manifest(manifest))
        .expect("failed to run tauri-build");
}
