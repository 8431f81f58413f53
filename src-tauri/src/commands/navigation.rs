//! Navigation and address bar commands

use serde::Serialize;
use tauri::{AppHandle, State};

use devshell_core::{InputKind, NavigationDecision, PageState, Traversal};

use super::webview::{content_webview, open_external};
use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoadInfo {
    pub kind: InputKind,
    pub url: String,
}

/// Resolve address bar input and load it in the content webview
#[tauri::command]
pub fn submit_input(
    app: AppHandle,
    state: State<AppState>,
    input: String,
) -> CommandResult<LoadInfo> {
    let plan = match state.with_browser(|browser| browser.plan_input(&input)) {
        Ok(plan) => plan,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    let info = LoadInfo {
        kind: plan.kind,
        url: plan.url.to_string(),
    };

    let target = match plan.decision {
        NavigationDecision::Allow => plan.url,
        NavigationDecision::Proxy(proxied) => proxied,
        NavigationDecision::OpenExternal => {
            open_external(&plan.url);
            return CommandResult::ok(info);
        }
    };

    let webview = match content_webview(&app) {
        Ok(w) => w,
        Err(e) => return CommandResult::err(e),
    };

    match webview.navigate(target) {
        Ok(()) => {
            tracing::info!(kind = ?info.kind, url = %info.url, "Loading input");
            CommandResult::ok(info)
        }
        Err(e) => CommandResult::err(format!("Navigation failed: {}", e)),
    }
}

#[tauri::command]
pub fn reload_page(app: AppHandle, state: State<AppState>) -> CommandResult<()> {
    let webview = match content_webview(&app) {
        Ok(w) => w,
        Err(e) => return CommandResult::err(e),
    };

    state.with_browser(|browser| browser.request_traversal(Traversal::Reload));

    match webview.reload() {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(format!("Reload failed: {}", e)),
    }
}

/// Returns false without navigating when there is nothing to go back to
#[tauri::command]
pub fn go_back(app: AppHandle, state: State<AppState>) -> CommandResult<bool> {
    traverse(&app, &state, Traversal::Back, "history.back()")
}

/// Returns false without navigating when there is nothing to go forward to
#[tauri::command]
pub fn go_forward(app: AppHandle, state: State<AppState>) -> CommandResult<bool> {
    traverse(&app, &state, Traversal::Forward, "history.forward()")
}

fn traverse(
    app: &AppHandle,
    state: &AppState,
    traversal: Traversal,
    script: &str,
) -> CommandResult<bool> {
    let webview = match content_webview(app) {
        Ok(w) => w,
        Err(e) => return CommandResult::err(e),
    };

    if !state.with_browser(|browser| browser.request_traversal(traversal)) {
        return CommandResult::ok(false);
    }

    match webview.eval(script) {
        Ok(()) => CommandResult::ok(true),
        Err(e) => CommandResult::err(format!("{:?} navigation failed: {}", traversal, e)),
    }
}

#[tauri::command]
pub fn get_page_state(state: State<AppState>) -> CommandResult<PageState> {
    CommandResult::ok(state.with_browser(|browser| browser.page_state()))
}
