//! Reports sent by pages in the content webview

use serde::Serialize;
use tauri::{AppHandle, Emitter, State};

use devshell_core::ConsoleMessage;

use super::{ui_webview_label, CommandResult};
use crate::state::AppState;

/// Installed into every page of the content webview. Mirrors `console.*`
/// calls, the favicon and the DOM-ready milestone to the shell, and
/// announces POST form submissions before they navigate.
pub const CONTENT_INIT_SCRIPT: &str = r#"
(() => {
  if (window.top !== window) return;
  const send = (cmd, args) => {
    try {
      const ipc = window.__TAURI_INTERNALS__;
      if (ipc && typeof ipc.invoke === 'function') {
        return ipc.invoke(cmd, args);
      }
    } catch {}
    return Promise.resolve();
  };
  const invoke = (cmd, args) => {
    send(cmd, args).catch(() => {});
  };

  const sourceOf = () => {
    try {
      const frame = (new Error().stack || '').split('\n')[3] || '';
      const match = frame.match(/(\S+?):(\d+):\d+\)?\s*$/);
      return match ? { source: match[1].replace(/^\(/, ''), line: Number(match[2]) } : null;
    } catch {
      return null;
    }
  };

  for (const level of ['debug', 'log', 'info', 'warn', 'error']) {
    const original = console[level];
    if (typeof original !== 'function') continue;
    console[level] = function (...args) {
      try {
        const message = args.map((a) => {
          if (typeof a === 'string') return a;
          try { return JSON.stringify(a); } catch { return String(a); }
        }).join(' ');
        const origin = sourceOf() || { source: location.href, line: 0 };
        invoke('report_console_message', {
          message: { level, message, line: origin.line, source: origin.source },
        });
      } catch {}
      return original.apply(this, args);
    };
  }

  const reportIcon = () => {
    try {
      const link = document.querySelector('link[rel~="icon"]');
      const href = link && link.href ? link.href : new URL('/favicon.ico', document.baseURI).href;
      invoke('report_page_icon', { href });
    } catch {}
  };

  // A POST body cannot go through the proxy; the shell must let the
  // submission load directly before the form navigates.
  window.addEventListener('submit', (event) => {
    const form = event.target;
    if (event.defaultPrevented || !(form instanceof HTMLFormElement)) return;
    const submitter = event.submitter || null;
    const method = (submitter && submitter.getAttribute('formmethod')) || form.method;
    if (String(method).toLowerCase() !== 'post') return;

    const action = (submitter && submitter.getAttribute('formaction') !== null)
      ? submitter.formAction
      : form.action;
    event.preventDefault();

    const resume = () => {
      form.action = action;
      form.method = 'post';
      if (submitter && submitter.getAttribute('formenctype')) {
        form.enctype = submitter.getAttribute('formenctype');
      }
      if (submitter && submitter.name) {
        const field = document.createElement('input');
        field.type = 'hidden';
        field.name = submitter.name;
        field.value = submitter.value;
        form.appendChild(field);
      }
      HTMLFormElement.prototype.submit.call(form);
    };
    send('report_form_submission', { action }).then(resume, resume);
  });

  document.addEventListener('DOMContentLoaded', () => {
    invoke('report_load_progress', { progress: 70 });
    reportIcon();
  }, { once: true });
})();
"#;

#[derive(Clone, Serialize)]
struct PageIconPayload {
    href: String,
}

#[tauri::command]
pub fn report_console_message(
    state: State<AppState>,
    message: ConsoleMessage,
) -> CommandResult<()> {
    state.with_browser(|browser| browser.on_console_message(&message));
    CommandResult::ok(())
}

#[tauri::command]
pub fn report_page_icon(app: AppHandle, href: String) -> CommandResult<()> {
    let Ok(parsed) = url::Url::parse(&href) else {
        return CommandResult::err(format!("Invalid URL: {}", href));
    };

    match app.emit_to(
        ui_webview_label("main").as_str(),
        "page-icon",
        PageIconPayload {
            href: parsed.to_string(),
        },
    ) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Called before a page POSTs a form, so the submission skips the proxy
#[tauri::command]
pub fn report_form_submission(state: State<AppState>, action: String) -> CommandResult<()> {
    state.with_browser(|browser| browser.allow_form_submission(&action));
    CommandResult::ok(())
}

#[tauri::command]
pub fn report_load_progress(state: State<AppState>, progress: u8) -> CommandResult<()> {
    state.with_browser(|browser| {
        // Late reports from a finished page must not move the bar backwards
        if browser.page_state().is_loading {
            browser.on_progress_changed(progress);
        }
    });
    CommandResult::ok(())
}
