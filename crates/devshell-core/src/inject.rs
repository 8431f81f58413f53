//! Debugging console injection

/// Script that loads and initialises the in-page debugging console.
///
/// Does nothing when the console is already present. `window.define` is
/// hidden while the script loads so an AMD loader on the page does not
/// capture it as a module.
pub fn console_injection_script(script_url: &str) -> String {
    let src = serde_json::to_string(script_url).unwrap_or_else(|_| "\"\"".to_string());

    format!(
        r#"(function () {{
  if (window.eruda) return;
  var define;
  if (window.define) {{
    define = window.define;
    window.define = null;
  }}
  var script = document.createElement('script');
  script.src = {src};
  document.body.appendChild(script);
  script.onload = function () {{
    eruda.init();
    if (define) {{
      window.define = define;
    }}
  }};
}})();"#,
        src = src
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_guarded() {
        let script = console_injection_script("https://cdn.jsdelivr.net/npm/eruda");
        assert!(script.contains("if (window.eruda) return;"));
        assert!(script.contains("script.src = \"https://cdn.jsdelivr.net/npm/eruda\";"));
        assert!(script.contains("window.define = null;"));
        assert!(script.contains("eruda.init();"));
    }

    #[test]
    fn test_script_url_is_escaped() {
        let script = console_injection_script("https://cdn.example/x\";alert(1);//");
        assert!(script.contains(r#"script.src = "https://cdn.example/x\";alert(1);//";"#));
    }
}
