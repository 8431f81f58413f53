//! Minimal HTML rewriting for documents served from the proxy scheme

/// Insert `<base href="...">` so relative URLs resolve against `base`.
///
/// The tag goes right after the opening `<head>` tag, falling back to after
/// `<html>` and then to the start of the document.
pub fn inject_base_href(html: &str, base: &str) -> String {
    let tag = format!("<base href=\"{}\">", escape_attribute(base));
    let at = opening_tag_end(html, "head")
        .or_else(|| opening_tag_end(html, "html"))
        .unwrap_or(0);

    let mut out = String::with_capacity(html.len() + tag.len());
    out.push_str(&html[..at]);
    out.push_str(&tag);
    out.push_str(&html[at..]);
    out
}

/// Byte offset just past the first `<name ...>` opening tag
fn opening_tag_end(html: &str, name: &str) -> Option<usize> {
    let lowered = html.to_ascii_lowercase();
    let needle = format!("<{}", name);
    let mut from = 0;

    while let Some(found) = lowered[from..].find(&needle) {
        let start = from + found;
        let after = start + needle.len();
        match lowered.as_bytes().get(after) {
            Some(b'>') => return Some(after + 1),
            Some(c) if c.is_ascii_whitespace() => {
                return lowered[after..].find('>').map(|end| after + end + 1);
            }
            _ => from = after,
        }
    }

    None
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
