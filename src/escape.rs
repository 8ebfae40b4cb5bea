//! Escaping and link helpers shared by the HTML and feed renderers.
//!
//! Attribute values and text nodes go through [`escape_html`], which relies on
//! Maud's escaper: `&`, `<`, `>` and `"` are replaced, apostrophes are left
//! alone. Every attribute in the generated markup is double-quoted, so that is
//! sufficient.

use maud::Render;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Link prefixes that [`rel_to_abs`] treats as already absolute.
const ABSOLUTE_PREFIXES: [&str; 5] = ["http", "ftp", "mailto", "data", "//"];

static LINK_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(href|src)="([^"]*)""#).expect("link attribute regex is valid"));

/// Escape text for use inside an element or a double-quoted attribute.
pub fn escape_html(value: &str) -> String {
    value.render().into_string()
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Rewrite relative `href`/`src` attribute values so they start with `base`.
///
/// Values starting with one of `http`, `ftp`, `mailto`, `data` or `//` are
/// left untouched.
pub fn rel_to_abs(text: &str, base: &str) -> String {
    LINK_ATTRIBUTE
        .replace_all(text, |caps: &Captures| {
            let value = &caps[2];
            if ABSOLUTE_PREFIXES.iter().any(|p| value.starts_with(p)) {
                caps[0].to_string()
            } else {
                format!("{}=\"{}{}\"", &caps[1], base, value)
            }
        })
        .into_owned()
}

/// Make a link safe for feed output.
///
/// Links containing non-ASCII characters have every `/`-separated segment
/// percent-encoded. Spaces always become `%20`.
pub fn encode_link(link: &str) -> String {
    let link = if link.is_ascii() {
        link.to_string()
    } else {
        link.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    };
    link.replace(' ', "%20")
}
