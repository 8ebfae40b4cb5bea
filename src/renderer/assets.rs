//! Asset tag rendering shared by the `styles` and `scripts` renderers.
//!
//! File assets are walked in dependency order. Inline assets positioned
//! `before`/`after` a file asset are emitted around it; the remaining inline
//! assets follow all file assets.

use crate::assets::{AssetKind, Attributes, WebAssetItem, WebAssetManager};
use crate::document::{Document, DocumentError, HtmlDocument};
use crate::escape::escape_html;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write;

const DEFAULT_JS_MIMES: [&str; 4] = [
    "text/javascript",
    "application/javascript",
    "text/x-javascript",
    "application/x-javascript",
];

const DEFAULT_CSS_MIMES: [&str; 1] = ["text/css"];

/// Script attributes rendered without a value under HTML5.
const NO_VALUE_SCRIPT_ATTRIBUTES: [&str; 3] = ["defer", "async", "nomodule"];

/// Render every active asset of `kind`.
///
/// `rendered` holds the URIs already emitted by this renderer; an URI is
/// emitted at most once.
pub(super) fn render_assets(
    doc: &HtmlDocument,
    kind: AssetKind,
    debug: bool,
    rendered: &mut HashSet<String>,
) -> Result<String, DocumentError> {
    let manager = doc.web_asset_manager();
    let mut assets = manager.get_assets(kind, true)?;
    let mut inline = WebAssetManager::filter_out_inline_assets(&mut assets);
    let relations = manager.get_inline_relation(&inline);

    let mut buffer = String::new();
    for asset in &assets {
        let relation = relations.get(&asset.name);
        if let Some(relation) = relation {
            for before in &relation.before {
                buffer.push_str(&inline_element(doc, before));
                inline.retain(|i| i.name != before.name);
            }
        }
        buffer.push_str(&file_element(doc, asset, debug, rendered));
        if let Some(relation) = relation {
            for after in &relation.after {
                buffer.push_str(&inline_element(doc, after));
                inline.retain(|i| i.name != after.name);
            }
        }
    }

    for asset in &inline {
        buffer.push_str(&inline_element(doc, asset));
    }
    Ok(buffer)
}

fn file_element(
    doc: &HtmlDocument,
    asset: &WebAssetItem,
    debug: bool,
    rendered: &mut HashSet<String>,
) -> String {
    let Some(uri) = asset.uri() else {
        return String::new();
    };
    if asset.kind == AssetKind::Script && asset.is_webcomponent() {
        return String::new();
    }
    if !rendered.insert(uri.to_string()) {
        tracing::debug!(asset = %asset.name, uri, "skipping already rendered asset");
        return String::new();
    }

    let meta = doc.meta();
    let mut attributes = asset.attributes.clone();
    if debug {
        attributes.insert("data-asset-name".into(), Value::String(asset.name.clone()));
        if !asset.dependencies.is_empty() {
            attributes.insert(
                "data-asset-dependencies".into(),
                Value::String(asset.dependencies.join(",")),
            );
        }
    }

    let src = match asset.version.as_deref() {
        Some(version) if !version.is_empty() && !uri.contains('?') => format!("{uri}?{version}"),
        _ => uri.to_string(),
    };

    let mut buffer = meta.tab().to_string();
    let conditional = asset.conditional();
    if let Some(condition) = conditional {
        let _ = write!(buffer, "<!--[if {condition}]>");
    }

    match asset.kind {
        AssetKind::Style => {
            let relation = match attributes.remove("rel") {
                Some(Value::String(rel)) => rel,
                _ => "stylesheet".to_string(),
            };
            let href = escape_html(&src);
            let _ = write!(
                buffer,
                "<link href=\"{href}\" rel=\"{}\"{} />",
                escape_html(&relation),
                render_attributes(&attributes, AssetKind::Style, doc.is_html5())
            );
            if relation == "lazy-stylesheet" {
                let _ = write!(buffer, "<noscript><link href=\"{href}\" rel=\"stylesheet\" /></noscript>");
            }
        }
        _ => {
            let src = format!("{}{src}", meta.base());
            let _ = write!(
                buffer,
                "<script src=\"{}\"{}></script>",
                escape_html(&src),
                render_attributes(&attributes, AssetKind::Script, doc.is_html5())
            );
        }
    }

    if conditional.is_some() {
        buffer.push_str("<![endif]-->");
    }
    buffer.push_str(meta.line_end());
    buffer
}

fn inline_element(doc: &HtmlDocument, asset: &WebAssetItem) -> String {
    let Some(content) = asset.content() else {
        return String::new();
    };
    let meta = doc.meta();
    let (tab, line_end) = (meta.tab(), meta.line_end());

    let mut attributes = asset.attributes.clone();
    if let Some(nonce) = doc.csp_nonce() {
        attributes.insert("nonce".into(), Value::String(nonce.to_string()));
    }

    let (tag, cdata_open, cdata_close) = match asset.kind {
        AssetKind::Style => ("style", "/*<![CDATA[*/", "/*]]>*/"),
        _ => ("script", "//<![CDATA[", "//]]>"),
    };
    // XHTML documents need the content wrapped in CDATA.
    let cdata = meta.mime() != "text/html";

    let mut buffer = format!(
        "{tab}<{tag}{}>",
        render_attributes(&attributes, asset.kind, doc.is_html5())
    );
    if cdata {
        let _ = write!(buffer, "{tab}{tab}{cdata_open}{line_end}");
    }
    buffer.push_str(content);
    if cdata {
        let _ = write!(buffer, "{tab}{tab}{cdata_close}{line_end}");
    }
    let _ = write!(buffer, "</{tag}>{line_end}");
    buffer
}

/// Render attributes of a script or style tag as ` name="value"` pairs.
///
/// - `options` and the URI attribute (`src`/`href`) are never rendered.
/// - Under HTML5, `type`/`mime` equal to the default mime type is dropped.
/// - `false` values are dropped, as are falsy `defer`/`async` on scripts.
/// - `true` values (and `defer`, `async`, `nomodule` on scripts) are
///   rendered bare under HTML5 and as `name="name"` otherwise.
/// - `mime` is rendered as `type`.
pub(super) fn render_attributes(attributes: &Attributes, kind: AssetKind, html5: bool) -> String {
    let (uri_attribute, default_mimes): (&str, &[&str]) = match kind {
        AssetKind::Style => ("href", &DEFAULT_CSS_MIMES),
        _ => ("src", &DEFAULT_JS_MIMES),
    };
    let is_script = kind != AssetKind::Style;

    let mut buffer = String::new();
    for (name, value) in attributes {
        if name == "options" || name == uri_attribute {
            continue;
        }
        if html5
            && (name == "type" || name == "mime")
            && value.as_str().is_some_and(|v| default_mimes.contains(&v))
        {
            continue;
        }
        if matches!(value, Value::Bool(false)) {
            continue;
        }
        if is_script && (name == "defer" || name == "async") && is_falsy(value) {
            continue;
        }

        let no_value = matches!(value, Value::Bool(true))
            || (is_script && NO_VALUE_SCRIPT_ATTRIBUTES.contains(&name.as_str()));
        let (name, value) = if name == "mime" {
            ("type", attribute_value(value))
        } else if no_value {
            (name.as_str(), name.clone())
        } else {
            (name.as_str(), attribute_value(value))
        };

        buffer.push(' ');
        buffer.push_str(&escape_html(name));
        if !(html5 && no_value) {
            let _ = write!(buffer, "=\"{}\"", escape_html(&value));
        }
    }
    buffer
}

/// String form of an attribute value; arrays and objects as JSON.
pub(super) fn attribute_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "1".into(),
        Value::Bool(false) => String::new(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn script_attributes_html5() {
        let attrs = attributes(json!({
            "type": "text/javascript",
            "src": "ignored.js",
            "options": {"x": 1},
            "defer": true,
            "async": false,
            "nomodule": "",
            "crossorigin": "anonymous",
            "integrity": "sha384-\"x\"",
        }));
        assert_eq!(
            render_attributes(&attrs, AssetKind::Script, true),
            " defer nomodule crossorigin=\"anonymous\" integrity=\"sha384-&quot;x&quot;\""
        );
    }

    #[test]
    fn script_attributes_xhtml() {
        let attrs = attributes(json!({
            "type": "text/javascript",
            "defer": "1",
            "async": 0,
            "data-list": [1, 2],
        }));
        assert_eq!(
            render_attributes(&attrs, AssetKind::Script, false),
            " type=\"text/javascript\" defer=\"defer\" data-list=\"[1,2]\""
        );
    }

    #[test]
    fn mime_is_renamed_to_type() {
        let attrs = attributes(json!({"mime": "module"}));
        assert_eq!(render_attributes(&attrs, AssetKind::Script, true), " type=\"module\"");
        let attrs = attributes(json!({"mime": "text/javascript"}));
        assert_eq!(render_attributes(&attrs, AssetKind::Script, true), "");
    }

    #[test]
    fn style_attributes() {
        let attrs = attributes(json!({
            "type": "text/css",
            "href": "ignored.css",
            "media": "print",
            "disabled": true,
            "title": false,
        }));
        assert_eq!(render_attributes(&attrs, AssetKind::Style, true), " media=\"print\" disabled");
        assert_eq!(
            render_attributes(&attrs, AssetKind::Style, false),
            " type=\"text/css\" media=\"print\" disabled=\"disabled\""
        );
    }

    #[test]
    fn style_defer_is_an_ordinary_attribute() {
        let attrs = attributes(json!({"defer": ""}));
        assert_eq!(render_attributes(&attrs, AssetKind::Style, true), " defer=\"\"");
    }

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!("0"), json!([])] {
            assert!(is_falsy(&value), "{value}");
        }
        for value in [json!(true), json!(1), json!("false"), json!([0])] {
            assert!(!is_falsy(&value), "{value}");
        }
    }
}
