//! Resource hints sent as an HTTP `Link` header.
//!
//! Assets that list methods in their `preload` option are registered here by
//! [`HtmlDocument`](crate::document::HtmlDocument) during rendering; the
//! collected links become a single header value such as
//! `</media/theme.css>; rel="preload"; as="style"`.

use crate::assets::Attributes;
use serde_json::Value;
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreloadError {
    #[error("The \"{0}\" method is not supported for preloading")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadMethod {
    Preload,
    DnsPrefetch,
    Preconnect,
    Prefetch,
    Prerender,
}

impl PreloadMethod {
    pub fn rel(&self) -> &'static str {
        match self {
            PreloadMethod::Preload => "preload",
            PreloadMethod::DnsPrefetch => "dns-prefetch",
            PreloadMethod::Preconnect => "preconnect",
            PreloadMethod::Prefetch => "prefetch",
            PreloadMethod::Prerender => "prerender",
        }
    }
}

impl FromStr for PreloadMethod {
    type Err = PreloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preload" => Ok(PreloadMethod::Preload),
            "dns-prefetch" => Ok(PreloadMethod::DnsPrefetch),
            "preconnect" => Ok(PreloadMethod::Preconnect),
            "prefetch" => Ok(PreloadMethod::Prefetch),
            "prerender" => Ok(PreloadMethod::Prerender),
            other => Err(PreloadError::Unsupported(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreloadLink {
    pub uri: String,
    pub method: PreloadMethod,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default)]
pub struct PreloadManager {
    links: Vec<PreloadLink>,
}

impl PreloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hint. A second hint for the same uri and method is ignored.
    pub fn add(&mut self, method: PreloadMethod, uri: &str, attributes: Attributes) {
        if self
            .links
            .iter()
            .any(|l| l.method == method && l.uri == uri)
        {
            return;
        }
        self.links.push(PreloadLink {
            uri: uri.to_string(),
            method,
            attributes,
        });
    }

    pub fn preload(&mut self, uri: &str, attributes: Attributes) {
        self.add(PreloadMethod::Preload, uri, attributes);
    }

    pub fn dns_prefetch(&mut self, uri: &str, attributes: Attributes) {
        self.add(PreloadMethod::DnsPrefetch, uri, attributes);
    }

    pub fn preconnect(&mut self, uri: &str, attributes: Attributes) {
        self.add(PreloadMethod::Preconnect, uri, attributes);
    }

    pub fn prefetch(&mut self, uri: &str, attributes: Attributes) {
        self.add(PreloadMethod::Prefetch, uri, attributes);
    }

    pub fn prerender(&mut self, uri: &str, attributes: Attributes) {
        self.add(PreloadMethod::Prerender, uri, attributes);
    }

    pub fn links(&self) -> &[PreloadLink] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Serialize every hint into one `Link` header value.
    pub fn link_header(&self) -> Option<String> {
        if self.links.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.links.iter().map(serialize_link).collect();
        Some(parts.join(", "))
    }
}

fn serialize_link(link: &PreloadLink) -> String {
    let mut out = format!("<{}>; rel=\"{}\"", link.uri, link.method.rel());
    for (key, value) in &link.attributes {
        match value {
            Value::Bool(true) => {
                let _ = write!(out, "; {key}");
            }
            Value::Bool(false) | Value::Null => {}
            Value::Array(values) => {
                for v in values {
                    let _ = write!(out, "; {key}=\"{}\"", quote(&scalar(v)));
                }
            }
            other => {
                let _ = write!(out, "; {key}=\"{}\"", quote(&scalar(other)));
            }
        }
    }
    out
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quote(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_supported_methods() {
        assert_eq!("dns-prefetch".parse::<PreloadMethod>().unwrap(), PreloadMethod::DnsPrefetch);
        assert!(matches!(
            "preflight".parse::<PreloadMethod>(),
            Err(PreloadError::Unsupported(m)) if m == "preflight"
        ));
    }

    #[test]
    fn empty_manager_has_no_header() {
        assert_eq!(PreloadManager::new().link_header(), None);
    }

    #[test]
    fn link_header_joins_hints() {
        let mut manager = PreloadManager::new();
        let mut attrs = Attributes::new();
        attrs.insert("as".into(), json!("style"));
        manager.preload("/media/theme.css", attrs);
        manager.dns_prefetch("//cdn.example.org", Attributes::new());
        assert_eq!(
            manager.link_header().unwrap(),
            r#"</media/theme.css>; rel="preload"; as="style", <//cdn.example.org>; rel="dns-prefetch""#
        );
    }

    #[test]
    fn duplicate_hints_are_ignored() {
        let mut manager = PreloadManager::new();
        manager.prefetch("/a.js", Attributes::new());
        manager.prefetch("/a.js", Attributes::new());
        manager.preconnect("/a.js", Attributes::new());
        assert_eq!(manager.links().len(), 2);
    }

    #[test]
    fn boolean_attributes_have_no_value() {
        let mut manager = PreloadManager::new();
        let mut attrs = Attributes::new();
        attrs.insert("crossorigin".into(), json!(true));
        attrs.insert("nopush".into(), json!(false));
        manager.prerender("/next", attrs);
        assert_eq!(manager.link_header().unwrap(), r#"</next>; rel="prerender"; crossorigin"#);
    }
}
