//! Shared test utilities for the docrender test suite.
//!
//! Builders for documents in a known state, so unit tests only spell out
//! what they change.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = html_document();
//! doc.web_asset_manager_mut()
//!     .register_and_use_style("site", "site.css", attrs(json!({"media": "screen"})), &[])
//!     .unwrap();
//! ```

use crate::assets::{Attributes, WebAssetManager, WebAssetRegistry};
use crate::config::{FeedConfig, HtmlConfig};
use crate::document::{Document, DocumentMeta, FeedDocument, HtmlDocument};
use serde_json::Value;

/// HTML5 document with default settings and an empty asset registry.
pub fn html_document() -> HtmlDocument {
    HtmlDocument::new(
        DocumentMeta::new("html", "text/html"),
        &HtmlConfig::default(),
        WebAssetManager::new(WebAssetRegistry::default()),
    )
}

/// Feed titled "News & Views" at `/news` on `https://example.org`, no items.
pub fn feed_document() -> FeedDocument {
    let settings = FeedConfig {
        site_url: "https://example.org".into(),
        ..FeedConfig::default()
    };
    let mut doc = FeedDocument::new(DocumentMeta::new("feed", "application/rss+xml"), settings);
    let meta = doc.meta_mut();
    meta.set_title("News & Views");
    meta.set_description("Latest articles");
    meta.set_link("/news");
    doc
}

/// Attribute map from a `json!` object literal.
pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
