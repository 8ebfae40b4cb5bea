//! Page descriptions read by the `render` command.
//!
//! A page file is JSON describing one document: what goes in its head, which
//! assets it uses, and its body. Only the fields relevant to the document
//! kind are used.
//!
//! ```json
//! {
//!   "kind": "html",
//!   "title": "Home",
//!   "meta": [{"name": "robots", "content": "noindex"}],
//!   "styles": [{"name": "site", "uri": "css/site.css"}],
//!   "scripts": [{"name": "app", "uri": "js/app.js", "attributes": {"defer": true}}],
//!   "body": "<main>Hello</main>",
//!   "params": {"max_age": 60}
//! }
//! ```

use crate::assets::{AssetKind, Attributes, WebAssetItem};
use crate::document::{
    AnyDocument, Document, DocumentError, DocumentOptions, Factory, HeadLink, HtmlDocument, Message,
    MetaTag, OpensearchImage, OpensearchUrl, RenderParams,
};
use crate::feed::{FeedImage, FeedItem, feed_timezone, parse_feed_date};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A script or stylesheet file used by the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageAsset {
    pub name: String,
    pub uri: String,
    pub version: Option<String>,
    pub attributes: Attributes,
    pub dependencies: Vec<String>,
    pub options: Attributes,
}

impl PageAsset {
    fn to_item(&self, kind: AssetKind) -> WebAssetItem {
        let mut item = WebAssetItem::new(kind, &self.name).with_uri(&self.uri);
        item.version = self.version.clone();
        item.attributes = self.attributes.clone();
        item.dependencies = self.dependencies.clone();
        item.options = self.options.clone();
        item
    }
}

/// An inline `<script>` or `<style>` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineAsset {
    pub content: String,
    /// `name`, `position` (`before`/`after`) and other asset options.
    pub options: Attributes,
    pub attributes: Attributes,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpensearchPage {
    pub short_name: String,
    pub images: Vec<OpensearchImage>,
    pub urls: Vec<OpensearchUrl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Page {
    /// Document kind, `html` when unset.
    pub kind: Option<String>,
    pub options: DocumentOptions,
    pub params: RenderParams,
    pub title: String,
    pub description: String,
    pub generator: Option<String>,
    /// Last modification date (RFC 2822, RFC 3339 or unix seconds).
    pub modified: Option<String>,
    /// Download name for JSON and XML documents.
    pub name: Option<String>,
    /// XML only: send as an attachment.
    pub download: bool,
    /// Component content for HTML, the body of raw/XML/image documents.
    pub body: String,

    pub meta: Vec<MetaTag>,
    pub links: Vec<HeadLink>,
    pub favicon: Option<String>,
    pub custom: Vec<String>,
    pub csp_nonce: Option<String>,
    pub presets: Vec<String>,
    pub scripts: Vec<PageAsset>,
    pub styles: Vec<PageAsset>,
    pub inline_scripts: Vec<InlineAsset>,
    pub inline_styles: Vec<InlineAsset>,
    pub script_options: serde_json::Map<String, Value>,
    pub messages: Vec<Message>,
    pub modules: BTreeMap<String, Vec<String>>,

    pub feed_items: Vec<FeedItem>,
    pub feed_image: Option<FeedImage>,
    pub opensearch: Option<OpensearchPage>,
}

impl Page {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Document kind: `kind` when given, else the page's, else `html`.
    pub fn resolve_kind<'a>(&'a self, kind: Option<&'a str>) -> &'a str {
        kind.or(self.kind.as_deref()).unwrap_or("html")
    }

    /// Create a document of `kind` from `factory` and fill it from the page.
    pub fn build(&self, factory: &Factory, kind: &str) -> Result<AnyDocument, DocumentError> {
        let mut doc = factory.create_document(kind, &self.options);

        let meta = doc.meta_mut();
        meta.set_title(&self.title);
        meta.set_description(&self.description);
        if let Some(generator) = &self.generator {
            meta.set_generator(generator);
        }
        if let Some(modified) = &self.modified {
            meta.set_modified(parse_feed_date(modified, &feed_timezone("UTC")?)?);
        }
        for (key, options) in &self.script_options {
            meta.add_script_options(key, options.clone(), true);
        }
        meta.set_buffer(self.body.as_bytes());

        match &mut doc {
            AnyDocument::Html(html) => self.fill_html(html)?,
            AnyDocument::Json(json) => {
                if let Some(name) = &self.name {
                    json.set_name(name);
                }
            }
            AnyDocument::Xml(xml) => {
                if let Some(name) = &self.name {
                    xml.set_name(name);
                }
                xml.set_download(self.download);
            }
            AnyDocument::Feed(feed) => {
                for item in &self.feed_items {
                    feed.add_item(item.clone());
                }
                feed.image = self.feed_image.clone();
            }
            AnyDocument::Opensearch(search) => {
                if let Some(page) = &self.opensearch {
                    search.set_short_name(&page.short_name);
                    for image in &page.images {
                        search.add_image(image.clone());
                    }
                    for url in &page.urls {
                        search.add_url(url.clone());
                    }
                }
            }
            AnyDocument::Raw(_) | AnyDocument::Image(_) => {}
        }
        Ok(doc)
    }

    fn fill_html(&self, html: &mut HtmlDocument) -> Result<(), DocumentError> {
        if let Some(nonce) = &self.csp_nonce {
            html.set_csp_nonce(nonce);
        }
        for tag in &self.meta {
            html.set_meta_data(&tag.name, &tag.content, tag.attribute);
        }
        for link in &self.links {
            html.add_head_link(&link.href, &link.relation, &link.rel_type, link.attributes.clone());
        }
        if let Some(favicon) = &self.favicon {
            html.add_favicon(favicon, None, None);
        }
        for custom in &self.custom {
            html.add_custom_tag(custom);
        }
        for message in &self.messages {
            html.enqueue_message(&message.text, &message.kind);
        }
        for (position, fragments) in &self.modules {
            for fragment in fragments {
                html.add_module(position, fragment);
            }
        }
        html.set_buffer(&self.body, "component", "");

        let assets = html.web_asset_manager_mut();
        for preset in &self.presets {
            assets.use_preset(preset)?;
        }
        for (kind, entries) in [(AssetKind::Style, &self.styles), (AssetKind::Script, &self.scripts)] {
            for entry in entries {
                assets.register_asset(entry.to_item(kind));
                assets.use_asset(kind, &entry.name)?;
            }
        }
        for (kind, entries) in [
            (AssetKind::Style, &self.inline_styles),
            (AssetKind::Script, &self.inline_scripts),
        ] {
            for entry in entries {
                let dependencies: Vec<&str> = entry.dependencies.iter().map(String::as_str).collect();
                let (content, options, attributes) =
                    (entry.content.as_str(), entry.options.clone(), entry.attributes.clone());
                match kind {
                    AssetKind::Style => assets.add_inline_style(content, options, attributes, &dependencies)?,
                    _ => assets.add_inline_script(content, options, attributes, &dependencies)?,
                };
            }
        }
        Ok(())
    }
}
