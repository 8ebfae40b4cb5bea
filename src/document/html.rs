//! HTML page document.
//!
//! Besides the shared [`DocumentMeta`], an HTML document owns everything that
//! ends up in `<head>` (meta tags, head links, custom tags, assets) and the
//! named buffers a page template pulls in:
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="en-gb" dir="ltr">
//!   <head><doc:include type="head" /></head>
//!   <body>
//!     <doc:include type="message" />
//!     <doc:include type="modules" name="sidebar" />
//!     <doc:include type="component" />
//!   </body>
//! </html>
//! ```
//!
//! Includes are rendered last-to-first so that `head` sees every asset the
//! body renderers registered.

use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};
use crate::assets::{AssetKind, Attributes, ManagerState, WebAssetManager};
use crate::config::HtmlConfig;
use crate::preload::{PreloadManager, PreloadMethod};
use crate::renderer::{Renderer, create_renderer};
use http::header::LINK;
use maud::{DOCTYPE, PreEscaped, html};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static INCLUDE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<doc:include\s+([^>]*?)\s*/>").expect("include tag regex is valid")
});

static INCLUDE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w-]+)="([^"]*)""#).expect("include attribute regex is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetaAttribute {
    #[default]
    Name,
    HttpEquiv,
    Property,
}

impl MetaAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaAttribute::Name => "name",
            MetaAttribute::HttpEquiv => "http-equiv",
            MetaAttribute::Property => "property",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(default)]
    pub attribute: MetaAttribute,
    pub name: String,
    pub content: String,
}

fn default_rel_type() -> String {
    "rel".into()
}

/// A `<link>` element in the head, unique per `href`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadLink {
    pub href: String,
    pub relation: String,
    /// Attribute carrying the relation: `rel` or `rev`.
    #[serde(default = "default_rel_type")]
    pub rel_type: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// A queued system message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default = "Message::default_kind")]
    pub kind: String,
    pub text: String,
}

impl Message {
    fn default_kind() -> String {
        "message".into()
    }
}

/// Everything that can be carried from one HTML document to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadData {
    pub title: String,
    pub description: String,
    pub link: String,
    pub meta_tags: Vec<MetaTag>,
    pub links: Vec<HeadLink>,
    pub custom: Vec<String>,
    pub asset_manager: ManagerState,
}

/// Parts of the head that can be reset individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadPart {
    Title,
    Description,
    Link,
    MetaTags,
    Links,
    Custom,
}

/// Page template: built in, or `<tmpl>.html` files in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Builtin,
    Dir(PathBuf),
}

/// One `<doc:include .../>` occurrence in a template.
struct Include {
    range: Range<usize>,
    kind: Option<String>,
    name: String,
}

fn parse_includes(source: &str) -> Vec<Include> {
    INCLUDE_TAG
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let mut kind = None;
            let mut name = String::new();
            for attr in INCLUDE_ATTRIBUTE.captures_iter(&caps[1]) {
                match &attr[1] {
                    "type" => kind = Some(attr[2].to_string()),
                    "name" => name = attr[2].to_string(),
                    _ => {}
                }
            }
            Some(Include {
                range: whole.range(),
                kind,
                name,
            })
        })
        .collect()
}

#[derive(Debug)]
pub struct HtmlDocument {
    meta: DocumentMeta,
    meta_tags: Vec<MetaTag>,
    links: Vec<HeadLink>,
    custom: Vec<String>,
    html5: bool,
    csp_nonce: Option<String>,
    debug_assets: bool,
    template: Template,
    buffers: HashMap<String, HashMap<String, String>>,
    messages: Vec<Message>,
    modules: BTreeMap<String, Vec<String>>,
    preload: PreloadManager,
    assets: WebAssetManager,
}

impl HtmlDocument {
    pub fn new(mut meta: DocumentMeta, config: &HtmlConfig, assets: WebAssetManager) -> Self {
        meta.set_doc_type("html");
        meta.set_mime("text/html");
        let template = if config.template_dir.is_empty() {
            Template::Builtin
        } else {
            Template::Dir(PathBuf::from(&config.template_dir))
        };
        Self {
            meta,
            meta_tags: Vec::new(),
            links: Vec::new(),
            custom: Vec::new(),
            html5: config.html5,
            csp_nonce: None,
            debug_assets: config.debug_assets,
            template,
            buffers: HashMap::new(),
            messages: Vec::new(),
            modules: BTreeMap::new(),
            preload: PreloadManager::new(),
            assets,
        }
    }

    // --- head ---

    /// Set a meta tag. `generator` and `description` update the document
    /// fields instead of adding a tag.
    pub fn set_meta_data(&mut self, name: &str, content: &str, attribute: MetaAttribute) {
        match name {
            "generator" => self.meta.set_generator(content),
            "description" => self.meta.set_description(content),
            _ => {
                if let Some(tag) = self
                    .meta_tags
                    .iter_mut()
                    .find(|t| t.attribute == attribute && t.name == name)
                {
                    tag.content = content.to_string();
                } else {
                    self.meta_tags.push(MetaTag {
                        attribute,
                        name: name.to_string(),
                        content: content.to_string(),
                    });
                }
            }
        }
    }

    pub fn get_meta_data(&self, name: &str, attribute: MetaAttribute) -> Option<&str> {
        match name {
            "generator" => Some(self.meta.generator()),
            "description" => Some(self.meta.description()),
            _ => self
                .meta_tags
                .iter()
                .find(|t| t.attribute == attribute && t.name == name)
                .map(|t| t.content.as_str()),
        }
    }

    pub fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }

    /// Add or replace the head link for `href`.
    pub fn add_head_link(&mut self, href: &str, relation: &str, rel_type: &str, attributes: Attributes) {
        let link = HeadLink {
            href: href.to_string(),
            relation: relation.to_string(),
            rel_type: rel_type.to_string(),
            attributes,
        };
        match self.links.iter_mut().find(|l| l.href == href) {
            Some(existing) => *existing = link,
            None => self.links.push(link),
        }
    }

    /// Add a favicon link. Backslashes in `href` become forward slashes.
    pub fn add_favicon(&mut self, href: &str, mime: Option<&str>, relation: Option<&str>) {
        let href = href.replace('\\', "/");
        let mut attributes = Attributes::new();
        attributes.insert(
            "type".into(),
            Value::String(mime.unwrap_or("image/vnd.microsoft.icon").to_string()),
        );
        self.add_head_link(&href, relation.unwrap_or("shortcut icon"), "rel", attributes);
    }

    pub fn links(&self) -> &[HeadLink] {
        &self.links
    }

    pub fn add_custom_tag(&mut self, html: &str) {
        self.custom.push(html.trim().to_string());
    }

    pub fn custom_tags(&self) -> &[String] {
        &self.custom
    }

    pub fn is_html5(&self) -> bool {
        self.html5
    }

    pub fn set_html5(&mut self, html5: bool) {
        self.html5 = html5;
    }

    pub fn csp_nonce(&self) -> Option<&str> {
        self.csp_nonce.as_deref().filter(|n| !n.is_empty())
    }

    pub fn set_csp_nonce(&mut self, nonce: &str) {
        self.csp_nonce = Some(nonce.to_string());
    }

    pub fn debug_assets(&self) -> bool {
        self.debug_assets
    }

    pub fn set_debug_assets(&mut self, debug: bool) {
        self.debug_assets = debug;
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn set_template(&mut self, template: Template) {
        self.template = template;
    }

    // --- body ---

    pub fn enqueue_message(&mut self, text: &str, kind: &str) {
        self.messages.push(Message {
            kind: kind.to_string(),
            text: text.to_string(),
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Register an HTML fragment for a module position.
    pub fn add_module(&mut self, position: &str, html: &str) {
        self.modules
            .entry(position.to_string())
            .or_default()
            .push(html.to_string());
    }

    pub fn modules(&self, position: &str) -> &[String] {
        self.modules.get(position).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn set_buffer(&mut self, content: &str, kind: &str, name: &str) {
        self.buffers
            .entry(kind.to_string())
            .or_default()
            .insert(name.to_string(), content.to_string());
    }

    pub fn buffer(&self, kind: &str, name: &str) -> Option<&str> {
        self.buffers.get(kind)?.get(name).map(String::as_str)
    }

    /// Content of a named buffer, rendering and caching it on first use.
    pub fn get_buffer(
        &mut self,
        kind: &str,
        name: &str,
        params: &RenderParams,
    ) -> Result<String, DocumentError> {
        if let Some(content) = self.buffer(kind, name) {
            return Ok(content.to_string());
        }
        let Renderer::Html(mut renderer) = create_renderer("html", kind)? else {
            return Err(DocumentError::UnknownRenderer {
                doc_type: "html".into(),
                name: kind.into(),
            });
        };
        let content = renderer.render(self, name, params, None)?;
        self.set_buffer(&content, kind, name);
        Ok(content)
    }

    // --- assets ---

    pub fn web_asset_manager(&self) -> &WebAssetManager {
        &self.assets
    }

    pub fn web_asset_manager_mut(&mut self) -> &mut WebAssetManager {
        &mut self.assets
    }

    pub fn preload_manager(&self) -> &PreloadManager {
        &self.preload
    }

    pub fn preload_manager_mut(&mut self) -> &mut PreloadManager {
        &mut self.preload
    }

    /// Register resource hints for active assets with a `preload` option.
    pub fn preload_assets(&mut self) -> Result<(), DocumentError> {
        for kind in [AssetKind::Style, AssetKind::Script] {
            for item in self.assets.get_assets(kind, true)? {
                let Some(uri) = item.uri() else {
                    continue;
                };
                for method in item.preload_methods() {
                    let method: PreloadMethod = method.parse()?;
                    let mut attributes = Attributes::new();
                    if method == PreloadMethod::Preload {
                        let destination = if kind == AssetKind::Style { "style" } else { "script" };
                        attributes.insert("as".into(), Value::String(destination.into()));
                    }
                    self.preload.add(method, uri, attributes);
                }
            }
        }
        Ok(())
    }

    // --- head data ---

    pub fn head_data(&self) -> HeadData {
        HeadData {
            title: self.meta.title().to_string(),
            description: self.meta.description().to_string(),
            link: self.meta.link().to_string(),
            meta_tags: self.meta_tags.clone(),
            links: self.links.clone(),
            custom: self.custom.clone(),
            asset_manager: self.assets.manager_state(),
        }
    }

    /// Replace the head with `data` and enable its assets.
    pub fn set_head_data(&mut self, data: HeadData) -> Result<(), DocumentError> {
        self.meta.set_title(&data.title);
        self.meta.set_description(&data.description);
        self.meta.set_link(&data.link);
        self.meta_tags = data.meta_tags;
        self.links = data.links;
        self.custom = data.custom;
        self.assets.restore_state(&data.asset_manager)?;
        Ok(())
    }

    /// Merge `data` into the head.
    ///
    /// Title and description are appended unless already contained
    /// (case-insensitively); links and custom tags are unioned.
    pub fn merge_head_data(&mut self, data: &HeadData) -> Result<(), DocumentError> {
        if let Some(title) = appended(self.meta.title(), &data.title) {
            self.meta.set_title(&title);
        }
        if let Some(description) = appended(self.meta.description(), &data.description) {
            self.meta.set_description(&description);
        }
        if !data.link.is_empty() {
            self.meta.set_link(&data.link);
        }
        for tag in &data.meta_tags {
            self.set_meta_data(&tag.name, &tag.content, tag.attribute);
        }
        for link in &data.links {
            if !self.links.iter().any(|l| l.href == link.href) {
                self.links.push(link.clone());
            }
        }
        for custom in &data.custom {
            if !self.custom.contains(custom) {
                self.custom.push(custom.clone());
            }
        }
        self.assets.restore_state(&data.asset_manager)?;
        Ok(())
    }

    /// Clear the given head parts, or all of them with `None`.
    pub fn reset_head_data(&mut self, parts: Option<&[HeadPart]>) {
        const ALL: [HeadPart; 6] = [
            HeadPart::Title,
            HeadPart::Description,
            HeadPart::Link,
            HeadPart::MetaTags,
            HeadPart::Links,
            HeadPart::Custom,
        ];
        for part in parts.unwrap_or(&ALL) {
            match part {
                HeadPart::Title => self.meta.set_title(""),
                HeadPart::Description => self.meta.set_description(""),
                HeadPart::Link => self.meta.set_link(""),
                HeadPart::MetaTags => self.meta_tags.clear(),
                HeadPart::Links => self.links.clear(),
                HeadPart::Custom => self.custom.clear(),
            }
        }
    }

    // --- page ---

    fn render_builtin(&mut self, params: &RenderParams) -> Result<String, DocumentError> {
        let message = self.get_buffer("message", "", params)?;
        let component = self.get_buffer("component", "", params)?;
        let head_html = self.get_buffer("head", "", params)?;
        let markup = html! {
            (DOCTYPE)
            html lang=(self.meta.language()) dir=(self.meta.direction()) {
                head { (PreEscaped(head_html)) }
                body {
                    (PreEscaped(message))
                    (PreEscaped(component))
                }
            }
        };
        Ok(markup.into_string())
    }

    /// Fill the `<doc:include>` tags of a template source.
    pub fn render_template(&mut self, source: &str, params: &RenderParams) -> Result<String, DocumentError> {
        let includes = parse_includes(source);
        let mut rendered = vec![String::new(); includes.len()];
        for (index, include) in includes.iter().enumerate().rev() {
            if let Some(kind) = &include.kind {
                rendered[index] = self.get_buffer(kind, &include.name, params)?;
            }
        }

        let mut page = String::with_capacity(source.len());
        let mut last = 0;
        for (include, content) in includes.iter().zip(&rendered) {
            page.push_str(&source[last..include.range.start]);
            page.push_str(content);
            last = include.range.end;
        }
        page.push_str(&source[last..]);
        Ok(page)
    }

    fn render_template_dir(&mut self, dir: &Path, params: &RenderParams) -> Result<String, DocumentError> {
        let name: String = params
            .tmpl
            .as_deref()
            .unwrap_or("index")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
            .collect();
        let path = dir.join(format!("{name}.html"));
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "template not found, using built-in page");
            return self.render_builtin(params);
        }
        let source = fs::read_to_string(&path)?;
        tracing::debug!(path = %path.display(), "rendering template");
        self.render_template(&source, params)
    }
}

/// `current + addition` when `addition` is non-empty and not yet contained.
fn appended(current: &str, addition: &str) -> Option<String> {
    if addition.is_empty() || current.to_lowercase().contains(&addition.to_lowercase()) {
        None
    } else {
        Some(format!("{current}{addition}"))
    }
}

impl Document for HtmlDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        self.preload_assets()?;
        let page = match self.template.clone() {
            Template::Builtin => self.render_builtin(params)?,
            Template::Dir(dir) => self.render_template_dir(&dir, params)?,
        };
        let mut response = self.meta.base_response(params)?;
        response.set_body(page);
        response.apply_cache(params)?;
        if let Some(link) = self.preload.link_header() {
            response.set_header(LINK, &link)?;
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::WebAssetItem;
    use crate::test_helpers::html_document;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn meta_data_special_names() {
        let mut doc = html_document();
        doc.set_meta_data("description", "About us", MetaAttribute::Name);
        doc.set_meta_data("generator", "site builder", MetaAttribute::Name);
        doc.set_meta_data("robots", "noindex", MetaAttribute::Name);
        doc.set_meta_data("robots", "index, follow", MetaAttribute::Name);
        assert_eq!(doc.meta().description(), "About us");
        assert_eq!(doc.meta().generator(), "site builder");
        assert_eq!(doc.meta_tags().len(), 1);
        assert_eq!(doc.get_meta_data("robots", MetaAttribute::Name), Some("index, follow"));
        assert_eq!(doc.get_meta_data("robots", MetaAttribute::HttpEquiv), None);
    }

    #[test]
    fn head_links_are_unique_per_href() {
        let mut doc = html_document();
        doc.add_head_link("/feed.rss", "alternate", "rel", Attributes::new());
        doc.add_head_link("/feed.rss", "alternate", "rev", Attributes::new());
        assert_eq!(doc.links().len(), 1);
        assert_eq!(doc.links()[0].rel_type, "rev");
    }

    #[test]
    fn favicon_defaults() {
        let mut doc = html_document();
        doc.add_favicon(r"media\favicon.ico", None, None);
        let link = &doc.links()[0];
        assert_eq!(link.href, "media/favicon.ico");
        assert_eq!(link.relation, "shortcut icon");
        assert_eq!(link.attributes["type"], json!("image/vnd.microsoft.icon"));
    }

    #[test]
    fn custom_tags_are_trimmed() {
        let mut doc = html_document();
        doc.add_custom_tag("  <meta name=\"x\">\n");
        assert_eq!(doc.custom_tags(), ["<meta name=\"x\">"]);
    }

    #[test]
    fn get_buffer_uses_cached_content() {
        let mut doc = html_document();
        doc.set_buffer("<main>cached</main>", "component", "");
        let content = doc.get_buffer("component", "", &RenderParams::default()).unwrap();
        assert_eq!(content, "<main>cached</main>");
    }

    #[test]
    fn get_buffer_unknown_renderer() {
        let mut doc = html_document();
        let err = doc.get_buffer("sidebar", "", &RenderParams::default()).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownRenderer { .. }));
    }

    #[test]
    fn merge_head_data_appends_and_unions() {
        let mut doc = html_document();
        doc.meta_mut().set_title("Home");
        doc.add_custom_tag("<x-a></x-a>");
        doc.add_head_link("/a", "alternate", "rel", Attributes::new());

        let mut data = HeadData {
            title: " | News".into(),
            custom: vec!["<x-a></x-a>".into(), "<x-b></x-b>".into()],
            links: vec![
                HeadLink {
                    href: "/a".into(),
                    relation: "other".into(),
                    rel_type: "rel".into(),
                    attributes: Attributes::new(),
                },
                HeadLink {
                    href: "/b".into(),
                    relation: "next".into(),
                    rel_type: "rel".into(),
                    attributes: Attributes::new(),
                },
            ],
            ..HeadData::default()
        };
        data.meta_tags.push(MetaTag {
            attribute: MetaAttribute::Property,
            name: "og:title".into(),
            content: "News".into(),
        });
        doc.merge_head_data(&data).unwrap();
        doc.merge_head_data(&data).unwrap();

        assert_eq!(doc.meta().title(), "Home | News");
        assert_eq!(doc.custom_tags(), ["<x-a></x-a>", "<x-b></x-b>"]);
        assert_eq!(doc.links().len(), 2);
        assert_eq!(doc.links()[0].relation, "alternate");
        assert_eq!(doc.get_meta_data("og:title", MetaAttribute::Property), Some("News"));
    }

    #[test]
    fn merge_title_is_case_insensitive() {
        assert_eq!(appended("Home | NEWS", " | news"), None);
        assert_eq!(appended("", "News"), Some("News".into()));
        assert_eq!(appended("Home", ""), None);
    }

    #[test]
    fn head_data_round_trip_carries_assets() {
        let mut source = html_document();
        source.meta_mut().set_title("Source");
        source
            .web_asset_manager_mut()
            .register_and_use_script("app", "media/app.js", Attributes::new(), &[])
            .unwrap();
        let data = source.head_data();

        let mut target = html_document();
        target.set_head_data(data).unwrap();
        assert_eq!(target.meta().title(), "Source");
        assert!(target.web_asset_manager().is_asset_active(AssetKind::Script, "app"));
    }

    #[test]
    fn reset_selected_parts() {
        let mut doc = html_document();
        doc.meta_mut().set_title("T");
        doc.meta_mut().set_description("D");
        doc.add_custom_tag("<x>");
        doc.reset_head_data(Some(&[HeadPart::Title, HeadPart::Custom]));
        assert_eq!(doc.meta().title(), "");
        assert_eq!(doc.meta().description(), "D");
        assert!(doc.custom_tags().is_empty());
        doc.reset_head_data(None);
        assert_eq!(doc.meta().description(), "");
    }

    #[test]
    fn preload_assets_builds_link_header() {
        let mut doc = html_document();
        doc.web_asset_manager_mut().register_asset(
            WebAssetItem::style("theme", "media/theme.css").with_option("preload", json!(["preload"])),
        );
        doc.web_asset_manager_mut()
            .use_asset(AssetKind::Style, "theme")
            .unwrap();
        let response = doc.render(&RenderParams::default()).unwrap();
        assert_eq!(
            response.header("link"),
            Some(r#"<media/theme.css>; rel="preload"; as="style""#)
        );
    }

    #[test]
    fn unsupported_preload_method_fails_render() {
        let mut doc = html_document();
        doc.web_asset_manager_mut().register_asset(
            WebAssetItem::script("app", "app.js").with_option("preload", json!(["preflight"])),
        );
        doc.web_asset_manager_mut()
            .use_asset(AssetKind::Script, "app")
            .unwrap();
        assert!(matches!(
            doc.render(&RenderParams::default()),
            Err(DocumentError::Preload(_))
        ));
    }

    #[test]
    fn builtin_template_renders_page() {
        let mut doc = html_document();
        doc.meta_mut().set_title("Welcome");
        doc.set_buffer("<main>Hello</main>", "component", "");
        let response = doc.render(&RenderParams::default()).unwrap();
        let body = response.body_str();
        assert!(body.starts_with("<!DOCTYPE html><html lang=\"en-gb\" dir=\"ltr\"><head>"));
        assert!(body.contains("<title>Welcome</title>"));
        assert!(body.contains("<main>Hello</main></body></html>"));
        assert_eq!(response.header("cache-control"), Some("public"));
        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
    }

    #[test]
    fn template_dir_includes_are_filled() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("index.html"),
            "<html><head><doc:include type=\"head\" /></head><body><doc:include type=\"modules\" name=\"top\" /><doc:include type=\"component\" /></body></html>",
        )
        .unwrap();
        fs::write(tmp.path().join("print.html"), "<pre><doc:include type=\"component\" /></pre>")
            .unwrap();

        let mut doc = html_document();
        doc.set_template(Template::Dir(tmp.path().to_path_buf()));
        doc.meta_mut().set_title("T");
        doc.add_module("top", "<nav>menu</nav>");
        doc.set_buffer("<p>body</p>", "component", "");

        let response = doc.render(&RenderParams::default()).unwrap();
        let body = response.body_str();
        assert!(body.starts_with("<html><head><meta charset=\"utf-8\">\n\t<title>T</title>\n</head>"));
        assert!(body.ends_with("<body><nav>menu</nav><p>body</p></body></html>"));

        let params = RenderParams {
            tmpl: Some("print".into()),
            ..RenderParams::default()
        };
        let response = doc.render(&params).unwrap();
        assert_eq!(response.body_str(), "<pre><p>body</p></pre>");
    }

    #[test]
    fn missing_template_falls_back_to_builtin() {
        let tmp = TempDir::new().unwrap();
        let mut doc = html_document();
        doc.set_template(Template::Dir(tmp.path().to_path_buf()));
        let response = doc.render(&RenderParams::default()).unwrap();
        assert!(response.body_str().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn include_without_type_renders_nothing() {
        let mut doc = html_document();
        let page = doc
            .render_template("<div><doc:include name=\"x\" /></div>", &RenderParams::default())
            .unwrap();
        assert_eq!(page, "<div></div>");
    }
}
