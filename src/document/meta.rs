use super::{DocumentError, Response};
use crate::config::RenderConfig;
use chrono::{DateTime, FixedOffset};
use http::header::{CONTENT_TYPE, LAST_MODIFIED};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Resolve a line-end style: `win`, `unix`, `mac`, or a literal string.
pub fn line_end(style: &str) -> &str {
    match style {
        "win" => "\r\n",
        "unix" => "\n",
        "mac" => "\r",
        other => other,
    }
}

/// Per-document overrides of the `[document]` config section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentOptions {
    pub charset: Option<String>,
    pub language: Option<String>,
    pub direction: Option<String>,
    pub line_end: Option<String>,
    pub tab: Option<String>,
    pub link: Option<String>,
    pub base: Option<String>,
    /// HTTP `Accept` header of the request (JSON documents).
    pub accept: Option<String>,
}

/// Parameters of a single render call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// HTTP status, 200 when unset.
    pub status: Option<u16>,
    pub max_age: Option<u32>,
    pub shared_age: Option<u32>,
    /// `Some(true)` marks the response private, anything else public.
    pub is_private: Option<bool>,
    /// Template file name without extension (HTML), `index` when unset.
    pub tmpl: Option<String>,
    /// Payload for JSON documents.
    pub data: Option<Value>,
    /// `rss` (default) or `atom`.
    pub feed_type: Option<String>,
    /// Add `data-asset-*` attributes to rendered assets.
    pub debug: bool,
    pub accept: Option<String>,
}

/// State shared by every document type.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    title: String,
    description: String,
    link: String,
    base: String,
    language: String,
    direction: String,
    modified: Option<DateTime<FixedOffset>>,
    tab: String,
    line_end: String,
    charset: Option<String>,
    mime: String,
    doc_type: String,
    generator: String,
    script_options: Map<String, Value>,
    buffer: Vec<u8>,
}

impl DocumentMeta {
    pub fn new(doc_type: &str, mime: &str) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            link: String::new(),
            base: String::new(),
            language: "en-gb".into(),
            direction: "ltr".into(),
            modified: None,
            tab: "\t".into(),
            line_end: "\n".into(),
            charset: Some("utf-8".into()),
            mime: mime.to_lowercase(),
            doc_type: doc_type.into(),
            generator: env!("CARGO_PKG_NAME").into(),
            script_options: Map::new(),
            buffer: Vec::new(),
        }
    }

    /// Build from config, then apply per-document overrides.
    pub fn configured(
        doc_type: &str,
        mime: &str,
        config: &RenderConfig,
        options: &DocumentOptions,
    ) -> Self {
        let doc = &config.document;
        let mut meta = Self::new(doc_type, mime);
        meta.set_charset(options.charset.as_deref().unwrap_or(&doc.charset));
        meta.set_language(options.language.as_deref().unwrap_or(&doc.language));
        meta.set_direction(options.direction.as_deref().unwrap_or(&doc.direction));
        meta.set_line_end(options.line_end.as_deref().unwrap_or(&doc.line_end));
        meta.set_tab(options.tab.as_deref().unwrap_or(&doc.tab));
        meta.set_link(options.link.as_deref().unwrap_or(&doc.link));
        meta.set_base(options.base.as_deref().unwrap_or(&doc.base));
        meta.set_generator(&config.feed.generator);
        meta
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn set_link(&mut self, link: &str) {
        self.link = link.to_string();
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn set_base(&mut self, base: &str) {
        self.base = base.to_string();
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_lowercase();
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    pub fn set_direction(&mut self, direction: &str) {
        self.direction = direction.to_lowercase();
    }

    pub fn modified(&self) -> Option<&DateTime<FixedOffset>> {
        self.modified.as_ref()
    }

    pub fn set_modified(&mut self, date: DateTime<FixedOffset>) {
        self.modified = Some(date);
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn set_tab(&mut self, tab: &str) {
        self.tab = tab.to_string();
    }

    pub fn line_end(&self) -> &str {
        &self.line_end
    }

    pub fn set_line_end(&mut self, style: &str) {
        self.line_end = line_end(style).to_string();
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn set_charset(&mut self, charset: &str) {
        self.charset = Some(charset.to_string());
    }

    /// Send `Content-Type` without a charset parameter.
    pub fn clear_charset(&mut self) {
        self.charset = None;
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn set_mime(&mut self, mime: &str) {
        self.mime = mime.to_lowercase();
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn set_doc_type(&mut self, doc_type: &str) {
        self.doc_type = doc_type.to_string();
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    pub fn set_generator(&mut self, generator: &str) {
        self.generator = generator.to_string();
    }

    pub fn script_options(&self) -> &Map<String, Value> {
        &self.script_options
    }

    /// Set options for client scripts under `key`.
    ///
    /// With `merge`, object values are merged recursively into what is
    /// already stored; otherwise the value replaces it.
    pub fn add_script_options(&mut self, key: &str, options: Value, merge: bool) {
        let slot = self
            .script_options
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if merge && options.is_object() {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            merge_recursive(slot, options);
        } else {
            *slot = options;
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    pub fn set_buffer(&mut self, content: impl Into<Vec<u8>>) {
        self.buffer = content.into();
    }

    /// Response with status, `Last-Modified` and `Content-Type` filled in.
    pub fn base_response(&self, params: &RenderParams) -> Result<Response, DocumentError> {
        let mut response = Response::new();
        if let Some(status) = params.status {
            response.set_status(status)?;
        }
        if let Some(modified) = &self.modified {
            response.set_header(LAST_MODIFIED, &super::response::http_date(modified))?;
        }
        let content_type = match &self.charset {
            Some(charset) => format!("{}; charset={}", self.mime, charset),
            None => self.mime.clone(),
        };
        response.set_header(CONTENT_TYPE, &content_type)?;
        Ok(response)
    }
}

fn merge_recursive(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(target), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let nested = value.is_object() && target.get(&key).is_some_and(Value::is_object);
                match target.get_mut(&key) {
                    Some(existing) if nested => merge_recursive(existing, value),
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, overlay) => *target = overlay,
    }
}
