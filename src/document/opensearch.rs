use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};
use crate::escape::escape_html;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const OPENSEARCH_MIME: &str = "application/opensearchdescription+xml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpensearchImage {
    /// Image URL or data URI.
    pub data: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpensearchUrl {
    #[serde(rename = "type")]
    pub mime: String,
    pub rel: String,
    pub template: String,
}

impl Default for OpensearchUrl {
    fn default() -> Self {
        Self {
            mime: "text/html".into(),
            rel: "results".into(),
            template: String::new(),
        }
    }
}

/// OpenSearch description document for browser search integration.
#[derive(Debug, Clone)]
pub struct OpensearchDocument {
    meta: DocumentMeta,
    short_name: String,
    images: Vec<OpensearchImage>,
    urls: Vec<OpensearchUrl>,
}

impl OpensearchDocument {
    pub fn new(mut meta: DocumentMeta) -> Self {
        meta.set_mime(OPENSEARCH_MIME);
        meta.set_doc_type("opensearch");
        Self {
            meta,
            short_name: String::new(),
            images: Vec::new(),
            urls: Vec::new(),
        }
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn set_short_name(&mut self, name: &str) {
        self.short_name = name.to_string();
    }

    pub fn add_image(&mut self, image: OpensearchImage) {
        self.images.push(image);
    }

    pub fn add_url(&mut self, url: OpensearchUrl) {
        self.urls.push(url);
    }

    fn body(&self) -> String {
        let charset = self.meta.charset().unwrap_or("utf-8");
        let mut xml = format!("<?xml version=\"1.0\" encoding=\"{charset}\"?>\n");
        xml.push_str("<OpenSearchDescription xmlns=\"http://a9.com/-/spec/opensearch/1.1/\">\n");
        let _ = writeln!(xml, "\t<ShortName>{}</ShortName>", escape_html(&self.short_name));
        let _ = writeln!(
            xml,
            "\t<Description>{}</Description>",
            escape_html(self.meta.description())
        );
        let _ = writeln!(xml, "\t<InputEncoding>{}</InputEncoding>", charset.to_uppercase());
        for image in &self.images {
            let _ = write!(xml, "\t<Image type=\"{}\"", escape_html(&image.mime));
            if let Some(width) = image.width {
                let _ = write!(xml, " width=\"{width}\"");
            }
            if let Some(height) = image.height {
                let _ = write!(xml, " height=\"{height}\"");
            }
            let _ = writeln!(xml, ">{}</Image>", escape_html(&image.data));
        }
        for url in &self.urls {
            let _ = writeln!(
                xml,
                "\t<Url type=\"{}\" rel=\"{}\" template=\"{}\"/>",
                escape_html(&url.mime),
                escape_html(&url.rel),
                escape_html(&url.template)
            );
        }
        xml.push_str("</OpenSearchDescription>\n");
        xml
    }
}

impl Document for OpensearchDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        let mut response = self.meta.base_response(params)?;
        response.set_body(self.body());
        Ok(response)
    }
}
