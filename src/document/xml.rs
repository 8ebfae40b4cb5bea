use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};
use http::header::CONTENT_DISPOSITION;

/// Escape a value for use inside a quoted header parameter.
fn quoted_param(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    meta: DocumentMeta,
    name: String,
    download: bool,
}

impl XmlDocument {
    pub fn new(mut meta: DocumentMeta) -> Self {
        meta.set_mime("application/xml");
        meta.set_doc_type("xml");
        Self {
            meta,
            name: "XmlDocument".into(),
            download: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn is_download(&self) -> bool {
        self.download
    }

    pub fn set_download(&mut self, download: bool) {
        self.download = download;
    }
}

impl Document for XmlDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        let mut response = self.meta.base_response(params)?;
        let disposition = if self.download { "attachment" } else { "inline" };
        response.set_header(
            CONTENT_DISPOSITION,
            &format!("{disposition}; filename=\"{}.xml\"", quoted_param(&self.name)),
        )?;
        response.set_body(self.meta.buffer());
        Ok(response)
    }
}
