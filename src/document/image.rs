use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};

/// Mime for a configured image kind; unknown kinds are served as PNG.
fn image_mime(kind: &str) -> &'static str {
    match kind {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "image/png",
    }
}

#[derive(Debug, Clone)]
pub struct ImageDocument {
    meta: DocumentMeta,
    kind: String,
}

impl ImageDocument {
    pub fn new(mut meta: DocumentMeta, kind: &str) -> Self {
        meta.set_mime(image_mime(kind));
        meta.set_doc_type("image");
        Self {
            meta,
            kind: kind.to_string(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: &str) {
        self.kind = kind.to_string();
    }
}

impl Document for ImageDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        self.meta.set_mime(image_mime(&self.kind));
        self.meta.clear_charset();
        let mut response = self.meta.base_response(params)?;
        response.set_body(self.meta.buffer());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_kind() {
        assert_eq!(image_mime("jpg"), "image/jpeg");
        assert_eq!(image_mime("jpeg"), "image/jpeg");
        assert_eq!(image_mime("gif"), "image/gif");
        assert_eq!(image_mime("png"), "image/png");
        assert_eq!(image_mime("bmp"), "image/png");
    }

    #[test]
    fn renders_bytes_without_charset() {
        let mut doc = ImageDocument::new(DocumentMeta::new("image", "image/png"), "gif");
        doc.meta_mut().set_buffer(vec![0x47, 0x49, 0x46]);
        let response = doc.render(&RenderParams::default()).unwrap();
        assert_eq!(response.header("content-type"), Some("image/gif"));
        assert_eq!(response.body, b"GIF");
    }
}
