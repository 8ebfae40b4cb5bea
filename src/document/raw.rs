use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};

/// Passes the buffer through unchanged. Also stands in for unknown formats.
#[derive(Debug, Clone)]
pub struct RawDocument {
    meta: DocumentMeta,
}

impl RawDocument {
    pub fn new(mut meta: DocumentMeta) -> Self {
        meta.set_mime("text/html");
        meta.set_doc_type("raw");
        Self { meta }
    }
}

impl Document for RawDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        let mut response = self.meta.base_response(params)?;
        response.set_body(self.meta.buffer());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_buffer() {
        let mut doc = RawDocument::new(DocumentMeta::new("raw", "text/plain"));
        doc.meta_mut().set_buffer("<p>fragment</p>");
        let response = doc.render(&RenderParams::default()).unwrap();
        assert_eq!(response.body_str(), "<p>fragment</p>");
        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(response.header("cache-control").is_none());
    }
}
