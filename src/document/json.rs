use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};
use serde_json::{Map, Value};

/// Pick the JSON mime for a request's `Accept` header.
///
/// Browsers that ask for HTML but not JSON get `text/plain` so the payload
/// is displayed instead of downloaded.
fn mime_for_accept(accept: Option<&str>) -> &'static str {
    match accept {
        Some(accept) if !accept.contains("application/json") && accept.contains("text/html") => {
            "text/plain"
        }
        _ => "application/json",
    }
}

#[derive(Debug, Clone)]
pub struct JsonDocument {
    meta: DocumentMeta,
    name: String,
}

impl JsonDocument {
    pub fn new(mut meta: DocumentMeta, accept: Option<&str>) -> Self {
        meta.set_mime(mime_for_accept(accept));
        meta.set_doc_type("json");
        Self {
            meta,
            name: "JsonDocument".into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

impl Document for JsonDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        if params.accept.is_some() {
            self.meta.set_mime(mime_for_accept(params.accept.as_deref()));
        }
        // Missing data renders as an empty object.
        let data = params.data.clone().unwrap_or_else(|| Value::Object(Map::new()));
        let mut response = self.meta.base_response(params)?;
        response.set_body(serde_json::to_vec(&data)?);
        response.apply_cache(params)?;
        Ok(response)
    }
}
