use super::HtmlRenderer;
use crate::document::{DocumentError, HtmlDocument, RenderParams};

/// Main page content. Returns what it is given; the document caches it as
/// the `component` buffer.
#[derive(Debug, Default)]
pub struct ComponentRenderer;

impl HtmlRenderer for ComponentRenderer {
    fn render(
        &mut self,
        _doc: &HtmlDocument,
        _name: &str,
        _params: &RenderParams,
        content: Option<&str>,
    ) -> Result<String, DocumentError> {
        Ok(content.unwrap_or_default().to_string())
    }
}
