use super::HtmlRenderer;
use crate::document::{DocumentError, HtmlDocument, RenderParams};

/// Fragments registered for the module position `name`, concatenated.
#[derive(Debug, Default)]
pub struct ModulesRenderer;

impl HtmlRenderer for ModulesRenderer {
    fn render(
        &mut self,
        doc: &HtmlDocument,
        name: &str,
        _params: &RenderParams,
        _content: Option<&str>,
    ) -> Result<String, DocumentError> {
        Ok(doc.modules(name).concat())
    }
}
