use super::{HtmlRenderer, MetasRenderer, ScriptsRenderer, StylesRenderer};
use crate::document::{DocumentError, HtmlDocument, RenderParams};

/// The whole `<head>` content: metas, styles, then scripts.
#[derive(Debug, Default)]
pub struct HeadRenderer;

impl HtmlRenderer for HeadRenderer {
    fn render(
        &mut self,
        doc: &HtmlDocument,
        name: &str,
        params: &RenderParams,
        content: Option<&str>,
    ) -> Result<String, DocumentError> {
        let mut buffer = MetasRenderer.render(doc, name, params, content)?;
        buffer.push_str(&StylesRenderer::default().render(doc, name, params, content)?);
        buffer.push_str(&ScriptsRenderer::default().render(doc, name, params, content)?);
        Ok(buffer)
    }
}
