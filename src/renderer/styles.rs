use super::assets::render_assets;
use super::{HtmlRenderer, ltrim_tab};
use crate::assets::AssetKind;
use crate::document::{Document, DocumentError, HtmlDocument, RenderParams};
use std::collections::HashSet;

/// `<link>` and `<style>` tags for active style assets.
#[derive(Debug, Default)]
pub struct StylesRenderer {
    rendered_src: HashSet<String>,
}

impl HtmlRenderer for StylesRenderer {
    fn render(
        &mut self,
        doc: &HtmlDocument,
        _name: &str,
        params: &RenderParams,
        _content: Option<&str>,
    ) -> Result<String, DocumentError> {
        let debug = params.debug || doc.debug_assets();
        let buffer = render_assets(doc, AssetKind::Style, debug, &mut self.rendered_src)?;
        Ok(ltrim_tab(&buffer, doc.meta().tab()))
    }
}
