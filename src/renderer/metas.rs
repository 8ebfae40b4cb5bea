use super::assets::attribute_value;
use super::{HtmlRenderer, ltrim_tab};
use crate::document::{Document, DocumentError, HtmlDocument, MetaAttribute, RenderParams};
use crate::escape::escape_html;
use std::fmt::Write;

/// Charset, base, meta tags, description, title and head links.
#[derive(Debug, Default)]
pub struct MetasRenderer;

impl HtmlRenderer for MetasRenderer {
    fn render(
        &mut self,
        doc: &HtmlDocument,
        _name: &str,
        _params: &RenderParams,
        _content: Option<&str>,
    ) -> Result<String, DocumentError> {
        let meta = doc.meta();
        let (tab, line_end) = (meta.tab(), meta.line_end());
        let mut buffer = String::new();

        if doc.is_html5() {
            let charset = meta.charset().unwrap_or("utf-8");
            let _ = write!(buffer, "{tab}<meta charset=\"{}\">{line_end}", escape_html(charset));
        }

        if !meta.base().is_empty() {
            let _ = write!(buffer, "{tab}<base href=\"{}\">{line_end}", escape_html(meta.base()));
        }

        for tag in doc.meta_tags() {
            let skip = match tag.attribute {
                MetaAttribute::HttpEquiv => doc.is_html5() && tag.name.eq_ignore_ascii_case("content-type"),
                _ => tag.content.is_empty(),
            };
            if skip {
                continue;
            }
            let _ = write!(
                buffer,
                "{tab}<meta {}=\"{}\" content=\"{}\">{line_end}",
                tag.attribute.as_str(),
                escape_html(&tag.name),
                escape_html(&tag.content)
            );
        }

        if !meta.description().is_empty() {
            let _ = write!(
                buffer,
                "{tab}<meta name=\"description\" content=\"{}\">{line_end}",
                escape_html(meta.description())
            );
        }

        let _ = write!(buffer, "{tab}<title>{}</title>{line_end}", escape_html(meta.title()));

        for link in doc.links() {
            let _ = write!(
                buffer,
                "{tab}<link href=\"{}\" {}=\"{}\"",
                escape_html(&link.href),
                escape_html(&link.rel_type),
                escape_html(&link.relation)
            );
            for (name, value) in &link.attributes {
                let _ = write!(
                    buffer,
                    " {}=\"{}\"",
                    escape_html(name),
                    escape_html(&attribute_value(value))
                );
            }
            let _ = write!(buffer, ">{line_end}");
        }

        Ok(ltrim_tab(&buffer, tab))
    }
}
