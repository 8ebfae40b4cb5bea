use super::assets::render_assets;
use super::{HtmlRenderer, ltrim_tab};
use crate::assets::AssetKind;
use crate::document::{Document, DocumentError, HtmlDocument, RenderParams};
use crate::escape::escape_html;
use std::collections::HashSet;
use std::fmt::Write;

/// `<script>` tags for active script assets, followed by the script options
/// block and the document's custom head tags.
#[derive(Debug, Default)]
pub struct ScriptsRenderer {
    rendered_src: HashSet<String>,
}

impl HtmlRenderer for ScriptsRenderer {
    fn render(
        &mut self,
        doc: &HtmlDocument,
        _name: &str,
        params: &RenderParams,
        _content: Option<&str>,
    ) -> Result<String, DocumentError> {
        let meta = doc.meta();
        let (tab, line_end) = (meta.tab(), meta.line_end());
        let debug = params.debug || doc.debug_assets();
        let mut buffer = render_assets(doc, AssetKind::Script, debug, &mut self.rendered_src)?;

        let options = meta.script_options();
        if !options.is_empty() {
            let json = serde_json::to_string(options)?.replace("</", "<\\/");
            let nonce = doc
                .csp_nonce()
                .map(|nonce| format!(" nonce=\"{}\"", escape_html(nonce)))
                .unwrap_or_default();
            let _ = write!(
                buffer,
                "{tab}<script type=\"application/json\" class=\"script-options new\"{nonce}>{json}</script>{line_end}"
            );
        }

        let mut seen = HashSet::new();
        for custom in doc.custom_tags() {
            if seen.insert(custom.as_str()) {
                let _ = write!(buffer, "{tab}{custom}{line_end}");
            }
        }

        Ok(ltrim_tab(&buffer, tab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Attributes, WebAssetItem};
    use crate::test_helpers::{attrs, html_document};
    use serde_json::json;

    fn render(doc: &HtmlDocument, params: &RenderParams) -> String {
        ScriptsRenderer::default().render(doc, "", params, None).unwrap()
    }

    #[test]
    fn dependencies_come_first_with_version_and_base() {
        let mut doc = html_document();
        doc.meta_mut().set_base("/site/");
        let assets = doc.web_asset_manager_mut();
        assets.register_asset(WebAssetItem::script("core", "media/core.js").with_version("abc"));
        assets.register_asset(
            WebAssetItem::script("app", "media/app.js?x=1")
                .with_version("abc")
                .with_dependency("core")
                .with_attribute("defer", true),
        );
        assets.use_asset(AssetKind::Script, "app").unwrap();

        assert_eq!(
            render(&doc, &RenderParams::default()),
            "<script src=\"/site/media/core.js?abc\"></script>\n\
             \t<script src=\"/site/media/app.js?x=1\" defer></script>\n"
        );
    }

    #[test]
    fn inline_relations_and_leftovers() {
        let mut doc = html_document();
        let assets = doc.web_asset_manager_mut();
        assets
            .register_and_use_script("app", "app.js", Attributes::new(), &[])
            .unwrap();
        assets
            .add_inline_script("var late = 1;", Attributes::new(), Attributes::new(), &[])
            .unwrap();
        assets
            .add_inline_script(
                "var before = 1;",
                attrs(json!({"name": "setup", "position": "before"})),
                Attributes::new(),
                &["app"],
            )
            .unwrap();
        assets
            .add_inline_script(
                "var after = 1;",
                attrs(json!({"position": "after"})),
                Attributes::new(),
                &["app"],
            )
            .unwrap();

        assert_eq!(
            render(&doc, &RenderParams::default()),
            "<script>var before = 1;</script>\n\
             \t<script src=\"app.js\"></script>\n\
             \t<script>var after = 1;</script>\n\
             \t<script>var late = 1;</script>\n"
        );
    }

    #[test]
    fn duplicate_src_and_webcomponents_are_skipped() {
        let mut doc = html_document();
        let assets = doc.web_asset_manager_mut();
        assets
            .register_and_use_script("a", "shared.js", Attributes::new(), &[])
            .unwrap();
        assets
            .register_and_use_script("b", "shared.js", Attributes::new(), &[])
            .unwrap();
        assets.register_asset(
            WebAssetItem::script("element", "element.js").with_option("webcomponent", true),
        );
        assets.use_asset(AssetKind::Script, "element").unwrap();

        assert_eq!(render(&doc, &RenderParams::default()), "<script src=\"shared.js\"></script>\n");
    }

    #[test]
    fn conditional_and_debug_attributes() {
        let mut doc = html_document();
        let assets = doc.web_asset_manager_mut();
        assets.register_asset(WebAssetItem::script("core", "core.js"));
        assets.register_asset(
            WebAssetItem::script("legacy", "legacy.js")
                .with_dependency("core")
                .with_option("conditional", "lt IE 9"),
        );
        assets.use_asset(AssetKind::Script, "legacy").unwrap();
        let params = RenderParams {
            debug: true,
            ..RenderParams::default()
        };

        assert_eq!(
            render(&doc, &params),
            "<script src=\"core.js\" data-asset-name=\"core\"></script>\n\
             \t<!--[if lt IE 9]><script src=\"legacy.js\" data-asset-name=\"legacy\" \
             data-asset-dependencies=\"core\"></script><![endif]-->\n"
        );
    }

    #[test]
    fn nonce_and_cdata_for_xhtml() {
        let mut doc = html_document();
        doc.set_csp_nonce("r4nd");
        doc.meta_mut().set_mime("application/xhtml+xml");
        doc.web_asset_manager_mut()
            .add_inline_script("go();", Attributes::new(), Attributes::new(), &[])
            .unwrap();

        assert_eq!(
            render(&doc, &RenderParams::default()),
            "<script nonce=\"r4nd\">\t\t//<![CDATA[\ngo();\t\t//]]>\n</script>\n"
        );
    }

    #[test]
    fn script_options_and_custom_tags() {
        let mut doc = html_document();
        doc.meta_mut()
            .add_script_options("system.paths", json!({"root": "</script>"}), true);
        doc.add_custom_tag("<meta name=\"x\">");
        doc.add_custom_tag("<meta name=\"x\">");

        assert_eq!(
            render(&doc, &RenderParams::default()),
            "<script type=\"application/json\" class=\"script-options new\">\
             {\"system.paths\":{\"root\":\"<\\/script>\"}}</script>\n\
             \t<meta name=\"x\">\n"
        );
    }

    #[test]
    fn empty_when_nothing_is_active() {
        assert_eq!(render(&html_document(), &RenderParams::default()), "");
    }
}
