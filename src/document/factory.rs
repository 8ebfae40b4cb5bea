use super::{
    AnyDocument, Document, DocumentError, DocumentMeta, DocumentOptions, FeedDocument, HtmlDocument,
    ImageDocument, JsonDocument, OpensearchDocument, RawDocument, XmlDocument,
};
use crate::assets::{WebAssetManager, WebAssetRegistry};
use crate::config::RenderConfig;
use std::path::Path;

/// Strip everything but `[A-Za-z0-9_.-]` from a requested document kind.
pub fn sanitize_kind(kind: &str) -> String {
    kind.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

/// Creates documents from a format name, configured from [`RenderConfig`].
#[derive(Debug, Clone, Default)]
pub struct Factory {
    config: RenderConfig,
    registry: WebAssetRegistry,
}

impl Factory {
    /// Factory with an asset registry loaded from `html.registry_dir`.
    ///
    /// Relative registry and template directories are resolved against `root`.
    pub fn new(mut config: RenderConfig, root: &Path) -> Result<Self, DocumentError> {
        if !config.html.template_dir.is_empty() {
            config.html.template_dir = root
                .join(&config.html.template_dir)
                .to_string_lossy()
                .into_owned();
        }
        let mut registry = WebAssetRegistry::new(&config.html.media_version);
        if !config.html.registry_dir.is_empty() {
            let dir = root.join(&config.html.registry_dir);
            let loaded = registry.load_dir(&dir)?;
            tracing::info!(dir = %dir.display(), files = loaded, "loaded asset registry");
        }
        Ok(Self { config, registry })
    }

    pub fn with_registry(config: RenderConfig, registry: WebAssetRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn registry(&self) -> &WebAssetRegistry {
        &self.registry
    }

    /// Create a document for `kind`.
    ///
    /// Unknown kinds yield a [`RawDocument`] whose type is the sanitized kind.
    pub fn create_document(&self, kind: &str, options: &DocumentOptions) -> AnyDocument {
        let kind = sanitize_kind(kind);
        let meta = |mime: &str| DocumentMeta::configured(&kind, mime, &self.config, options);

        match kind.to_ascii_lowercase().as_str() {
            "html" => {
                let assets = WebAssetManager::new(self.registry.clone());
                AnyDocument::Html(Box::new(HtmlDocument::new(
                    meta("text/html"),
                    &self.config.html,
                    assets,
                )))
            }
            "json" => AnyDocument::Json(JsonDocument::new(
                meta("application/json"),
                options.accept.as_deref(),
            )),
            "xml" => AnyDocument::Xml(XmlDocument::new(meta("application/xml"))),
            "raw" => AnyDocument::Raw(RawDocument::new(meta("text/html"))),
            "image" => AnyDocument::Image(ImageDocument::new(
                meta("image/png"),
                &self.config.image.kind,
            )),
            "feed" => AnyDocument::Feed(Box::new(FeedDocument::new(
                meta("application/rss+xml"),
                self.config.feed.clone(),
            ))),
            "opensearch" => AnyDocument::Opensearch(OpensearchDocument::new(meta(
                "application/opensearchdescription+xml",
            ))),
            _ => {
                tracing::debug!(kind = %kind, "unknown document type, using raw document");
                let mut raw = RawDocument::new(meta("text/html"));
                raw.meta_mut().set_doc_type(&kind);
                AnyDocument::Raw(raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn factory() -> Factory {
        Factory::with_registry(RenderConfig::default(), WebAssetRegistry::default())
    }

    #[test]
    fn sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_kind("../ht ml!"), "..html");
        assert_eq!(sanitize_kind("Feed_2.0-x"), "Feed_2.0-x");
    }

    #[test]
    fn creates_known_kinds() {
        let f = factory();
        let options = DocumentOptions::default();
        assert!(matches!(f.create_document("html", &options), AnyDocument::Html(_)));
        assert!(matches!(f.create_document("JSON", &options), AnyDocument::Json(_)));
        assert!(matches!(f.create_document("xml", &options), AnyDocument::Xml(_)));
        assert!(matches!(f.create_document("image", &options), AnyDocument::Image(_)));
        assert!(matches!(f.create_document("feed", &options), AnyDocument::Feed(_)));
        assert!(matches!(
            f.create_document("opensearch", &options),
            AnyDocument::Opensearch(_)
        ));
    }

    #[test]
    fn unknown_kind_becomes_raw_with_requested_type() {
        let doc = factory().create_document("csv<script>", &DocumentOptions::default());
        assert!(matches!(doc, AnyDocument::Raw(_)));
        assert_eq!(doc.meta().doc_type(), "csvscript");
        assert_eq!(doc.meta().mime(), "text/html");
    }

    #[test]
    fn documents_pick_up_config_and_options() {
        let mut config = RenderConfig::default();
        config.document.language = "fr-FR".into();
        config.image.kind = "jpg".into();
        let f = Factory::with_registry(config, WebAssetRegistry::default());
        let options = DocumentOptions {
            direction: Some("RTL".into()),
            ..DocumentOptions::default()
        };
        let doc = f.create_document("html", &options);
        assert_eq!(doc.meta().language(), "fr-fr");
        assert_eq!(doc.meta().direction(), "rtl");
        assert_eq!(doc.meta().doc_type(), "html");
        let image = f.create_document("image", &options);
        assert_eq!(image.meta().mime(), "image/jpeg");
    }

    #[test]
    fn new_loads_registry_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("media")).unwrap();
        fs::write(
            tmp.path().join("media/site.asset.json"),
            r#"{"name": "site", "assets": [{"name": "app", "type": "script", "uri": "app.js"}]}"#,
        )
        .unwrap();
        let mut config = RenderConfig::default();
        config.html.registry_dir = "media".into();
        let f = Factory::new(config, tmp.path()).unwrap();
        assert!(f.registry().exists(crate::assets::AssetKind::Script, "app"));
    }
}
