use super::{Document, DocumentError, DocumentMeta, RenderParams, Response};
use crate::config::FeedConfig;
use crate::feed::{FeedError, FeedImage, FeedItem, feed_timezone};
use crate::renderer::{Renderer, create_renderer};
use chrono::{DateTime, FixedOffset, Utc};

/// An RSS/Atom feed. Channel fields are public, as on the wire.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    meta: DocumentMeta,
    settings: FeedConfig,
    items: Vec<FeedItem>,
    /// Explicit self link; derived from the document link when empty.
    pub syndication_url: String,
    pub image: Option<FeedImage>,
    pub copyright: String,
    pub pub_date: String,
    /// Defaults to the render time.
    pub last_build_date: Option<DateTime<FixedOffset>>,
    pub editor: String,
    pub editor_email: String,
    pub webmaster: String,
    pub docs: String,
    pub categories: Vec<String>,
    pub ttl: String,
    pub rating: String,
    pub skip_hours: String,
    pub skip_days: String,
}

impl FeedDocument {
    pub fn new(mut meta: DocumentMeta, settings: FeedConfig) -> Self {
        meta.set_doc_type("feed");
        meta.set_generator(&settings.generator);
        Self {
            meta,
            settings,
            items: Vec::new(),
            syndication_url: String::new(),
            image: None,
            copyright: String::new(),
            pub_date: String::new(),
            last_build_date: None,
            editor: String::new(),
            editor_email: String::new(),
            webmaster: String::new(),
            docs: String::new(),
            categories: Vec::new(),
            ttl: String::new(),
            rating: String::new(),
            skip_hours: String::new(),
            skip_days: String::new(),
        }
    }

    pub fn settings(&self) -> &FeedConfig {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut FeedConfig {
        &mut self.settings
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Add an entry; its `source` becomes the feed link.
    pub fn add_item(&mut self, mut item: FeedItem) {
        item.source = self.meta.link().to_string();
        self.items.push(item);
    }

    pub fn timezone(&self) -> Result<FixedOffset, FeedError> {
        feed_timezone(&self.settings.offset)
    }

    /// Self link of the feed, relative to the site URL.
    pub fn syndication_url(&self, feed_type: &str) -> String {
        if !self.syndication_url.is_empty() {
            return self.syndication_url.clone();
        }
        let link = self.meta.link();
        let separator = if link.contains('?') { '&' } else { '?' };
        format!("{link}{separator}format=feed&type={feed_type}")
    }

    /// Base used to absolutize links inside item descriptions.
    pub fn content_base(&self) -> String {
        let site = self.settings.site_url.trim_end_matches('/');
        format!("{site}/")
    }

    /// Render the feed body for `feed_type` at a fixed time.
    pub fn render_feed(
        &mut self,
        feed_type: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<String, DocumentError> {
        let Renderer::Feed(renderer) = create_renderer("feed", feed_type)? else {
            return Err(DocumentError::UnknownRenderer {
                doc_type: "feed".into(),
                name: feed_type.into(),
            });
        };
        self.meta.set_mime(renderer.content_type());
        let charset = self.meta.charset().unwrap_or("utf-8").to_string();
        let mut data = format!("<?xml version=\"1.0\" encoding=\"{charset}\"?>\n");
        data.push_str(&renderer.render(self, now)?);
        Ok(data)
    }
}

impl Document for FeedDocument {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        let feed_type = params
            .feed_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("rss");
        let now = Utc::now().with_timezone(&self.timezone()?);
        let body = self.render_feed(feed_type, now)?;
        let mut response = self.meta.base_response(params)?;
        response.set_body(body);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::feed_document;

    #[test]
    fn add_item_sets_source() {
        let mut doc = feed_document();
        doc.add_item(FeedItem::new("a", "/a"));
        assert_eq!(doc.items()[0].source, "/news");
    }

    #[test]
    fn syndication_url_derives_from_link() {
        let mut doc = feed_document();
        assert_eq!(doc.syndication_url("atom"), "/news?format=feed&type=atom");
        doc.meta_mut().set_link("/news?view=list");
        assert_eq!(doc.syndication_url("rss"), "/news?view=list&format=feed&type=rss");
        doc.syndication_url = "/feeds/news.xml".into();
        assert_eq!(doc.syndication_url("rss"), "/feeds/news.xml");
    }

    #[test]
    fn render_defaults_to_rss() {
        let mut doc = feed_document();
        let response = doc.render(&RenderParams::default()).unwrap();
        assert_eq!(
            response.header("content-type"),
            Some("application/rss+xml; charset=utf-8")
        );
        assert!(response.body_str().starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rss"));
    }

    #[test]
    fn render_atom() {
        let mut doc = feed_document();
        let params = RenderParams {
            feed_type: Some("atom".into()),
            ..RenderParams::default()
        };
        let response = doc.render(&params).unwrap();
        assert_eq!(
            response.header("content-type"),
            Some("application/atom+xml; charset=utf-8")
        );
        assert!(response.body_str().contains("<feed xmlns=\"http://www.w3.org/2005/Atom\""));
    }

    #[test]
    fn unknown_feed_type_is_an_error() {
        let mut doc = feed_document();
        let params = RenderParams {
            feed_type: Some("json".into()),
            ..RenderParams::default()
        };
        assert!(matches!(
            doc.render(&params),
            Err(DocumentError::UnknownRenderer { .. })
        ));
    }
}
