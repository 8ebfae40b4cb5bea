//! Documents: application state in, HTTP [`Response`] out.
//!
//! Every document type shares a [`DocumentMeta`] (language, charset, mime,
//! line endings, ...) and implements [`Document::render`]. The
//! [`Factory`] picks the concrete type from a requested format name:
//!
//! | Kind | Type | Body |
//! |------|------|------|
//! | `html` | [`HtmlDocument`] | Template with head/component/message/modules includes |
//! | `json` | [`JsonDocument`] | `params.data` serialized |
//! | `xml` | [`XmlDocument`] | Buffer, with `Content-Disposition` |
//! | `feed` | [`FeedDocument`] | RSS 2.0 or Atom |
//! | `image` | [`ImageDocument`] | Buffer bytes |
//! | `opensearch` | [`OpensearchDocument`] | OpenSearch description |
//! | `raw` / anything else | [`RawDocument`] | Buffer |
//!
//! Nothing here performs I/O on the network: the caller decides what to do
//! with the returned [`Response`].

mod factory;
mod feed;
mod html;
mod image;
mod json;
mod meta;
mod opensearch;
mod raw;
mod response;
mod xml;

pub use factory::{Factory, sanitize_kind};
pub use feed::FeedDocument;
pub use html::{
    HeadData, HeadLink, HeadPart, HtmlDocument, Message, MetaAttribute, MetaTag, Template,
};
pub use image::ImageDocument;
pub use json::JsonDocument;
pub use meta::{DocumentMeta, DocumentOptions, RenderParams, line_end};
pub use opensearch::{OpensearchDocument, OpensearchImage, OpensearchUrl};
pub use raw::RawDocument;
pub use response::Response;
pub use xml::XmlDocument;

use crate::assets::AssetError;
use crate::feed::FeedError;
use crate::preload::PreloadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("Preload error: {0}")]
    Preload(#[from] PreloadError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),
    #[error("Invalid status code: {0}")]
    Status(#[from] http::status::InvalidStatusCode),
    #[error("Unable to load {doc_type} renderer \"{name}\"")]
    UnknownRenderer { doc_type: String, name: String },
}

pub trait Document {
    fn meta(&self) -> &DocumentMeta;
    fn meta_mut(&mut self) -> &mut DocumentMeta;
    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError>;
}

/// Any document the [`Factory`] can create.
#[derive(Debug)]
pub enum AnyDocument {
    Html(Box<HtmlDocument>),
    Json(JsonDocument),
    Xml(XmlDocument),
    Raw(RawDocument),
    Image(ImageDocument),
    Feed(Box<FeedDocument>),
    Opensearch(OpensearchDocument),
}

impl AnyDocument {
    fn inner(&self) -> &dyn Document {
        match self {
            AnyDocument::Html(doc) => &**doc,
            AnyDocument::Json(doc) => doc,
            AnyDocument::Xml(doc) => doc,
            AnyDocument::Raw(doc) => doc,
            AnyDocument::Image(doc) => doc,
            AnyDocument::Feed(doc) => &**doc,
            AnyDocument::Opensearch(doc) => doc,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Document {
        match self {
            AnyDocument::Html(doc) => &mut **doc,
            AnyDocument::Json(doc) => doc,
            AnyDocument::Xml(doc) => doc,
            AnyDocument::Raw(doc) => doc,
            AnyDocument::Image(doc) => doc,
            AnyDocument::Feed(doc) => &mut **doc,
            AnyDocument::Opensearch(doc) => doc,
        }
    }

    pub fn as_html_mut(&mut self) -> Option<&mut HtmlDocument> {
        match self {
            AnyDocument::Html(doc) => Some(&mut **doc),
            _ => None,
        }
    }

    pub fn as_feed_mut(&mut self) -> Option<&mut FeedDocument> {
        match self {
            AnyDocument::Feed(doc) => Some(&mut **doc),
            _ => None,
        }
    }

    pub fn as_opensearch_mut(&mut self) -> Option<&mut OpensearchDocument> {
        match self {
            AnyDocument::Opensearch(doc) => Some(doc),
            _ => None,
        }
    }
}

impl Document for AnyDocument {
    fn meta(&self) -> &DocumentMeta {
        self.inner().meta()
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        self.inner_mut().meta_mut()
    }

    fn render(&mut self, params: &RenderParams) -> Result<Response, DocumentError> {
        self.inner_mut().render(params)
    }
}
