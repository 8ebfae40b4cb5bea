//! Renderer factory.
//!
//! HTML documents fill their named buffers through [`HtmlRenderer`]s; feed
//! documents serialize their channel through a [`FeedRenderer`].
//!
//! | Document | Renderer | Output |
//! |----------|----------|--------|
//! | `html` | `head` | `metas` + `styles` + `scripts` |
//! | `html` | `metas` | charset, base, meta tags, title, head links |
//! | `html` | `styles` | `<link rel="stylesheet">` and `<style>` blocks |
//! | `html` | `scripts` | `<script>` tags, script options, custom tags |
//! | `html` | `component` | the content it is given |
//! | `html` | `message` | queued system messages |
//! | `html` | `modules` | fragments registered for a position |
//! | `feed` | `rss`, `atom` | feed XML body |

mod assets;
mod component;
mod head;
mod message;
mod metas;
mod modules;
mod scripts;
mod styles;

pub use component::ComponentRenderer;
pub use head::HeadRenderer;
pub use message::MessageRenderer;
pub use metas::MetasRenderer;
pub use modules::ModulesRenderer;
pub use scripts::ScriptsRenderer;
pub use styles::StylesRenderer;

use crate::document::{DocumentError, FeedDocument, HtmlDocument, RenderParams};
use crate::feed::{AtomRenderer, FeedError, RssRenderer};
use chrono::{DateTime, FixedOffset};

/// Produces one named buffer of an HTML document.
pub trait HtmlRenderer {
    fn content_type(&self) -> &'static str {
        "text/html"
    }

    /// Render the buffer `name`. `content` is pre-rendered content passed
    /// through by renderers that wrap it.
    fn render(
        &mut self,
        doc: &HtmlDocument,
        name: &str,
        params: &RenderParams,
        content: Option<&str>,
    ) -> Result<String, DocumentError>;
}

/// Serializes a feed document.
pub trait FeedRenderer {
    fn content_type(&self) -> &'static str;

    fn render(&self, doc: &FeedDocument, now: DateTime<FixedOffset>) -> Result<String, FeedError>;
}

pub enum Renderer {
    Html(Box<dyn HtmlRenderer>),
    Feed(Box<dyn FeedRenderer>),
}

/// Create the renderer `name` for documents of type `doc_type`.
pub fn create_renderer(doc_type: &str, name: &str) -> Result<Renderer, DocumentError> {
    let renderer = match (doc_type, name) {
        ("html", "head") => Renderer::Html(Box::new(HeadRenderer)),
        ("html", "metas") => Renderer::Html(Box::new(MetasRenderer)),
        ("html", "styles") => Renderer::Html(Box::<StylesRenderer>::default()),
        ("html", "scripts") => Renderer::Html(Box::<ScriptsRenderer>::default()),
        ("html", "component") => Renderer::Html(Box::new(ComponentRenderer)),
        ("html", "message") => Renderer::Html(Box::new(MessageRenderer)),
        ("html", "modules") => Renderer::Html(Box::new(ModulesRenderer)),
        ("feed", "rss") => Renderer::Feed(Box::new(RssRenderer)),
        ("feed", "atom") => Renderer::Feed(Box::new(AtomRenderer)),
        _ => {
            return Err(DocumentError::UnknownRenderer {
                doc_type: doc_type.into(),
                name: name.into(),
            });
        }
    };
    tracing::trace!(doc_type, name, "created renderer");
    Ok(renderer)
}

/// Strip leading characters that occur in `tab`.
pub(crate) fn ltrim_tab(buffer: &str, tab: &str) -> String {
    buffer.trim_start_matches(|c| tab.contains(c)).to_string()
}
