//! # docrender
//!
//! The document layer of a web application: it turns page state (title,
//! meta tags, scripts, stylesheets, feed items, payloads) into an HTTP
//! response for one content type.
//!
//! # Architecture
//!
//! ```text
//! config.toml ─→ Factory ─→ AnyDocument ─→ render(params) ─→ Response
//!                  │              │
//!       asset registry      HtmlDocument ─→ template ─→ <doc:include> buffers
//!       (*.asset.json)                                   └→ renderer factory
//! ```
//!
//! A [`document::Factory`] creates documents by kind (`html`, `json`, `xml`,
//! `raw`, `image`, `feed`, `opensearch`). HTML documents render a page
//! template whose `<doc:include type="…" name="…" />` tags are filled by
//! [`renderer`]s; the `head` include emits meta tags and the scripts and
//! styles tracked by the [`assets::WebAssetManager`], ordered so that every
//! asset follows its dependencies.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Document types, shared metadata, the factory and the HTTP response |
//! | [`renderer`] | Renderer factory: head/metas/styles/scripts/component/message/modules, rss/atom |
//! | [`assets`] | Asset registry (`*.asset.json`) and the per-document asset manager |
//! | [`preload`] | Resource hints collected into an HTTP `Link` header |
//! | [`feed`] | Feed items, date parsing, RSS 2.0 and Atom serializers |
//! | [`escape`] | HTML escaping and link helpers |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | JSON page descriptions used by the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud for Markup With Structure
//!
//! Page skeletons and message containers are built with
//! [Maud](https://maud.lambda.xyz/). Head tags are written as text instead:
//! their exact byte layout (tab, line end, attribute order) is configurable
//! and is part of the output contract.
//!
//! ## Ordered JSON Maps for Attributes
//!
//! Asset attributes and options are `serde_json` maps with `preserve_order`,
//! so attributes appear in the markup in the order they were declared.

pub mod assets;
pub mod config;
pub mod document;
pub mod escape;
pub mod feed;
pub mod output;
pub mod preload;
pub mod renderer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
