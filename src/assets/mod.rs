//! Web asset tracking.
//!
//! Scripts and stylesheets are declared once in a [`WebAssetRegistry`] (either
//! programmatically or from `*.asset.json` registry files) and switched on per
//! request through the [`WebAssetManager`]. The manager resolves dependencies
//! into a stable render order; the HTML renderers then walk that order.
//!
//! ```text
//! registry files ─┐
//!                 ├─► WebAssetRegistry ─► WebAssetManager::use_asset()
//! register_asset ─┘                             │
//!                                               ▼
//!                          get_assets(kind, sorted) ─► styles/scripts renderer
//! ```
//!
//! Presets are named groups: enabling a preset enables every `name#kind`
//! dependency it lists. A plain dependency name always refers to an asset of
//! the same kind as the dependent.

mod item;
mod manager;
mod registry;

pub use item::{AssetKind, Attributes, InlinePosition, WebAssetItem};
pub use manager::{AssetState, InlineRelation, ManagerState, WebAssetManager};
pub use registry::{WebAssetRegistry, media_version_hash};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid registry file {path}: {source}")]
    Registry {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Error walking registry directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Unknown asset type: {0}")]
    UnknownKind(String),
    #[error("There is no \"{name}\" asset of a \"{kind}\" type in the registry")]
    UnknownAsset { kind: AssetKind, name: String },
    #[error("Unsatisfied dependency \"{dependency}\" for {kind} asset \"{name}\"")]
    UnsatisfiedDependency {
        kind: AssetKind,
        name: String,
        dependency: String,
    },
    #[error("Circular dependency detected among {kind} assets: {}", chain.join(" -> "))]
    CircularDependency { kind: AssetKind, chain: Vec<String> },
}
