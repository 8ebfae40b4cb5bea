use super::{AssetError, AssetKind, WebAssetItem};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix identifying registry files inside a registry directory.
const REGISTRY_SUFFIX: &str = ".asset.json";

/// Version placeholder replaced by [`media_version_hash`].
const AUTO_VERSION: &str = "auto";

/// On-disk registry file format.
///
/// ```json
/// {
///   "name": "system",
///   "version": "1.0.0",
///   "assets": [
///     { "name": "core", "type": "script", "uri": "media/system/core.js", "version": "auto" }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct RegistryFile {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    assets: Vec<WebAssetItem>,
}

/// Short content hash used as the media version for `"auto"` assets.
///
/// Mixes the crate version with the configured seed so a new release or a
/// new seed busts browser caches.
pub fn media_version_hash(seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    hasher.update(seed.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..10].to_string()
}

/// Every asset the application knows about, by kind and name.
#[derive(Debug, Clone)]
pub struct WebAssetRegistry {
    assets: BTreeMap<AssetKind, BTreeMap<String, WebAssetItem>>,
    registry_files: Vec<PathBuf>,
    media_version: String,
}

impl WebAssetRegistry {
    pub fn new(media_version_seed: &str) -> Self {
        Self {
            assets: BTreeMap::new(),
            registry_files: Vec::new(),
            media_version: media_version_hash(media_version_seed),
        }
    }

    pub fn media_version(&self) -> &str {
        &self.media_version
    }

    /// Add or replace an asset. `"auto"` versions become the media version.
    pub fn add(&mut self, mut item: WebAssetItem) {
        if item.version.as_deref() == Some(AUTO_VERSION) {
            item.version = Some(self.media_version.clone());
        }
        tracing::trace!(kind = %item.kind, name = %item.name, "registering asset");
        self.assets
            .entry(item.kind)
            .or_default()
            .insert(item.name.clone(), item);
    }

    pub fn get(&self, kind: AssetKind, name: &str) -> Option<&WebAssetItem> {
        self.assets.get(&kind).and_then(|items| items.get(name))
    }

    pub fn exists(&self, kind: AssetKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    pub fn remove(&mut self, kind: AssetKind, name: &str) -> Option<WebAssetItem> {
        self.assets.get_mut(&kind).and_then(|items| items.remove(name))
    }

    /// All registered assets of one kind, ordered by name.
    pub fn assets_of(&self, kind: AssetKind) -> impl Iterator<Item = &WebAssetItem> {
        self.assets.get(&kind).into_iter().flat_map(|items| items.values())
    }

    /// Registry files loaded so far, in load order.
    pub fn registry_files(&self) -> &[PathBuf] {
        &self.registry_files
    }

    /// Parse a registry file and add all of its assets.
    ///
    /// Loading the same path twice is a no-op.
    pub fn add_registry_file(&mut self, path: &Path) -> Result<(), AssetError> {
        if self.registry_files.iter().any(|p| p == path) {
            return Ok(());
        }
        let content = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegistryFile =
            serde_json::from_str(&content).map_err(|source| AssetError::Registry {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            registry = %file.name,
            version = file.version.as_deref().unwrap_or("-"),
            assets = file.assets.len(),
            path = %path.display(),
            "loaded asset registry file"
        );

        for mut item in file.assets {
            // Assets without their own version inherit the package version.
            if item.version.is_none() {
                item.version.clone_from(&file.version);
            }
            self.add(item);
        }
        self.registry_files.push(path.to_path_buf());
        Ok(())
    }

    /// Load every `*.asset.json` file below `dir`, in file-name order.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, AssetError> {
        let mut loaded = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let is_registry = entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.ends_with(REGISTRY_SUFFIX));
            if is_registry {
                self.add_registry_file(entry.path())?;
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}

impl Default for WebAssetRegistry {
    fn default() -> Self {
        Self::new("")
    }
}
