//! Render configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [document]
//! charset = "utf-8"
//! language = "en-gb"        # Lower-cased on load
//! direction = "ltr"         # ltr | rtl
//! line_end = "unix"         # unix | win | mac | any literal string
//! tab = "\t"                # Indent unit for head markup
//! base = ""                 # Emitted as <base href>, prefixed to script URLs
//! link = ""                 # Canonical document link
//!
//! [html]
//! html5 = true
//! template_dir = ""         # Empty = built-in page template
//! debug_assets = false      # data-asset-* attributes on asset tags
//! media_version = ""        # Seed for "auto" asset versions
//! registry_dir = ""         # Directory scanned for *.asset.json files
//!
//! [feed]
//! offset = "UTC"            # UTC or ±HH:MM
//! generator = "docrender"
//! site_url = ""             # Scheme + host used to absolutize feed links
//! sitename = ""
//! sitename_pagetitles = 0   # 0 = off, 1 = "Site - Title", 2 = "Title - Site"
//!
//! [image]
//! kind = "png"              # png | jpg | jpeg | gif
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::feed::parse_offset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Render configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Settings shared by every document type.
    pub document: DocumentConfig,
    /// HTML document settings (template, assets).
    pub html: HtmlConfig,
    /// RSS/Atom feed settings.
    pub feed: FeedConfig,
    /// Image document settings.
    pub image: ImageConfig,
}

impl RenderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.document.charset.trim().is_empty() {
            return Err(ConfigError::Validation(
                "document.charset must not be empty".into(),
            ));
        }
        if !matches!(self.document.direction.to_lowercase().as_str(), "ltr" | "rtl") {
            return Err(ConfigError::Validation(
                "document.direction must be ltr or rtl".into(),
            ));
        }
        if self.feed.sitename_pagetitles > 2 {
            return Err(ConfigError::Validation(
                "feed.sitename_pagetitles must be 0, 1 or 2".into(),
            ));
        }
        if parse_offset(&self.feed.offset).is_none() {
            return Err(ConfigError::Validation(format!(
                "feed.offset '{}' is not UTC or ±HH:MM",
                self.feed.offset
            )));
        }
        if !matches!(self.image.kind.as_str(), "png" | "jpg" | "jpeg" | "gif") {
            return Err(ConfigError::Validation(
                "image.kind must be png, jpg, jpeg or gif".into(),
            ));
        }
        Ok(())
    }
}

/// Settings shared by every document type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    pub charset: String,
    pub language: String,
    pub direction: String,
    /// `unix`, `win`, `mac`, or a literal line terminator.
    pub line_end: String,
    pub tab: String,
    pub base: String,
    pub link: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            charset: "utf-8".to_string(),
            language: "en-gb".to_string(),
            direction: "ltr".to_string(),
            line_end: "unix".to_string(),
            tab: "\t".to_string(),
            base: String::new(),
            link: String::new(),
        }
    }
}

/// HTML document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    pub html5: bool,
    /// Directory holding `index.html` and alternate `<tmpl>.html` layouts.
    /// Empty selects the built-in layout.
    pub template_dir: String,
    /// Add `data-asset-name`/`data-asset-dependencies` to asset tags.
    pub debug_assets: bool,
    /// Seed mixed into the hash that replaces `"auto"` asset versions.
    pub media_version: String,
    /// Directory scanned recursively for `*.asset.json` registry files.
    pub registry_dir: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            html5: true,
            template_dir: String::new(),
            debug_assets: false,
            media_version: String::new(),
            registry_dir: String::new(),
        }
    }
}

/// RSS/Atom feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Timezone offset used for feed dates, `UTC` or `±HH:MM`.
    pub offset: String,
    pub generator: String,
    /// Scheme and host, e.g. `https://example.org`.
    pub site_url: String,
    pub sitename: String,
    /// 0 = title only, 1 = site name first, 2 = site name last.
    pub sitename_pagetitles: u8,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            offset: "UTC".to_string(),
            generator: "docrender".to_string(),
            site_url: String::new(),
            sitename: String::new(),
            sitename_pagetitles: 0,
        }
    }
}

/// Image document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub kind: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            kind: "png".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(RenderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    tracing::debug!(path = %config_path.display(), "loaded config file");
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<RenderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RenderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<RenderConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docrender configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Settings shared by every document type
# ---------------------------------------------------------------------------
[document]
charset = "utf-8"

# Document language, lower-cased when applied (html lang, feed language).
language = "en-gb"

# Text direction: ltr or rtl.
direction = "ltr"

# Line terminator for head markup: unix, win, mac, or a literal string.
line_end = "unix"

# Indent unit written before each head element.
tab = "\t"

# Base URI: rendered as <base href> and prefixed to script URLs.
base = ""

# Canonical link of the document (feeds use it for the channel link).
link = ""

# ---------------------------------------------------------------------------
# HTML documents
# ---------------------------------------------------------------------------
[html]
html5 = true

# Directory with index.html (and <tmpl>.html alternates) containing
# <doc:include type="head" /> style placeholders. Empty = built-in layout.
template_dir = ""

# Annotate asset tags with data-asset-name / data-asset-dependencies.
debug_assets = false

# Seed for assets declaring version = "auto".
media_version = ""

# Directory scanned recursively for *.asset.json registry files.
registry_dir = ""

# ---------------------------------------------------------------------------
# RSS / Atom feeds
# ---------------------------------------------------------------------------
[feed]
# Timezone for feed dates: UTC or +HH:MM / -HH:MM.
offset = "UTC"

generator = "docrender"

# Scheme and host prefixed to relative feed links.
site_url = ""

sitename = ""

# Site name in Atom titles: 0 = off, 1 = "Site - Title", 2 = "Title - Site".
sitename_pagetitles = 0

# ---------------------------------------------------------------------------
# Image documents
# ---------------------------------------------------------------------------
[image]
# Output type: png, jpg, jpeg or gif.
kind = "png"
"##
}
