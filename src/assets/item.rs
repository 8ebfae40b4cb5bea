use super::AssetError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Ordered attribute/option map. Values keep their JSON type so renderers can
/// tell `defer: true` from `defer: "defer"` and encode arrays as JSON.
pub type Attributes = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Style,
    Preset,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Script => "script",
            AssetKind::Style => "style",
            AssetKind::Preset => "preset",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "script" => Ok(AssetKind::Script),
            "style" => Ok(AssetKind::Style),
            "preset" => Ok(AssetKind::Preset),
            other => Err(AssetError::UnknownKind(other.to_string())),
        }
    }
}

/// Where an inline asset goes relative to the asset it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlinePosition {
    Before,
    After,
}

/// A single script, stylesheet or preset declaration.
///
/// Recognised options:
///
/// | Option | Meaning |
/// |--------|---------|
/// | `inline` | `true` for inline content (no `uri`) |
/// | `content` | Inline script/style body |
/// | `position` | `"before"`/`"after"` its last dependency |
/// | `conditional` | IE conditional-comment expression |
/// | `webcomponent` | Loaded by a custom element, never emitted as `<script src>` |
/// | `preload` | List of preload methods (`preload`, `dns-prefetch`, ...) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebAssetItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: Attributes,
}

impl WebAssetItem {
    pub fn new(kind: AssetKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            uri: None,
            version: None,
            attributes: Attributes::new(),
            dependencies: Vec::new(),
            options: Attributes::new(),
        }
    }

    pub fn script(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(AssetKind::Script, name).with_uri(uri)
    }

    pub fn style(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(AssetKind::Style, name).with_uri(uri)
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// URI if present and non-empty.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|u| !u.is_empty())
    }

    pub fn is_inline(&self) -> bool {
        self.option("inline").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn content(&self) -> Option<&str> {
        self.option("content")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
    }

    pub fn position(&self) -> Option<InlinePosition> {
        match self.option("position").and_then(Value::as_str) {
            Some("before") => Some(InlinePosition::Before),
            Some("after") => Some(InlinePosition::After),
            _ => None,
        }
    }

    pub fn conditional(&self) -> Option<&str> {
        self.option("conditional").and_then(Value::as_str)
    }

    pub fn is_webcomponent(&self) -> bool {
        self.option("webcomponent").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Preload methods listed in the `preload` option.
    pub fn preload_methods(&self) -> Vec<&str> {
        match self.option("preload") {
            Some(Value::Array(methods)) => methods.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(method)) => vec![method.as_str()],
            _ => Vec::new(),
        }
    }

    /// Dependencies as `(kind, name)` pairs.
    ///
    /// `name#kind` names the kind explicitly; a bare name means the same kind
    /// as this asset. Unknown kind suffixes are reported as errors.
    pub fn dependency_refs(&self) -> Result<Vec<(AssetKind, &str)>, AssetError> {
        self.dependencies
            .iter()
            .map(|dep| match dep.split_once('#') {
                Some((name, kind)) => Ok((kind.parse()?, name)),
                None => Ok((self.kind, dep.as_str())),
            })
            .collect()
    }
}
