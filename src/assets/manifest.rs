// Declarative asset manifest: what to load and what each asset waits for

use super::LoaderError;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported asset kinds
///
/// The set is closed. Names that do not match a known kind are kept as
/// `Unsupported` so the manifest still parses; the loader never hands those
/// to a media starter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetKind {
    Script,
    Stylesheet,
    Image,
    ResponsiveImage,
    Unsupported(String),
}

impl AssetKind {
    /// Canonical name used in manifests
    pub fn name(&self) -> &str {
        match self {
            AssetKind::Script => "script",
            AssetKind::Stylesheet => "stylesheet",
            AssetKind::Image => "image",
            AssetKind::ResponsiveImage => "responsive-image",
            AssetKind::Unsupported(name) => name,
        }
    }

    /// Whether a media starter can load this kind
    pub fn is_supported(&self) -> bool {
        !matches!(self, AssetKind::Unsupported(_))
    }

    /// Element tag a DOM-backed starter creates for this kind
    pub fn element_tag(&self) -> Option<&'static str> {
        match self {
            AssetKind::Script => Some("script"),
            AssetKind::Stylesheet => Some("link"),
            AssetKind::Image => Some("img"),
            AssetKind::ResponsiveImage => Some("picture"),
            AssetKind::Unsupported(_) => None,
        }
    }
}

impl From<String> for AssetKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "script" | "js" => AssetKind::Script,
            "stylesheet" | "link" | "css" => AssetKind::Stylesheet,
            "image" | "img" => AssetKind::Image,
            "responsive-image" | "picture" => AssetKind::ResponsiveImage,
            _ => AssetKind::Unsupported(name),
        }
    }
}

impl From<&str> for AssetKind {
    fn from(name: &str) -> Self {
        AssetKind::from(name.to_string())
    }
}

impl From<AssetKind> for String {
    fn from(kind: AssetKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `<source>` entry of a responsive image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveSource {
    pub srcset: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
}

impl ResponsiveSource {
    pub fn new(srcset: impl Into<String>) -> Self {
        Self {
            srcset: srcset.into(),
            mime_type: None,
            media: None,
            sizes: None,
        }
    }

    pub fn with_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }
}

/// Declaration of a single asset as written by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDecl {
    #[serde(alias = "type")]
    pub kind: AssetKind,

    #[serde(alias = "src")]
    pub source: String,

    /// Ids of assets or groups that must load first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// Groups this asset counts towards
    #[serde(default, alias = "groups", skip_serializing_if = "Vec::is_empty")]
    pub member_of_groups: Vec<String>,

    /// Attributes applied to the created element
    #[serde(default, alias = "options", skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ResponsiveSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
}

impl AssetDecl {
    pub fn new(kind: impl Into<AssetKind>, source: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            source: source.into(),
            requires: Vec::new(),
            member_of_groups: Vec::new(),
            attributes: IndexMap::new(),
            sources: Vec::new(),
            srcset: None,
        }
    }

    pub fn script(source: impl Into<String>) -> Self {
        Self::new(AssetKind::Script, source)
    }

    pub fn stylesheet(source: impl Into<String>) -> Self {
        Self::new(AssetKind::Stylesheet, source)
    }

    pub fn image(source: impl Into<String>) -> Self {
        Self::new(AssetKind::Image, source)
    }

    pub fn responsive_image(source: impl Into<String>) -> Self {
        Self::new(AssetKind::ResponsiveImage, source)
    }

    /// Add a requirement on an asset or group id
    pub fn requires(mut self, id: impl Into<String>) -> Self {
        self.requires.push(id.into());
        self
    }

    /// Declare membership of a group
    pub fn member_of(mut self, group: impl Into<String>) -> Self {
        self.member_of_groups.push(group.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn source_set(mut self, srcset: impl Into<String>) -> Self {
        self.srcset = Some(srcset.into());
        self
    }

    pub fn responsive_source(mut self, source: ResponsiveSource) -> Self {
        self.sources.push(source);
        self
    }
}

/// Ordered map of asset id to declaration
///
/// Declaration order is preserved; it decides the order in which
/// requirement-free assets are dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    assets: IndexMap<String, AssetDecl>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a declaration, builder style
    pub fn with(mut self, id: impl Into<String>, decl: AssetDecl) -> Self {
        self.insert(id, decl);
        self
    }

    /// Add (or replace) a declaration
    pub fn insert(&mut self, id: impl Into<String>, decl: AssetDecl) -> Option<AssetDecl> {
        self.assets.insert(id.into(), decl)
    }

    pub fn get(&self, id: &str) -> Option<&AssetDecl> {
        self.assets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AssetDecl)> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Parse a manifest from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, LoaderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoaderError::ManifestNotFound(path.to_string_lossy().to_string()).into());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        Self::from_json_str(&text)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }
}
