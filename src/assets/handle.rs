// Node references shared by the graph builder and the orchestrator

use std::fmt;

/// A node of the dependency graph: either a declared asset or a group
///
/// Completion propagation runs over this one type so that assets and groups
/// release their dependents through the same code path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Asset(String),
    Group(String),
}

impl NodeRef {
    pub fn asset(id: impl Into<String>) -> Self {
        Self::Asset(id.into())
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::Group(id.into())
    }

    /// The id as written in the manifest
    pub fn id(&self) -> &str {
        match self {
            Self::Asset(id) | Self::Group(id) => id,
        }
    }

    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(id) => write!(f, "asset '{}'", id),
            Self::Group(id) => write!(f, "group '{}'", id),
        }
    }
}
