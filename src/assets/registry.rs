// Working set of asset and group records for one load invocation

use super::manifest::{AssetDecl, AssetKind, Manifest};
use super::state::{AssetState, GroupState};
use indexmap::IndexMap;

/// An asset declaration plus the bookkeeping the loader attaches to it
#[derive(Debug, Clone)]
pub struct AssetRecord {
    id: String,
    decl: AssetDecl,

    /// Assets waiting on this one
    pub(crate) notify_on_load: Vec<String>,

    /// Requirements already met, one entry per satisfied `requires` slot
    pub(crate) satisfied_requirements: Vec<String>,

    pub(crate) state: AssetState,
}

impl AssetRecord {
    fn new(id: String, decl: AssetDecl) -> Self {
        Self {
            id,
            decl,
            notify_on_load: Vec::new(),
            satisfied_requirements: Vec::new(),
            state: AssetState::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &AssetKind {
        &self.decl.kind
    }

    pub fn source(&self) -> &str {
        &self.decl.source
    }

    /// The full declaration, including kind-specific fields
    pub fn decl(&self) -> &AssetDecl {
        &self.decl
    }

    pub fn requires(&self) -> &[String] {
        &self.decl.requires
    }

    pub fn member_of_groups(&self) -> &[String] {
        &self.decl.member_of_groups
    }

    pub fn notify_on_load(&self) -> &[String] {
        &self.notify_on_load
    }

    pub fn satisfied_requirements(&self) -> &[String] {
        &self.satisfied_requirements
    }

    pub fn state(&self) -> AssetState {
        self.state
    }

    /// Check if every requirement has been met
    pub fn requirements_met(&self) -> bool {
        self.satisfied_requirements.len() == self.decl.requires.len()
    }
}

/// A group, created implicitly the first time any asset names it
#[derive(Debug, Clone)]
pub struct GroupRecord {
    id: String,
    pub(crate) members: Vec<String>,
    pub(crate) notify_on_load: Vec<String>,
    pub(crate) satisfied_members: Vec<String>,
    pub(crate) state: GroupState,
}

impl GroupRecord {
    fn new(id: String) -> Self {
        Self {
            id,
            members: Vec::new(),
            notify_on_load: Vec::new(),
            satisfied_members: Vec::new(),
            state: GroupState::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn notify_on_load(&self) -> &[String] {
        &self.notify_on_load
    }

    pub fn satisfied_members(&self) -> &[String] {
        &self.satisfied_members
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Check if every member has loaded. Always false for an empty group.
    pub fn all_members_loaded(&self) -> bool {
        !self.members.is_empty() && self.satisfied_members.len() == self.members.len()
    }
}

/// Per-invocation registry of assets and groups
///
/// Built from a deep copy of the manifest, so the caller's declarations are
/// never touched and no two loaders share records.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: IndexMap<String, AssetRecord>,
    groups: IndexMap<String, GroupRecord>,
}

impl AssetRegistry {
    /// Copy the manifest into fresh records. Groups start empty.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let assets = manifest
            .iter()
            .map(|(id, decl)| (id.clone(), AssetRecord::new(id.clone(), decl.clone())))
            .collect();

        Self {
            assets,
            groups: IndexMap::new(),
        }
    }

    /// Get an asset by id
    pub fn get(&self, id: &str) -> Option<&AssetRecord> {
        self.assets.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut AssetRecord> {
        self.assets.get_mut(id)
    }

    /// Get a group by id
    pub fn group(&self, id: &str) -> Option<&GroupRecord> {
        self.groups.get(id)
    }

    pub(crate) fn group_mut(&mut self, id: &str) -> Option<&mut GroupRecord> {
        self.groups.get_mut(id)
    }

    /// Get a group, creating an empty one if nobody named it yet
    pub(crate) fn ensure_group(&mut self, id: &str) -> &mut GroupRecord {
        self.groups
            .entry(id.to_string())
            .or_insert_with(|| GroupRecord::new(id.to_string()))
    }

    pub fn contains_asset(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    pub fn contains_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Assets in declaration order
    pub fn assets(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.values()
    }

    /// Groups in creation order
    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups.values()
    }

    /// Asset ids in declaration order
    pub fn asset_ids(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
