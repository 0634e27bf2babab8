// Load orchestration: dispatch ready assets, propagate completions

use super::config::LoaderConfig;
use super::events::{EventBus, EventKind, LoaderEvent};
use super::graph::build_graph;
use super::handle::NodeRef;
use super::manifest::Manifest;
use super::registry::{AssetRecord, AssetRegistry};
use super::starter::MediaStarter;
use super::state::{AssetState, GroupState};
use super::LoaderError;
use log::{debug, error, info, warn};
use std::collections::VecDeque;

/// Counters for one load invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    /// Assets that reported success
    pub loaded: usize,
    /// Assets dispatched so far
    pub to_load: usize,
    /// Assets in the manifest
    pub declared: usize,
}

impl LoadProgress {
    /// Fraction of declared assets loaded, in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        if self.declared == 0 {
            return 1.0;
        }
        self.loaded as f32 / self.declared as f32
    }
}

/// Drives one load invocation from start to `complete`
///
/// Owns its own registry, counters and listeners; nothing is shared between
/// loaders. After `start`, all progress comes from the host reporting
/// `on_completed` / `on_failed` for assets the media starter was given.
pub struct DependencyLoader<S: MediaStarter> {
    config: LoaderConfig,
    registry: AssetRegistry,
    starter: S,
    events: EventBus,

    /// Incremented once per asset handed to the starter
    to_load: usize,

    /// Incremented once per asset reported as loaded
    loaded: usize,

    started: bool,
    completed: bool,
}

impl<S: MediaStarter> DependencyLoader<S> {
    /// Create a loader over a private copy of the manifest
    pub fn new(manifest: &Manifest, starter: S) -> Self {
        Self::with_config(manifest, starter, LoaderConfig::default())
    }

    pub fn with_config(manifest: &Manifest, starter: S, config: LoaderConfig) -> Self {
        Self {
            config,
            registry: AssetRegistry::from_manifest(manifest),
            starter,
            events: EventBus::new(),
            to_load: 0,
            loaded: 0,
            started: false,
            completed: false,
        }
    }

    /// Register a listener by event name (`loaded`, `error`, `complete`)
    ///
    /// Unknown names are logged and ignored; returns whether the listener
    /// was registered.
    pub fn listen<F>(&mut self, name: &str, callback: F) -> bool
    where
        F: FnMut(&LoaderEvent<'_>) + 'static,
    {
        self.events.listen(name, callback)
    }

    /// Register a listener for a known event kind
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&LoaderEvent<'_>) + 'static,
    {
        self.events.on(kind, callback);
    }

    /// Build the dependency graph and dispatch every requirement-free asset
    ///
    /// Configuration problems (nothing can start, a required group has no
    /// members, a cycle) are returned here and nothing is dispatched.
    pub fn start(&mut self) -> Result<(), LoaderError> {
        if self.started {
            return Err(LoaderError::AlreadyStarted);
        }
        self.started = true;

        let ready = build_graph(&mut self.registry, &self.config)?;

        info!(
            "Loading {} assets, {} ready to start",
            self.registry.len(),
            ready.len()
        );

        if self.registry.is_empty() {
            self.finish_if_complete();
            return Ok(());
        }

        for id in ready {
            self.dispatch(&id);
        }

        Ok(())
    }

    /// Report that the media starter finished loading an asset
    ///
    /// Releases every dependent whose requirements are now all met, fires
    /// `loaded`, and fires `complete` once nothing dispatched is outstanding
    /// and no declared asset is still pending.
    pub fn on_completed(&mut self, id: &str) -> Result<(), LoaderError> {
        if !self.accept_callback(id)? {
            return Ok(());
        }

        if let Some(record) = self.registry.get_mut(id) {
            record.state = AssetState::Loaded;
        }
        self.loaded += 1;
        debug!("Asset '{}' loaded ({}/{})", id, self.loaded, self.to_load);

        for dependent in self.propagate(NodeRef::asset(id)) {
            self.dispatch(&dependent);
        }

        if let Some(record) = self.registry.get(id) {
            self.events.fire(&LoaderEvent::Loaded(record));
        }

        self.finish_if_complete();
        Ok(())
    }

    /// Report that the media starter failed to load an asset
    ///
    /// Fires `error`. Nothing that requires the asset, directly or through a
    /// group, will ever be dispatched, and `complete` will not fire.
    pub fn on_failed(&mut self, id: &str) -> Result<(), LoaderError> {
        if !self.accept_callback(id)? {
            return Ok(());
        }

        if let Some(record) = self.registry.get_mut(id) {
            record.state = AssetState::Failed;
            error!("Failed to load asset '{}' from {}", id, record.source());
        }

        if let Some(record) = self.registry.get(id) {
            self.events.fire(&LoaderEvent::Error(record));
        }

        Ok(())
    }

    /// Current state of an asset
    pub fn asset_state(&self, id: &str) -> Option<AssetState> {
        self.registry.get(id).map(AssetRecord::state)
    }

    /// Current state of a group
    pub fn group_state(&self, id: &str) -> Option<GroupState> {
        self.registry.group(id).map(|group| group.state())
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            loaded: self.loaded,
            to_load: self.to_load,
            declared: self.registry.len(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Check if `complete` has fired
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn starter(&self) -> &S {
        &self.starter
    }

    pub fn starter_mut(&mut self) -> &mut S {
        &mut self.starter
    }

    /// Hand an asset to the media starter. Unsupported kinds are counted but
    /// never started, so they hold back `complete`.
    fn dispatch(&mut self, id: &str) {
        let Some(record) = self.registry.get_mut(id) else {
            return;
        };
        if record.state != AssetState::Pending {
            return;
        }

        record.state = AssetState::Ready;
        self.to_load += 1;

        if record.kind().is_supported() {
            debug!("Starting {} '{}' from {}", record.kind(), id, record.source());
            self.starter.start_loading(record);
        } else {
            warn!(
                "Asset '{}' has unsupported kind '{}', it will not be loaded",
                id,
                record.kind()
            );
        }
    }

    /// Record a node's completion on everything waiting for it
    ///
    /// Assets notify their dependents and their groups; a group whose last
    /// member just loaded is then propagated the same way. Groups never touch
    /// the counters. Returns the assets whose requirements are now all met,
    /// in notification order.
    fn propagate(&mut self, origin: NodeRef) -> Vec<String> {
        let mut ready = Vec::new();
        let mut queue = VecDeque::from([origin]);

        while let Some(node) = queue.pop_front() {
            let (dependents, groups) = match &node {
                NodeRef::Asset(id) => match self.registry.get(id) {
                    Some(record) => (
                        record.notify_on_load().to_vec(),
                        record.member_of_groups().to_vec(),
                    ),
                    None => continue,
                },
                NodeRef::Group(id) => match self.registry.group(id) {
                    Some(group) => (group.notify_on_load().to_vec(), Vec::new()),
                    None => continue,
                },
            };

            for dependent in dependents {
                let Some(record) = self.registry.get_mut(&dependent) else {
                    continue;
                };
                record.satisfied_requirements.push(node.id().to_string());
                if record.state == AssetState::Pending && record.requirements_met() {
                    ready.push(dependent);
                }
            }

            for group_id in groups {
                let Some(group) = self.registry.group_mut(&group_id) else {
                    continue;
                };
                group.satisfied_members.push(node.id().to_string());
                if group.state == GroupState::Pending && group.all_members_loaded() {
                    group.state = GroupState::Satisfied;
                    debug!("Group '{}' satisfied", group_id);
                    queue.push_back(NodeRef::Group(group_id));
                }
            }
        }

        ready
    }

    /// Fire `complete` once nothing dispatched is outstanding and no
    /// declared asset is still waiting on its requirements.
    fn finish_if_complete(&mut self) {
        if self.completed || self.loaded != self.to_load {
            return;
        }
        if self
            .registry
            .assets()
            .any(|asset| asset.state() == AssetState::Pending)
        {
            return;
        }

        self.completed = true;
        info!("All {} assets loaded", self.loaded);
        self.events.fire(&LoaderEvent::Complete);
    }

    /// Validate a starter callback. Under strict callbacks violations are
    /// errors; otherwise they are logged and the callback is dropped.
    fn accept_callback(&self, id: &str) -> Result<bool, LoaderError> {
        let violation = if !self.started {
            LoaderError::NotStarted
        } else {
            match self.registry.get(id).map(AssetRecord::state) {
                None => LoaderError::UnknownAsset(id.to_string()),
                Some(state) if state.awaits_callback() => return Ok(true),
                Some(state) => LoaderError::UnexpectedCallback {
                    id: id.to_string(),
                    state,
                },
            }
        };

        if self.config.strict_callbacks {
            return Err(violation);
        }

        warn!("Ignoring media starter callback: {}", violation);
        Ok(false)
    }
}

impl<S: MediaStarter + std::fmt::Debug> std::fmt::Debug for DependencyLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyLoader")
            .field("config", &self.config)
            .field("progress", &self.progress())
            .field("started", &self.started)
            .field("completed", &self.completed)
            .field("starter", &self.starter)
            .field("events", &self.events)
            .finish()
    }
}
