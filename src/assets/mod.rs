// Asset dependency loading
//
// Turns a declarative manifest into a dependency graph and drives loading in
// prerequisite order through an external media starter.
//
// ## Architecture
//
// - `manifest`: Input declarations and their JSON form
// - `registry`: Per-invocation working copy of assets and groups
// - `graph`: Wires requirements into notification edges, finds the ready set
// - `orchestrator`: Dispatches ready assets and propagates completions
// - `events`: `loaded` / `error` / `complete` listeners
// - `starter`: The media starter seam
//
// ## Usage Example
//
// ```rust
// use dependency_loader::{AssetDecl, DependencyLoader, Manifest, QueuedStarter};
//
// let manifest = Manifest::new()
//     .with("jquery", AssetDecl::script("/js/jquery.js"))
//     .with("app", AssetDecl::script("/js/app.js").requires("jquery"));
//
// let mut loader = DependencyLoader::new(&manifest, QueuedStarter::new());
// loader.listen("complete", |_| println!("all assets loaded"));
// loader.start()?;
//
// // Later, when the host sees the element's load event:
// loader.on_completed("jquery")?;
// ```

mod config;
mod events;
mod graph;
mod handle;
mod manifest;
mod orchestrator;
mod registry;
mod starter;
mod state;

pub use config::LoaderConfig;
pub use events::{EventBus, EventKind, LoaderEvent};
pub use graph::{build_graph, detect_cycles};
pub use handle::NodeRef;
pub use manifest::{AssetDecl, AssetKind, Manifest, ResponsiveSource};
pub use orchestrator::{DependencyLoader, LoadProgress};
pub use registry::{AssetRecord, AssetRegistry, GroupRecord};
pub use starter::{MediaStarter, QueuedStarter};
pub use state::{AssetState, GroupState};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("No asset can start: every asset requires something")]
    NoEntryPoint,

    #[error("Group '{group}' has no members but is required by: {}", dependents.join(", "))]
    EmptyGroup {
        group: String,
        dependents: Vec<String>,
    },

    #[error("Dependency cycle between: {}", assets.join(", "))]
    Cycle { assets: Vec<String> },

    #[error("Loading already started")]
    AlreadyStarted,

    #[error("Loading has not started")]
    NotStarted,

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Unexpected callback for asset '{id}' in state {state}")]
    UnexpectedCallback { id: String, state: AssetState },

    #[error("Manifest not found: {0}")]
    ManifestNotFound(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),
}
