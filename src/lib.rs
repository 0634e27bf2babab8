// Dependency-ordered asset loading
//
// Assets declared in a manifest (scripts, stylesheets, images, responsive
// images) start loading only after everything they require has loaded.
// Actual fetching is delegated to a `MediaStarter`; the host reports each
// outcome back and the loader releases dependents and fires events.

pub mod assets;

pub use assets::{
    AssetDecl, AssetKind, AssetRecord, AssetRegistry, AssetState, DependencyLoader, EventBus,
    EventKind, GroupRecord, GroupState, LoadProgress, LoaderConfig, LoaderError, LoaderEvent,
    Manifest, MediaStarter, NodeRef, QueuedStarter, ResponsiveSource,
};
