// The seam between the loader and whatever actually fetches resources

use super::registry::AssetRecord;
use std::collections::VecDeque;

/// Begins acquisition of an asset whose requirements are all met
///
/// For every asset it is given, the host must later report exactly one of
/// `DependencyLoader::on_completed` or `DependencyLoader::on_failed` for that
/// id. The loader never calls `start_loading` twice for the same asset and
/// never calls it for unsupported kinds.
pub trait MediaStarter {
    fn start_loading(&mut self, asset: &AssetRecord);
}

impl<F> MediaStarter for F
where
    F: FnMut(&AssetRecord),
{
    fn start_loading(&mut self, asset: &AssetRecord) {
        self(asset)
    }
}

/// A starter that only records what it was asked to load
///
/// Hosts that fetch asynchronously drain the queue, start the real work and
/// report back through the loader when each resource settles.
#[derive(Debug, Default)]
pub struct QueuedStarter {
    queue: VecDeque<String>,
    started: Vec<String>,
}

impl QueuedStarter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest dispatched asset id
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Take every queued asset id, oldest first
    pub fn drain(&mut self) -> Vec<String> {
        self.queue.drain(..).collect()
    }

    /// Queued ids not yet taken
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Every id ever dispatched, in dispatch order
    pub fn started(&self) -> &[String] {
        &self.started
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl MediaStarter for QueuedStarter {
    fn start_loading(&mut self, asset: &AssetRecord) {
        self.queue.push_back(asset.id().to_string());
        self.started.push(asset.id().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::{AssetDecl, Manifest};
    use crate::assets::registry::AssetRegistry;

    fn registry() -> AssetRegistry {
        AssetRegistry::from_manifest(
            &Manifest::new()
                .with("a", AssetDecl::script("/a.js"))
                .with("b", AssetDecl::image("/b.png")),
        )
    }

    #[test]
    fn test_queue_is_fifo() {
        let registry = registry();
        let mut starter = QueuedStarter::new();

        starter.start_loading(registry.get("a").unwrap());
        starter.start_loading(registry.get("b").unwrap());

        assert_eq!(starter.pending().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(starter.pop().as_deref(), Some("a"));
        assert_eq!(starter.drain(), vec!["b"]);
        assert!(starter.is_empty());
        assert_eq!(starter.started(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_closure_starter() {
        let registry = registry();
        let mut seen = Vec::new();
        {
            let mut starter = |asset: &AssetRecord| seen.push(asset.source().to_string());
            starter.start_loading(registry.get("b").unwrap());
        }
        assert_eq!(seen, vec!["/b.png"]);
    }
}
