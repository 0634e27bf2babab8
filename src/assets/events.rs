// Loader lifecycle events and their listeners

use super::registry::AssetRecord;
use log::{trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The fixed event vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An asset finished loading
    Loaded,
    /// The media starter reported a failure for an asset
    Error,
    /// Every declared asset has loaded
    Complete,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Loaded, EventKind::Error, EventKind::Complete];

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Loaded => "loaded",
            EventKind::Error => "error",
            EventKind::Complete => "complete",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| name.to_string())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event payload handed to listeners
#[derive(Debug, Clone, Copy)]
pub enum LoaderEvent<'a> {
    Loaded(&'a AssetRecord),
    Error(&'a AssetRecord),
    Complete,
}

impl<'a> LoaderEvent<'a> {
    pub fn kind(&self) -> EventKind {
        match self {
            LoaderEvent::Loaded(_) => EventKind::Loaded,
            LoaderEvent::Error(_) => EventKind::Error,
            LoaderEvent::Complete => EventKind::Complete,
        }
    }

    /// The asset the event is about, if any
    pub fn asset(&self) -> Option<&'a AssetRecord> {
        match *self {
            LoaderEvent::Loaded(asset) | LoaderEvent::Error(asset) => Some(asset),
            LoaderEvent::Complete => None,
        }
    }
}

type Listener = Box<dyn FnMut(&LoaderEvent<'_>)>;

/// Listener registry for one loader
///
/// Listeners run in registration order. There is no replay: a listener added
/// after loading started only sees later events.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener by event name
    ///
    /// Unknown names are logged and ignored. Returns whether the listener
    /// was registered.
    pub fn listen<F>(&mut self, name: &str, callback: F) -> bool
    where
        F: FnMut(&LoaderEvent<'_>) + 'static,
    {
        match name.parse::<EventKind>() {
            Ok(kind) => {
                self.on(kind, callback);
                true
            }
            Err(name) => {
                warn!("Event '{}' not supported by the dependency loader", name);
                false
            }
        }
    }

    /// Register a listener for a known event kind
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&LoaderEvent<'_>) + 'static,
    {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Invoke every listener for the event's kind
    pub fn fire(&mut self, event: &LoaderEvent<'_>) {
        let Some(listeners) = self.listeners.get_mut(&event.kind()) else {
            return;
        };

        trace!("Firing '{}' to {} listener(s)", event.kind(), listeners.len());
        for listener in listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            map.entry(&kind.name(), &self.listener_count(kind));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_names() {
        assert_eq!("loaded".parse::<EventKind>(), Ok(EventKind::Loaded));
        assert_eq!("error".parse::<EventKind>(), Ok(EventKind::Error));
        assert_eq!("complete".parse::<EventKind>(), Ok(EventKind::Complete));
        assert_eq!("progress".parse::<EventKind>(), Err("progress".to_string()));
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let mut bus = EventBus::new();
        assert!(!bus.listen("progress", |_| {}));
        assert!(bus.listen("complete", |_| {}));
        assert_eq!(bus.listener_count(EventKind::Complete), 1);
    }

    #[test]
    fn test_fire_without_listeners_is_noop() {
        let mut bus = EventBus::new();
        bus.fire(&LoaderEvent::Complete);
        assert_eq!(bus.listener_count(EventKind::Loaded), 0);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for n in 0..3 {
            let calls = Rc::clone(&calls);
            bus.on(EventKind::Complete, move |_| calls.borrow_mut().push(n));
        }

        bus.fire(&LoaderEvent::Complete);
        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_only_matching_kind_is_invoked() {
        let fired = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        let counter = Rc::clone(&fired);
        bus.on(EventKind::Error, move |_| *counter.borrow_mut() += 1);

        bus.fire(&LoaderEvent::Complete);
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn test_complete_has_no_asset() {
        assert!(LoaderEvent::Complete.asset().is_none());
        assert_eq!(LoaderEvent::Complete.kind(), EventKind::Complete);
    }
}
