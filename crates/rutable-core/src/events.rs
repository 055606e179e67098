//! Lifecycle events and the synchronous event bus.
//!
//! Listeners run in registration order before `emit` returns.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::row::RowId;
use crate::sort::Direction;

/// Events emitted by the data table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum Event {
    #[serde(rename = "init")]
    Init,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "page")]
    Page { page: usize },
    #[serde(rename = "search")]
    Search { query: String, matches: Vec<RowId> },
    #[serde(rename = "rows.render")]
    RowsRender { page: usize },
    #[serde(rename = "rows.add")]
    RowsAdd { rows: Vec<RowId> },
    #[serde(rename = "rows.remove")]
    RowsRemove { rows: Vec<RowId> },
    #[serde(rename = "columns.sort")]
    ColumnsSort {
        column: usize,
        direction: Direction,
        previous: Option<usize>,
    },
    #[serde(rename = "columns.order")]
    ColumnsOrder { order: Vec<usize> },
    #[serde(rename = "columns.hide")]
    ColumnsHide { columns: Vec<usize> },
    #[serde(rename = "columns.show")]
    ColumnsShow { columns: Vec<usize> },
    #[serde(rename = "columns.add")]
    ColumnsAdd { column: usize },
    #[serde(rename = "columns.remove")]
    ColumnsRemove { columns: Vec<usize> },
    #[serde(rename = "import")]
    Import { rows: usize },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Init => EventKind::Init,
            Event::Update => EventKind::Update,
            Event::Page { .. } => EventKind::Page,
            Event::Search { .. } => EventKind::Search,
            Event::RowsRender { .. } => EventKind::RowsRender,
            Event::RowsAdd { .. } => EventKind::RowsAdd,
            Event::RowsRemove { .. } => EventKind::RowsRemove,
            Event::ColumnsSort { .. } => EventKind::ColumnsSort,
            Event::ColumnsOrder { .. } => EventKind::ColumnsOrder,
            Event::ColumnsHide { .. } => EventKind::ColumnsHide,
            Event::ColumnsShow { .. } => EventKind::ColumnsShow,
            Event::ColumnsAdd { .. } => EventKind::ColumnsAdd,
            Event::ColumnsRemove { .. } => EventKind::ColumnsRemove,
            Event::Import { .. } => EventKind::Import,
        }
    }
}

/// Event names listeners subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Init,
    Update,
    Page,
    Search,
    RowsRender,
    RowsAdd,
    RowsRemove,
    ColumnsSort,
    ColumnsOrder,
    ColumnsHide,
    ColumnsShow,
    ColumnsAdd,
    ColumnsRemove,
    Import,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::Init,
        EventKind::Update,
        EventKind::Page,
        EventKind::Search,
        EventKind::RowsRender,
        EventKind::RowsAdd,
        EventKind::RowsRemove,
        EventKind::ColumnsSort,
        EventKind::ColumnsOrder,
        EventKind::ColumnsHide,
        EventKind::ColumnsShow,
        EventKind::ColumnsAdd,
        EventKind::ColumnsRemove,
        EventKind::Import,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Update => "update",
            EventKind::Page => "page",
            EventKind::Search => "search",
            EventKind::RowsRender => "rows.render",
            EventKind::RowsAdd => "rows.add",
            EventKind::RowsRemove => "rows.remove",
            EventKind::ColumnsSort => "columns.sort",
            EventKind::ColumnsOrder => "columns.order",
            EventKind::ColumnsHide => "columns.hide",
            EventKind::ColumnsShow => "columns.show",
            EventKind::ColumnsAdd => "columns.add",
            EventKind::ColumnsRemove => "columns.remove",
            EventKind::Import => "import",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown event: {}", s))
    }
}

/// Callback type for receiving events
pub type Listener = Box<dyn FnMut(&Event)>;

/// Handle returned by [`EventBus::subscribe`], used to remove the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Synchronous publish/subscribe keyed by event kind
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<(u64, Listener)>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (kind.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one kind of event
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&Event) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        Subscription { kind, id }
    }

    /// Remove a listener; returns `false` if it was already removed
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Some(listeners) = self.listeners.get_mut(&subscription.kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription.id);
        before != listeners.len()
    }

    /// Deliver an event to its listeners in registration order
    pub fn emit(&mut self, event: &Event) {
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_registration_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(EventKind::Page, move |event| {
                if let Event::Page { page } = event {
                    log.borrow_mut().push(format!("{}:{}", name, page));
                }
            });
        }

        bus.emit(&Event::Page { page: 3 });
        assert_eq!(*log.borrow(), vec!["first:3", "second:3"]);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let mut bus = EventBus::new();
        bus.emit(&Event::Update);
        assert_eq!(bus.listener_count(EventKind::Update), 0);
    }

    #[test]
    fn test_listeners_only_receive_their_kind() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        bus.subscribe(EventKind::Update, move |_| *c.borrow_mut() += 1);

        bus.emit(&Event::Init);
        bus.emit(&Event::Update);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = Rc::clone(&count);
        let sub = bus.subscribe(EventKind::Update, move |_| *c.borrow_mut() += 1);
        let c = Rc::clone(&count);
        bus.subscribe(EventKind::Update, move |_| *c.borrow_mut() += 10);

        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        bus.emit(&Event::Update);

        assert_eq!(*count.borrow(), 10);
        assert_eq!(bus.listener_count(EventKind::Update), 1);
    }

    #[test]
    fn test_event_kind_names() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
        assert!("rows.sort".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::ColumnsSort {
            column: 1,
            direction: Direction::Desc,
            previous: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "columns.sort");
        assert_eq!(json["direction"], "desc");
        assert_eq!(event.kind(), EventKind::ColumnsSort);
    }
}
