//! Progress notifications.
//!
//! Every operation takes a `&mut dyn Listener` and reports what it does as a
//! sequence of [`Event`]s, in the order things happen. Nothing here is global:
//! a caller that does not care passes [`NullListener`].

use crate::model::ComponentKind;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    List,
    Export,
    Import,
    Remove,
    Init,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::List => "list",
            OperationKind::Export => "export",
            OperationKind::Import => "import",
            OperationKind::Remove => "remove",
            OperationKind::Init => "init",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started {
        operation: OperationKind,
        container: PathBuf,
    },
    Opened {
        writable: bool,
    },
    /// A read-path item left out; the operation continues.
    Skipped {
        item: String,
        reason: String,
    },
    Exported {
        name: String,
        path: PathBuf,
    },
    Added {
        name: String,
        kind: ComponentKind,
    },
    Updated {
        name: String,
    },
    /// A document module written into the live module `target`.
    Bound {
        name: String,
        target: String,
    },
    Removed {
        name: String,
    },
    Saved {
        path: PathBuf,
        upgraded: bool,
    },
    Failed {
        message: String,
    },
    Finished {
        operation: OperationKind,
        success: bool,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Started {
                operation,
                container,
            } => write!(f, "Starting {} on {}", operation, container.display()),
            Event::Opened { writable: true } => f.write_str("Opened project (writable)"),
            Event::Opened { writable: false } => f.write_str("Opened project (read-only)"),
            Event::Skipped { item, reason } => write!(f, "Skipped {}: {}", item, reason),
            Event::Exported { name, path } => write!(f, "Exported {} -> {}", name, path.display()),
            Event::Added { name, kind } => write!(f, "Added {}({})", name, kind.label()),
            Event::Updated { name } => write!(f, "Updated {}", name),
            Event::Bound { name, target } => write!(f, "Bound {} -> {}", name, target),
            Event::Removed { name } => write!(f, "Removed {}", name),
            Event::Saved {
                path,
                upgraded: true,
            } => write!(f, "Saved as macro-enabled {}", path.display()),
            Event::Saved {
                path,
                upgraded: false,
            } => write!(f, "Saved {}", path.display()),
            Event::Failed { message } => write!(f, "Failed: {}", message),
            Event::Finished {
                operation,
                success: true,
            } => write!(f, "Finished {}", operation),
            Event::Finished {
                operation,
                success: false,
            } => write!(f, "Aborted {}", operation),
        }
    }
}

pub trait Listener {
    fn on_event(&mut self, event: Event);
}

#[derive(Debug, Default)]
pub struct NullListener;

impl Listener for NullListener {
    fn on_event(&mut self, _event: Event) {}
}

/// Keeps every event, for tests and for callers that render afterwards.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Listener for Recorder {
    fn on_event(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Forwards events to another thread. A dropped receiver is not an error: the
/// operation keeps running and the events are lost.
pub struct ChannelListener {
    sender: Sender<Event>,
}

impl ChannelListener {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

impl Listener for ChannelListener {
    fn on_event(&mut self, event: Event) {
        if self.sender.send(event).is_err() {
            log::debug!("event receiver dropped");
        }
    }
}
