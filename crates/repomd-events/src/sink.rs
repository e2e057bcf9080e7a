use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex,
};

use crate::RepoEvent;

/// Trait for consuming events.
///
/// Frontends provide their own implementation.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RepoEvent);
}

/// Channel-based event sink.
///
/// The receiver end can be drained by any consumer, e.g. a progress renderer
/// running on another thread.
pub struct ChannelSink {
    sender: Sender<RepoEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<RepoEvent>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender,
            },
            receiver,
        )
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: RepoEvent) {
        let _ = self.sender.send(event);
    }
}

/// No-op event sink.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: RepoEvent) {}
}

/// Collector sink that stores all events for inspection.
#[derive(Default)]
pub struct CollectorSink {
    events: Mutex<Vec<RepoEvent>>,
}

impl CollectorSink {
    pub fn events(&self) -> Vec<RepoEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overall percentages emitted so far, in order.
    pub fn percentages(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| {
                match event {
                    RepoEvent::Percentage {
                        percentage, ..
                    } => Some(percentage),
                    _ => None,
                }
            })
            .collect()
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: RepoEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
