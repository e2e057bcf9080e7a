mod event;
mod progress;
mod sink;

use std::sync::Arc;

pub use event::*;
pub use progress::*;
pub use sink::*;

/// Unique identifier for a running operation.
pub type OperationId = u64;

/// Shared handle to an event sink.
pub type EventSinkHandle = Arc<dyn EventSink>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink() {
        let sink = NullSink;
        sink.emit(RepoEvent::Percentage {
            op_id: 1,
            percentage: 10,
        });
    }

    #[test]
    fn test_channel_sink() {
        let (sink, rx) = ChannelSink::new();
        sink.emit(RepoEvent::Loading {
            op_id: 1,
            md_id: "fedora".to_string(),
            kind: "primary".to_string(),
        });
        sink.emit(RepoEvent::Checksum {
            op_id: 1,
            md_id: "fedora".to_string(),
            stage: ChecksumStage::Passed,
        });
        sink.emit(RepoEvent::Loaded {
            op_id: 1,
            md_id: "fedora".to_string(),
            kind: "primary".to_string(),
            records: 12,
        });

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], RepoEvent::Loading { .. }));
        assert!(matches!(
            &events[1],
            RepoEvent::Checksum {
                stage: ChecksumStage::Passed,
                ..
            }
        ));
        assert!(matches!(
            &events[2],
            RepoEvent::Loaded {
                records: 12,
                ..
            }
        ));
    }

    #[test]
    fn test_channel_sink_receiver_dropped() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.emit(RepoEvent::Loading {
            op_id: 2,
            md_id: "updates".to_string(),
            kind: "primary_db".to_string(),
        });
    }

    #[test]
    fn test_collector_sink() {
        let sink = CollectorSink::default();
        assert!(sink.is_empty());

        sink.emit(RepoEvent::Percentage {
            op_id: 7,
            percentage: 50,
        });
        sink.emit(RepoEvent::SubPercentage {
            op_id: 7,
            percentage: 20,
        });
        sink.emit(RepoEvent::Percentage {
            op_id: 7,
            percentage: 100,
        });

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.percentages(), vec![50, 100]);
    }

    #[test]
    fn test_event_sink_handle() {
        let collector = Arc::new(CollectorSink::default());
        let sink: EventSinkHandle = collector.clone();
        let mut progress = Progress::new(sink);
        progress.set_number_steps(1).unwrap();
        progress.done().unwrap();
        assert_eq!(collector.percentages(), vec![100]);
    }

    #[test]
    fn test_progress_tree_emits_percentages_only() {
        let collector = Arc::new(CollectorSink::default());
        let mut progress = Progress::new(collector.clone());
        progress.set_number_steps(2).unwrap();
        {
            let mut child = progress.child();
            child.set_number_steps(2).unwrap();
            child.done().unwrap();
            child.done().unwrap();
        }
        progress.done().unwrap();
        progress.done().unwrap();

        let events = collector.events();
        assert!(!events.is_empty());
        assert!(events.iter().all(|event| matches!(
            event,
            RepoEvent::Percentage { .. } | RepoEvent::SubPercentage { .. }
        )));
        assert_eq!(collector.percentages().last(), Some(&100));
    }

    #[test]
    fn test_event_sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NullSink>();
        assert_send_sync::<ChannelSink>();
        assert_send_sync::<CollectorSink>();
        assert_send_sync::<Cancellable>();
    }
}
