use std::{
    collections::HashMap,
    sync::{mpsc::Receiver, Arc, LazyLock},
    time::Duration,
};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use nu_ansi_term::Color::{Cyan, Red};
use repomd_events::{ChecksumStage, OperationId, RepoEvent};
use tracing::debug;

use crate::utils::progress_enabled;

/// Shared MultiProgress instance for suspend/stop from other modules.
static MULTI: LazyLock<Arc<MultiProgress>> = LazyLock::new(|| Arc::new(MultiProgress::new()));

/// Pause progress display, run the closure, then resume.
pub fn suspend<F: FnOnce()>(f: F) {
    MULTI.suspend(f);
}

/// Handle returned by [`spawn_event_handler`] that owns the background progress thread.
///
/// The event sink (which holds the channel sender) must be dropped before
/// calling [`finish`](ProgressGuard::finish), otherwise the thread keeps waiting.
pub struct ProgressGuard {
    handle: Option<std::thread::JoinHandle<()>>,
}

impl ProgressGuard {
    pub fn finish(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
        MULTI.clear().ok();
    }
}

fn query_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}  {wide_bar:.cyan/dim}  {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─")
}

fn create_query_job() -> ProgressBar {
    let pb = if progress_enabled() {
        MULTI.add(ProgressBar::new(100))
    } else {
        MULTI.add(ProgressBar::hidden())
    };
    pb.set_style(query_style());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spawn a background thread that maps [`RepoEvent`]s to indicatif progress bars.
///
/// Each root operation gets one bar, cleared once it reaches 100%.
pub fn spawn_event_handler(receiver: Receiver<RepoEvent>) -> ProgressGuard {
    let handle = std::thread::spawn(move || {
        let mut jobs: HashMap<OperationId, ProgressBar> = HashMap::new();

        while let Ok(event) = receiver.recv() {
            match event {
                RepoEvent::Loading {
                    op_id,
                    md_id,
                    kind,
                } => {
                    let pb = jobs.entry(op_id).or_insert_with(create_query_job);
                    pb.set_message(format!("Loading {} {kind}", Cyan.paint(md_id)));
                }
                RepoEvent::Checksum {
                    op_id,
                    md_id,
                    stage,
                } => {
                    let pb = jobs.entry(op_id).or_insert_with(create_query_job);
                    match stage {
                        ChecksumStage::Verifying => {
                            pb.set_message(format!("Verifying {}", Cyan.paint(md_id)));
                        }
                        ChecksumStage::Failed {
                            ..
                        } => {
                            pb.set_message(format!("{} {md_id}", Red.paint("Checksum failed")));
                        }
                        ChecksumStage::Skipped | ChecksumStage::Passed => {}
                    }
                }
                RepoEvent::Loaded {
                    op_id,
                    md_id,
                    kind,
                    records,
                } => {
                    debug!("loaded {records} records from {kind} metadata of {md_id}");
                    if let Some(pb) = jobs.get(&op_id) {
                        pb.set_message(format!("Querying {}", Cyan.paint(md_id)));
                    }
                }
                RepoEvent::Percentage {
                    op_id,
                    percentage,
                } => {
                    let pb = jobs.entry(op_id).or_insert_with(create_query_job);
                    pb.set_position(u64::from(percentage));
                    if percentage >= 100 {
                        pb.finish_and_clear();
                        jobs.remove(&op_id);
                    }
                }
                RepoEvent::SubPercentage {
                    ..
                } => {}
            }
        }

        for (_, pb) in jobs.drain() {
            pb.finish_and_clear();
        }
    });

    ProgressGuard {
        handle: Some(handle),
    }
}
