//! Nested, weighted progress tracking with cooperative cancellation.
//!
//! A [`Progress`] node divides its work into steps. Each step may hand a
//! [`Progress::child`] node to a callee, which divides that step further.
//! Percentages reported by a child are scaled into the parent's current step
//! and travel up to the root, which is the only node that emits
//! [`RepoEvent::Percentage`].
//!
//! ```
//! use repomd_events::Progress;
//!
//! let mut progress = Progress::detached();
//! progress.set_number_steps(2).unwrap();
//! {
//!     let mut child = progress.child();
//!     child.set_number_steps(4).unwrap();
//!     child.done().unwrap();
//!     assert_eq!(child.percentage(), 25);
//! }
//! assert_eq!(progress.percentage(), 12);
//! progress.done().unwrap();
//! progress.done().unwrap();
//! assert_eq!(progress.percentage(), 100);
//! ```

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use miette::Diagnostic;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{EventSinkHandle, NullSink, OperationId, RepoEvent};

static NEXT_OP_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a process-unique operation id.
pub fn next_op_id() -> OperationId {
    NEXT_OP_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Number of steps is already set to {0}")]
    #[diagnostic(
        code(repomd_events::steps_already_set),
        help("Call reset() before dividing the same node again")
    )]
    StepsAlreadySet(usize),

    #[error("Progress node has no steps")]
    #[diagnostic(code(repomd_events::no_steps))]
    NoSteps,

    #[error("All {0} steps are already complete")]
    #[diagnostic(code(repomd_events::already_complete))]
    AlreadyComplete(usize),

    #[error("Step weights must add up to 100, got {0}")]
    #[diagnostic(code(repomd_events::invalid_weights))]
    InvalidWeights(u32),

    #[error("Operation was cancelled")]
    #[diagnostic(code(repomd_events::cancelled))]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ProgressError>;

/// Cooperative cancellation flag shared by every node of a progress tree.
#[derive(Debug, Clone, Default)]
pub struct Cancellable(Arc<AtomicBool>);

impl Cancellable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

trait ChildListener {
    fn child_progress(&mut self, percentage: u32);
}

/// One node of a progress tree.
///
/// The lifetime ties a child to the parent it reports into; root nodes are
/// `Progress<'static>`.
pub struct Progress<'p> {
    op_id: OperationId,
    sink: EventSinkHandle,
    cancel: Cancellable,
    // Cumulative percentage reached at the end of each step.
    bounds: Vec<u32>,
    current: usize,
    percentage: u32,
    parent: Option<&'p mut dyn ChildListener>,
}

impl Progress<'static> {
    /// Creates a root node reporting into `sink`.
    pub fn new(sink: EventSinkHandle) -> Self {
        Self::with_cancellable(sink, Cancellable::new())
    }

    /// Creates a root node observing an existing cancellation flag.
    pub fn with_cancellable(sink: EventSinkHandle, cancel: Cancellable) -> Self {
        Self {
            op_id: next_op_id(),
            sink,
            cancel,
            bounds: Vec::new(),
            current: 0,
            percentage: 0,
            parent: None,
        }
    }

    /// Creates a root node whose events are discarded.
    pub fn detached() -> Self {
        Self::new(Arc::new(NullSink))
    }
}

impl<'p> Progress<'p> {
    pub fn op_id(&self) -> OperationId {
        self.op_id
    }

    pub fn cancellable(&self) -> &Cancellable {
        &self.cancel
    }

    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    pub fn steps(&self) -> usize {
        self.bounds.len()
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        !self.bounds.is_empty() && self.current == self.bounds.len()
    }

    /// Forwards an event to the tree's sink.
    pub fn emit(&self, event: RepoEvent) {
        self.sink.emit(event);
    }

    /// Returns [`ProgressError::Cancelled`] once the shared flag is raised.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ProgressError::Cancelled);
        }
        Ok(())
    }

    /// Creates a node covering the current step of `self`.
    ///
    /// The parent stays mutably borrowed until the child is dropped, so the
    /// parent can only advance with [`Progress::done`] after the child's work
    /// has finished.
    pub fn child(&mut self) -> Progress<'_> {
        let op_id = self.op_id;
        let sink = self.sink.clone();
        let cancel = self.cancel.clone();
        Progress {
            op_id,
            sink,
            cancel,
            bounds: Vec::new(),
            current: 0,
            percentage: 0,
            parent: Some(self as &mut dyn ChildListener),
        }
    }

    /// Divides this node into `steps` equally weighted steps.
    pub fn set_number_steps(&mut self, steps: usize) -> Result<()> {
        if !self.bounds.is_empty() {
            return Err(ProgressError::StepsAlreadySet(self.bounds.len()));
        }
        if steps == 0 {
            return Err(ProgressError::NoSteps);
        }

        let total = steps as u64;
        self.bounds = (1..=total).map(|i| (i * 100 / total) as u32).collect();
        self.current = 0;
        Ok(())
    }

    /// Divides this node into weighted steps; the weights must add up to 100.
    pub fn set_steps(&mut self, weights: &[u32]) -> Result<()> {
        if !self.bounds.is_empty() {
            return Err(ProgressError::StepsAlreadySet(self.bounds.len()));
        }
        if weights.is_empty() {
            return Err(ProgressError::NoSteps);
        }

        let total: u32 = weights.iter().sum();
        if total != 100 {
            return Err(ProgressError::InvalidWeights(total));
        }

        self.bounds = weights
            .iter()
            .scan(0, |acc, weight| {
                *acc += weight;
                Some(*acc)
            })
            .collect();
        self.current = 0;
        Ok(())
    }

    /// Marks the current step as finished.
    pub fn done(&mut self) -> Result<()> {
        self.check_cancelled()?;

        if self.bounds.is_empty() {
            return Err(ProgressError::NoSteps);
        }
        if self.current >= self.bounds.len() {
            return Err(ProgressError::AlreadyComplete(self.bounds.len()));
        }

        self.current += 1;
        self.set_percentage(self.bounds[self.current - 1]);
        Ok(())
    }

    /// Jumps straight to 100%, skipping any remaining steps.
    pub fn finish(&mut self) {
        if self.bounds.is_empty() {
            self.bounds.push(100);
        }
        self.current = self.bounds.len();
        self.set_percentage(100);
    }

    /// Clears steps and percentage so the node can be divided again.
    pub fn reset(&mut self) {
        self.bounds.clear();
        self.current = 0;
        self.percentage = 0;
    }

    fn set_percentage(&mut self, percentage: u32) {
        let percentage = percentage.min(100);
        if percentage < self.percentage {
            warn!(
                "percentage should not go down from {} to {}",
                self.percentage, percentage
            );
            return;
        }
        if percentage == self.percentage {
            return;
        }
        self.percentage = percentage;

        match self.parent.as_deref_mut() {
            Some(parent) => parent.child_progress(percentage),
            None => {
                self.sink.emit(RepoEvent::Percentage {
                    op_id: self.op_id,
                    percentage,
                })
            }
        }
    }
}

impl ChildListener for Progress<'_> {
    fn child_progress(&mut self, percentage: u32) {
        if self.current >= self.bounds.len() {
            trace!("ignoring child progress on a node without a pending step");
            return;
        }

        if self.bounds.len() == 1 {
            self.set_percentage(percentage);
            return;
        }

        if self.parent.is_none() {
            self.sink.emit(RepoEvent::SubPercentage {
                op_id: self.op_id,
                percentage,
            });
        }

        let offset = match self.current {
            0 => 0,
            n => self.bounds[n - 1],
        };
        let range = self.bounds[self.current] - offset;
        self.set_percentage(offset + percentage * range / 100);
    }
}
