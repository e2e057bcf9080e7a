use crate::OperationId;

/// All event types emitted while loading and querying repository metadata.
#[derive(Debug, Clone)]
pub enum RepoEvent {
    /// Overall percentage of a root operation changed.
    Percentage { op_id: OperationId, percentage: u32 },
    /// Percentage of the step currently running under a root operation changed.
    SubPercentage { op_id: OperationId, percentage: u32 },
    /// A metadata source started loading its backing file.
    Loading {
        op_id: OperationId,
        md_id: String,
        kind: String,
    },
    /// A metadata source finished loading.
    Loaded {
        op_id: OperationId,
        md_id: String,
        kind: String,
        records: usize,
    },
    /// Checksum verification of a metadata file.
    Checksum {
        op_id: OperationId,
        md_id: String,
        stage: ChecksumStage,
    },
}

/// Checksum verification stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumStage {
    /// No expected checksum was configured.
    Skipped,
    /// Hashing the file.
    Verifying,
    /// Checksum matched.
    Passed,
    /// Checksum did not match.
    Failed { expected: String, actual: String },
}
