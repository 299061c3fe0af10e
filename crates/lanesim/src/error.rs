use thiserror::Error;

/// Every fatal condition the core can raise.
///
/// None of these are retried internally: lane data is either fully
/// written or the kernel that would have written it was never launched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error(
        "tensor from backend '{found}' combined with one from backend '{expected}' in the same operation"
    )]
    BackendMismatch { expected: String, found: String },

    #[error("batch size mismatch: expected {expected} lanes, found {found}")]
    BatchSizeMismatch { expected: usize, found: usize },

    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    #[error("signal '{signal}' is driven by more than one gate (first: '{first_gate}', second: '{second_gate}')")]
    DuplicateDriver {
        signal: String,
        first_gate: String,
        second_gate: String,
    },

    #[error("combinational cycle detected, involving signal '{signal}'")]
    CombinationalCycle { signal: String },

    #[error("fault campaign capacity exceeded: batch size {batch_size} allows at most {max} faults (lane 0 is reserved)")]
    CapacityExceeded { batch_size: usize, max: usize },

    #[error("invalid stuck-at value {0}, expected 0 or 1")]
    InvalidStuckValue(u32),

    #[error("scan pattern shape mismatch: expected {expected_rows} rows x {expected_cols} cols, found {found_rows} x {found_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
}
