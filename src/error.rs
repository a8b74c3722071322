use thiserror::Error;

/// A slot allocation request the allocator could not satisfy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("allocation of {slots} slots failed")]
pub struct AllocError {
    pub slots: usize,
}

/// Failures reported by ring buffer operations. None of them mutate the buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("buffer is full ({capacity} slots)")]
    Full { capacity: usize },

    #[error("resize to {requested} slots would truncate {len} live elements")]
    WouldTruncate { len: usize, requested: usize },

    #[error("resize failed: {0}")]
    Alloc(#[from] AllocError),

    #[error("no buffer")]
    Absent,
}

/// A malformed line in an operation script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown operation '{op}'")]
    UnknownOp { line: usize, op: String },

    #[error("line {line}: '{op}' needs an argument")]
    MissingArg { line: usize, op: String },

    #[error("line {line}: '{op}' takes no argument")]
    UnexpectedArg { line: usize, op: String },

    #[error("line {line}: bad argument '{arg}' for '{op}'")]
    BadArg { line: usize, op: String, arg: String },
}
