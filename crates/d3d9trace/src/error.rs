use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TraceReadError>;

/// Errors produced while decoding a capture-trace file.
///
/// All variants are file-scoped: a failure decoding one trace must never
/// abort a batch pass over many traces. `TruncatedInput` and
/// `TruncatedResourceEntry` are additionally recoverable mid-table (the
/// table is treated as ending early), whereas `UnknownDrawCallKind` is fatal
/// for the rest of the draw-call table because the record's true length is
/// undefined once the discriminant is unrecognized.
#[derive(Debug, Error)]
pub enum TraceReadError {
    /// Generic I/O failure from the underlying reader.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("fewer than 88 bytes available for the trace header")]
    TruncatedHeader,

    #[error("invalid trace magic {found:#018x}")]
    InvalidMagic { found: u64 },

    #[error("declared offset {offset} is beyond the input length {len}")]
    InvalidOffset { offset: u64, len: u64 },

    #[error("truncated input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: u64 },

    #[error("truncated resource entry")]
    TruncatedResourceEntry,

    #[error("unknown draw-call kind {0}")]
    UnknownDrawCallKind(u8),
}

impl TraceReadError {
    /// True for the short-read variants that end a table scan early without
    /// failing the decode.
    pub(crate) fn is_short_read(&self) -> bool {
        matches!(
            self,
            TraceReadError::TruncatedInput { .. } | TraceReadError::TruncatedResourceEntry
        )
    }
}
