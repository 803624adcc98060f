use std::io;

/// Alias for [`std::result::Result`] defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors the codec layer surfaces to its immediate caller.
///
/// This layer performs no retries and no silent recovery: every condition is
/// reported exactly once and the caller decides whether to abort the batch or
/// continue past the failure point. Ingestion errors carry the index of the
/// offending element; rows appended before that index remain materialized.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed or out-of-bounds type string, raised at construction time.
    #[error("malformed type descriptor: {0}")]
    TypeDescriptor(String),

    /// A text element matched none of the accepted time formats.
    #[error("cannot parse time from `{value}` at row {index}")]
    TimeParse { value: String, index: usize },

    /// A text element could not be parsed as the column's type.
    #[error("cannot parse {type_name} from `{value}` at row {index}")]
    TextParse { type_name: &'static str, value: String, index: usize },

    /// A native value of the wrong kind was supplied for batch ingestion.
    #[error("expected {expected} value, found {found} at row {index}")]
    TypeMismatch { expected: &'static str, found: &'static str, index: usize },

    /// Binary decode consumed fewer bytes than the element run requires.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// Projection requested for an index past the materialized length.
    #[error("index {index} out of range for column of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Wire or lifecycle invariant violation (oversized payload, capacity
    /// overflow, value out of the column's representable range).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Any other failure from the underlying stream.
    #[error("io error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEndOfStream,
            _ => Self::Io(err),
        }
    }
}
