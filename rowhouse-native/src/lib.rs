#![doc = include_str!("../README.md")]

mod constants;
mod errors;
mod io;
pub mod native;
mod options;

pub use constants::MAX_PRECISION;
pub use errors::*;
pub use io::*;
/// Represents the column types Rowhouse supports natively.
pub use native::types::*;
/// The native value union used for heterogeneous batch ingestion.
pub use native::values::*;
/// Per-column data stores and their factory.
pub use native::columns::*;
pub use options::{CompressionMethod, ConnectionOptions};

// External libraries
mod reexports {
    pub use chrono_tz::Tz;
    pub use {bytes, chrono, tracing};
}
/// Re-exports
///
/// Exporting different external modules used by the library.
pub use reexports::*;
