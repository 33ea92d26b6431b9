//! Sink implementations
//!
//! Contains ConsoleSink, FileTableSink, and TimeSeriesSink.

mod console;
pub mod line_protocol;
mod table;
mod time_series;

pub use self::console::{ConsoleBuffer, ConsoleSink};
pub use self::table::{build_row, FileTableSink, TAG_COLUMN_PREFIX};
pub use self::time_series::TimeSeriesSink;
