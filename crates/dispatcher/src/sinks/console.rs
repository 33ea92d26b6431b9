//! ConsoleSink - prints every point, never fails
//!
//! Also the fallback target when another sink cannot be reached.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use contracts::{ContractError, DataPoint, DataSink, Direction, WriteReport};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
enum ConsoleTarget {
    Stdout,
    Buffer(Arc<Mutex<Vec<String>>>),
}

/// Captured console output (for tests and embedding)
#[derive(Debug, Clone, Default)]
pub struct ConsoleBuffer(Arc<Mutex<Vec<String>>>);

impl ConsoleBuffer {
    /// All lines printed so far
    pub fn lines(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Sink that prints points line by line
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    name: String,
    target: ConsoleTarget,
}

impl ConsoleSink {
    /// Create a ConsoleSink printing to stdout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: ConsoleTarget::Stdout,
        }
    }

    /// Create a ConsoleSink that records lines in memory instead of printing
    pub fn buffered(name: impl Into<String>) -> (Self, ConsoleBuffer) {
        let buffer = ConsoleBuffer::default();
        let sink = Self {
            name: name.into(),
            target: ConsoleTarget::Buffer(Arc::clone(&buffer.0)),
        };
        (sink, buffer)
    }

    /// Emit one line of output
    pub fn print_line(&self, line: &str) {
        match &self.target {
            ConsoleTarget::Stdout => {
                if let Err(e) = write_line(&mut io::stdout().lock(), line) {
                    warn!(sink = %self.name, error = %e, "Console write failed");
                }
            }
            ConsoleTarget::Buffer(lines) => lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(line.to_string()),
        }
    }

    /// Print each point verbatim, without scope/direction prefix
    pub fn print_points(&self, points: &[DataPoint]) {
        for point in points {
            self.print_line(&point.to_string());
        }
    }
}

// A closed stdout (e.g. `| head`) must not take the process down
fn write_line<W: Write>(out: &mut W, line: &str) -> io::Result<()> {
    writeln!(out, "{line}")?;
    out.flush()
}

impl DataSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "console_sink_write",
        skip(self, points),
        fields(sink = %self.name, points = points.len())
    )]
    async fn write(
        &self,
        points: &[DataPoint],
        scope: &str,
        direction: Direction,
    ) -> Result<WriteReport, ContractError> {
        for point in points {
            self.print_line(&format!("[{direction}] {scope}: {point}"));
        }
        debug!(sink = %self.name, scope, %direction, "Points printed");
        Ok(WriteReport::all_written(points.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FieldValue, Tags};

    #[tokio::test]
    async fn test_console_sink_write() {
        let (sink, buffer) = ConsoleSink::buffered("console");
        let points = vec![
            DataPoint::new(Tags::new(), "a", Some(FieldValue::Int(1))),
            DataPoint::new(Tags::new(), "b", None),
        ];

        let report = sink.write(&points, "add", Direction::In).await.unwrap();
        assert_eq!(report, WriteReport::all_written(2));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[in] add: Tags: {}, Field: a, Value: 1");
        assert_eq!(lines[1], "[in] add: Tags: {}, Field: b, Value: None");
    }

    #[tokio::test]
    async fn test_console_sink_empty_batch() {
        let (sink, buffer) = ConsoleSink::buffered("console");
        let report = sink.write(&[], "noop", Direction::Out).await.unwrap();
        assert_eq!(report.written, 0);
        assert!(buffer.lines().is_empty());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_write_line_reports_broken_pipe() {
        let err = write_line(&mut ClosedPipe, "Tags: {}, Field: a, Value: 1").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let mut out = Vec::new();
        write_line(&mut out, "a").unwrap();
        write_line(&mut out, "b").unwrap();
        assert_eq!(out, b"a\nb\n");
    }

    #[test]
    fn test_console_sink_name() {
        let sink = ConsoleSink::new("my_console");
        assert_eq!(sink.name(), "my_console");
    }
}
