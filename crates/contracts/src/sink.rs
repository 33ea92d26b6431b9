//! DataSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, DataPoint, Direction};

/// Outcome of one batch write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Points persisted
    pub written: usize,
    /// Points the sink cannot store (absent or composite values)
    pub skipped: usize,
    /// Points whose individual write failed
    pub failed: usize,
}

impl WriteReport {
    /// Every point in the batch was written
    pub fn all_written(count: usize) -> Self {
        Self {
            written: count,
            ..Self::default()
        }
    }
}

/// Data output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(DataSink: Send)]
pub trait LocalDataSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one batch of points captured from `scope` in `direction`
    ///
    /// # Errors
    /// Returns an error only when the sink cannot be reached at all
    /// (file cannot be opened, backend unavailable). Per-point failures are
    /// reported through [`WriteReport::failed`].
    async fn write(
        &self,
        points: &[DataPoint],
        scope: &str,
        direction: Direction,
    ) -> Result<WriteReport, ContractError>;
}

/// Table / measurement name for a batch: `<scope>_<direction>`
pub fn batch_name(scope: &str, direction: Direction) -> String {
    format!("{scope}_{direction}")
}
