//! SinkDispatcher - routes flattened batches to the selected sink

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, error, info, instrument, warn};

use contracts::{DataPoint, DataSink, Direction, SinkConfig, SinkSelection};

use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::sinks::{ConsoleSink, FileTableSink, TimeSeriesSink};

pub const CONSOLE_SINK_NAME: &str = "console";
pub const FILE_TABLE_SINK_NAME: &str = "file-table";
pub const TIME_SERIES_SINK_NAME: &str = "time-series";

/// Shared, swappable sink selection
///
/// The dispatcher reads it on every dispatch, so changing it takes effect
/// for the next batch.
#[derive(Debug, Clone)]
pub struct SelectionHandle(Arc<ArcSwap<SinkSelection>>);

impl SelectionHandle {
    pub fn new(selection: SinkSelection) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(selection)))
    }

    /// Current selection
    pub fn current(&self) -> Arc<SinkSelection> {
        self.0.load_full()
    }

    /// Replace the selection
    pub fn set(&self, selection: SinkSelection) {
        info!(selection = %selection, "Sink selection changed");
        self.0.store(Arc::new(selection));
    }
}

impl Default for SelectionHandle {
    fn default() -> Self {
        Self::new(SinkSelection::Console)
    }
}

/// Builder for creating a SinkDispatcher
pub struct DispatcherBuilder {
    selection: SelectionHandle,
    console: Option<ConsoleSink>,
    file_table: Option<FileTableSink>,
    time_series: Option<TimeSeriesSink>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(selection: SelectionHandle) -> Self {
        Self {
            selection,
            console: None,
            file_table: None,
            time_series: None,
        }
    }

    /// Use a specific console sink (defaults to stdout)
    pub fn console(mut self, sink: ConsoleSink) -> Self {
        self.console = Some(sink);
        self
    }

    pub fn file_table(mut self, sink: FileTableSink) -> Self {
        self.file_table = Some(sink);
        self
    }

    pub fn time_series(mut self, sink: TimeSeriesSink) -> Self {
        self.time_series = Some(sink);
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> SinkDispatcher {
        SinkDispatcher {
            selection: self.selection,
            console: self
                .console
                .unwrap_or_else(|| ConsoleSink::new(CONSOLE_SINK_NAME)),
            file_table: self.file_table,
            time_series: self.time_series,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }
}

/// Forwards batches to the sink named by the current selection
///
/// Dispatch never fails: a sink that cannot be reached is logged and the
/// batch goes to the console instead.
pub struct SinkDispatcher {
    selection: SelectionHandle,
    console: ConsoleSink,
    file_table: Option<FileTableSink>,
    time_series: Option<TimeSeriesSink>,
    metrics: Arc<DispatchMetrics>,
}

impl SinkDispatcher {
    /// Build a dispatcher with every sink configured from `config`
    #[instrument(name = "dispatcher_from_config", skip(config), fields(selection = %config.selection))]
    pub fn from_config(config: &SinkConfig) -> Result<Self, DispatcherError> {
        let time_series = TimeSeriesSink::new(TIME_SERIES_SINK_NAME, config.time_series.clone())
            .map_err(|e| DispatcherError::sink_creation(TIME_SERIES_SINK_NAME, e.to_string()))?;
        let file_table = FileTableSink::new(FILE_TABLE_SINK_NAME, config.file_table.clone());

        if !config.selection.is_known() {
            warn!(selection = %config.selection, "Unknown sink selection, points will be printed");
        }

        Ok(DispatcherBuilder::new(SelectionHandle::new(config.selection.clone()))
            .file_table(file_table)
            .time_series(time_series)
            .build())
    }

    /// Handle to read or change the active selection
    pub fn selection(&self) -> &SelectionHandle {
        &self.selection
    }

    /// Shared metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Write a batch through the active sink
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, points),
        fields(points = points.len())
    )]
    pub async fn dispatch(&self, points: &[DataPoint], scope: &str, direction: Direction) {
        self.metrics.inc_batch_count();
        let selection = self.selection.current();

        match selection.as_ref() {
            SinkSelection::Console => self.write_console(points, scope, direction).await,
            SinkSelection::FileTable => match &self.file_table {
                Some(sink) => self.write_or_fallback(sink, points, scope, direction).await,
                None => self.missing_sink(FILE_TABLE_SINK_NAME, points, scope, direction).await,
            },
            SinkSelection::TimeSeries => match &self.time_series {
                Some(sink) => self.write_or_fallback(sink, points, scope, direction).await,
                None => self.missing_sink(TIME_SERIES_SINK_NAME, points, scope, direction).await,
            },
            SinkSelection::Unknown(name) => {
                warn!(selection = %name, scope, %direction, "Unknown sink selection");
                self.write_console(points, scope, direction).await;
                self.console
                    .print_line(&format!("[{direction}] Unknown datasink '{name}', printing:"));
                self.console.print_points(points);
            }
        }
    }

    async fn write_console(&self, points: &[DataPoint], scope: &str, direction: Direction) {
        // Console writes cannot fail
        if let Ok(report) = self.console.write(points, scope, direction).await {
            self.metrics.record_report(&report);
            observability::record_sink_write(self.console.name(), true);
        }
    }

    async fn write_or_fallback<S: DataSink + Sync>(
        &self,
        sink: &S,
        points: &[DataPoint],
        scope: &str,
        direction: Direction,
    ) {
        match sink.write(points, scope, direction).await {
            Ok(report) => {
                self.metrics.record_report(&report);
                observability::record_sink_write(sink.name(), true);
                observability::record_points_skipped(sink.name(), report.skipped);
                debug!(
                    sink = %sink.name(),
                    scope,
                    %direction,
                    written = report.written,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Batch dispatched"
                );
            }
            Err(e) => {
                error!(
                    sink = %sink.name(),
                    scope,
                    %direction,
                    error = %e,
                    "Sink unavailable, falling back to console"
                );
                self.metrics.inc_fallback_count();
                observability::record_sink_write(sink.name(), false);
                observability::record_sink_fallback(sink.name());
                self.write_console(points, scope, direction).await;
            }
        }
    }

    async fn missing_sink(
        &self,
        sink_name: &str,
        points: &[DataPoint],
        scope: &str,
        direction: Direction,
    ) {
        warn!(sink = sink_name, "Selected sink is not configured, falling back to console");
        self.metrics.inc_fallback_count();
        observability::record_sink_fallback(sink_name);
        self.write_console(points, scope, direction).await;
    }
}
