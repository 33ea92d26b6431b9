//! FileTableSink - appends one CSV row per batch
//!
//! Each `<scope>_<direction>` pair gets its own table file under the base
//! directory. The header row is written once, when the file is first created.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contracts::{
    batch_name, ContractError, DataPoint, DataSink, Direction, FileTableConfig, WriteReport,
};
use dashmap::DashMap;
use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

/// Column prefix for tag columns
pub const TAG_COLUMN_PREFIX: &str = "tag_";

/// Sink that appends flattened batches to CSV tables
pub struct FileTableSink {
    name: String,
    config: FileTableConfig,
    /// One lock per table file; rows from concurrent batches never interleave
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl FileTableSink {
    /// Create a new FileTableSink
    ///
    /// The base directory is created on first write.
    pub fn new(name: impl Into<String>, config: FileTableConfig) -> Self {
        Self {
            name: name.into(),
            config,
            locks: DashMap::new(),
        }
    }

    /// Path of the table file for a batch
    pub fn table_path(&self, scope: &str, direction: Direction) -> PathBuf {
        self.config
            .base_path
            .join(format!("{}.csv", batch_name(scope, direction)))
    }

    fn table_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks.entry(path.to_path_buf()).or_default().clone()
    }

    fn persist_row(&self, path: &Path, row: &IndexMap<String, String>) -> Result<bool, ContractError> {
        fs::create_dir_all(&self.config.base_path)
            .and_then(|()| append_row(path, row).map_err(std::io::Error::other))
            .map_err(|e| {
                error!(sink = %self.name, path = %path.display(), error = %e, "Table write failed");
                ContractError::sink_write(&self.name, format!("{}: {e}", path.display()))
            })
    }
}

/// Merge a batch into a single row
///
/// Tags become `tag_<name>` columns, fields become columns of their own name.
/// A repeated column keeps its first position and takes the latest value.
pub fn build_row(points: &[DataPoint]) -> IndexMap<String, String> {
    let mut row = IndexMap::new();
    for point in points {
        for (tag, value) in &point.tags {
            row.insert(format!("{TAG_COLUMN_PREFIX}{tag}"), value.clone());
        }
        let value = point
            .value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        row.insert(point.field.clone(), value);
    }
    row
}

/// Append a row, writing the header first if the file is empty.
///
/// Returns whether the header was written. The file handle is closed when
/// this function returns, on every path.
fn append_row(path: &Path, row: &IndexMap<String, String>) -> Result<bool, csv::Error> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_new = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(row.keys())?;
    }
    writer.write_record(row.values())?;
    writer.flush()?;

    Ok(is_new)
}

impl DataSink for FileTableSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_table_sink_write",
        skip(self, points),
        fields(sink = %self.name, points = points.len())
    )]
    async fn write(
        &self,
        points: &[DataPoint],
        scope: &str,
        direction: Direction,
    ) -> Result<WriteReport, ContractError> {
        if points.is_empty() {
            debug!(sink = %self.name, scope, %direction, "Empty batch, no row written");
            return Ok(WriteReport::default());
        }

        let path = self.table_path(scope, direction);
        let row = build_row(points);

        let lock = self.table_lock(&path);
        let _guard = lock.lock().await;
        let header_written = self.persist_row(&path, &row)?;

        debug!(
            sink = %self.name,
            path = %path.display(),
            columns = row.len(),
            header_written,
            "Row appended"
        );
        Ok(WriteReport::all_written(points.len()))
    }
}
