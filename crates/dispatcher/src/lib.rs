//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 把扁平化后的 `DataPoint` 批次写入当前选中的 sink
//! - sink 不可用时回退到控制台，不影响被拦截的调用
//! - 运行时切换 sink 选择

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;

pub use contracts::{DataSink, SinkSelection};
pub use dispatcher::{
    DispatcherBuilder, SelectionHandle, SinkDispatcher, CONSOLE_SINK_NAME, FILE_TABLE_SINK_NAME,
    TIME_SERIES_SINK_NAME,
};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use sinks::{ConsoleBuffer, ConsoleSink, FileTableSink, TimeSeriesSink};
