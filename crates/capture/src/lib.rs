//! # Capture
//!
//! 调用拦截与消息扁平化。
//!
//! - `flatten`：嵌套消息 → 带层级标签的 `DataPoint`
//! - `CallInterceptor`：包装函数，在调用前后捕获输入/输出并分发到 sink

pub mod flatten;
pub mod interceptor;

pub use contracts::{CaptureMode, CaptureModes, Direction, Json, Message, StructuredMessage};
pub use flatten::{flatten, Flattened, Points, TAG_PRESENT};
pub use interceptor::{CallInterceptor, Instrumented};
