//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `DataPoint`: one tagged leaf of a flattened message
//! - `StructuredMessage`: capability of exposing a nested key/value view
//! - `ServerDescriptor`: a named endpoint reported by the directory
//! - `ConnectorBlueprint`: configuration for the directory and sinks

mod blueprint;
mod capture;
mod error;
mod message;
mod point;
mod server;
mod sink;

pub use blueprint::*;
pub use capture::*;
pub use error::*;
pub use message::*;
pub use point::*;
pub use server::*;
pub use sink::*;
