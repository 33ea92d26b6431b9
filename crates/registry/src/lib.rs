//! # Registry
//!
//! Service registry backed by a directory service.
//!
//! - `connect`: load the directory's server list
//! - `lookup_and_connect`: resolve one server by name and open a connection
//!   to it, wrapped in a caller-supplied stub
//! - `Transport`: gRPC (tonic) in production, in-memory for tests

pub mod error;
pub mod grpc;
pub mod mock;
pub mod registry;
pub mod transport;

pub use error::RegistryError;
pub use grpc::{GrpcTransport, ManagerClient};
pub use mock::{MockConnection, MockTransport};
pub use registry::{Resolved, ServerMap, ServiceRegistry};
pub use transport::{DirectoryEntry, Transport};

/// Registry speaking gRPC to the directory
pub type GrpcRegistry = ServiceRegistry<GrpcTransport>;
