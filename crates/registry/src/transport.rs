//! Transport trait - how the registry reaches the directory and endpoints

use crate::RegistryError;

/// One raw entry of a `FetchServers` response
///
/// The name is not validated here; the registry decides what to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub address: String,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Connection transport
///
/// All implementations must implement this trait.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Open connection handle; cloning shares the underlying channel
    type Connection: Clone + Send + Sync;

    /// Open a connection to `address` (`host:port`)
    async fn open(&self, address: &str) -> Result<Self::Connection, RegistryError>;

    /// Issue `FetchServers` on a directory connection
    async fn fetch_servers(
        &self,
        connection: &Self::Connection,
    ) -> Result<Vec<DirectoryEntry>, RegistryError>;

    /// Release a connection
    async fn close(&self, connection: Self::Connection);
}
