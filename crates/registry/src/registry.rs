//! ServiceRegistry - directory discovery and endpoint connection

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use contracts::{ServerDescriptor, ServerName};

use crate::transport::{DirectoryEntry, Transport};
use crate::RegistryError;

/// Known servers, keyed by validated name
pub type ServerMap = BTreeMap<ServerName, ServerDescriptor>;

struct DirectoryState<C> {
    address: String,
    connection: C,
    servers: ServerMap,
}

/// Outcome of [`ServiceRegistry::resolve_and_connect`]
#[derive(Debug)]
pub struct Resolved<C, S> {
    /// Entry from the listing fetched for this lookup
    pub entry: DirectoryEntry,
    pub connection: C,
    pub stub: S,
}

/// Client-side registry of the servers a directory knows about
///
/// `connect` and `refresh` only change state once every await has
/// succeeded; a failed or cancelled call leaves the registry as it was.
pub struct ServiceRegistry<T: Transport> {
    transport: T,
    state: Option<DirectoryState<T::Connection>>,
}

impl<T: Transport> ServiceRegistry<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_some()
    }

    /// Address of the connected directory
    pub fn address(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.address.as_str())
    }

    /// Servers discovered by the last `connect` or `refresh`
    pub fn servers(&self) -> impl Iterator<Item = &ServerDescriptor> {
        self.state.iter().flat_map(|s| s.servers.values())
    }

    pub fn server(&self, name: &str) -> Option<&ServerDescriptor> {
        self.state.as_ref().and_then(|s| s.servers.get(name))
    }

    /// Connect to the directory at `address` and load its server list
    ///
    /// Replaces any previous connection.
    #[instrument(name = "registry_connect", skip(self))]
    pub async fn connect(&mut self, address: &str) -> Result<(), RegistryError> {
        let connection = self.transport.open(address).await?;
        let servers = match self.fetch_known(&connection).await {
            Ok(servers) => servers,
            Err(e) => {
                self.transport.close(connection).await;
                return Err(e);
            }
        };

        info!(address, servers = servers.len(), "Connected to directory");
        let previous = self.state.replace(DirectoryState {
            address: address.to_string(),
            connection,
            servers,
        });
        if let Some(previous) = previous {
            self.transport.close(previous.connection).await;
        }
        Ok(())
    }

    /// Re-fetch the server list over the current connection
    #[instrument(name = "registry_refresh", skip(self))]
    pub async fn refresh(&mut self) -> Result<(), RegistryError> {
        let state = self.state.as_ref().ok_or(RegistryError::NotConnected)?;
        let servers = self.fetch_known(&state.connection).await?;

        if let Some(state) = self.state.as_mut() {
            debug!(servers = servers.len(), "Server list refreshed");
            state.servers = servers;
        }
        Ok(())
    }

    /// Find `name` in a fresh directory listing and connect to it
    ///
    /// Returns the new connection and the stub built on it. The caller owns
    /// both; the registry keeps no record of them.
    pub async fn lookup_and_connect<S, C>(
        &self,
        name: &str,
        stub_ctor: C,
    ) -> Result<(T::Connection, S), RegistryError>
    where
        C: FnOnce(T::Connection) -> S,
    {
        let resolved = self.resolve_and_connect(name, stub_ctor).await?;
        Ok((resolved.connection, resolved.stub))
    }

    /// Like [`lookup_and_connect`](Self::lookup_and_connect), also returning
    /// the directory entry that was dialled.
    ///
    /// The entry comes from the fresh listing, so it can differ from the
    /// cached [`server`](Self::server) record.
    #[instrument(name = "registry_lookup_and_connect", skip(self, stub_ctor))]
    pub async fn resolve_and_connect<S, C>(
        &self,
        name: &str,
        stub_ctor: C,
    ) -> Result<Resolved<T::Connection, S>, RegistryError>
    where
        C: FnOnce(T::Connection) -> S,
    {
        let state = self.state.as_ref().ok_or(RegistryError::NotConnected)?;
        let directory = state.connection.clone();

        let entries = self.fetch(&directory).await?;
        let entry = entries
            .into_iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| RegistryError::not_found(name))?;

        let connection = self.transport.open(&entry.address).await?;
        info!(name, address = %entry.address, "Connected to server");
        let stub = stub_ctor(connection.clone());
        Ok(Resolved {
            entry,
            connection,
            stub,
        })
    }

    /// Close the directory connection; does nothing when not connected
    #[instrument(name = "registry_close", skip(self))]
    pub async fn close(&mut self) {
        if let Some(state) = self.state.take() {
            self.transport.close(state.connection).await;
            info!(address = %state.address, "Directory connection closed");
        }
    }

    async fn fetch(&self, connection: &T::Connection) -> Result<Vec<DirectoryEntry>, RegistryError> {
        let result = self.transport.fetch_servers(connection).await;
        observability::record_directory_fetch(result.is_ok());
        if let Err(e) = &result {
            warn!(error = %e, "FetchServers failed");
        }
        result
    }

    async fn fetch_known(&self, connection: &T::Connection) -> Result<ServerMap, RegistryError> {
        let mut servers = ServerMap::new();
        for entry in self.fetch(connection).await? {
            let name = ServerName::new(entry.name)?;
            if servers.contains_key(&name) {
                debug!(name = %name, "Duplicate server name, keeping first entry");
                continue;
            }
            servers.insert(name.clone(), ServerDescriptor::new(name, entry.address));
        }
        Ok(servers)
    }
}
