//! gRPC transport (tonic)
//!
//! The directory speaks the `h2pcontrol.Manager` service; its messages are
//! small enough to declare by hand with prost.

use std::time::Duration;

use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, instrument};

use contracts::DirectoryConfig;

use crate::transport::{DirectoryEntry, Transport};
use crate::RegistryError;

const FETCH_SERVERS_PATH: &str = "/h2pcontrol.Manager/FetchServers";

/// `h2pcontrol.Empty`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}

/// `h2pcontrol.Server`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerEntry {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub addr: ::prost::alloc::string::String,
}

/// `h2pcontrol.FetchServersResponse`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FetchServersResponse {
    #[prost(message, repeated, tag = "1")]
    pub servers: ::prost::alloc::vec::Vec<ServerEntry>,
}

impl From<ServerEntry> for DirectoryEntry {
    fn from(entry: ServerEntry) -> Self {
        DirectoryEntry::new(entry.name, entry.addr)
    }
}

/// Client for the directory's `Manager` service
#[derive(Debug, Clone)]
pub struct ManagerClient {
    inner: tonic::client::Grpc<Channel>,
}

impl ManagerClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn fetch_servers(
        &mut self,
        request: Empty,
    ) -> Result<FetchServersResponse, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("service was not ready: {e}")))?;
        let codec: ProstCodec<Empty, FetchServersResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static(FETCH_SERVERS_PATH);
        let response = self
            .inner
            .unary(tonic::Request::new(request), path, codec)
            .await?;
        Ok(response.into_inner())
    }
}

/// Plaintext gRPC transport
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    connect_timeout: Duration,
}

impl GrpcTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(Duration::from_millis(config.connect_timeout_ms))
    }
}

impl Default for GrpcTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

/// `host:port` to a URI tonic accepts
fn endpoint_uri(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

impl Transport for GrpcTransport {
    type Connection = Channel;

    #[instrument(name = "grpc_open", skip(self))]
    async fn open(&self, address: &str) -> Result<Channel, RegistryError> {
        let endpoint = Endpoint::from_shared(endpoint_uri(address))
            .map_err(|e| RegistryError::connection(address, e.to_string()))?
            .connect_timeout(self.connect_timeout);
        let channel = endpoint
            .connect()
            .await
            .map_err(|e| RegistryError::connection(address, e.to_string()))?;
        debug!(address, "Channel open");
        Ok(channel)
    }

    #[instrument(name = "grpc_fetch_servers", skip_all)]
    async fn fetch_servers(
        &self,
        connection: &Channel,
    ) -> Result<Vec<DirectoryEntry>, RegistryError> {
        let response = ManagerClient::new(connection.clone())
            .fetch_servers(Empty {})
            .await
            .map_err(|status| RegistryError::fetch(status.message()))?;
        Ok(response.servers.into_iter().map(Into::into).collect())
    }

    async fn close(&self, connection: Channel) {
        // Dropping the last clone shuts the channel down
        drop(connection);
    }
}
