//! Registry error types

use contracts::ContractError;
use thiserror::Error;

/// Registry-specific errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Endpoint could not be reached
    #[error("failed to connect to '{address}': {message}")]
    Connection { address: String, message: String },

    /// Directory has no server with this name
    #[error("Server named {name} not found")]
    NotFound { name: String },

    /// Operation needs a directory connection
    #[error("not connected to a directory")]
    NotConnected,

    /// `FetchServers` call failed
    #[error("directory fetch failed: {message}")]
    Fetch { message: String },

    /// Error from contract (invalid server name)
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl RegistryError {
    pub fn connection(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            address: address.into(),
            message: message.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}
