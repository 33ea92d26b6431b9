//! In-memory directory for tests and dry runs

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::transport::{DirectoryEntry, Transport};
use crate::RegistryError;

/// Handle returned by [`MockTransport::open`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConnection {
    pub id: u64,
    pub address: String,
}

#[derive(Debug, Default)]
struct MockState {
    entries: Mutex<Vec<DirectoryEntry>>,
    reachable: Mutex<HashSet<String>>,
    fetch_failure: Mutex<Option<String>>,
    opened: Mutex<Vec<String>>,
    next_id: AtomicU64,
    fetches: AtomicUsize,
    closed: AtomicUsize,
}

/// Directory and endpoints living in memory
///
/// Only addresses marked reachable can be opened. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory at `address` listing `entries`; every listed address is reachable
    pub fn with_directory<I>(address: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = DirectoryEntry>,
    {
        let transport = Self::new();
        transport.add_reachable(address);
        transport.set_entries(entries);
        transport
    }

    /// Replace the directory listing
    pub fn set_entries<I>(&self, entries: I)
    where
        I: IntoIterator<Item = DirectoryEntry>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        for entry in &entries {
            self.add_reachable(&entry.address);
        }
        *lock(&self.state.entries) = entries;
    }

    pub fn add_reachable(&self, address: &str) {
        lock(&self.state.reachable).insert(address.to_string());
    }

    pub fn remove_reachable(&self, address: &str) {
        lock(&self.state.reachable).remove(address);
    }

    /// Make every following `FetchServers` fail (or succeed again with `None`)
    pub fn set_fetch_failure(&self, message: Option<&str>) {
        *lock(&self.state.fetch_failure) = message.map(str::to_string);
    }

    /// Addresses opened so far, in order
    pub fn opened(&self) -> Vec<String> {
        lock(&self.state.opened).clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }

    pub fn closed_count(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Transport for MockTransport {
    type Connection = MockConnection;

    async fn open(&self, address: &str) -> Result<MockConnection, RegistryError> {
        if !lock(&self.state.reachable).contains(address) {
            return Err(RegistryError::connection(address, "connection refused"));
        }
        lock(&self.state.opened).push(address.to_string());
        Ok(MockConnection {
            id: self.state.next_id.fetch_add(1, Ordering::SeqCst),
            address: address.to_string(),
        })
    }

    async fn fetch_servers(
        &self,
        _connection: &MockConnection,
    ) -> Result<Vec<DirectoryEntry>, RegistryError> {
        self.state.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = lock(&self.state.fetch_failure).clone() {
            return Err(RegistryError::fetch(message));
        }
        Ok(lock(&self.state.entries).clone())
    }

    async fn close(&self, _connection: MockConnection) {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
    }
}
