use super::connection_store::ConnectionStore;
use super::state::{Address, ConnectionState};
use crate::bridge::Client;
use std::fmt::{self, Display};
use std::sync::Arc;
use tokio::sync::watch;

/// Raised when connection state is requested outside an active scope.
/// This is an integration mistake, not something to recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    NoActiveContext,
}

impl Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::NoActiveContext => write!(f, "no active connection context"),
        }
    }
}

impl std::error::Error for GridError {}

/// The scope a store is visible in.
///
/// Built once per session (or per test) and handed down by reference to
/// whatever renders or acts on the connection. Cloning is cheap: clones share
/// the same store.
#[derive(Clone, Default)]
pub struct GridContext {
    store: Option<Arc<ConnectionStore>>,
}

/// What a consumer sees: read access plus the two setters.
#[derive(Clone)]
pub struct GridHandle {
    store: Arc<ConnectionStore>,
}

impl GridContext {
    pub fn new(store: ConnectionStore) -> Self {
        Self {
            store: Some(Arc::new(store)),
        }
    }

    /// A scope with no store in it. Any accessor call fails.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Resolve the store of this scope. Fails if there is none or it has
    /// been closed.
    pub fn use_grid(&self) -> Result<GridHandle, GridError> {
        match &self.store {
            Some(store) if store.is_open() => Ok(GridHandle {
                store: store.clone(),
            }),
            _ => Err(GridError::NoActiveContext),
        }
    }

    /// Like [`use_grid`](Self::use_grid) but panics, for call sites where a
    /// missing scope can only be a wiring bug.
    pub fn grid(&self) -> GridHandle {
        match self.use_grid() {
            Ok(handle) => handle,
            Err(e) => panic!("{}", e),
        }
    }

    /// End the scope: closes the store so every handle stops writing.
    pub fn close(&self) {
        if let Some(store) = &self.store {
            store.close();
        }
    }
}

impl GridHandle {
    pub fn state(&self) -> ConnectionState {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.store.subscribe()
    }

    pub fn set_selected_address(&self, address: Option<Address>) {
        self.store.set_selected_address(address);
    }

    pub fn set_searching(&self, searching: bool) {
        self.store.set_searching(searching);
    }

    pub fn client(&self) -> Option<Client> {
        self.store.client()
    }

    pub async fn wait_initialized(&self) {
        self.store.wait_initialized().await;
    }
}
