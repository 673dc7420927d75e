use super::errors::BridgeError;
use super::provider::{
    EventHandler, ListenerId, ProviderBridge, ProviderEvent, ProviderEventKind, TransferRequest,
};
use crate::core::state::Address;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    chain_id: u64,
    addresses: Vec<Address>,
    context_accounts: Vec<Address>,

    chain_id_error: Option<BridgeError>,
    addresses_error: Option<BridgeError>,
    transfer_rejection: Option<String>,

    listeners: HashMap<ProviderEventKind, Vec<(ListenerId, EventHandler)>>,
    next_listener: u64,
    submitted: Vec<TransferRequest>,
}

/// An in-process provider.
///
/// Holds the snapshot a real wallet would report, dispatches [`emit`]ted
/// events to registered handlers in registration order and records every
/// submitted transfer. Queries can be made to fail to exercise the store's
/// error path.
///
/// [`emit`]: MemoryBridge::emit
#[derive(Default)]
pub struct MemoryBridge {
    inner: Mutex<MemoryState>,
}

impl MemoryBridge {
    pub fn new(chain_id: u64, addresses: Vec<Address>, context_accounts: Vec<Address>) -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                chain_id,
                addresses,
                context_accounts,
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `get_chain_id` fail (or succeed again with `None`).
    pub fn fail_chain_id(&self, error: Option<BridgeError>) {
        self.lock().chain_id_error = error;
    }

    /// Make `get_addresses` fail (or succeed again with `None`).
    pub fn fail_addresses(&self, error: Option<BridgeError>) {
        self.lock().addresses_error = error;
    }

    /// Reject every following transfer with `reason`.
    pub fn reject_transfers(&self, reason: Option<String>) {
        self.lock().transfer_rejection = reason;
    }

    /// Update the provider snapshot and deliver `event` to the handlers
    /// registered for its kind.
    pub fn emit(&self, event: ProviderEvent) {
        // Handlers run without the lock held so they may call back into us.
        let handlers: Vec<EventHandler> = {
            let mut state = self.lock();
            match &event {
                ProviderEvent::AccountsChanged(accounts) => state.addresses = accounts.clone(),
                ProviderEvent::ContextAccountsChanged(accounts) => {
                    state.context_accounts = accounts.clone()
                }
                ProviderEvent::ChainChanged(chain_id) => state.chain_id = *chain_id,
            }
            state
                .listeners
                .get(&event.kind())
                .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };
        debug!("emit {} to {} handler(s)", event.kind(), handlers.len());
        for handler in handlers {
            handler(&event);
        }
    }

    /// Number of handlers currently registered for `kind`.
    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.lock().listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Every transfer accepted so far, oldest first.
    pub fn submitted(&self) -> Vec<TransferRequest> {
        self.lock().submitted.clone()
    }
}

#[async_trait]
impl ProviderBridge for MemoryBridge {
    async fn get_chain_id(&self) -> Result<u64, BridgeError> {
        let state = self.lock();
        match &state.chain_id_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.chain_id),
        }
    }

    async fn get_addresses(&self) -> Result<Vec<Address>, BridgeError> {
        let state = self.lock();
        match &state.addresses_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.addresses.clone()),
        }
    }

    fn context_accounts(&self) -> Vec<Address> {
        self.lock().context_accounts.clone()
    }

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) -> ListenerId {
        let mut state = self.lock();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state.listeners.entry(kind).or_default().push((id, handler));
        id
    }

    fn remove_listener(&self, kind: ProviderEventKind, id: ListenerId) {
        if let Some(list) = self.lock().listeners.get_mut(&kind) {
            list.retain(|(listener, _)| *listener != id);
        }
    }

    async fn send_transaction(&self, request: TransferRequest) -> Result<String, BridgeError> {
        let mut state = self.lock();
        if let Some(reason) = &state.transfer_rejection {
            return Err(BridgeError::Rejected(reason.clone()));
        }
        state.submitted.push(request);
        Ok(format!("0x{:064x}", state.submitted.len()))
    }
}
