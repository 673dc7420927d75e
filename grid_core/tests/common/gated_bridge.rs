//! A **controllable stand‑in** for an injected wallet provider.
//!
//! * Identity queries (`get_chain_id`, `get_addresses`) block until the test
//!   calls [`GatedBridge::release`], so a test can close the store while
//!   initialisation is still in flight.
//! * With [`GatedBridge::ignore_removals`] the bridge keeps handlers after
//!   `remove_listener`, to prove the store itself refuses late events.
//!
//! Everything else is delegated to a `MemoryBridge`.

use async_trait::async_trait;
use grid_core::bridge::{
    BridgeError, EventHandler, ListenerId, MemoryBridge, ProviderBridge, ProviderEvent,
    ProviderEventKind, TransferRequest,
};
use grid_core::Address;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::watch;

pub struct GatedBridge {
    inner: MemoryBridge,
    gate: watch::Sender<bool>,
    ignore_removals: AtomicBool,
    /// Identity queries that reached the gate.
    pub queries_started: AtomicUsize,
}

impl GatedBridge {
    /// A closed gate over the given snapshot.
    pub fn new(chain_id: u64, addresses: Vec<Address>, context_accounts: Vec<Address>) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            inner: MemoryBridge::new(chain_id, addresses, context_accounts),
            gate,
            ignore_removals: AtomicBool::new(false),
            queries_started: AtomicUsize::new(0),
        }
    }

    /// Let every pending and future identity query through.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    pub fn ignore_removals(&self) {
        self.ignore_removals.store(true, Ordering::SeqCst);
    }

    pub fn emit(&self, event: ProviderEvent) {
        self.inner.emit(event);
    }

    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.inner.listener_count(kind)
    }

    async fn wait_for_gate(&self) {
        self.queries_started.fetch_add(1, Ordering::SeqCst);
        let mut open = self.gate.subscribe();
        while !*open.borrow_and_update() {
            if open.changed().await.is_err() {
                return;
            }
        }
    }
}

#[async_trait]
impl ProviderBridge for GatedBridge {
    async fn get_chain_id(&self) -> Result<u64, BridgeError> {
        self.wait_for_gate().await;
        self.inner.get_chain_id().await
    }

    async fn get_addresses(&self) -> Result<Vec<Address>, BridgeError> {
        self.wait_for_gate().await;
        self.inner.get_addresses().await
    }

    fn context_accounts(&self) -> Vec<Address> {
        self.inner.context_accounts()
    }

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) -> ListenerId {
        self.inner.on(kind, handler)
    }

    fn remove_listener(&self, kind: ProviderEventKind, id: ListenerId) {
        if !self.ignore_removals.load(Ordering::SeqCst) {
            self.inner.remove_listener(kind, id);
        }
    }

    async fn send_transaction(&self, request: TransferRequest) -> Result<String, BridgeError> {
        self.inner.send_transaction(request).await
    }
}
