use super::errors::BridgeError;
use crate::core::state::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;

/// The three event classes a provider emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ContextAccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    pub const ALL: [ProviderEventKind; 3] = [
        ProviderEventKind::AccountsChanged,
        ProviderEventKind::ContextAccountsChanged,
        ProviderEventKind::ChainChanged,
    ];

    /// The event name as the injected provider spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEventKind::AccountsChanged => "accountsChanged",
            ProviderEventKind::ContextAccountsChanged => "contextAccountsChanged",
            ProviderEventKind::ChainChanged => "chainChanged",
        }
    }
}

impl Display for ProviderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event pushed by the provider.
///
/// JSON form: `{ "event": "accountsChanged", "payload": ["0x…"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ContextAccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ContextAccountsChanged(_) => ProviderEventKind::ContextAccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }
}

/// Opaque token returned by [`ProviderBridge::on`], used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback registered for one event kind. Runs synchronously on the
/// emitting task.
pub type EventHandler = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// A single value transfer, `value` in the smallest subunit (18 decimals).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub account: Address,
    pub to: Address,
    pub value: u128,
}

/// The injected channel to the wallet / host page.
///
/// Implementations are supplied from outside the core: the browser provider
/// in a real page, [`MemoryBridge`](super::memory::MemoryBridge) in tests and
/// the CLI.
#[async_trait]
pub trait ProviderBridge: Send + Sync {
    async fn get_chain_id(&self) -> Result<u64, BridgeError>;
    async fn get_addresses(&self) -> Result<Vec<Address>, BridgeError>;

    /// Current counterpart accounts. Synchronous: the provider keeps this
    /// snapshot locally.
    fn context_accounts(&self) -> Vec<Address>;

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) -> ListenerId;
    fn remove_listener(&self, kind: ProviderEventKind, id: ListenerId);

    /// Submit one transfer and return its transaction hash.
    async fn send_transaction(&self, request: TransferRequest) -> Result<String, BridgeError>;
}

/// The request-submission handle the store passes through to collaborators.
pub type Client = Arc<dyn ProviderBridge>;
