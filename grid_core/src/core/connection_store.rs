use crate::bridge::{BridgeError, Client, ListenerId, ProviderEvent, ProviderEventKind};
use crate::core::state::{Address, ConnectionState};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The single write path into the state.
///
/// Cloned into the initialisation task and into every event handler. Each
/// write re-checks liveness under the watch channel's lock and edits the
/// value that is stored *now*, so a handler can never compute `connected`
/// from a list it captured earlier, and nothing lands after `close()`.
#[derive(Clone)]
struct StateWriter {
    state: Arc<watch::Sender<ConnectionState>>,
    alive: Arc<AtomicBool>,
}

impl StateWriter {
    /// Apply `update` if the store is still open. `update` returns whether it
    /// changed anything; subscribers are only notified when it did.
    fn apply(&self, what: &str, update: impl FnOnce(&mut ConnectionState) -> bool) -> bool {
        let alive = &self.alive;
        let mut dropped = false;
        let changed = self.state.send_if_modified(|state| {
            if !alive.load(Ordering::SeqCst) {
                dropped = true;
                return false;
            }
            update(state)
        });
        if dropped {
            debug!("Store closed, discarding {}", what);
        }
        changed
    }

    fn handle_event(&self, event: &ProviderEvent) {
        debug!("Provider event: {:?}", event);
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                let accounts = accounts.clone();
                self.apply("accountsChanged", move |state| {
                    state.replace_accounts(accounts);
                    true
                });
            }
            ProviderEvent::ContextAccountsChanged(accounts) => {
                let accounts = accounts.clone();
                self.apply("contextAccountsChanged", move |state| {
                    state.replace_context_accounts(accounts);
                    true
                });
            }
            ProviderEvent::ChainChanged(chain_id) => {
                let chain_id = *chain_id;
                self.apply("chainChanged", move |state| {
                    let changed = state.chain_id != chain_id;
                    state.chain_id = chain_id;
                    changed
                });
            }
        }
    }

    /// chain id → local accounts → context accounts, each published as soon
    /// as it is known.
    async fn query_identity(&self, bridge: &Client) -> Result<(), BridgeError> {
        let chain_id = bridge.get_chain_id().await?;
        debug!("Initial chain id: {}", chain_id);
        self.apply("initial chain id", |state| {
            let changed = state.chain_id != chain_id;
            state.chain_id = chain_id;
            changed
        });

        let accounts = bridge.get_addresses().await?;
        debug!("Initial accounts: {:?}", accounts);
        self.apply("initial accounts", |state| {
            state.replace_accounts(accounts);
            true
        });

        let context_accounts = bridge.context_accounts();
        debug!("Initial context accounts: {:?}", context_accounts);
        self.apply("initial context accounts", |state| {
            state.replace_context_accounts(context_accounts);
            true
        });
        Ok(())
    }
}

/// Owns the connection state and the subscription to the provider.
///
/// `open` registers the event handlers and starts initialisation in a tokio
/// task; `close` (also run on drop) deregisters them and stops any further
/// write, including ones from an initialisation still in flight.
///
/// Without a provider the store stays at the default state for its whole
/// life: chain id `0`, no accounts, not connected.
pub struct ConnectionStore {
    bridge: Option<Client>,
    writer: StateWriter,
    listeners: Mutex<Vec<(ProviderEventKind, ListenerId)>>,
    init_task: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConnectionStore {
    /// Open a store over `bridge`.
    ///
    /// Must be called from within a tokio runtime when a bridge is given,
    /// since initialisation is spawned onto it.
    pub fn open(bridge: Option<Client>) -> Self {
        let (state, _) = watch::channel(ConnectionState::default());
        let writer = StateWriter {
            state: Arc::new(state),
            alive: Arc::new(AtomicBool::new(true)),
        };

        let Some(provider) = bridge.clone() else {
            info!("No provider available; connection store stays uninitialised.");
            return Self {
                bridge,
                writer,
                listeners: Mutex::new(Vec::new()),
                init_task: Mutex::new(None),
            };
        };

        let listeners = ProviderEventKind::ALL
            .iter()
            .map(|&kind| {
                let handler_writer = writer.clone();
                let id = provider.on(
                    kind,
                    Arc::new(move |event: &ProviderEvent| handler_writer.handle_event(event)),
                );
                (kind, id)
            })
            .collect();

        let init_writer = writer.clone();
        let init_task = tokio::spawn(async move {
            info!("Connection store initialisation started.");
            match init_writer.query_identity(&provider).await {
                Ok(()) => info!("Connection store initialisation finished."),
                Err(e) => error!("Failed to initialise connection state: {}", e),
            }
        });

        Self {
            bridge,
            writer,
            listeners: Mutex::new(listeners),
            init_task: Mutex::new(Some(init_task)),
        }
    }

    /// Wait for the initial queries to finish. Returns immediately when there
    /// is no provider or the task was already awaited.
    pub async fn wait_initialized(&self) {
        let task = lock(&self.init_task).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Initialisation task ended abnormally: {}", e);
            }
        }
    }

    /// Deregister all handlers and refuse further writes. Idempotent.
    pub fn close(&self) {
        let alive = &self.writer.alive;
        let mut was_open = false;
        // Flip the flag under the state lock so no write can straddle it.
        self.writer.state.send_if_modified(|_| {
            was_open = alive.swap(false, Ordering::SeqCst);
            false
        });

        let listeners = std::mem::take(&mut *lock(&self.listeners));
        if let Some(bridge) = &self.bridge {
            for (kind, id) in listeners {
                debug!("Removing {} listener {:?}", kind, id);
                bridge.remove_listener(kind, id);
            }
        }
        if was_open {
            info!("Connection store closed.");
        }
    }

    pub fn is_open(&self) -> bool {
        self.writer.alive.load(Ordering::SeqCst)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.writer.state.borrow().clone()
    }

    /// A receiver that wakes on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.writer.state.subscribe()
    }

    /// Override the target address; `None` falls back to the first context
    /// account. Not validated.
    pub fn set_selected_address(&self, address: Option<Address>) {
        self.writer.apply("selected address", |state| {
            let changed = state.selected_address != address;
            state.selected_address = address;
            changed
        });
    }

    pub fn set_searching(&self, searching: bool) {
        self.writer.apply("searching flag", |state| {
            let changed = state.searching != searching;
            state.searching = searching;
            changed
        });
    }

    /// The provider's request-submission handle, if there is a provider.
    pub fn client(&self) -> Option<Client> {
        self.bridge.clone()
    }
}

impl Drop for ConnectionStore {
    fn drop(&mut self) {
        self.close();
    }
}
