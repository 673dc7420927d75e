use grid_core::bridge::{BridgeError, MemoryBridge, ProviderEvent, ProviderEventKind};
use grid_core::{Client, ConnectionState, ConnectionStore, GridContext};
use std::sync::atomic::Ordering;
use std::sync::Arc;

mod common;
use common::gated_bridge::GatedBridge;
use common::{addr, init_test_logging};

#[tokio::test]
async fn close_before_initial_query_resolves_writes_nothing() {
    init_test_logging();

    let bridge = Arc::new(GatedBridge::new(4201, vec![addr(1)], vec![addr(2)]));
    let client: Client = bridge.clone();
    let store = ConnectionStore::open(Some(client));
    let mut state_rx = store.subscribe();

    // ── Let the initialisation task reach the (closed) gate ──────────────
    while bridge.queries_started.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    // ── Act ─ unmount, then let the provider answer ──────────────────────
    store.close();
    bridge.release();
    store.wait_initialized().await;

    // ── Assert ─ nothing was published after close ───────────────────────
    assert_eq!(store.state(), ConnectionState::default());
    assert!(
        !state_rx.has_changed().expect("store still owns the sender"),
        "no state change may be published after close"
    );
}

#[tokio::test]
async fn close_deregisters_every_handler() {
    init_test_logging();

    let bridge = Arc::new(MemoryBridge::new(1, vec![addr(1)], vec![addr(2)]));
    let client: Client = bridge.clone();
    let store = ConnectionStore::open(Some(client));
    store.wait_initialized().await;

    for kind in ProviderEventKind::ALL {
        assert_eq!(bridge.listener_count(kind), 1, "{kind} should be subscribed");
    }

    store.close();

    for kind in ProviderEventKind::ALL {
        assert_eq!(bridge.listener_count(kind), 0, "{kind} should be removed");
    }
}

#[tokio::test]
async fn emission_after_close_mutates_nothing() {
    init_test_logging();

    let bridge = Arc::new(MemoryBridge::new(1, vec![addr(1)], vec![addr(2)]));
    let client: Client = bridge.clone();
    let store = ConnectionStore::open(Some(client));
    store.wait_initialized().await;
    let before = store.state();

    store.close();
    bridge.emit(ProviderEvent::AccountsChanged(Vec::new()));
    bridge.emit(ProviderEvent::ChainChanged(99));

    assert_eq!(store.state(), before);
}

#[tokio::test]
async fn late_handler_call_is_refused_by_the_store() {
    init_test_logging();

    // A misbehaving provider that keeps calling handlers after removal.
    let bridge = Arc::new(GatedBridge::new(1, vec![addr(1)], vec![addr(2)]));
    bridge.ignore_removals();
    bridge.release();
    let client: Client = bridge.clone();
    let store = ConnectionStore::open(Some(client));
    store.wait_initialized().await;
    let mut state_rx = store.subscribe();

    store.close();
    assert_eq!(bridge.listener_count(ProviderEventKind::ChainChanged), 1);
    bridge.emit(ProviderEvent::ContextAccountsChanged(Vec::new()));
    bridge.emit(ProviderEvent::ChainChanged(7));

    assert!(store.state().connected);
    assert_eq!(store.state().chain_id, 1);
    assert!(!state_rx.has_changed().expect("store still owns the sender"));
}

#[tokio::test]
async fn failing_chain_id_query_is_absorbed() {
    init_test_logging();

    let bridge = Arc::new(MemoryBridge::new(1, vec![addr(1)], vec![addr(2)]));
    bridge.fail_chain_id(Some(BridgeError::Rpc {
        code: -32603,
        message: "internal error".into(),
    }));
    let client: Client = bridge.clone();
    let store = ConnectionStore::open(Some(client));
    store.wait_initialized().await;

    // The chain id failed first, so nothing after it was queried.
    assert_eq!(store.state(), ConnectionState::default());

    // Events still flow once the provider recovers.
    bridge.emit(ProviderEvent::ChainChanged(42));
    assert_eq!(store.state().chain_id, 42);
}

#[tokio::test]
async fn failing_account_query_keeps_chain_id() {
    init_test_logging();

    let bridge = Arc::new(MemoryBridge::new(42, vec![addr(1)], vec![addr(2)]));
    bridge.fail_addresses(Some(BridgeError::Rejected("locked".into())));
    let client: Client = bridge.clone();
    let store = ConnectionStore::open(Some(client));
    store.wait_initialized().await;

    let state = store.state();
    assert_eq!(state.chain_id, 42);
    assert!(state.accounts.is_empty());
    assert!(state.context_accounts.is_empty());
    assert!(!state.connected);
}

#[tokio::test]
async fn scope_accessor_fails_without_store_and_after_close() {
    init_test_logging();

    let detached = GridContext::detached();
    for _ in 0..3 {
        let err = detached.use_grid().err().expect("detached scope must fail");
        assert_eq!(err.to_string(), "no active connection context");
    }

    let bridge = Arc::new(MemoryBridge::new(1, vec![addr(1)], vec![addr(2)]));
    let client: Client = bridge.clone();
    let context = GridContext::new(ConnectionStore::open(Some(client)));
    let grid = context.grid();
    grid.wait_initialized().await;
    assert!(grid.state().connected);
    assert!(grid.client().is_some());

    context.close();
    assert!(context.use_grid().is_err());
    assert_eq!(bridge.listener_count(ProviderEventKind::AccountsChanged), 0);
}
