use super::amount::Amount;
use crate::bridge::{BridgeError, Client, TransferRequest};
use crate::core::state::ConnectionState;
use log::{debug, info};

/// Sends one value transfer to the state's target address.
///
/// Does nothing (and returns `Ok(None)`) without a client or while not
/// connected; the UI is expected to have the submit control disabled then.
/// No retry and no wait for a receipt.
pub async fn submit_transfer(
    client: Option<&Client>,
    state: &ConnectionState,
    amount: &Amount,
) -> Result<Option<String>, BridgeError> {
    let Some(client) = client else {
        debug!("No provider client; transfer skipped.");
        return Ok(None);
    };
    if !state.connected {
        debug!("Not connected; transfer skipped.");
        return Ok(None);
    }
    let (Some(account), Some(to)) = (state.sender(), state.target_address()) else {
        debug!("No sender or recipient resolved; transfer skipped.");
        return Ok(None);
    };

    let request = TransferRequest {
        account,
        to,
        value: amount.subunits(),
    };
    info!("Submitting transfer of {} from {} to {}", amount, account, to);
    let tx_hash = client.send_transaction(request).await?;
    info!("Transfer submitted: {}", tx_hash);
    Ok(Some(tx_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MemoryBridge;
    use crate::core::state::Address;
    use crate::transfer::amount::AmountBounds;
    use std::sync::Arc;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn connected_state() -> ConnectionState {
        let mut state = ConnectionState::default();
        state.replace_accounts(vec![addr(1)]);
        state.replace_context_accounts(vec![addr(2), addr(3)]);
        state
    }

    #[tokio::test]
    async fn submits_once_to_the_target() {
        let bridge = Arc::new(MemoryBridge::default());
        let client: Client = bridge.clone();
        let amount = AmountBounds::default().parse("2.5").unwrap();

        let hash = submit_transfer(Some(&client), &connected_state(), &amount)
            .await
            .unwrap();
        assert!(hash.is_some());
        assert_eq!(
            bridge.submitted(),
            vec![TransferRequest {
                account: addr(1),
                to: addr(2),
                value: 2_500_000_000_000_000_000,
            }]
        );
    }

    #[tokio::test]
    async fn selection_overrides_recipient() {
        let bridge = Arc::new(MemoryBridge::default());
        let client: Client = bridge.clone();
        let amount = AmountBounds::default().parse("1").unwrap();
        let mut state = connected_state();
        state.selected_address = Some(addr(3));

        submit_transfer(Some(&client), &state, &amount).await.unwrap();
        assert_eq!(bridge.submitted()[0].to, addr(3));
    }

    #[tokio::test]
    async fn no_op_without_client_or_connection() {
        let bridge = Arc::new(MemoryBridge::default());
        let client: Client = bridge.clone();
        let amount = AmountBounds::default().parse("10").unwrap();

        let skipped = submit_transfer(None, &connected_state(), &amount).await.unwrap();
        assert_eq!(skipped, None);
        let skipped = submit_transfer(Some(&client), &ConnectionState::default(), &amount)
            .await
            .unwrap();
        assert_eq!(skipped, None);
        assert!(bridge.submitted().is_empty());
    }

    #[tokio::test]
    async fn rejection_is_returned() {
        let bridge = Arc::new(MemoryBridge::default());
        bridge.reject_transfers(Some("user denied".into()));
        let client: Client = bridge.clone();
        let amount = AmountBounds::default().parse("10").unwrap();

        let err = submit_transfer(Some(&client), &connected_state(), &amount)
            .await
            .unwrap_err();
        assert_eq!(err, BridgeError::Rejected("user denied".into()));
    }
}
