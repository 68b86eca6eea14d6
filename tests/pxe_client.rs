//! Transport behaviour of the PXE client: readiness, failover, remote errors.

use alloy::primitives::{TxHash, B256};

use pxe_wallet::account::{test_wallets, Wallet};
use pxe_wallet::config::PxeConfig;
use pxe_wallet::pxe::{AztecAddress, PxeClient, PxeError};

mod common;
use common::{MockPxe, MOCK_NODE_VERSION};

fn client(node: &MockPxe) -> PxeClient {
    let config = node.config();
    PxeClient::new(&config.pxe).unwrap().with_wait_config(config.wait)
}

#[tokio::test]
async fn test_wait_for_pxe_rides_out_startup() {
    let node = MockPxe::start(0).await;
    node.state.lock().await.unavailable_for = 2;

    let info = client(&node).wait_for_pxe().await.unwrap();
    assert_eq!(info.node_version, MOCK_NODE_VERSION);
}

#[tokio::test]
async fn test_wait_for_pxe_gives_up() {
    let node = MockPxe::start(0).await;
    node.state.lock().await.unavailable_for = u32::MAX;

    let err = client(&node).wait_for_pxe().await.unwrap_err();
    assert!(matches!(err, PxeError::Unavailable { attempts: 5, .. }));
}

#[tokio::test]
async fn test_failover_to_secondary_endpoint() {
    let node = MockPxe::start(0).await;
    let pxe = PxeClient::new(&PxeConfig {
        url: "http://127.0.0.1:1".to_string(),
        failover_urls: vec![node.url.clone()],
        request_timeout_secs: 2,
    })
    .unwrap();

    assert_eq!(pxe.get_block_number().await.unwrap(), 1);
    assert!(pxe.is_healthy().await);
}

#[tokio::test]
async fn test_remote_error_is_not_retried_elsewhere() {
    let node = MockPxe::start(1).await;
    let err = client(&node)
        .create_auth_wit(AztecAddress::from_preimage(b"stranger"), B256::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, PxeError::Remote { code: -32003, .. }));
}

#[tokio::test]
async fn test_unknown_contract_instance_is_none() {
    let node = MockPxe::start(0).await;
    let instance = client(&node).get_contract_instance(AztecAddress::ZERO).await.unwrap();
    assert!(instance.is_none());
}

#[tokio::test]
async fn test_node_signs_for_test_accounts() {
    let node = MockPxe::start(2).await;
    let pxe = client(&node);
    let accounts = pxe.get_test_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(pxe.get_registered_accounts().await.unwrap(), accounts);

    let digest = B256::repeat_byte(0xab);
    let witness = pxe.create_auth_wit(accounts[0].address, digest).await.unwrap();
    assert_eq!(witness.request_hash, digest);
    assert!(witness.verify(&accounts[0].public_key));
    assert!(!witness.verify(&accounts[1].public_key));
}

#[tokio::test]
async fn test_unknown_tx_is_dropped() {
    let node = MockPxe::start(0).await;
    let err = client(&node).wait_for_tx(TxHash::ZERO).await.unwrap_err();
    assert!(matches!(err, PxeError::TxDropped(_)));
}

#[tokio::test]
async fn test_wait_polls_through_pending() {
    let node = MockPxe::start(1).await;
    let pxe = client(&node);
    let wallet = test_wallets(&pxe).await.unwrap().remove(0);
    node.state.lock().await.pending_polls = 3;

    let sent = wallet.send_tx(vec![]).await.unwrap();
    let receipt = sent.wait().await.unwrap();

    assert_eq!(receipt.tx_hash, sent.tx_hash());
    assert!(receipt.block_number.is_some());
    assert_eq!(node.state.lock().await.receipt_polls, 4);
}

#[tokio::test]
async fn test_wait_times_out_while_pending() {
    let node = MockPxe::start(1).await;
    let mut config = node.config();
    config.wait.tx_timeout_secs = 1;
    let pxe = PxeClient::new(&config.pxe).unwrap().with_wait_config(config.wait);
    let wallet = test_wallets(&pxe).await.unwrap().remove(0);
    node.state.lock().await.pending_polls = u32::MAX;

    let sent = wallet.send_tx(vec![]).await.unwrap();
    let err = sent.wait().await.unwrap_err();

    match err {
        PxeError::TxTimeout { tx_hash, secs } => {
            assert_eq!(tx_hash, sent.tx_hash());
            assert_eq!(secs, 1);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}
