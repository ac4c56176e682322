// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! JSON-RPC client tests.

mod mock;

use aztec_connect::rpc::{SponsoredTxRequest, TxRequest};
use aztec_connect::{Error, RpcClient};
use mock::{rpc, MockTransport};
use serde_json::{json, Value};

fn tx() -> TxRequest {
    TxRequest {
        contract_address: "0x01".into(),
        function_name: "has_profile".into(),
        args: vec![json!("0x02")],
        from: None,
    }
}

#[tokio::test]
async fn simulate_error_carries_message() {
    let rpc = rpc(MockTransport::error("x"));

    let err = rpc
        .simulate_transaction(tx())
        .await
        .expect_err("error object to be propagated");

    assert!(matches!(&err, Error::Rpc { message, .. } if message == "x"));
    assert!(err.to_string().contains('x'));
}

#[tokio::test]
async fn envelope_and_ids() {
    let rpc = rpc(MockTransport::by_method(|method| match method {
        "aztec_sendTransaction" => json!("0x01"),
        _ => json!(true),
    }));

    rpc.simulate_transaction(tx()).await.unwrap();
    let receipt = rpc.send_transaction(tx()).await.unwrap();
    assert_eq!(receipt.tx_hash.as_deref(), Some("0x01"));

    let requests = rpc.transport().requests();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0]["jsonrpc"], "2.0");
    assert_eq!(requests[0]["method"], "aztec_simulateTransaction");
    assert_eq!(
        requests[0]["params"],
        json!([{
            "contractAddress": "0x01",
            "functionName": "has_profile",
            "args": ["0x02"]
        }])
    );
    assert_eq!(requests[1]["method"], "aztec_sendTransaction");

    let first = requests[0]["id"].as_u64().unwrap();
    let second = requests[1]["id"].as_u64().unwrap();
    assert_eq!(second, first + 1);
}

#[tokio::test]
async fn send_result_must_be_a_receipt() {
    for result in [json!(true), json!(42), json!(null)] {
        let rpc = mock::rpc(MockTransport::result(result));
        let err = rpc.send_transaction(tx()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}

#[tokio::test]
async fn send_receipt_with_both_hash_keys() {
    let rpc = rpc(MockTransport::result(json!({
        "txHash": "0x01",
        "hash": "0x01",
        "status": "pending",
    })));

    let receipt = rpc.send_transaction(tx()).await.unwrap();
    assert_eq!(receipt.tx_hash.as_deref(), Some("0x01"));
    assert_eq!(receipt.status.as_deref(), Some("pending"));
}

#[tokio::test]
async fn loose_error_shapes_keep_the_message() {
    let bodies: [&'static [u8]; 2] = [
        br#"{"jsonrpc":"2.0","id":1,"error":{"code":"E1","message":"x"}}"#,
        br#"{"jsonrpc":"2.0","id":1,"error":"x"}"#,
    ];

    for body in bodies {
        let rpc = mock::rpc(MockTransport::raw(body));
        let err = rpc.simulate_transaction(tx()).await.unwrap_err();
        assert!(matches!(&err, Error::Rpc { message, .. } if message == "x"));
        assert!(err.to_string().contains('x'));
    }
}

#[tokio::test]
async fn block_number_accepts_hex() {
    let rpc = rpc(MockTransport::result(json!("0x2a")));

    assert_eq!(rpc.block_number().await.unwrap(), 42);

    let requests = rpc.transport().requests();
    assert_eq!(requests[0]["method"], "aztec_getBlockNumber");
    assert_eq!(requests[0]["params"], json!([]));
}

#[tokio::test]
async fn node_info_and_connection_check() {
    let rpc = rpc(MockTransport::result(json!({
        "nodeVersion": "0.87.0",
        "l1ChainId": "0xaa36a7",
    })));

    let info = rpc.node_info().await.unwrap();
    assert_eq!(info.l1_chain_id, Some(11155111));

    rpc.check_connection().await.unwrap();
    assert_eq!(
        rpc.transport().methods(),
        vec!["pxe_getNodeInfo", "pxe_getNodeInfo"]
    );
}

#[tokio::test]
async fn pxe_send_transaction_receipt() {
    let rpc = rpc(MockTransport::result(json!({
        "txHash": "0xabc",
        "address": "0xdef",
    })));

    let receipt = rpc
        .pxe_send_transaction(SponsoredTxRequest {
            from: "0x10".into(),
            sponsor: "0x20".into(),
            call: tx(),
        })
        .await
        .unwrap();

    assert_eq!(receipt.tx_hash.as_deref(), Some("0xabc"));
    assert_eq!(receipt.address.as_deref(), Some("0xdef"));

    let params = &rpc.transport().requests()[0]["params"];
    assert_eq!(params[0]["from"], "0x10");
    assert_eq!(params[0]["sponsor"], "0x20");
    assert_eq!(params[0]["call"]["functionName"], "has_profile");
}

#[tokio::test]
async fn malformed_responses() {
    let rpc = rpc(MockTransport::raw(br#"{"jsonrpc":"2.0","id":1}"#));
    let err = rpc.simulate_transaction(tx()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));

    let rpc = mock::rpc(MockTransport::raw(b"<html>bad gateway</html>"));
    let err = rpc.block_number().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));

    // a result of the wrong shape is rejected at the boundary
    let rpc = mock::rpc(MockTransport::result(json!({ "height": 1 })));
    let err = rpc.block_number().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn generic_call() {
    let rpc = rpc(MockTransport::by_method(|method| json!(method)));

    let echoed: Value =
        rpc.call("pxe_getBlockHeader", json!([1])).await.unwrap();
    assert_eq!(echoed, json!("pxe_getBlockHeader"));
}

#[tokio::test]
async fn transport_failure_is_propagated() {
    let rpc = rpc(MockTransport::unreachable());
    let err = rpc.node_info().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn http_connection_refused() {
    // nothing listens on port 1
    let rpc = RpcClient::http("http://127.0.0.1:1").unwrap();
    let err = rpc.block_number().await.unwrap_err();
    assert!(matches!(err, Error::Reqwest(_)));
}
