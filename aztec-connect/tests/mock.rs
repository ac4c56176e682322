// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Mocks of the traits used by the client.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aztec_connect::contract::ContractCall;
use aztec_connect::rpc::TxReceipt;
use aztec_connect::{
    AccountId, ConnectRequest, Error, RpcClient, Transport, WalletExtension,
};
use serde_json::{json, Value};

type Handler = Box<dyn Fn(&Value) -> Result<Vec<u8>, Error> + Send + Sync>;

/// A transport answering with a scripted handler and recording every request
pub struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<Value>>,
}

impl MockTransport {
    /// Answer every request with the body built by `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<u8>, Error> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(vec![]),
        }
    }

    /// Answer every request by method with `results(method)`
    pub fn by_method<F>(results: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Self::new(move |req| {
            let method = req["method"].as_str().unwrap_or_default();
            Ok(success(req, results(method)))
        })
    }

    /// Answer every request with `result`
    pub fn result(result: Value) -> Self {
        Self::new(move |req| Ok(success(req, result.clone())))
    }

    /// Answer every request with an error object carrying `message`
    pub fn error(message: &'static str) -> Self {
        Self::new(move |req| {
            let body = json!({
                "jsonrpc": "2.0",
                "id": req["id"],
                "error": { "message": message },
            });
            Ok(serde_json::to_vec(&body).unwrap())
        })
    }

    /// Fail every request before any response
    pub fn unreachable() -> Self {
        Self::new(|_| Err(Error::Transport("connection refused".into())))
    }

    /// Answer every request with `body`, verbatim
    pub fn raw(body: &'static [u8]) -> Self {
        Self::new(move |_| Ok(body.to_vec()))
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Methods called so far, in order
    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|req| req["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, Error> {
        let request: Value = serde_json::from_slice(&body)?;
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(&request)
    }
}

/// A successful response to `req`
pub fn success(req: &Value, result: Value) -> Vec<u8> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": req["id"],
        "result": result,
    });
    serde_json::to_vec(&body).unwrap()
}

/// An rpc client over `transport`
pub fn rpc(transport: MockTransport) -> Arc<RpcClient<MockTransport>> {
    Arc::new(RpcClient::new(transport))
}

/// A wallet extension with scripted answers
#[derive(Debug)]
pub struct MockWallet {
    accounts: Result<Vec<String>, String>,
    send_error: Option<String>,
    sent: Mutex<Vec<(AccountId, ContractCall)>>,
    disconnected: AtomicBool,
}

impl MockWallet {
    /// A wallet granting `accounts`
    pub fn granting(accounts: &[&str]) -> Self {
        Self {
            accounts: Ok(accounts.iter().map(|a| a.to_string()).collect()),
            send_error: None,
            sent: Mutex::new(vec![]),
            disconnected: AtomicBool::new(false),
        }
    }

    /// A wallet rejecting every session request with `msg`
    pub fn rejecting(msg: &str) -> Self {
        Self {
            accounts: Err(msg.to_string()),
            ..Self::granting(&[])
        }
    }

    /// Make every transaction fail with `msg`
    pub fn failing_sends(mut self, msg: &str) -> Self {
        self.send_error = Some(msg.to_string());
        self
    }

    /// Transactions sent so far
    pub fn sent(&self) -> Vec<(AccountId, ContractCall)> {
        self.sent.lock().unwrap().clone()
    }

    /// Whether the session was torn down
    pub fn disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletExtension for MockWallet {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(
        &self,
        _request: &ConnectRequest,
    ) -> Result<Vec<String>, Error> {
        self.accounts.clone().map_err(Error::Connection)
    }

    async fn send_transaction(
        &self,
        account: &AccountId,
        call: &ContractCall,
    ) -> Result<TxReceipt, Error> {
        if let Some(msg) = &self.send_error {
            return Err(Error::Connection(msg.clone()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((account.clone(), call.clone()));
        Ok(TxReceipt {
            tx_hash: Some("0xfeed".into()),
            status: Some("pending".into()),
            address: None,
        })
    }

    async fn sign_message(
        &self,
        _account: &AccountId,
        message: &[u8],
    ) -> Result<Vec<u8>, Error> {
        Ok(message.iter().rev().copied().collect())
    }

    async fn disconnect(&self) -> Result<(), Error> {
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }
}
