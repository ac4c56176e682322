// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! JSON-RPC client for the Aztec node.
//!
//! Every call is a single round trip: no retries, no batching. Responses are
//! decoded into an [`RpcResponse`] and validated before the caller sees them.

pub mod model;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Body;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub use model::{
    BlockNumber, NodeInfo, RpcErrorObject, RpcRequest, RpcResponse,
    SponsoredTxRequest, TxReceipt, TxRequest,
};

use crate::Error;

/// Something able to carry a JSON-RPC body to the node and bring back the
/// raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `body` and return the response body
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, Error>;
}

#[derive(Clone)]
/// JSON-RPC over HTTP POST
pub struct HttpTransport {
    client: reqwest::Client,
    uri: String,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Errors
    /// This method errors if a TLS backend cannot be initialized, or the
    /// resolver cannot load the system configuration.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(30))
            .build();

        match client {
            Ok(client) => Ok(Self {
                uri: uri.into(),
                client,
            }),
            Err(_) => Err(Error::HttpClient),
        }
    }

    /// Endpoint the transport posts to
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("uri", &self.uri)
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, Error> {
        let response = self
            .client
            .post(&self.uri)
            .body(Body::from(body))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let error = &response.bytes().await?;

            let error = String::from_utf8(error.to_vec())
                .unwrap_or("unparsable error".into());

            let msg = format!("{status}: {error}");

            Err(Error::Node(msg))
        } else {
            Ok(response.bytes().await?.to_vec())
        }
    }
}

/// A method of the node's RPC surface, with its parameter and result types
pub trait RpcMethod {
    /// Name of the method on the wire
    const NAME: &'static str;
    /// Positional parameters
    type Params: Serialize + Send + Sync;
    /// Decoded result
    type Output: DeserializeOwned;
}

macro_rules! rpc_method {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $params:ty => $output:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $ty;

        impl RpcMethod for $ty {
            const NAME: &'static str = $name;
            type Params = $params;
            type Output = $output;
        }
    };
}

rpc_method!(
    /// Submit a transaction to the node
    SendTransaction, "aztec_sendTransaction", [TxRequest; 1] => TxReceipt
);
rpc_method!(
    /// Run a transaction without submitting it, returning its return value
    SimulateTransaction, "aztec_simulateTransaction", [TxRequest; 1] => Value
);
rpc_method!(
    /// Latest block number
    GetBlockNumber, "aztec_getBlockNumber", [(); 0] => BlockNumber
);
rpc_method!(
    /// Node and chain information
    GetNodeInfo, "pxe_getNodeInfo", [(); 0] => NodeInfo
);
rpc_method!(
    /// Submit a fee-sponsored transaction through the PXE
    PxeSendTransaction,
    "pxe_sendTransaction",
    [SponsoredTxRequest; 1] => TxReceipt
);

/// JSON-RPC client
pub struct RpcClient<T = HttpTransport> {
    transport: T,
    next_id: AtomicU64,
}

impl RpcClient<HttpTransport> {
    /// Create a client posting to `uri` over HTTP
    ///
    /// # Errors
    /// This method errors if the HTTP client cannot be built.
    pub fn http<S: Into<String>>(uri: S) -> Result<Self, Error> {
        Ok(Self::new(HttpTransport::new(uri)?))
    }
}

impl<T: Transport> RpcClient<T> {
    /// Create a client over `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `method` with `params` and decode the result as `R`.
    ///
    /// # Errors
    /// This method errors if the transport fails, if the body is not a
    /// JSON-RPC response, or if the node answers with an error object.
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R, Error>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(method, params, id);
        let body = serde_json::to_vec(&request)?;

        debug!(method, id, "sending rpc request");
        let response = self.transport.post(body).await?;

        let response: RpcResponse<R> = serde_json::from_slice(&response)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        match response.id().and_then(Value::as_u64) {
            Some(echoed) if echoed != id => {
                warn!(method, id, echoed, "rpc response id mismatch")
            }
            _ => {}
        }

        response.into_result()
    }

    /// Call a typed [`RpcMethod`]
    ///
    /// # Errors
    /// See [`RpcClient::call`].
    pub async fn request<M: RpcMethod>(
        &self,
        params: M::Params,
    ) -> Result<M::Output, Error> {
        self.call(M::NAME, params).await
    }

    /// Submit a transaction
    ///
    /// # Errors
    /// See [`RpcClient::call`].
    pub async fn send_transaction(
        &self,
        tx: TxRequest,
    ) -> Result<TxReceipt, Error> {
        self.request::<SendTransaction>([tx]).await
    }

    /// Simulate a transaction and return its raw return value
    ///
    /// # Errors
    /// See [`RpcClient::call`]; an error object returned by the node is
    /// propagated as [`Error::Rpc`].
    pub async fn simulate_transaction(
        &self,
        tx: TxRequest,
    ) -> Result<Value, Error> {
        self.request::<SimulateTransaction>([tx]).await
    }

    /// Latest block number
    ///
    /// # Errors
    /// See [`RpcClient::call`].
    pub async fn block_number(&self) -> Result<u64, Error> {
        let BlockNumber(n) = self.request::<GetBlockNumber>([]).await?;
        Ok(n)
    }

    /// Node information
    ///
    /// # Errors
    /// See [`RpcClient::call`].
    pub async fn node_info(&self) -> Result<NodeInfo, Error> {
        self.request::<GetNodeInfo>([]).await
    }

    /// Submit a sponsored transaction through the PXE
    ///
    /// # Errors
    /// See [`RpcClient::call`].
    pub async fn pxe_send_transaction(
        &self,
        tx: SponsoredTxRequest,
    ) -> Result<TxReceipt, Error> {
        self.request::<PxeSendTransaction>([tx]).await
    }

    /// Check the node is reachable and speaks JSON-RPC
    ///
    /// # Errors
    /// This method errors if `pxe_getNodeInfo` fails.
    pub async fn check_connection(&self) -> Result<(), Error> {
        self.node_info().await.map(|_| ())
    }
}

impl<T: fmt::Debug> fmt::Debug for RpcClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("transport", &self.transport)
            .finish()
    }
}
