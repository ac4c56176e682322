// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! # JSON-RPC Models
//!
//! Envelopes and payloads exchanged with the node.
//!
//! The node is loosely typed: numbers may come back as hex strings and
//! transaction results either as a bare hash or as a receipt object. The
//! types here accept those shapes and nothing else, so that callers only see
//! validated values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

/// JSON-RPC protocol version sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a, P> {
    /// Always [`JSONRPC_VERSION`]
    pub jsonrpc: &'static str,
    /// Method name
    pub method: &'a str,
    /// Positional parameters
    pub params: P,
    /// Numeric request id
    pub id: u64,
}

impl<'a, P> RpcRequest<'a, P> {
    /// New request for `method`
    pub fn new(method: &'a str, params: P, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id,
        }
    }
}

/// Error object carried by a failed response.
///
/// Nodes are not strict about its shape: a bare string is taken as the
/// message and a code that is not an integer reads as `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ErrorRepr")]
pub struct RpcErrorObject {
    /// Error code, `0` if the node omits it or sends a non-integer
    pub code: i64,
    /// Human readable message
    pub message: String,
    /// Additional data attached by the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorRepr {
    Message(String),
    Object {
        #[serde(default)]
        code: Option<Value>,
        message: String,
        #[serde(default)]
        data: Option<Value>,
    },
}

impl From<ErrorRepr> for RpcErrorObject {
    fn from(repr: ErrorRepr) -> Self {
        match repr {
            ErrorRepr::Message(message) => Self {
                code: 0,
                message,
                data: None,
            },
            ErrorRepr::Object {
                code,
                message,
                data,
            } => Self {
                code: code.as_ref().and_then(error_code).unwrap_or_default(),
                message,
                data,
            },
        }
    }
}

fn error_code(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A response, tagged by outcome.
///
/// `Failure` is tried first so that an `error` member always wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RpcResponse<R> {
    /// `{"error": {...}}`
    Failure {
        /// The reported error
        error: RpcErrorObject,
        /// Echoed request id
        #[serde(default)]
        id: Option<Value>,
    },
    /// `{"result": ...}`
    Success {
        /// The method's result
        result: R,
        /// Echoed request id
        #[serde(default)]
        id: Option<Value>,
    },
}

impl<R> RpcResponse<R> {
    /// The id echoed by the node, if any
    pub fn id(&self) -> Option<&Value> {
        match self {
            Self::Failure { id, .. } | Self::Success { id, .. } => id.as_ref(),
        }
    }

    /// Turn the response into the method's result
    ///
    /// # Errors
    /// Returns [`Error::Rpc`] for failure responses.
    pub fn into_result(self) -> Result<R, Error> {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Failure { error, .. } => Err(Error::Rpc {
                code: error.code,
                message: error.message,
            }),
        }
    }
}

/// A transaction as handed to the node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    /// Target contract
    pub contract_address: String,
    /// Function to invoke
    pub function_name: String,
    /// Positional arguments
    pub args: Vec<Value>,
    /// Sender account, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// A sponsored transaction: fees are paid by `sponsor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredTxRequest {
    /// Account the transaction is sent from
    pub from: String,
    /// Account paying the fees
    pub sponsor: String,
    /// Call performed by the transaction
    pub call: TxRequest,
}

/// Outcome of a submitted transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ReceiptRepr")]
pub struct TxReceipt {
    /// Transaction hash, when reported
    pub tx_hash: Option<String>,
    /// Status string, when reported
    pub status: Option<String>,
    /// Address created by the transaction, when reported
    pub address: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReceiptRepr {
    Hash(String),
    Object {
        #[serde(default, rename = "txHash")]
        tx_hash: Option<String>,
        #[serde(default)]
        hash: Option<String>,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        address: Option<String>,
    },
}

impl From<ReceiptRepr> for TxReceipt {
    fn from(repr: ReceiptRepr) -> Self {
        match repr {
            ReceiptRepr::Hash(hash) => Self {
                tx_hash: Some(hash),
                ..Self::default()
            },
            ReceiptRepr::Object {
                tx_hash,
                hash,
                status,
                address,
            } => Self {
                tx_hash: tx_hash.or(hash),
                status,
                address,
            },
        }
    }
}

/// Information reported by `pxe_getNodeInfo`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// Version string of the node software
    #[serde(default)]
    pub node_version: Option<String>,
    /// Chain id of the settlement layer
    #[serde(default, with = "quantity::option")]
    pub l1_chain_id: Option<u64>,
    /// Protocol version
    #[serde(default, alias = "rollupVersion", with = "quantity::option")]
    pub protocol_version: Option<u64>,
    /// Every other field, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A block number, numeric or hex/decimal string on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BlockNumber(#[serde(with = "quantity")] pub u64);

/// Numbers that may travel as JSON numbers or as `0x` hex / decimal strings.
pub mod quantity {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    /// Parse a quantity out of a JSON value
    pub fn from_value(value: &Value) -> Option<u64> {
        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => parse_str(s),
            _ => None,
        }
    }

    fn parse_str(s: &str) -> Option<u64> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        }
    }

    /// Deserializes a number or a numeric string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        from_value(&value).ok_or_else(|| {
            de::Error::custom(format!("invalid quantity: {value}"))
        })
    }

    /// Same as the parent module for optional fields
    pub mod option {
        use serde::{Deserialize, Deserializer};
        use serde_json::Value;

        /// Deserializes an optional number or numeric string
        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<Option<u64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Option::<Value>::deserialize(deserializer)?;
            match value {
                None | Some(Value::Null) => Ok(None),
                Some(value) => super::from_value(&value)
                    .map(Some)
                    .ok_or_else(|| {
                        serde::de::Error::custom(format!(
                            "invalid quantity: {value}"
                        ))
                    }),
            }
        }
    }
}
