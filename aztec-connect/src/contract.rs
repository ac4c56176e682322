// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Profile and verification contract calls.
//!
//! Read operations fall back to a default value on any failure; the failure
//! is logged and otherwise swallowed. There is no distinction between a
//! network error and a contract rejection, and nothing is retried.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ArgEncoding;
use crate::encoding::encode_str;
use crate::rpc::{RpcClient, Transport, TxReceipt, TxRequest};
use crate::{Config, Error, Session, VERIFICATION_COUNT};

/// Verification flags of a profile
pub type Verifications = [bool; VERIFICATION_COUNT];

/// Profile contract function creating a profile
pub const CREATE_PROFILE: &str = "create_profile";
/// Profile contract function checking a profile exists
pub const HAS_PROFILE: &str = "has_profile";
/// Profile contract function returning a profile id
pub const GET_PROFILE_ID: &str = "get_profile_id";
/// Verification contract function returning the verification flags
pub const GET_VERIFICATIONS: &str = "get_verifications";

/// A call to a contract function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCall {
    /// Target contract address
    pub contract: String,
    /// Function name
    pub function: String,
    /// Positional arguments
    pub args: Vec<Value>,
}

impl ContractCall {
    /// A call to `function` on `contract`
    pub fn new<C, F>(contract: C, function: F, args: Vec<Value>) -> Self
    where
        C: Into<String>,
        F: Into<String>,
    {
        Self {
            contract: contract.into(),
            function: function.into(),
            args,
        }
    }

    /// The call as a node transaction request
    pub fn to_tx_request(&self, from: Option<&str>) -> TxRequest {
        TxRequest {
            contract_address: self.contract.clone(),
            function_name: self.function.clone(),
            args: self.args.clone(),
            from: from.map(str::to_string),
        }
    }
}

/// Outcome of a state-changing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The wallet submitted the transaction
    Submitted(TxReceipt),
    /// The call failed; the message is meant for the user
    Failed(String),
}

impl CallOutcome {
    /// Whether the transaction was submitted
    pub fn success(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// The transaction hash, if reported
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Submitted(receipt) => receipt.tx_hash.as_deref(),
            Self::Failed(_) => None,
        }
    }
}

/// Loose boolean coercion of a contract return value.
///
/// `null`, `false`, zero, and the strings `""`, `"false"` and zero
/// quantities (`"0"`, `"0x0"`, `"0X00"`) are false; anything else is true.
/// Strings are trimmed and read with the same prefixes as quantities.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => {
            let s = s.trim();
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s);
            let zero = !digits.is_empty() && digits.chars().all(|c| c == '0');
            !(s.is_empty() || s == "false" || zero)
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read the verification flags out of a return value.
///
/// Missing entries are `false`, extra entries are ignored.
fn verifications_from(value: &Value) -> Result<Verifications, Error> {
    let flags = match value {
        Value::Array(flags) => flags,
        other => {
            return Err(Error::MalformedResponse(format!(
                "expected an array of verification flags, got {other}"
            )));
        }
    };

    let mut verifications = [false; VERIFICATION_COUNT];
    for (slot, flag) in verifications.iter_mut().zip(flags) {
        *slot = is_truthy(flag);
    }
    Ok(verifications)
}

/// Simulated return values are either the value itself or an object
/// wrapping it
fn return_value(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            for key in ["returnValue", "returnValues", "value"] {
                if let Some(inner) = map.remove(key) {
                    return inner;
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Named operations of the profile and verification contracts
#[derive(Debug)]
pub struct ProfileContract<T> {
    rpc: Arc<RpcClient<T>>,
    profile: String,
    verification: String,
    encoding: ArgEncoding,
}

impl<T: Transport> ProfileContract<T> {
    /// Bind the two contract addresses to `rpc`
    pub fn new<P, V>(
        rpc: Arc<RpcClient<T>>,
        profile: P,
        verification: V,
    ) -> Self
    where
        P: Into<String>,
        V: Into<String>,
    {
        Self {
            rpc,
            profile: profile.into(),
            verification: verification.into(),
            encoding: ArgEncoding::default(),
        }
    }

    /// Bind the contracts named in `config`
    pub fn from_config(rpc: Arc<RpcClient<T>>, config: &Config) -> Self {
        Self::new(
            rpc,
            config.profile_contract.clone(),
            config.verification_contract.clone(),
        )
        .with_encoding(config.arg_encoding)
    }

    /// Set the encoding of string arguments
    pub fn with_encoding(mut self, encoding: ArgEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Address of the profile contract
    pub fn profile_address(&self) -> &str {
        &self.profile
    }

    /// Address of the verification contract
    pub fn verification_address(&self) -> &str {
        &self.verification
    }

    /// Simulate `call` and return its raw return value.
    ///
    /// # Errors
    /// Errors are propagated to the caller, an error object returned by the
    /// node surfaces as [`Error::Rpc`].
    pub async fn simulate(&self, call: &ContractCall) -> Result<Value, Error> {
        debug!(
            contract = %call.contract,
            function = %call.function,
            "simulating contract call"
        );
        let value =
            self.rpc.simulate_transaction(call.to_tx_request(None)).await?;
        Ok(return_value(value))
    }

    /// Create a profile named `name` for the session's account.
    ///
    /// Never errors: failures are reported as [`CallOutcome::Failed`].
    pub async fn create_profile(
        &self,
        session: &Session,
        name: &str,
    ) -> CallOutcome {
        let call = ContractCall::new(
            self.profile.clone(),
            CREATE_PROFILE,
            vec![
                Value::String(session.address().to_string()),
                encode_str(self.encoding, name),
            ],
        );

        match session.send_transaction(&call).await {
            Ok(receipt) => CallOutcome::Submitted(receipt),
            Err(e) => {
                warn!(
                    account = session.address(),
                    "create_profile failed: {e}"
                );
                CallOutcome::Failed(e.to_string())
            }
        }
    }

    /// Whether `address` owns a profile; `false` on any failure
    pub async fn has_profile(&self, address: &str) -> bool {
        let call = self.profile_call(HAS_PROFILE, address);
        match self.simulate(&call).await {
            Ok(value) => is_truthy(&value),
            Err(e) => {
                warn!(address, "has_profile failed: {e}");
                false
            }
        }
    }

    /// Profile id of `address`; `"0"` on any failure
    pub async fn profile_id(&self, address: &str) -> String {
        let call = self.profile_call(GET_PROFILE_ID, address);
        match self.simulate(&call).await {
            Ok(Value::String(id)) if !id.trim().is_empty() => id,
            Ok(Value::Number(id)) => id.to_string(),
            Ok(other) => {
                warn!(address, "unexpected profile id {other}");
                "0".to_string()
            }
            Err(e) => {
                warn!(address, "get_profile_id failed: {e}");
                "0".to_string()
            }
        }
    }

    /// Verification flags of `address`; all `false` on any failure
    pub async fn get_profile_verifications(
        &self,
        address: &str,
    ) -> Verifications {
        let call = ContractCall::new(
            self.verification.clone(),
            GET_VERIFICATIONS,
            vec![Value::String(address.to_string())],
        );

        let verifications = self
            .simulate(&call)
            .await
            .and_then(|value| verifications_from(&value));

        match verifications {
            Ok(verifications) => verifications,
            Err(e) => {
                warn!(address, "get_verifications failed: {e}");
                [false; VERIFICATION_COUNT]
            }
        }
    }

    fn profile_call(&self, function: &str, address: &str) -> ContractCall {
        ContractCall::new(
            self.profile.clone(),
            function,
            vec![Value::String(address.to_string())],
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truthiness() {
        for truthy in [
            json!(true),
            json!(1),
            json!(-2.5),
            json!("1"),
            json!("0x01"),
            json!("0X1"),
            json!("0x"),
            json!("yes"),
            json!([]),
            json!({}),
        ] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }

        for falsy in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!("0x0"),
            json!("0x0000"),
            json!("0X0"),
            json!(" 0x0 "),
            json!("false"),
        ] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
    }

    #[test]
    fn verification_flags_are_padded_and_truncated() {
        let short = verifications_from(&json!([true, 1])).unwrap();
        assert_eq!(short, [true, true, false, false, false, false]);

        let long =
            verifications_from(&json!([0, 1, 0, 1, 0, 1, 1, 1])).unwrap();
        assert_eq!(long, [false, true, false, true, false, true]);

        assert!(verifications_from(&json!("0x3f")).is_err());
    }

    #[test]
    fn return_value_unwrapping() {
        assert_eq!(return_value(json!({ "returnValue": 5 })), json!(5));
        assert_eq!(return_value(json!({ "value": [1] })), json!([1]));
        assert_eq!(return_value(json!(true)), json!(true));
        assert_eq!(return_value(json!({ "other": 1 })), json!({ "other": 1 }));
    }

    #[test]
    fn call_to_tx_request() {
        let call = ContractCall::new("0x01", HAS_PROFILE, vec![json!("0x02")]);
        let tx = call.to_tx_request(Some("0x03"));

        assert_eq!(
            serde_json::to_value(tx).unwrap(),
            json!({
                "contractAddress": "0x01",
                "functionName": "has_profile",
                "args": ["0x02"],
                "from": "0x03"
            })
        );
    }
}
