// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Stand-in string hashing.
//!
//! Some deployed profile contracts expect string arguments replaced by a
//! 31-multiplier rolling hash instead of a proper field encoding. This is
//! **not** a field-element codec and **not** cryptographic: it collides
//! trivially and carries no relation to the network's ABI. It is kept only so
//! that [`ArgEncoding::StandInHash`](crate::ArgEncoding::StandInHash) can talk
//! to those contracts.

use serde_json::Value;

use crate::config::ArgEncoding;

/// Rolling hash over the UTF-16 code units of `input`.
///
/// The accumulator wraps as a signed 32-bit integer, the magnitude of the
/// final value is returned.
pub fn stand_in_hash(input: &str) -> u32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// [`stand_in_hash`] rendered as a `0x`-prefixed hex string
pub fn stand_in_field(input: &str) -> String {
    format!("{:#x}", stand_in_hash(input))
}

/// Apply `encoding` to a string argument
pub(crate) fn encode_str(encoding: ArgEncoding, input: &str) -> Value {
    match encoding {
        ArgEncoding::Raw => Value::String(input.to_string()),
        ArgEncoding::StandInHash => Value::String(stand_in_field(input)),
    }
}
