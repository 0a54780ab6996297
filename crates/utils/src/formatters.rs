// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Hex digits kept before a value is shortened
const FULL_HEX_LIMIT: usize = 64;
/// Hex digits shown on each side of a shortened value
const EDGE: usize = 6;

/// Write bytes as `0x`-prefixed hex, eliding the middle of long values.
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", short_hex(data))
}

/// Hex representation of `data` that stays readable in log lines.
///
/// Handles and addresses are 32 and 20 bytes; anything above 32 bytes (proofs,
/// serialized payloads) is shortened to `<bytes(n):0xabcdef..123456>`.
pub fn short_hex(data: &[u8]) -> String {
    let hex: String = data.iter().map(|b| format!("{:02x}", b)).collect();
    if hex.len() <= FULL_HEX_LIMIT {
        return format!("0x{hex}");
    }
    format!(
        "<bytes({}):0x{}..{}>",
        data.len(),
        &hex[..EDGE],
        &hex[hex.len() - EDGE..]
    )
}
