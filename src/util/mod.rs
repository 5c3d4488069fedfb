// SPDX-License-Identifier: Apache-2.0

//! Helpful primitives for developing the crate.

mod read_ext;

pub(crate) use read_ext::ReadExt;

/// Render bytes as rows of 16 hex pairs, for debug logs.
pub fn hexdump(bytes: &[u8]) -> String {
    let mut retval: String = String::new();
    for (i, byte) in bytes.iter().enumerate() {
        if (i % 16) == 0 {
            retval.push('\n');
        }
        retval.push_str(&format!("{byte:02x} "));
    }
    retval.push('\n');
    retval
}
