// SPDX-License-Identifier: MIT OR Apache-2.0

//! The panel obfuscates every frame body with a fixed 128-byte keystream,
//! XOR'd byte-for-byte with the position in the body wrapping modulo 128.
//! This is not encryption — the keystream is public and constant across
//! every panel and firmware revision observed.

/// The panel's obfuscation keystream. Index with `i & 0x7f`.
pub const KEYSTREAM: [u8; 128] = [
    0x0c, 0x38, 0x4e, 0x4e, 0x62, 0x38, 0x2d, 0x62, 0x0e, 0x38, 0x4e, 0x4e, 0x44, 0x38, 0x2d, 0x30,
    0x0f, 0x38, 0x2b, 0x38, 0x2b, 0x0c, 0x5a, 0x62, 0x34, 0x38, 0x4e, 0x30, 0x4e, 0x4c, 0x37, 0x2b,
    0x10, 0x53, 0x5a, 0x0c, 0x20, 0x43, 0x2d, 0x17, 0x11, 0x42, 0x44, 0x4e, 0x58, 0x42, 0x2c, 0x42,
    0x11, 0x57, 0x32, 0x2a, 0x20, 0x40, 0x36, 0x17, 0x20, 0x56, 0x44, 0x62, 0x62, 0x38, 0x2b, 0x5f,
    0x0c, 0x38, 0x4e, 0x4e, 0x62, 0x38, 0x2d, 0x62, 0x0e, 0x38, 0x58, 0x58, 0x08, 0x2e, 0x23, 0x2c,
    0x0f, 0x38, 0x2b, 0x38, 0x2b, 0x0c, 0x5a, 0x62, 0x34, 0x38, 0x30, 0x30, 0x4e, 0x2e, 0x36, 0x2b,
    0x10, 0x54, 0x5a, 0x0c, 0x3e, 0x43, 0x2e, 0x17, 0x11, 0x38, 0x4e, 0x62, 0x58, 0x24, 0x37, 0x1c,
    0x11, 0x57, 0x32, 0x42, 0x20, 0x40, 0x2c, 0x17, 0x20, 0x4c, 0x44, 0x4e, 0x62, 0x4c, 0x2e, 0x12,
];

/// XOR `data` against [`KEYSTREAM`] in place, cycling the key every 128 bytes.
///
/// Involutive: applying this twice returns the original bytes.
pub fn xor_stream(data: &mut [u8]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= KEYSTREAM[i & 0x7f];
    }
}

/// Like [`xor_stream`] but returns a new buffer, leaving `data` untouched.
pub fn xor_stream_copy(data: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| b ^ KEYSTREAM[i & 0x7f])
        .collect()
}
