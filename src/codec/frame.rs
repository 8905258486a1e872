// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame header encode/decode.
//!
//! A framed datagram is 16 ASCII-digit header bytes, followed by an
//! XOR-obfuscated XML body of the declared length, followed by a 4-digit
//! sequence-number trailer that repeats the header's `seq` field:
//!
//! ```text
//! @ieM 0042 0007 0000 <...body, 42 bytes...> 0007
//! ^--- ^--- ^--- ^---
//! magic len  seq  reserved
//! ```
//!
//! The keepalive magic `%maI` is a bare 4-byte datagram with no header or
//! body at all.

use bytes::Bytes;

use super::keystream::xor_stream_copy;
use crate::error::{Error, Result};

pub const HEADER_LEN: usize = 16;
pub const TRAILER_LEN: usize = 4;

/// The three magic values the panel ever sends or expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// `@ieM` — a framed command/response or push-subscription message.
    Command,
    /// `%maI` — a bare keepalive ping, no header/body/trailer.
    Keepalive,
    /// `@alA` — a framed unsolicited alarm-event push.
    Alarm,
}

impl Magic {
    fn as_bytes(self) -> &'static [u8; 4] {
        match self {
            Magic::Command => b"@ieM",
            Magic::Keepalive => b"%maI",
            Magic::Alarm => b"@alA",
        }
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"@ieM" => Some(Magic::Command),
            b"%maI" => Some(Magic::Keepalive),
            b"@alA" => Some(Magic::Alarm),
            _ => None,
        }
    }
}

/// A fully decoded framed datagram (everything but the bare keepalive).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub magic: Magic,
    pub seq: u32,
    /// De-obfuscated XML body.
    pub body: Bytes,
}

/// Encode a framed datagram: `@ieM`/`@alA` header + XOR'd body + trailer.
pub fn encode(magic: Magic, seq: u32, xml: &[u8]) -> Vec<u8> {
    let obfuscated = xor_stream_copy(xml);
    let mut out = Vec::with_capacity(HEADER_LEN + obfuscated.len() + TRAILER_LEN);
    out.extend_from_slice(magic.as_bytes());
    out.extend_from_slice(format!("{:04}", xml.len()).as_bytes());
    out.extend_from_slice(format!("{:04}", seq).as_bytes());
    out.extend_from_slice(b"0000");
    out.extend_from_slice(&obfuscated);
    out.extend_from_slice(format!("{:04}", seq).as_bytes());
    out
}

/// Encode the bare 4-byte keepalive datagram.
pub fn encode_keepalive() -> [u8; 4] {
    *b"%maI"
}

/// Decode a complete framed datagram already assembled from the socket.
/// Validates magic, declared length, and trailer, then de-obfuscates the
/// body.
pub fn decode(buf: &[u8]) -> Result<Frame> {
    if buf.len() < HEADER_LEN + TRAILER_LEN {
        return Err(Error::Frame(format!("buffer too short: {} bytes", buf.len())));
    }
    let magic = Magic::from_bytes(&buf[0..4])
        .ok_or_else(|| Error::Frame(format!("unknown magic {:?}", &buf[0..4])))?;
    let len_digits = std::str::from_utf8(&buf[4..8])
        .map_err(|_| Error::Frame("length field is not ASCII".into()))?;
    let declared_len: usize = len_digits
        .parse()
        .map_err(|_| Error::Frame(format!("length field not numeric: {len_digits}")))?;
    let seq_digits = std::str::from_utf8(&buf[8..12])
        .map_err(|_| Error::Frame("seq field is not ASCII".into()))?;
    let seq: u32 = seq_digits
        .parse()
        .map_err(|_| Error::Frame(format!("seq field not numeric: {seq_digits}")))?;

    let body_start = HEADER_LEN;
    let body_end = body_start + declared_len;
    if buf.len() != body_end + TRAILER_LEN {
        return Err(Error::Frame(format!(
            "declared length {declared_len} does not match buffer size {}",
            buf.len()
        )));
    }

    let trailer_digits = std::str::from_utf8(&buf[body_end..body_end + TRAILER_LEN])
        .map_err(|_| Error::Frame("trailer field is not ASCII".into()))?;
    let trailer: u32 = trailer_digits
        .parse()
        .map_err(|_| Error::Frame(format!("trailer field not numeric: {trailer_digits}")))?;
    if trailer != seq {
        return Err(Error::Frame(format!("trailer {trailer} does not match seq {seq}")));
    }

    let body = Bytes::from(xor_stream_copy(&buf[body_start..body_end]));
    Ok(Frame { magic, seq, body })
}

/// Parse just the header to learn how many more bytes to read from the
/// socket before the full datagram can be decoded. Returns the total frame
/// length (header + body + trailer), or `None` when `header` is a bare
/// keepalive with no body to await.
pub fn declared_frame_len(header: &[u8; HEADER_LEN]) -> Result<Option<usize>> {
    if Magic::from_bytes(&header[0..4]) == Some(Magic::Keepalive) {
        return Ok(None);
    }
    let len_digits = std::str::from_utf8(&header[4..8])
        .map_err(|_| Error::Frame("length field is not ASCII".into()))?;
    let declared_len: usize = len_digits
        .parse()
        .map_err(|_| Error::Frame(format!("length field not numeric: {len_digits}")))?;
    Ok(Some(HEADER_LEN + declared_len + TRAILER_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_command_frame() {
        let xml = b"<Root><Pair><Client><Id>STR,3|abc</Id></Client></Pair></Root>";
        let wire = encode(Magic::Command, 7, xml);
        let frame = decode(&wire).expect("decodes");
        assert_eq!(frame.magic, Magic::Command);
        assert_eq!(frame.seq, 7);
        assert_eq!(frame.body.as_ref(), xml.as_slice());
    }

    #[test]
    fn rejects_trailer_mismatch() {
        let xml = b"<Root/>";
        let mut wire = encode(Magic::Command, 1, xml);
        let last = wire.len() - 1;
        wire[last] = b'9';
        assert!(decode(&wire).is_err());
    }

    #[test]
    fn rejects_unknown_magic() {
        let mut wire = encode(Magic::Command, 1, b"<Root/>");
        wire[0..4].copy_from_slice(b"XXXX");
        assert!(decode(&wire).is_err());
    }

    #[test]
    fn declared_len_accounts_for_header_and_trailer() {
        let xml = b"<Root/>";
        let wire = encode(Magic::Command, 3, xml);
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&wire[0..HEADER_LEN]);
        let total = declared_frame_len(&header).expect("ok").expect("some");
        assert_eq!(total, wire.len());
    }

    #[test]
    fn keepalive_has_no_declared_body() {
        let header = *b"%maI0000000000000";
        let mut buf = [0u8; HEADER_LEN];
        buf.copy_from_slice(&header[0..HEADER_LEN]);
        assert_eq!(declared_frame_len(&buf).expect("ok"), None);
    }
}
