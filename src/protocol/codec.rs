//! MySQL wire protocol encoding and decoding primitives.
//!
//! MySQL uses little-endian byte order for all fixed-width integers.

use crate::error::{Error, Result};
use zerocopy::FromBytes;

use super::types::{U16LE, U32LE, U64LE};

/// Size of the packet header: 3-byte payload length + 1-byte sequence id.
pub const HEADER_LEN: usize = 4;

/// Largest payload a single frame can carry. A frame of exactly this size
/// is followed by a continuation frame.
pub const MAX_FRAME_PAYLOAD: usize = 0xFF_FFFF;

/// Read 1-byte unsigned integer.
#[inline]
pub fn read_u8(data: &[u8]) -> Result<(u8, &[u8])> {
    match data.split_first() {
        Some((&value, rest)) => Ok((value, rest)),
        None => Err(Error::Protocol("read_u8: empty buffer".into())),
    }
}

/// Read 2-byte little-endian unsigned integer.
#[inline]
pub fn read_u16(data: &[u8]) -> Result<(u16, &[u8])> {
    let (bytes, rest) = read_bytes(data, 2)?;
    let value = U16LE::ref_from_bytes(bytes)
        .map_err(|e| Error::Protocol(format!("read_u16: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read 3-byte little-endian unsigned integer.
#[inline]
pub fn read_u24(data: &[u8]) -> Result<(u32, &[u8])> {
    let (bytes, rest) = read_bytes(data, 3)?;
    let mut buf = [0u8; 4];
    buf[..3].copy_from_slice(bytes);
    Ok((u32::from_le_bytes(buf), rest))
}

/// Read 4-byte little-endian unsigned integer.
#[inline]
pub fn read_u32(data: &[u8]) -> Result<(u32, &[u8])> {
    let (bytes, rest) = read_bytes(data, 4)?;
    let value = U32LE::ref_from_bytes(bytes)
        .map_err(|e| Error::Protocol(format!("read_u32: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read 8-byte little-endian unsigned integer.
#[inline]
pub fn read_u64(data: &[u8]) -> Result<(u64, &[u8])> {
    let (bytes, rest) = read_bytes(data, 8)?;
    let value = U64LE::ref_from_bytes(bytes)
        .map_err(|e| Error::Protocol(format!("read_u64: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read fixed-length bytes.
#[inline]
pub fn read_bytes(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if data.len() < len {
        return Err(Error::Protocol(format!(
            "read_bytes: buffer too short: {} < {}",
            data.len(),
            len
        )));
    }
    Ok(data.split_at(len))
}

/// Read a length-encoded integer.
///
/// `0xFB` (NULL in text rows) is rejected here; callers that accept NULL
/// check for it before calling.
#[inline]
pub fn read_lenenc_int(data: &[u8]) -> Result<(u64, &[u8])> {
    let (first, rest) = read_u8(data)?;
    match first {
        0xFC => {
            let (value, rest) = read_u16(rest)?;
            Ok((u64::from(value), rest))
        }
        0xFD => {
            let (value, rest) = read_u24(rest)?;
            Ok((u64::from(value), rest))
        }
        0xFE => read_u64(rest),
        0xFB | 0xFF => Err(Error::Protocol(format!(
            "read_lenenc_int: invalid first byte 0x{:02X}",
            first
        ))),
        _ => Ok((u64::from(first), rest)),
    }
}

/// Read a length-encoded string.
#[inline]
pub fn read_lenenc_bytes(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = read_lenenc_int(data)?;
    let len = usize::try_from(len)
        .map_err(|_| Error::Protocol(format!("read_lenenc_bytes: length too large: {}", len)))?;
    read_bytes(rest, len)
}

/// Read a length-encoded string as &str.
#[inline]
pub fn read_lenenc_str(data: &[u8]) -> Result<(&str, &[u8])> {
    let (bytes, rest) = read_lenenc_bytes(data)?;
    let s = simdutf8::compat::from_utf8(bytes)
        .map_err(|e| Error::Protocol(format!("read_lenenc_str: invalid UTF-8: {e}")))?;
    Ok((s, rest))
}

/// Write 1-byte unsigned integer.
#[inline]
pub fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

/// Write 4-byte little-endian unsigned integer.
#[inline]
pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Encode a packet header for a payload of `len` bytes.
///
/// `len` must not exceed [`MAX_FRAME_PAYLOAD`].
#[inline]
pub fn packet_header(len: usize, sequence_id: u8) -> [u8; HEADER_LEN] {
    let len = (len as u32).to_le_bytes();
    [len[0], len[1], len[2], sequence_id]
}
