//! Generic server responses: OK, EOF and ERR packets.

use crate::error::{Error, Result, ServerError};

use super::codec::{read_bytes, read_lenenc_int, read_u16, read_u8};
use super::types::ServerStatus;

/// Header byte of an OK packet.
pub const OK_HEADER: u8 = 0x00;
/// Header byte of an EOF packet (and of the OK packet that replaces it
/// when CLIENT_DEPRECATE_EOF is negotiated).
pub const EOF_HEADER: u8 = 0xFE;
/// Header byte of an ERR packet.
pub const ERR_HEADER: u8 = 0xFF;

/// Returns true if `payload` is an ERR packet.
#[inline]
pub fn is_err_packet(payload: &[u8]) -> bool {
    payload.first() == Some(&ERR_HEADER)
}

/// Returns true if `payload` terminates a row stream (EOF, or OK with an
/// EOF header).
#[inline]
pub fn is_eof_packet(payload: &[u8]) -> bool {
    payload.first() == Some(&EOF_HEADER) && payload.len() < super::codec::MAX_FRAME_PAYLOAD
}

/// OK packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OkPacket {
    /// Rows affected by the last statement
    pub affected_rows: u64,
    /// Last auto-increment id
    pub last_insert_id: u64,
    /// Server status flags
    pub status: ServerStatus,
    /// Number of warnings
    pub warnings: u16,
}

impl OkPacket {
    /// Parse an OK packet, including its header byte (`0x00` or `0xFE`).
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let (header, rest) = read_u8(payload)?;
        if header != OK_HEADER && header != EOF_HEADER {
            return Err(Error::Protocol(format!(
                "Expected OK packet, got header 0x{:02X}",
                header
            )));
        }
        let (affected_rows, rest) = read_lenenc_int(rest)?;
        let (last_insert_id, rest) = read_lenenc_int(rest)?;
        let (status, rest) = read_u16(rest)?;
        let (warnings, _info) = read_u16(rest)?;
        Ok(Self {
            affected_rows,
            last_insert_id,
            status: ServerStatus::new(status),
            warnings,
        })
    }
}

/// EOF packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EofPacket {
    /// Number of warnings
    pub warnings: u16,
    /// Server status flags
    pub status: ServerStatus,
}

impl EofPacket {
    /// Parse a row-stream terminator.
    ///
    /// Accepts both the classic 5-byte EOF packet and the OK packet with an
    /// `0xFE` header that servers send under CLIENT_DEPRECATE_EOF.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() >= 9 {
            let ok = OkPacket::parse(payload)?;
            return Ok(Self {
                warnings: ok.warnings,
                status: ok.status,
            });
        }
        let (header, rest) = read_u8(payload)?;
        if header != EOF_HEADER {
            return Err(Error::Protocol(format!(
                "Expected EOF packet, got header 0x{:02X}",
                header
            )));
        }
        let (warnings, rest) = read_u16(rest)?;
        let (status, _) = read_u16(rest)?;
        Ok(Self {
            warnings,
            status: ServerStatus::new(status),
        })
    }
}

/// Parse an ERR packet into a server error.
pub fn parse_err_packet(payload: &[u8]) -> Result<ServerError> {
    let (header, rest) = read_u8(payload)?;
    if header != ERR_HEADER {
        return Err(Error::Protocol(format!(
            "Expected ERR packet, got header 0x{:02X}",
            header
        )));
    }
    let (code, rest) = read_u16(rest)?;

    let (sql_state, rest) = match rest.split_first() {
        Some((&b'#', after)) => {
            let (state, rest) = read_bytes(after, 5)?;
            (Some(String::from_utf8_lossy(state).into_owned()), rest)
        }
        _ => (None, rest),
    };

    Ok(ServerError {
        code,
        sql_state,
        message: String::from_utf8_lossy(rest).into_owned(),
    })
}

/// Expect an OK packet; an ERR packet becomes [`Error::Server`].
pub fn expect_ok(payload: &[u8]) -> Result<OkPacket> {
    if is_err_packet(payload) {
        return Err(Error::Server(parse_err_packet(payload)?));
    }
    OkPacket::parse(payload)
}
