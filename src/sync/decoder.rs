//! Row decoding from the wire.

use crate::error::{Error, Result};
use crate::protocol::response::{EofPacket, is_eof_packet, is_err_packet, parse_err_packet};
use crate::protocol::{BinaryRowPayload, ColumnDefinition};
use crate::value::{Value, decode_row};

use super::conn::Connection;

/// Reads the rows of one fetch batch from a connection.
///
/// Call [`read_row`](Self::read_row) until it returns `Ok(None)`, which ends
/// the batch normally. An implementation that sees the batch terminator must
/// record the terminator's status flags with [`Connection::set_status`].
/// A row that fails to decode should not leave the rest of its batch unread
/// on the connection.
pub trait RowDecoder {
    /// Read and decode the next row, or `None` at the end of the batch.
    fn read_row<C: Connection + ?Sized>(
        &mut self,
        conn: &mut C,
        columns: &[ColumnDefinition],
    ) -> Result<Option<Vec<Value>>>;
}

/// Decoder for binary protocol rows (COM_STMT_EXECUTE / COM_STMT_FETCH).
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryRowDecoder;

impl RowDecoder for BinaryRowDecoder {
    fn read_row<C: Connection + ?Sized>(
        &mut self,
        conn: &mut C,
        columns: &[ColumnDefinition],
    ) -> Result<Option<Vec<Value>>> {
        let payload = conn.read_packet()?;

        if is_err_packet(payload) {
            return Err(Error::Server(parse_err_packet(payload)?));
        }
        if is_eof_packet(payload) {
            let eof = EofPacket::parse(payload)?;
            conn.set_status(eof.status);
            return Ok(None);
        }

        let decoded =
            BinaryRowPayload::parse(payload, columns.len()).and_then(|row| decode_row(&row, columns));
        match decoded {
            Ok(values) => Ok(Some(values)),
            Err(e) => {
                skip_to_batch_end(conn)?;
                Err(e)
            }
        }
    }
}

/// Discard the remaining rows of a batch after a row failed to decode.
///
/// Leaves the connection at the packet after the batch terminator, with the
/// terminator's status flags recorded.
fn skip_to_batch_end<C: Connection + ?Sized>(conn: &mut C) -> Result<()> {
    loop {
        let payload = conn.read_packet()?;
        if is_err_packet(payload) {
            return Ok(());
        }
        if is_eof_packet(payload) {
            let eof = EofPacket::parse(payload)?;
            conn.set_status(eof.status);
            return Ok(());
        }
    }
}
