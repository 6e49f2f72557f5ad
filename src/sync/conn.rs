//! Blocking packet connection.

use std::io::{Read, Write};

use crate::buffer_set::BufferSet;
use crate::error::{Error, Result};
use crate::opts::Opts;
use crate::protocol::ColumnDefinition;
use crate::protocol::codec::{HEADER_LEN, MAX_FRAME_PAYLOAD, packet_header};
use crate::protocol::types::ServerStatus;

use super::cursor::CursorRows;

/// Packet-level operations a cursor needs from its connection.
///
/// The connection is shared with every other protocol exchange on the same
/// stream: sequence ids and status flags set here are visible to the next
/// command, and a broken connection stays broken.
pub trait Connection {
    /// Reserve an outgoing packet for a payload of exactly `payload_len` bytes.
    ///
    /// The returned buffer already holds the packet header placeholder; the
    /// caller appends the payload and then calls [`write_packet`](Self::write_packet).
    /// Fails with [`Error::BadConnectionNoWrite`] when no buffer can be
    /// provided, in which case nothing has been written.
    fn take_write_buffer(&mut self, payload_len: usize) -> Result<&mut Vec<u8>>;

    /// Frame and send the packet built in the write buffer.
    fn write_packet(&mut self) -> Result<()>;

    /// Read the next packet and return its payload.
    ///
    /// A packet larger than the connection accepts is a protocol error.
    fn read_packet(&mut self) -> Result<&[u8]>;

    /// Reset the packet sequence id. Every command starts a new sequence.
    fn reset_sequence(&mut self);

    /// Status flags from the most recent OK or EOF packet.
    fn status(&self) -> ServerStatus;

    /// Record status flags from an OK or EOF packet.
    fn set_status(&mut self, status: ServerStatus);

    /// Invalidate the connection; later calls fail fast.
    fn mark_broken(&mut self);

    /// Check if the connection is broken.
    fn is_broken(&self) -> bool;
}

/// Packet connection over a blocking stream.
///
/// The stream must already be past the handshake: `Conn` only frames
/// command-phase packets.
pub struct Conn<S> {
    stream: S,
    buffer_set: BufferSet,
    sequence_id: u8,
    status: ServerStatus,
    fetch_size: u32,
    max_allowed_packet: usize,
    is_broken: bool,
}

impl<S: Read + Write> Conn<S> {
    /// Wrap an authenticated stream.
    pub fn new(stream: S, opts: &Opts) -> Self {
        Self {
            stream,
            buffer_set: BufferSet::new(),
            sequence_id: 0,
            status: ServerStatus::default(),
            fetch_size: opts.fetch_size,
            max_allowed_packet: opts.max_allowed_packet,
            is_broken: false,
        }
    }

    /// Open a cursor on a statement executed with CURSOR_TYPE_READ_ONLY.
    ///
    /// `columns` is the column metadata the server sent in the execute
    /// response. Rows are fetched in batches of [`Opts::fetch_size`].
    pub fn cursor(
        &mut self,
        statement_id: u32,
        columns: Vec<ColumnDefinition>,
    ) -> Result<CursorRows<'_, Self>> {
        let fetch_size = self.fetch_size;
        CursorRows::new(self, statement_id, columns, fetch_size)
    }

    /// Get a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Get a mutable reference to the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Consume the connection and return the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn read_frame_into_buffer(&mut self) -> Result<usize> {
        let mut header = [0u8; HEADER_LEN];
        self.stream.read_exact(&mut header)?;
        let len = usize::from(header[0])
            | (usize::from(header[1]) << 8)
            | (usize::from(header[2]) << 16);

        if header[3] != self.sequence_id {
            return Err(Error::Protocol(format!(
                "packets out of sync: expected sequence {}, got {}",
                self.sequence_id, header[3]
            )));
        }
        self.sequence_id = self.sequence_id.wrapping_add(1);

        let start = self.buffer_set.read_buffer.len();
        if start + len > self.max_allowed_packet {
            return Err(Error::Protocol(format!(
                "packet of {} bytes exceeds max_allowed_packet ({})",
                start + len,
                self.max_allowed_packet
            )));
        }
        self.buffer_set.read_buffer.resize(start + len, 0);
        self.stream
            .read_exact(&mut self.buffer_set.read_buffer[start..])?;
        Ok(len)
    }

    fn broken_on_err<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result
            && (e.is_connection_broken() || matches!(e, Error::Protocol(_)))
        {
            self.mark_broken();
        }
        result
    }
}

impl<S: Read + Write> Connection for Conn<S> {
    fn take_write_buffer(&mut self, payload_len: usize) -> Result<&mut Vec<u8>> {
        if self.is_broken {
            tracing::warn!("cannot take write buffer: connection is broken");
            return Err(Error::BadConnectionNoWrite);
        }
        if payload_len > self.max_allowed_packet || payload_len >= MAX_FRAME_PAYLOAD {
            tracing::warn!(
                payload_len,
                max_allowed_packet = self.max_allowed_packet,
                "cannot take write buffer: packet too large"
            );
            return Err(Error::BadConnectionNoWrite);
        }

        let buf = &mut self.buffer_set.write_buffer;
        buf.clear();
        buf.reserve(HEADER_LEN + payload_len);
        buf.extend_from_slice(&[0; HEADER_LEN]);
        Ok(buf)
    }

    fn write_packet(&mut self) -> Result<()> {
        let payload_len = self
            .buffer_set
            .write_buffer
            .len()
            .checked_sub(HEADER_LEN)
            .ok_or_else(|| Error::Protocol("write buffer is missing its header".into()))?;

        let header = packet_header(payload_len, self.sequence_id);
        self.buffer_set.write_buffer[..HEADER_LEN].copy_from_slice(&header);
        self.sequence_id = self.sequence_id.wrapping_add(1);

        let result = self
            .stream
            .write_all(&self.buffer_set.write_buffer)
            .and_then(|()| self.stream.flush())
            .map_err(Error::from);
        self.broken_on_err(result)
    }

    fn read_packet(&mut self) -> Result<&[u8]> {
        if self.is_broken {
            return Err(Error::BadConnection);
        }
        self.buffer_set.read_buffer.clear();
        loop {
            let result = self.read_frame_into_buffer();
            if self.broken_on_err(result)? < MAX_FRAME_PAYLOAD {
                break;
            }
        }
        Ok(&self.buffer_set.read_buffer)
    }

    fn reset_sequence(&mut self) {
        self.sequence_id = 0;
    }

    fn status(&self) -> ServerStatus {
        self.status
    }

    fn set_status(&mut self, status: ServerStatus) {
        self.status = status;
    }

    fn mark_broken(&mut self) {
        if !self.is_broken {
            tracing::debug!("marking connection as broken");
        }
        self.is_broken = true;
    }

    fn is_broken(&self) -> bool {
        self.is_broken
    }
}
