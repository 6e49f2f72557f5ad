//! Server-side cursor for iterative row fetching.

use crate::error::{Error, Result};
use crate::protocol::ColumnDefinition;
use crate::protocol::command::{
    COMMAND_U32_LEN, STMT_FETCH_LEN, com, write_command_u32, write_stmt_fetch,
};
use crate::protocol::response::expect_ok;
use crate::value::Value;

use super::conn::Connection;
use super::decoder::{BinaryRowDecoder, RowDecoder};
use super::teardown::Teardown;

/// Upper bound on rows preallocated per batch, whatever the fetch size.
const MAX_PREALLOCATED_ROWS: usize = 4096;

/// Rows of a statement executed with a read-only server-side cursor.
///
/// Rows are requested from the server with COM_STMT_FETCH, `fetch_size` at a
/// time, and buffered locally. [`next_row`](Self::next_row) serves buffered
/// rows and only goes to the network once the buffer is drained and the
/// server has not yet reported the last row.
///
/// The cursor borrows its connection until [`close`](Self::close) or drop.
///
/// # Example
///
/// ```ignore
/// let mut rows = conn.cursor(statement_id, columns)?;
/// let mut row = vec![Value::Null; rows.column_count()];
/// while rows.next_row(&mut row)? {
///     process(&row);
/// }
/// rows.close()?;
/// ```
pub struct CursorRows<'conn, C: Connection + ?Sized, D: RowDecoder = BinaryRowDecoder> {
    conn: Option<&'conn mut C>,
    columns: Vec<ColumnDefinition>,
    buffer: Vec<Vec<Value>>,
    ptr: usize,
    last_row_sent: bool,
    fetch_size: u32,
    statement_id: u32,
    decoder: D,
    teardown: Teardown<'conn>,
}

impl<'conn, C: Connection + ?Sized> CursorRows<'conn, C, BinaryRowDecoder> {
    /// Create a cursor over binary protocol rows.
    ///
    /// `statement_id` identifies a statement the server executed with
    /// CURSOR_TYPE_READ_ONLY; `columns` is the metadata from that execution.
    pub fn new(
        conn: &'conn mut C,
        statement_id: u32,
        columns: Vec<ColumnDefinition>,
        fetch_size: u32,
    ) -> Result<Self> {
        Self::with_decoder(conn, statement_id, columns, fetch_size, BinaryRowDecoder)
    }
}

impl<'conn, C: Connection + ?Sized, D: RowDecoder> CursorRows<'conn, C, D> {
    /// Create a cursor with a custom row decoder.
    pub fn with_decoder(
        conn: &'conn mut C,
        statement_id: u32,
        columns: Vec<ColumnDefinition>,
        fetch_size: u32,
        decoder: D,
    ) -> Result<Self> {
        if fetch_size == 0 {
            return Err(Error::InvalidUsage("fetch size must be positive".into()));
        }
        Ok(Self {
            conn: Some(conn),
            columns,
            buffer: Vec::new(),
            ptr: 0,
            last_row_sent: false,
            fetch_size,
            statement_id,
            decoder,
            teardown: Teardown::new(),
        })
    }

    /// Register an action to run when the cursor is closed.
    ///
    /// Replaces any previously registered action. The action runs at most
    /// once, on the first call to [`close`](Self::close) (or on drop).
    pub fn set_teardown<F: FnOnce() + 'conn>(&mut self, action: F) {
        self.teardown.set(action);
    }

    /// Column names, in result set order.
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Full column metadata.
    pub fn column_definitions(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Number of columns in each row.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Server-assigned statement id the cursor belongs to.
    pub fn statement_id(&self) -> u32 {
        self.statement_id
    }

    /// Rows requested per fetch round-trip.
    pub fn fetch_size(&self) -> u32 {
        self.fetch_size
    }

    /// Check if the server has sent the last row. Buffered rows may remain.
    pub fn is_exhausted(&self) -> bool {
        self.last_row_sent
    }

    /// Check if the cursor has released its connection.
    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Move the next row into `dest`.
    ///
    /// `dest` must have exactly [`column_count`](Self::column_count) slots.
    /// Returns `Ok(false)` once every row has been returned.
    ///
    /// Blocks on a fetch round-trip when the local buffer is drained and the
    /// server has more rows. A failure to send the fetch request invalidates
    /// the connection.
    pub fn next_row(&mut self, dest: &mut [Value]) -> Result<bool> {
        debug_assert_eq!(
            dest.len(),
            self.columns.len(),
            "destination length must equal the column count"
        );

        if self.conn.is_none() {
            return Err(Error::BadConnection);
        }

        if self.ptr >= self.buffer.len() && !self.last_row_sent {
            self.fetch_and_read_rows()?;
        }

        let Some(row) = self.buffer.get_mut(self.ptr) else {
            return Ok(false);
        };
        for (slot, value) in dest.iter_mut().zip(row.drain(..)) {
            *slot = value;
        }
        self.ptr += 1;
        Ok(true)
    }

    /// Close the cursor.
    ///
    /// Runs the teardown action, resets the cursor on the server with
    /// COM_STMT_RESET and releases the connection. The statement itself stays
    /// prepared. The connection is released even if the reset fails.
    ///
    /// Calling `close` again, or on a cursor whose connection is broken,
    /// returns [`Error::BadConnection`] without touching the network.
    pub fn close(&mut self) -> Result<()> {
        self.teardown.run();

        let conn = match self.conn.take() {
            Some(conn) if !conn.is_broken() => conn,
            _ => return Err(Error::BadConnection),
        };

        tracing::debug!(statement_id = self.statement_id, "resetting cursor");
        if let Err(e) = send_command_u32(conn, com::STMT_RESET, self.statement_id) {
            return Err(mark_bad_conn(conn, e));
        }

        let reply = conn.read_packet().and_then(expect_ok);
        match reply {
            Ok(ok) => {
                conn.set_status(ok.status);
                Ok(())
            }
            Err(e) if e.is_connection_broken() || matches!(e, Error::Protocol(_)) => {
                Err(mark_bad_conn(conn, e))
            }
            Err(e) => Err(e),
        }
    }

    /// Run one fetch round-trip and replace the buffer with its rows.
    fn fetch_and_read_rows(&mut self) -> Result<()> {
        let conn = self.conn.as_deref_mut().ok_or(Error::BadConnection)?;
        if conn.is_broken() {
            return Err(Error::BadConnection);
        }

        if let Err(e) = send_fetch_request(conn, self.statement_id, self.fetch_size) {
            return Err(mark_bad_conn(conn, e));
        }

        let capacity = usize::try_from(self.fetch_size)
            .unwrap_or(MAX_PREALLOCATED_ROWS)
            .min(MAX_PREALLOCATED_ROWS);
        let mut buffer = Vec::with_capacity(capacity);
        let read = loop {
            match self.decoder.read_row(conn, &self.columns) {
                Ok(Some(row)) => buffer.push(row),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        // A batch that failed to decode may still have carried the last row
        if !conn.is_broken() && conn.status().last_row_sent() {
            self.last_row_sent = true;
        }
        read?;
        tracing::debug!(
            statement_id = self.statement_id,
            rows = buffer.len(),
            last_row_sent = self.last_row_sent,
            "fetched cursor batch"
        );

        self.buffer = buffer;
        self.ptr = 0;
        Ok(())
    }
}

impl<C: Connection + ?Sized, D: RowDecoder> Drop for CursorRows<'_, C, D> {
    fn drop(&mut self) {
        if self.conn.is_some() {
            let _ = self.close();
        }
    }
}

/// Send COM_STMT_FETCH for `num_rows` rows of the cursor on `statement_id`.
///
/// Starts a new packet sequence. If the connection cannot provide a write
/// buffer the error is [`Error::BadConnectionNoWrite`] and nothing was sent.
pub fn send_fetch_request<C: Connection + ?Sized>(
    conn: &mut C,
    statement_id: u32,
    num_rows: u32,
) -> Result<()> {
    conn.reset_sequence();
    let buf = conn.take_write_buffer(STMT_FETCH_LEN)?;
    write_stmt_fetch(buf, statement_id, num_rows);
    conn.write_packet()
}

fn send_command_u32<C: Connection + ?Sized>(conn: &mut C, command: u8, arg: u32) -> Result<()> {
    conn.reset_sequence();
    let buf = conn.take_write_buffer(COMMAND_U32_LEN)?;
    write_command_u32(buf, command, arg);
    conn.write_packet()
}

/// Invalidate the connection. A write that never started is reported as a
/// plain bad connection.
fn mark_bad_conn<C: Connection + ?Sized>(conn: &mut C, err: Error) -> Error {
    conn.mark_broken();
    match err {
        Error::BadConnectionNoWrite => Error::BadConnection,
        other => other,
    }
}
