//! Client → server command packets.
//!
//! Encoders append the command payload to a buffer whose packet header has
//! already been reserved by the connection.

use super::codec::{write_u32, write_u8};

/// Command tag bytes.
pub mod com {
    /// COM_STMT_RESET: reset the statement's cursor and long data
    pub const STMT_RESET: u8 = 0x1A;
    /// COM_STMT_FETCH: fetch rows from an open cursor
    pub const STMT_FETCH: u8 = 0x1C;
}

/// Payload length of COM_STMT_FETCH: command + statement id + row count.
pub const STMT_FETCH_LEN: usize = 1 + 4 + 4;

/// Payload length of a command carrying a single u32 argument.
pub const COMMAND_U32_LEN: usize = 1 + 4;

/// Write a COM_STMT_FETCH payload.
///
/// Asks the server for up to `num_rows` rows from the cursor opened on
/// `statement_id`.
pub fn write_stmt_fetch(buf: &mut Vec<u8>, statement_id: u32, num_rows: u32) {
    write_u8(buf, com::STMT_FETCH);
    write_u32(buf, statement_id);
    write_u32(buf, num_rows);
}

/// Write a command payload whose only argument is a u32 (e.g. COM_STMT_RESET).
pub fn write_command_u32(buf: &mut Vec<u8>, command: u8, arg: u32) {
    write_u8(buf, command);
    write_u32(buf, arg);
}
