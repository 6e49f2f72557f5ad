//! Synchronous MySQL cursor client.

mod conn;
mod cursor;
mod decoder;
mod teardown;

pub use conn::{Conn, Connection};
pub use cursor::{CursorRows, send_fetch_request};
pub use decoder::{BinaryRowDecoder, RowDecoder};
pub use teardown::Teardown;
