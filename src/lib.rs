//! Server-side cursor streaming for the MySQL binary protocol.
//!
//! A statement executed with `CURSOR_TYPE_READ_ONLY` leaves its result set
//! on the server. [`sync::CursorRows`] pulls it down in batches with
//! COM_STMT_FETCH and hands rows out one at a time.
//!
//! # Features
//!
//! - **Bounded memory**: at most `fetch_size` rows are buffered locally
//! - **Server-driven end of data**: iteration stops on the last-row-sent status flag
//! - **Idempotent close**: the cursor is reset on the server once, the teardown action runs once
//!
//! # Example
//!
//! ```no_run
//! use std::net::TcpStream;
//! use zero_mysql_cursor::sync::Conn;
//! use zero_mysql_cursor::{ColumnDefinition, ColumnType, Opts, Value};
//!
//! fn main() -> zero_mysql_cursor::error::Result<()> {
//!     let opts = Opts::try_from("mysql://localhost/app?fetch_size=100")?;
//!     // The stream must already be authenticated and the statement executed
//!     // with CURSOR_TYPE_READ_ONLY.
//!     let stream = TcpStream::connect("localhost:3306")?;
//!     let mut conn = Conn::new(stream, &opts);
//!
//!     let columns = vec![ColumnDefinition::new("id", ColumnType::LongLong)];
//!     let mut rows = conn.cursor(1, columns)?;
//!     let mut row = vec![Value::Null; rows.column_count()];
//!     while rows.next_row(&mut row)? {
//!         println!("{:?}", row);
//!     }
//!     rows.close()
//! }
//! ```

pub mod buffer_set;
pub mod error;
pub mod opts;
pub mod protocol;
pub mod value;

#[cfg(feature = "sync")]
pub mod sync;

pub use buffer_set::BufferSet;
pub use error::{Error, Result, ServerError};
pub use opts::Opts;
pub use protocol::{ColumnDefinition, ColumnFlags, ColumnType, ServerStatus};
pub use value::Value;
