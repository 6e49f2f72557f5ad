//! MySQL wire protocol implementation.
//!
//! This module contains the low-level protocol encoding and decoding.
//!
//! # Structure
//!
//! - `codec`: Low-level encoding/decoding primitives and packet framing
//! - `command`: Client → Server command packets
//! - `response`: OK, EOF and ERR packets
//! - `column`: Column definitions
//! - `row`: Binary protocol rows
//! - `types`: Common protocol types (ServerStatus, ColumnType, ColumnFlags)

pub mod codec;
pub mod column;
pub mod command;
pub mod response;
pub mod row;
pub mod types;

// Re-export commonly used types
pub use column::ColumnDefinition;
pub use row::BinaryRowPayload;
pub use types::{ColumnFlags, ColumnType, ServerStatus};
