//! Column definitions (Protocol::ColumnDefinition41).

use crate::error::{Error, Result};

use super::codec::{read_lenenc_int, read_lenenc_str, read_u16, read_u32, read_u8};
use super::types::{ColumnFlags, ColumnType};

/// Metadata of a single result set column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Schema (database) name
    pub schema: String,
    /// Table alias
    pub table: String,
    /// Physical table name
    pub org_table: String,
    /// Column alias, as reported to the client
    pub name: String,
    /// Physical column name
    pub org_name: String,
    /// Character set number
    pub charset: u16,
    /// Maximum display length
    pub column_length: u32,
    /// Wire type
    pub column_type: ColumnType,
    /// Column flags
    pub flags: ColumnFlags,
    /// Number of decimals for numeric and temporal types
    pub decimals: u8,
}

impl ColumnDefinition {
    /// Create a column definition with only a name and a type.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            schema: String::new(),
            table: String::new(),
            org_table: String::new(),
            name: name.into(),
            org_name: String::new(),
            charset: 63,
            column_length: 0,
            column_type,
            flags: ColumnFlags::default(),
            decimals: 0,
        }
    }

    /// Set the column flags.
    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = ColumnFlags::new(flags);
        self
    }

    /// Parse a column definition packet payload.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let (_catalog, rest) = read_lenenc_str(payload)?;
        let (schema, rest) = read_lenenc_str(rest)?;
        let (table, rest) = read_lenenc_str(rest)?;
        let (org_table, rest) = read_lenenc_str(rest)?;
        let (name, rest) = read_lenenc_str(rest)?;
        let (org_name, rest) = read_lenenc_str(rest)?;

        let (fixed_len, rest) = read_lenenc_int(rest)?;
        if fixed_len < 0x0c {
            return Err(Error::Protocol(format!(
                "column definition: fixed-length fields too short: {}",
                fixed_len
            )));
        }
        let (charset, rest) = read_u16(rest)?;
        let (column_length, rest) = read_u32(rest)?;
        let (type_byte, rest) = read_u8(rest)?;
        let (flags, rest) = read_u16(rest)?;
        let (decimals, _filler) = read_u8(rest)?;

        let column_type = ColumnType::from_u8(type_byte).ok_or_else(|| {
            Error::Protocol(format!("column definition: unknown type 0x{:02X}", type_byte))
        })?;

        Ok(Self {
            schema: schema.to_string(),
            table: table.to_string(),
            org_table: org_table.to_string(),
            name: name.to_string(),
            org_name: org_name.to_string(),
            charset,
            column_length,
            column_type,
            flags: ColumnFlags::new(flags),
            decimals,
        })
    }
}
