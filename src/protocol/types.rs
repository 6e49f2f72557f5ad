//! Common MySQL wire protocol types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Server status flags reported in OK and EOF packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerStatus(u16);

impl ServerStatus {
    /// A transaction is active
    pub const IN_TRANS: u16 = 0x0001;
    /// Autocommit mode is set
    pub const AUTOCOMMIT: u16 = 0x0002;
    /// More result sets follow
    pub const MORE_RESULTS_EXISTS: u16 = 0x0008;
    /// The server opened a read-only cursor for the statement
    pub const CURSOR_EXISTS: u16 = 0x0040;
    /// The last row of the cursor's result set has been sent
    pub const LAST_ROW_SENT: u16 = 0x0080;

    /// Create from the raw flag bits.
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// Get the raw flag bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Check whether all bits of `flag` are set.
    pub const fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// Returns true if the server reported that the cursor is exhausted.
    pub const fn last_row_sent(self) -> bool {
        self.contains(Self::LAST_ROW_SENT)
    }

    /// Returns true if a cursor is open for the last executed statement.
    pub const fn cursor_exists(self) -> bool {
        self.contains(Self::CURSOR_EXISTS)
    }
}

/// Column definition flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnFlags(u16);

impl ColumnFlags {
    /// Column cannot be NULL
    pub const NOT_NULL: u16 = 0x0001;
    /// Column is part of the primary key
    pub const PRI_KEY: u16 = 0x0002;
    /// Numeric column is unsigned
    pub const UNSIGNED: u16 = 0x0020;
    /// Column has binary collation
    pub const BINARY: u16 = 0x0080;

    /// Create from the raw flag bits.
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// Get the raw flag bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns true if the column is an unsigned integer type.
    pub const fn is_unsigned(self) -> bool {
        self.0 & Self::UNSIGNED != 0
    }
}

/// Column type as sent in column definitions and binary rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColumnType {
    Decimal = 0x00,
    Tiny = 0x01,
    Short = 0x02,
    Long = 0x03,
    Float = 0x04,
    Double = 0x05,
    Null = 0x06,
    Timestamp = 0x07,
    LongLong = 0x08,
    Int24 = 0x09,
    Date = 0x0a,
    Time = 0x0b,
    DateTime = 0x0c,
    Year = 0x0d,
    NewDate = 0x0e,
    VarChar = 0x0f,
    Bit = 0x10,
    Timestamp2 = 0x11,
    DateTime2 = 0x12,
    Time2 = 0x13,
    Vector = 0xf2,
    Json = 0xf5,
    NewDecimal = 0xf6,
    Enum = 0xf7,
    Set = 0xf8,
    TinyBlob = 0xf9,
    MediumBlob = 0xfa,
    LongBlob = 0xfb,
    Blob = 0xfc,
    VarString = 0xfd,
    String = 0xfe,
    Geometry = 0xff,
}

impl ColumnType {
    /// Create a ColumnType from a raw byte value.
    pub fn from_u8(value: u8) -> Option<Self> {
        let ty = match value {
            0x00 => ColumnType::Decimal,
            0x01 => ColumnType::Tiny,
            0x02 => ColumnType::Short,
            0x03 => ColumnType::Long,
            0x04 => ColumnType::Float,
            0x05 => ColumnType::Double,
            0x06 => ColumnType::Null,
            0x07 => ColumnType::Timestamp,
            0x08 => ColumnType::LongLong,
            0x09 => ColumnType::Int24,
            0x0a => ColumnType::Date,
            0x0b => ColumnType::Time,
            0x0c => ColumnType::DateTime,
            0x0d => ColumnType::Year,
            0x0e => ColumnType::NewDate,
            0x0f => ColumnType::VarChar,
            0x10 => ColumnType::Bit,
            0x11 => ColumnType::Timestamp2,
            0x12 => ColumnType::DateTime2,
            0x13 => ColumnType::Time2,
            0xf2 => ColumnType::Vector,
            0xf5 => ColumnType::Json,
            0xf6 => ColumnType::NewDecimal,
            0xf7 => ColumnType::Enum,
            0xf8 => ColumnType::Set,
            0xf9 => ColumnType::TinyBlob,
            0xfa => ColumnType::MediumBlob,
            0xfb => ColumnType::LongBlob,
            0xfc => ColumnType::Blob,
            0xfd => ColumnType::VarString,
            0xfe => ColumnType::String,
            0xff => ColumnType::Geometry,
            _ => return None,
        };
        Some(ty)
    }
}

/// Little-endian 16-bit unsigned integer for zerocopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct U16LE([u8; 2]);

impl U16LE {
    /// Create a new U16LE from a native u16.
    pub const fn new(value: u16) -> Self {
        Self(value.to_le_bytes())
    }

    /// Get the native u16 value.
    pub const fn get(self) -> u16 {
        u16::from_le_bytes(self.0)
    }
}

/// Little-endian 32-bit unsigned integer for zerocopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct U32LE([u8; 4]);

impl U32LE {
    /// Create a new U32LE from a native u32.
    pub const fn new(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    /// Get the native u32 value.
    pub const fn get(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

/// Little-endian 64-bit unsigned integer for zerocopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct U64LE([u8; 8]);

impl U64LE {
    /// Create a new U64LE from a native u64.
    pub const fn new(value: u64) -> Self {
        Self(value.to_le_bytes())
    }

    /// Get the native u64 value.
    pub const fn get(self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}
