//! Column values decoded from binary protocol rows.

use crate::error::{Error, Result};
use crate::protocol::codec::{read_bytes, read_lenenc_bytes, read_u16, read_u32, read_u64, read_u8};
use crate::protocol::{BinaryRowPayload, ColumnDefinition, ColumnType};

/// A single decoded column value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Signed integer (TINYINT .. BIGINT, YEAR)
    Int(i64),
    /// Unsigned integer (UNSIGNED columns)
    UInt(u64),
    /// FLOAT
    Float(f32),
    /// DOUBLE
    Double(f64),
    /// String, blob, decimal, JSON, bit, enum, set, geometry
    Bytes(Vec<u8>),
    /// DATE, DATETIME, TIMESTAMP
    Date {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        micros: u32,
    },
    /// TIME
    Time {
        negative: bool,
        days: u32,
        hours: u8,
        minutes: u8,
        seconds: u8,
        micros: u32,
    },
}

impl Value {
    /// Returns true if the value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Decode every column of a binary row.
pub fn decode_row(row: &BinaryRowPayload<'_>, columns: &[ColumnDefinition]) -> Result<Vec<Value>> {
    if row.num_columns() != columns.len() {
        return Err(Error::Decode(format!(
            "row has {} columns, metadata describes {}",
            row.num_columns(),
            columns.len()
        )));
    }

    let mut values = Vec::with_capacity(columns.len());
    let mut data = row.values();
    for (idx, column) in columns.iter().enumerate() {
        if row.is_null(idx) {
            values.push(Value::Null);
            continue;
        }
        let (value, rest) = decode_value(data, column)?;
        values.push(value);
        data = rest;
    }

    if !data.is_empty() {
        return Err(Error::Decode(format!(
            "{} trailing bytes after last column",
            data.len()
        )));
    }
    Ok(values)
}

/// Decode one non-NULL binary value and return the remaining bytes.
pub fn decode_value<'a>(data: &'a [u8], column: &ColumnDefinition) -> Result<(Value, &'a [u8])> {
    let unsigned = column.flags.is_unsigned();
    let decoded = match column.column_type {
        ColumnType::Null => Ok((Value::Null, data)),
        ColumnType::Tiny => read_u8(data).map(|(v, rest)| {
            let value = if unsigned {
                Value::UInt(u64::from(v))
            } else {
                Value::Int(i64::from(v as i8))
            };
            (value, rest)
        }),
        ColumnType::Short | ColumnType::Year => read_u16(data).map(|(v, rest)| {
            let value = if unsigned {
                Value::UInt(u64::from(v))
            } else {
                Value::Int(i64::from(v as i16))
            };
            (value, rest)
        }),
        ColumnType::Long | ColumnType::Int24 => read_u32(data).map(|(v, rest)| {
            let value = if unsigned {
                Value::UInt(u64::from(v))
            } else {
                Value::Int(i64::from(v as i32))
            };
            (value, rest)
        }),
        ColumnType::LongLong => read_u64(data).map(|(v, rest)| {
            let value = if unsigned {
                Value::UInt(v)
            } else {
                Value::Int(v as i64)
            };
            (value, rest)
        }),
        ColumnType::Float => {
            read_u32(data).map(|(v, rest)| (Value::Float(f32::from_bits(v)), rest))
        }
        ColumnType::Double => {
            read_u64(data).map(|(v, rest)| (Value::Double(f64::from_bits(v)), rest))
        }
        ColumnType::Date
        | ColumnType::NewDate
        | ColumnType::DateTime
        | ColumnType::DateTime2
        | ColumnType::Timestamp
        | ColumnType::Timestamp2 => decode_date(data),
        ColumnType::Time | ColumnType::Time2 => decode_time(data),
        _ => read_lenenc_bytes(data).map(|(v, rest)| (Value::Bytes(v.to_vec()), rest)),
    };

    decoded.map_err(|e| match e {
        Error::Protocol(msg) => Error::Decode(format!("column '{}': {}", column.name, msg)),
        other => other,
    })
}

fn decode_date(data: &[u8]) -> Result<(Value, &[u8])> {
    let (len, rest) = read_u8(data)?;
    if !matches!(len, 0 | 4 | 7 | 11) {
        return Err(Error::Protocol(format!("invalid DATETIME length: {}", len)));
    }
    let (body, rest) = read_bytes(rest, usize::from(len))?;

    // Omitted trailing fields are zero.
    let mut f = [0u8; 11];
    f[..body.len()].copy_from_slice(body);

    Ok((
        Value::Date {
            year: u16::from_le_bytes([f[0], f[1]]),
            month: f[2],
            day: f[3],
            hour: f[4],
            minute: f[5],
            second: f[6],
            micros: u32::from_le_bytes([f[7], f[8], f[9], f[10]]),
        },
        rest,
    ))
}

fn decode_time(data: &[u8]) -> Result<(Value, &[u8])> {
    let (len, rest) = read_u8(data)?;
    if !matches!(len, 0 | 8 | 12) {
        return Err(Error::Protocol(format!("invalid TIME length: {}", len)));
    }
    let (body, rest) = read_bytes(rest, usize::from(len))?;

    let mut f = [0u8; 12];
    f[..body.len()].copy_from_slice(body);

    Ok((
        Value::Time {
            negative: f[0] == 1,
            days: u32::from_le_bytes([f[1], f[2], f[3], f[4]]),
            hours: f[5],
            minutes: f[6],
            seconds: f[7],
            micros: u32::from_le_bytes([f[8], f[9], f[10], f[11]]),
        },
        rest,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ColumnFlags;

    #[test]
    fn test_signed_and_unsigned() {
        let signed = ColumnDefinition::new("a", ColumnType::Tiny);
        let unsigned = ColumnDefinition::new("b", ColumnType::Tiny).with_flags(ColumnFlags::UNSIGNED);

        assert_eq!(decode_value(&[0xFF], &signed).unwrap().0, Value::Int(-1));
        assert_eq!(decode_value(&[0xFF], &unsigned).unwrap().0, Value::UInt(255));

        let long = ColumnDefinition::new("c", ColumnType::LongLong);
        let bytes = (-42i64).to_le_bytes();
        let (value, rest) = decode_value(&bytes, &long).unwrap();
        assert_eq!(value, Value::Int(-42));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_double() {
        let col = ColumnDefinition::new("d", ColumnType::Double);
        let (value, _) = decode_value(&1.5f64.to_le_bytes(), &col).unwrap();
        assert_eq!(value, Value::Double(1.5));
    }

    #[test]
    fn test_lenenc_string() {
        let col = ColumnDefinition::new("s", ColumnType::VarString);
        let (value, rest) = decode_value(b"\x03abc\x01", &col).unwrap();
        assert_eq!(value, Value::Bytes(b"abc".to_vec()));
        assert_eq!(rest, &[0x01]);
    }

    #[test]
    fn test_datetime() {
        let col = ColumnDefinition::new("ts", ColumnType::DateTime);
        let mut data = vec![11];
        data.extend_from_slice(&2024u16.to_le_bytes());
        data.extend_from_slice(&[2, 29, 13, 45, 30]);
        data.extend_from_slice(&123_456u32.to_le_bytes());

        let (value, rest) = decode_value(&data, &col).unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            value,
            Value::Date {
                year: 2024,
                month: 2,
                day: 29,
                hour: 13,
                minute: 45,
                second: 30,
                micros: 123_456,
            }
        );

        let (zero, _) = decode_value(&[0], &col).unwrap();
        assert!(matches!(zero, Value::Date { year: 0, .. }));
        assert!(decode_value(&[5, 0, 0, 0, 0, 0], &col).is_err());
    }

    #[test]
    fn test_time() {
        let col = ColumnDefinition::new("t", ColumnType::Time);
        let mut data = vec![8, 1];
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[3, 4, 5]);

        let (value, _) = decode_value(&data, &col).unwrap();
        assert_eq!(
            value,
            Value::Time {
                negative: true,
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
                micros: 0,
            }
        );
    }

    #[test]
    fn test_decode_row_with_null() {
        let columns = vec![
            ColumnDefinition::new("id", ColumnType::Long),
            ColumnDefinition::new("name", ColumnType::VarString),
        ];
        // column 1 NULL -> bit 3
        let mut payload = vec![0x00, 0b0000_1000];
        payload.extend_from_slice(&7u32.to_le_bytes());
        let row = BinaryRowPayload::parse(&payload, 2).unwrap();

        let values = decode_row(&row, &columns).unwrap();
        assert_eq!(values, vec![Value::Int(7), Value::Null]);
    }

    #[test]
    fn test_decode_row_truncated() {
        let columns = vec![ColumnDefinition::new("id", ColumnType::LongLong)];
        let payload = [0x00, 0x00, 0x01, 0x02];
        let row = BinaryRowPayload::parse(&payload, 1).unwrap();
        assert!(matches!(decode_row(&row, &columns), Err(Error::Decode(_))));
    }
}
