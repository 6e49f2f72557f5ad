//! Binary protocol result rows (ProtocolBinary::ResultsetRow).

use crate::error::{Error, Result};

/// Header byte of a binary row packet.
pub const ROW_HEADER: u8 = 0x00;

/// Bit offset of the first column in the NULL bitmap.
const NULL_BITMAP_OFFSET: usize = 2;

/// A binary row split into its NULL bitmap and value bytes.
#[derive(Debug, Clone, Copy)]
pub struct BinaryRowPayload<'a> {
    null_bitmap: &'a [u8],
    values: &'a [u8],
    num_columns: usize,
}

impl<'a> BinaryRowPayload<'a> {
    /// Split a row packet payload for a result set with `num_columns` columns.
    pub fn parse(payload: &'a [u8], num_columns: usize) -> Result<Self> {
        let (&header, rest) = payload
            .split_first()
            .ok_or_else(|| Error::Protocol("binary row: empty packet".into()))?;
        if header != ROW_HEADER {
            return Err(Error::Protocol(format!(
                "binary row: unexpected header 0x{:02X}",
                header
            )));
        }

        let bitmap_len = (num_columns + 7 + NULL_BITMAP_OFFSET) / 8;
        if rest.len() < bitmap_len {
            return Err(Error::Protocol(format!(
                "binary row: NULL bitmap truncated: {} < {}",
                rest.len(),
                bitmap_len
            )));
        }
        let (null_bitmap, values) = rest.split_at(bitmap_len);

        Ok(Self {
            null_bitmap,
            values,
            num_columns,
        })
    }

    /// Returns true if column `idx` is NULL.
    pub fn is_null(&self, idx: usize) -> bool {
        let bit = idx + NULL_BITMAP_OFFSET;
        self.null_bitmap
            .get(bit / 8)
            .is_some_and(|byte| byte & (1 << (bit % 8)) != 0)
    }

    /// Raw bytes of all non-NULL values, in column order.
    pub fn values(&self) -> &'a [u8] {
        self.values
    }

    /// Number of columns in this row.
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_bitmap() {
        // 3 columns -> (3 + 9) / 8 = 1 byte; column 1 NULL -> bit 3
        let payload = [0x00, 0b0000_1000, 0x2A];
        let row = BinaryRowPayload::parse(&payload, 3).unwrap();
        assert!(!row.is_null(0));
        assert!(row.is_null(1));
        assert!(!row.is_null(2));
        assert_eq!(row.values(), &[0x2A]);
        assert_eq!(row.num_columns(), 3);
    }

    #[test]
    fn test_bitmap_spans_bytes() {
        // 7 columns -> (7 + 9) / 8 = 2 bytes; column 6 -> bit 8
        let payload = [0x00, 0x00, 0x01];
        let row = BinaryRowPayload::parse(&payload, 7).unwrap();
        assert!(row.is_null(6));
        assert!(!row.is_null(5));
        assert!(row.values().is_empty());
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(BinaryRowPayload::parse(&[0xFE, 0x00], 1).is_err());
        assert!(BinaryRowPayload::parse(&[0x00], 1).is_err());
    }
}
