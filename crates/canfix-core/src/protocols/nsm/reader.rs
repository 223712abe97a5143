use std::ops::Range;

use super::error::NsmError;

/// Bounds-checked access to a node specific frame payload.
///
/// Offsets are relative to the full frame payload, control code included,
/// so they line up with the constants in `layout`.
pub struct NsmReader<'a> {
    payload: &'a [u8],
}

impl<'a> NsmReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn dlc(&self) -> usize {
        self.payload.len()
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, NsmError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(NsmError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], NsmError> {
        self.payload.get(range.clone()).ok_or(NsmError::TooShort {
            needed: range.end,
            actual: self.payload.len(),
        })
    }

    /// Reads a 24-bit little-endian unsigned value.
    pub fn read_u24_le(&self, range: Range<usize>) -> Result<u32, NsmError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 3 {
            return Err(NsmError::TooShort {
                needed: 3,
                actual: bytes.len(),
            });
        }
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
    }
}

/// Narrows a caller-supplied value to a byte field, rejecting values above 255.
pub fn checked_u8(field: &'static str, value: u32) -> Result<u8, NsmError> {
    u8::try_from(value).map_err(|_| NsmError::FieldRange {
        field,
        value,
        expected: "0..=255",
    })
}

/// Little-endian bytes of a 24-bit value; the top byte is dropped.
pub fn u24_le_bytes(value: u32) -> [u8; 3] {
    let [lo, mid, hi, _] = value.to_le_bytes();
    [lo, mid, hi]
}

#[cfg(test)]
mod tests {
    use super::{NsmReader, checked_u8, u24_le_bytes};
    use crate::protocols::nsm::error::NsmError;

    #[test]
    fn read_u24_le_assembles_low_byte_first() {
        let payload = [0x00, 0x01, 0x56, 0x34, 0x12];
        let reader = NsmReader::new(&payload);
        assert_eq!(reader.read_u24_le(2..5).unwrap(), 0x12_3456);
    }

    #[test]
    fn read_u8_past_end() {
        let payload = [0x00];
        let reader = NsmReader::new(&payload);
        let err = reader.read_u8(1).unwrap_err();
        assert_eq!(
            err,
            NsmError::TooShort {
                needed: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn read_u8_on_empty_payload_reports_actual() {
        let reader = NsmReader::new(&[]);
        let err = reader.read_u8(0).unwrap_err();
        assert!(err.to_string().contains("payload too short"));
    }

    #[test]
    fn checked_u8_bounds() {
        assert_eq!(checked_u8("device", 0).unwrap(), 0);
        assert_eq!(checked_u8("device", 255).unwrap(), 255);
        let err = checked_u8("device", 256).unwrap_err();
        assert!(matches!(
            err,
            NsmError::FieldRange {
                field: "device",
                value: 256,
                ..
            }
        ));
    }

    #[test]
    fn u24_bytes_split() {
        assert_eq!(u24_le_bytes(0xAB_CDEF), [0xEF, 0xCD, 0xAB]);
    }
}
