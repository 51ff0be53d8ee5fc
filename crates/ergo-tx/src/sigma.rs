//! Sigma register encoding/decoding utilities
//!
//! Register values are parsed back through ergo-lib's `Constant`. The
//! encoders write the Sigma serialization format directly:
//! - Type descriptor (1 or 2 bytes)
//! - Collections: VLQ length followed by the items
//! - Int/Long values: VLQ zigzag encoded
//!
//! Type descriptors used here:
//! ```text
//! 04     SInt
//! 05     SLong
//! 0e     Coll[SByte]
//! 1a     Coll[Coll[SByte]]
//! 1c     Coll[Coll[SInt]]
//! 1d     Coll[Coll[SLong]]
//! 0c 1d  Coll[Coll[Coll[SLong]]]
//! ```

use ergo_lib::ergotree_ir::mir::constant::{Constant, TryExtractInto};
use ergo_lib::ergotree_ir::serialization::SigmaSerializable;

const TYPE_INT: u8 = 0x04;
const TYPE_LONG: u8 = 0x05;
const TYPE_COLL: u8 = 0x0c;
const TYPE_COLL_BYTE: u8 = 0x0e;
const TYPE_COLL_COLL_BYTE: u8 = 0x1a;
const TYPE_COLL_COLL_INT: u8 = 0x1c;
const TYPE_COLL_COLL_LONG: u8 = 0x1d;

// =============================================================================
// Encoding
// =============================================================================

fn zigzag_i32(value: i32) -> u64 {
    ((value << 1) ^ (value >> 31)) as u32 as u64
}

fn zigzag_i64(value: i64) -> u64 {
    // handles i64::MIN without overflow
    ((value << 1) ^ (value >> 63)) as u64
}

/// VLQ-encode a u64 value and append to buffer
fn vlq_encode(buf: &mut Vec<u8>, mut n: u64) {
    loop {
        let mut byte = (n & 0x7F) as u8;
        n >>= 7;
        if n != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if n == 0 {
            break;
        }
    }
}

fn put_longs(buf: &mut Vec<u8>, values: &[i64]) {
    vlq_encode(buf, values.len() as u64);
    for v in values {
        vlq_encode(buf, zigzag_i64(*v));
    }
}

/// Encode an i32 value as a Sigma Int register value (hex string)
pub fn encode_sigma_int(value: i32) -> String {
    let mut bytes = vec![TYPE_INT];
    vlq_encode(&mut bytes, zigzag_i32(value));
    hex::encode(bytes)
}

/// Encode an i64 value as a Sigma Long register value (hex string)
pub fn encode_sigma_long(value: i64) -> String {
    let mut bytes = vec![TYPE_LONG];
    vlq_encode(&mut bytes, zigzag_i64(value));
    hex::encode(bytes)
}

/// Encode a `Coll[SByte]` value as a Sigma register hex string.
pub fn encode_sigma_coll_byte(data: &[u8]) -> String {
    let mut bytes = vec![TYPE_COLL_BYTE];
    vlq_encode(&mut bytes, data.len() as u64);
    bytes.extend_from_slice(data);
    hex::encode(bytes)
}

/// Encode a `Coll[Coll[SByte]]` value as a Sigma register hex string.
///
/// Rosen lock boxes carry their transfer metadata in R4 this way, one UTF-8
/// string per inner collection.
///
/// ```text
/// 1a        -- type descriptor: Coll[Coll[SByte]]
/// <VLQ>     -- number of inner collections
/// For each inner Coll[SByte]:
///   <VLQ>   -- length of byte array
///   <bytes> -- raw bytes
/// ```
pub fn encode_sigma_coll_coll_byte(values: &[&[u8]]) -> String {
    let mut bytes = vec![TYPE_COLL_COLL_BYTE];
    vlq_encode(&mut bytes, values.len() as u64);
    for value in values {
        vlq_encode(&mut bytes, value.len() as u64);
        bytes.extend_from_slice(value);
    }
    hex::encode(bytes)
}

/// Encode a `Coll[Coll[SInt]]` value
pub fn encode_sigma_coll_coll_int(values: &[Vec<i32>]) -> String {
    let mut bytes = vec![TYPE_COLL_COLL_INT];
    vlq_encode(&mut bytes, values.len() as u64);
    for row in values {
        vlq_encode(&mut bytes, row.len() as u64);
        for v in row {
            vlq_encode(&mut bytes, zigzag_i32(*v));
        }
    }
    hex::encode(bytes)
}

/// Encode a `Coll[Coll[SLong]]` value
pub fn encode_sigma_coll_coll_long(values: &[Vec<i64>]) -> String {
    let mut bytes = vec![TYPE_COLL_COLL_LONG];
    vlq_encode(&mut bytes, values.len() as u64);
    for row in values {
        put_longs(&mut bytes, row);
    }
    hex::encode(bytes)
}

/// Encode a `Coll[Coll[Coll[SLong]]]` value
pub fn encode_sigma_coll_coll_coll_long(values: &[Vec<Vec<i64>>]) -> String {
    let mut bytes = vec![TYPE_COLL, TYPE_COLL_COLL_LONG];
    vlq_encode(&mut bytes, values.len() as u64);
    for matrix in values {
        vlq_encode(&mut bytes, matrix.len() as u64);
        for row in matrix {
            put_longs(&mut bytes, row);
        }
    }
    hex::encode(bytes)
}

// =============================================================================
// Decoding
// =============================================================================

/// Errors that can occur while reading a serialized register value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("Invalid hex string")]
    InvalidHex,
    #[error("Failed to parse constant: {0}")]
    Parse(String),
    #[error("Failed to extract {expected}: {reason}")]
    Extract {
        expected: &'static str,
        reason: String,
    },
}

/// Parse a serialized register value (hex) into a Sigma constant
pub fn parse_register(hex_str: &str) -> Result<Constant, RegisterError> {
    let bytes = hex::decode(hex_str).map_err(|_| RegisterError::InvalidHex)?;
    Constant::sigma_parse_bytes(&bytes).map_err(|e| RegisterError::Parse(format!("{:?}", e)))
}

/// Read a `Coll[Coll[SByte]]` register value
pub fn parse_coll_coll_byte(hex_str: &str) -> Result<Vec<Vec<u8>>, RegisterError> {
    let coll_coll: Vec<Vec<i8>> =
        parse_register(hex_str)?
            .try_extract_into()
            .map_err(|e| RegisterError::Extract {
                expected: "Coll[Coll[SByte]]",
                reason: format!("{:?}", e),
            })?;

    Ok(coll_coll
        .into_iter()
        .map(|bytes| bytes.into_iter().map(|b| b as u8).collect())
        .collect())
}

/// Read a 2D numeric register value.
///
/// Tries `Coll[Coll[SLong]]` first, then falls back to `Coll[Coll[SInt]]`
/// widened to i64; fee boxes use either depending on the register.
pub fn parse_coll_coll_long(hex_str: &str) -> Result<Vec<Vec<i64>>, RegisterError> {
    let constant = parse_register(hex_str)?;

    if let Ok(vals) = constant.clone().try_extract_into::<Vec<Vec<i64>>>() {
        return Ok(vals);
    }

    let int_vals: Vec<Vec<i32>> =
        constant
            .try_extract_into()
            .map_err(|e| RegisterError::Extract {
                expected: "Coll[Coll[SLong]] or Coll[Coll[SInt]]",
                reason: format!("{:?}", e),
            })?;

    Ok(int_vals
        .into_iter()
        .map(|row| row.into_iter().map(i64::from).collect())
        .collect())
}

/// Read a `Coll[Coll[Coll[SLong]]]` register value
pub fn parse_coll_coll_coll_long(hex_str: &str) -> Result<Vec<Vec<Vec<i64>>>, RegisterError> {
    parse_register(hex_str)?
        .try_extract_into::<Vec<Vec<Vec<i64>>>>()
        .map_err(|e| RegisterError::Extract {
            expected: "Coll[Coll[Coll[SLong]]]",
            reason: format!("{:?}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sigma_long() {
        assert_eq!(encode_sigma_long(0), "0500");
        assert_eq!(encode_sigma_long(1), "0502");
        assert_eq!(encode_sigma_long(100), "05c801");
        assert_eq!(encode_sigma_long(-1), "0501");
        assert_eq!(encode_sigma_long(-100), "05c701");
    }

    #[test]
    fn test_long_parses_as_constant() {
        for value in [0i64, -1, 1_000_000, i64::MAX, i64::MIN] {
            let constant = parse_register(&encode_sigma_long(value)).unwrap();
            assert_eq!(constant.try_extract_into::<i64>().unwrap(), value);
        }
    }

    #[test]
    fn test_parse_register_errors() {
        assert_eq!(parse_register("xyz"), Err(RegisterError::InvalidHex));
        assert!(matches!(parse_register(""), Err(RegisterError::Parse(_))));
        // Coll[Coll[SByte]] announcing one 5-byte element but carrying two
        assert!(matches!(
            parse_coll_coll_byte("1a0105abcd"),
            Err(RegisterError::Parse(_))
        ));
    }

    #[test]
    fn test_encode_sigma_int() {
        assert_eq!(encode_sigma_int(0), "0400");
        assert_eq!(encode_sigma_int(100), "04c801");
        assert_eq!(encode_sigma_int(-1), "0401");
    }

    #[test]
    fn test_encode_coll_byte() {
        assert_eq!(encode_sigma_coll_byte(&[]), "0e00");
        assert_eq!(encode_sigma_coll_byte(&[0xab, 0xcd]), "0e02abcd");
    }

    #[test]
    fn test_encode_coll_coll_byte_single() {
        let encoded = encode_sigma_coll_coll_byte(&[b"cardano".as_ref()]);
        assert_eq!(encoded, format!("1a0107{}", hex::encode(b"cardano")));
    }

    #[test]
    fn test_coll_coll_byte_lock_metadata() {
        let values: Vec<&[u8]> = vec![
            &b"cardano"[..],
            &b"addr1qtest"[..],
            &b"500000"[..],
            &b"300000"[..],
            &b"9ftest"[..],
        ];
        let encoded = encode_sigma_coll_coll_byte(&values);
        assert!(encoded.starts_with("1a05"));

        let decoded = parse_coll_coll_byte(&encoded).unwrap();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded[0], b"cardano");
        assert_eq!(decoded[4], b"9ftest");
    }

    #[test]
    fn test_coll_coll_byte_long_element() {
        let large = vec![0xABu8; 200];
        let encoded = encode_sigma_coll_coll_byte(&[large.as_ref()]);

        let bytes = hex::decode(&encoded).unwrap();
        // VLQ for 200 is [0xC8, 0x01]
        assert_eq!(&bytes[..4], &[0x1a, 0x01, 0xC8, 0x01]);
        assert_eq!(bytes.len(), 4 + 200);
        assert_eq!(parse_coll_coll_byte(&encoded).unwrap(), vec![large]);
    }

    #[test]
    fn test_coll_coll_long_with_int_fallback() {
        assert_eq!(encode_sigma_coll_coll_long(&[vec![1, -1]]), "1d01020201");
        assert_eq!(
            parse_coll_coll_long("1d01020201").unwrap(),
            vec![vec![1, -1]]
        );

        let ints = encode_sigma_coll_coll_int(&[vec![1_000_000, -1], vec![]]);
        assert!(ints.starts_with("1c02"));
        assert_eq!(
            parse_coll_coll_long(&ints).unwrap(),
            vec![vec![1_000_000, -1], vec![]]
        );

        let chains = encode_sigma_coll_coll_byte(&[b"ergo".as_ref()]);
        assert!(matches!(
            parse_coll_coll_long(&chains),
            Err(RegisterError::Extract { .. })
        ));
    }

    #[test]
    fn test_coll_coll_coll_long() {
        assert_eq!(
            encode_sigma_coll_coll_coll_long(&[vec![vec![1, 2]]]),
            "0c1d0101020204"
        );

        let values = vec![
            vec![vec![500_000, 100_000_000], vec![200_000, 10_000_000_000]],
            vec![vec![-1, -1]],
        ];
        let encoded = encode_sigma_coll_coll_coll_long(&values);
        assert_eq!(parse_coll_coll_coll_long(&encoded).unwrap(), values);

        assert!(matches!(
            parse_coll_coll_coll_long("1d01020201"),
            Err(RegisterError::Extract { .. })
        ));
    }
}
