use tlcodec_types::deserialize::{Error, FaultKind};
use tlcodec_types::{Cursor, Deserializable, Serializable};

// ── Primitive round-trips ─────────────────────────────────────────────────────

#[test]
fn roundtrip_i32() {
    for v in [0i32, -1, i32::MAX, i32::MIN, 42] {
        let bytes = v.to_bytes();
        assert_eq!(i32::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_i64() {
    for v in [0i64, -1, i64::MAX, i64::MIN, 1_234_567_890] {
        let bytes = v.to_bytes();
        assert_eq!(i64::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_bool_true() {
    let bytes = true.to_bytes();
    assert_eq!(bytes, 0x997275b5u32.to_le_bytes());
    assert_eq!(bool::from_bytes(&bytes).unwrap(), true);
}

#[test]
fn roundtrip_bool_false() {
    let bytes = false.to_bytes();
    assert_eq!(bytes, 0xbc799737u32.to_le_bytes());
    assert_eq!(bool::from_bytes(&bytes).unwrap(), false);
}

// ── String / bytes ────────────────────────────────────────────────────────────

#[test]
fn roundtrip_empty_string() {
    let s = String::new();
    let bytes = s.to_bytes();
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_short_string() {
    let s = "hello world".to_owned();
    let bytes = s.to_bytes();
    assert_eq!(bytes.len() % 4, 0, "must be 4-byte aligned");
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_long_string() {
    // >253 bytes triggers the 4-byte length header path
    let s = "x".repeat(300);
    let bytes = s.clone().to_bytes();
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_bytes_vec() {
    let v: Vec<u8> = (0u8..=255).collect();
    let bytes = v.clone().to_bytes();
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), v);
}

// ── Vectors ───────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_vec_i32() {
    let v: Vec<i32> = vec![1, 2, 3, -99];
    let bytes = v.to_bytes();
    assert_eq!(Vec::<i32>::from_bytes(&bytes).unwrap(), vec![1, 2, 3, -99]);
}

#[test]
fn roundtrip_empty_vec() {
    let v: Vec<i64> = vec![];
    let bytes = v.to_bytes();
    assert_eq!(Vec::<i64>::from_bytes(&bytes).unwrap(), Vec::<i64>::new());
}

#[test]
fn long_vector_is_bare() {
    let v: Vec<i64> = vec![7, 42];
    let bytes = v.to_bytes();
    assert_eq!(bytes.len(), 4 + 2 * 8);
    assert_eq!(&bytes[..4], &2i32.to_le_bytes());
    assert_eq!(Vec::<i64>::from_bytes(&bytes).unwrap(), vec![7, 42]);
}

#[test]
fn string_vector_is_boxed() {
    let v = vec!["👍".to_owned(), "❤".to_owned()];
    let bytes = v.to_bytes();
    assert_eq!(&bytes[..4], &0x1cb5c415u32.to_le_bytes());
    assert_eq!(Vec::<String>::from_bytes(&bytes).unwrap(), v);
}

#[test]
fn string_vector_without_marker_faults() {
    let bytes = 0i32.to_bytes();
    assert_eq!(
        Vec::<String>::from_bytes(&bytes),
        Err(Error::BufferFault { kind: FaultKind::BadVectorMarker, pos: 4 })
    );
}

// ── Cursor faults ─────────────────────────────────────────────────────────────

#[test]
fn deserialize_truncated_returns_eof() {
    let result = i32::from_bytes(&[0x01, 0x02]); // only 2 bytes, need 4
    assert_eq!(
        result,
        Err(Error::BufferFault { kind: FaultKind::UnexpectedEof, pos: 0 })
    );
}

#[test]
fn unknown_bool_faults() {
    let result = bool::from_bytes(&0x12345678u32.to_le_bytes());
    assert!(matches!(
        result,
        Err(Error::BufferFault { kind: FaultKind::InvalidBool, .. })
    ));
}

#[test]
fn invalid_utf8_faults() {
    let bytes = vec![0xffu8, 0xfe].to_bytes();
    assert!(matches!(
        String::from_bytes(&bytes),
        Err(Error::BufferFault { kind: FaultKind::InvalidUtf8, .. })
    ));
}

#[test]
fn reads_after_fault_are_zero() {
    let bytes = 5i32.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(i64::deserialize(&mut cursor), 0);
    assert_eq!(i32::deserialize(&mut cursor), 0);
    assert_eq!(cursor.pos(), 0);
    assert!(cursor.is_faulted());
}

#[test]
fn longest_byte_string_fills_the_length_header() {
    let data = vec![0u8; tlcodec_types::serialize::MAX_BYTES_LEN - 1];
    let bytes = data.to_bytes();
    assert_eq!(bytes[..4], [0xfe, 0xff, 0xff, 0xff]);
    assert_eq!(bytes.len() % 4, 0);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "TL byte string")]
fn oversized_byte_string_is_caught() {
    let data = vec![0u8; tlcodec_types::serialize::MAX_BYTES_LEN];
    let _ = data.to_bytes();
}
