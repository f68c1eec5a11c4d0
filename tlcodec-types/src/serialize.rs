//! The [`Serializable`] trait and its implementations for primitive TL types.
//!
//! Encoding follows the [MTProto Binary Serialization] conventions.
//!
//! [MTProto Binary Serialization]: https://core.telegram.org/mtproto/serialize

use crate::vector::VECTOR_ID;

/// Serialize a bare value into TL binary format.
pub trait Serializable {
    /// Appends the serialized form of `self` to `buf`.
    fn serialize(&self, buf: &mut impl Extend<u8>);

    /// Convenience: allocate a fresh `Vec<u8>` and serialize into it.
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        self.serialize(&mut v);
        v
    }
}

// ─── bool ────────────────────────────────────────────────────────────────────

/// `true`  → `boolTrue#997275b5`
/// `false` → `boolFalse#bc799737`
impl Serializable for bool {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let id: u32 = if *self { 0x997275b5 } else { 0xbc799737 };
        id.serialize(buf);
    }
}

// ─── integers ────────────────────────────────────────────────────────────────

impl Serializable for i32 {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.to_le_bytes());
    }
}

impl Serializable for u32 {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.to_le_bytes());
    }
}

impl Serializable for i64 {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.to_le_bytes());
    }
}

impl Serializable for f64 {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.to_le_bytes());
    }
}

// ─── strings / bytes ─────────────────────────────────────────────────────────

/// Exclusive upper bound on a TL string or byte string length.
pub const MAX_BYTES_LEN: usize = 1 << 24;

/// TL string encoding: a length-prefixed, 4-byte aligned byte string.
///
/// * If `len ≤ 253`: `[len as u8][data][0-padding to align to 4 bytes]`
/// * If `len ≥ 254`: `[0xfe][len as 3 LE bytes][data][0-padding]`
///
/// The long form has 24 bits of length, so byte strings must stay below
/// [`MAX_BYTES_LEN`].
impl Serializable for [u8] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let len = self.len();
        debug_assert!(len < MAX_BYTES_LEN, "TL byte string of {len} bytes");
        let header_len = if len <= 253 {
            buf.extend([len as u8]);
            1
        } else {
            let [a, b, c, _] = (len as u32).to_le_bytes();
            buf.extend([0xfe, a, b, c]);
            4
        };

        let padding = (4 - (header_len + len) % 4) % 4;
        buf.extend(self.iter().copied());
        buf.extend(std::iter::repeat_n(0u8, padding));
    }
}

impl Serializable for Vec<u8> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_slice().serialize(buf);
    }
}

impl Serializable for str {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

impl Serializable for String {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

// ─── vectors ─────────────────────────────────────────────────────────────────

/// `Vector<int>`: count + raw elements, no marker.
impl Serializable for Vec<i32> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        (self.len() as i32).serialize(buf);
        for item in self { item.serialize(buf); }
    }
}

/// `Vector<long>`: count + raw elements, no marker.
impl Serializable for Vec<i64> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        (self.len() as i32).serialize(buf);
        for item in self { item.serialize(buf); }
    }
}

/// `Vector<string>`: prefixed with constructor ID `0x1cb5c415`.
impl Serializable for Vec<String> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        VECTOR_ID.serialize(buf);
        (self.len() as i32).serialize(buf);
        for item in self { item.serialize(buf); }
    }
}
