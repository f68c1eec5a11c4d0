//! The [`Deserializable`] trait, the sticky-fault [`Cursor`] and primitive impls.
//!
//! Reads never fail on the spot. An underrun or a malformed length records a
//! fault inside the cursor, the read returns a zero value and every later
//! read is a no-op. Callers decode a whole record and then ask the cursor
//! once, through [`Cursor::check`], whether the bytes were sound.

use std::fmt;

use crate::vector::VECTOR_ID;

// ─── Error ───────────────────────────────────────────────────────────────────

/// What went wrong inside a [`Cursor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    /// Ran out of bytes before the value was fully read.
    UnexpectedEof,
    /// A string/bytes header or a vector count that cannot fit the buffer.
    MalformedLength,
    /// A `string` whose bytes are not UTF-8.
    InvalidUtf8,
    /// A `Bool` that is neither `boolTrue` nor `boolFalse`.
    InvalidBool,
    /// A boxed scalar vector without the `0x1cb5c415` marker.
    BadVectorMarker,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnexpectedEof => "unexpected end of buffer",
            Self::MalformedLength => "malformed length",
            Self::InvalidUtf8 => "string is not valid UTF-8",
            Self::InvalidBool => "invalid Bool constructor",
            Self::BadVectorMarker => "missing vector marker",
        })
    }
}

/// Errors that can occur during decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A constructor tag the record (or registry) being decoded does not know.
    UnknownConstructor {
        /// The offending tag as read from the wire.
        id: u32,
    },
    /// The cursor faulted somewhere while the record was read.
    BufferFault {
        /// The first fault recorded.
        kind: FaultKind,
        /// Byte offset at which it happened.
        pos: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownConstructor { id } => write!(f, "unknown constructor id: {id:#010x}"),
            Self::BufferFault { kind, pos } => write!(f, "{kind} at byte {pos}"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for decoding.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// A zero-copy cursor over an in-memory byte slice with a sticky fault.
///
/// The cursor never reads past the end of its slice. It is single-owner and
/// meant for one decode call.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    fault: Option<(FaultKind, usize)>,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, fault: None }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize { self.pos }

    /// Remaining bytes.
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// `true` once any read has faulted.
    pub fn is_faulted(&self) -> bool { self.fault.is_some() }

    /// The first recorded fault, as an [`Error::BufferFault`].
    pub fn fault(&self) -> Option<Error> {
        self.fault.map(|(kind, pos)| Error::BufferFault { kind, pos })
    }

    /// `Err` if the cursor has faulted.
    pub fn check(&self) -> Result<()> {
        match self.fault() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Record a fault at the current position. Only the first one is kept.
    pub fn set_fault(&mut self, kind: FaultKind) {
        if self.fault.is_none() {
            self.fault = Some((kind, self.pos));
        }
    }

    /// Borrow the next `len` bytes, or fault and return an empty slice.
    pub fn read_slice(&mut self, len: usize) -> &'a [u8] {
        if self.is_faulted() {
            return &[];
        }
        if len > self.remaining() {
            self.set_fault(FaultKind::UnexpectedEof);
            return &[];
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        out
    }

    /// Read a fixed-size array, zeroed on fault.
    pub fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        let slice = self.read_slice(N);
        if slice.len() == N {
            out.copy_from_slice(slice);
        }
        out
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> u8 {
        self.read_array::<1>()[0]
    }

    /// Read an element count and reject it when `count * min_elem_size`
    /// could not possibly fit in the remaining bytes.
    pub fn read_count(&mut self, min_elem_size: usize) -> usize {
        let raw = i32::deserialize(self);
        if self.is_faulted() {
            return 0;
        }
        match usize::try_from(raw) {
            Ok(n) if n.saturating_mul(min_elem_size) <= self.remaining() => n,
            _ => {
                self.set_fault(FaultKind::MalformedLength);
                0
            }
        }
    }

    /// Consume all remaining bytes into `out`.
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> usize {
        let slice = &self.buf[self.pos..];
        out.extend_from_slice(slice);
        self.pos = self.buf.len();
        slice.len()
    }
}

/// Alias used by generated code: `crate::deserialize::Buffer<'_, '_>`.
pub type Buffer<'a, 'b> = &'a mut Cursor<'b>;

// ─── Deserializable ──────────────────────────────────────────────────────────

/// Decode a bare value from TL binary format.
pub trait Deserializable: Sized {
    /// Read `Self` from `buf`, advancing its position. Returns a zero value
    /// and leaves the fault in `buf` when the bytes are bad.
    fn deserialize(buf: Buffer) -> Self;

    /// Convenience: decode from a byte slice and surface any fault.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::from_slice(bytes);
        let value = Self::deserialize(&mut cursor);
        cursor.check()?;
        Ok(value)
    }
}

// ─── Primitives ───────────────────────────────────────────────────────────────

impl Deserializable for bool {
    fn deserialize(buf: Buffer) -> Self {
        match u32::deserialize(buf) {
            0x997275b5 => true,
            0xbc799737 => false,
            _ => {
                buf.set_fault(FaultKind::InvalidBool);
                false
            }
        }
    }
}

impl Deserializable for i32 {
    fn deserialize(buf: Buffer) -> Self {
        i32::from_le_bytes(buf.read_array())
    }
}

impl Deserializable for u32 {
    fn deserialize(buf: Buffer) -> Self {
        u32::from_le_bytes(buf.read_array())
    }
}

impl Deserializable for i64 {
    fn deserialize(buf: Buffer) -> Self {
        i64::from_le_bytes(buf.read_array())
    }
}

impl Deserializable for f64 {
    fn deserialize(buf: Buffer) -> Self {
        f64::from_le_bytes(buf.read_array())
    }
}

// ─── Bytes / String ───────────────────────────────────────────────────────────

impl Deserializable for Vec<u8> {
    fn deserialize(buf: Buffer) -> Self {
        let first = buf.read_byte();
        let (len, header_len) = match first {
            0xfe => {
                let [a, b, c] = buf.read_array::<3>();
                (usize::from(a) | usize::from(b) << 8 | usize::from(c) << 16, 4)
            }
            0xff => {
                buf.set_fault(FaultKind::MalformedLength);
                return Vec::new();
            }
            n => (usize::from(n), 1),
        };
        if buf.is_faulted() {
            return Vec::new();
        }
        if len > buf.remaining() {
            buf.set_fault(FaultKind::MalformedLength);
            return Vec::new();
        }

        let data = buf.read_slice(len).to_vec();
        let padding = (4 - (header_len + len) % 4) % 4;
        buf.read_slice(padding);
        data
    }
}

impl Deserializable for String {
    fn deserialize(buf: Buffer) -> Self {
        let bytes = Vec::<u8>::deserialize(buf);
        String::from_utf8(bytes).unwrap_or_else(|_| {
            buf.set_fault(FaultKind::InvalidUtf8);
            String::new()
        })
    }
}

// ─── Vectors ─────────────────────────────────────────────────────────────────

/// `Vector<int>`: count + raw elements, no marker.
impl Deserializable for Vec<i32> {
    fn deserialize(buf: Buffer) -> Self {
        let len = buf.read_count(4);
        (0..len).map(|_| i32::deserialize(buf)).collect()
    }
}

/// `Vector<long>`: count + raw elements, no marker.
impl Deserializable for Vec<i64> {
    fn deserialize(buf: Buffer) -> Self {
        let len = buf.read_count(8);
        (0..len).map(|_| i64::deserialize(buf)).collect()
    }
}

/// `Vector<string>`: marker + count + strings.
impl Deserializable for Vec<String> {
    fn deserialize(buf: Buffer) -> Self {
        let id = u32::deserialize(buf);
        if buf.is_faulted() {
            return Vec::new();
        }
        if id != VECTOR_ID {
            buf.set_fault(FaultKind::BadVectorMarker);
            return Vec::new();
        }
        let len = buf.read_count(4);
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            if buf.is_faulted() {
                break;
            }
            out.push(String::deserialize(buf));
        }
        out
    }
}
