//! `Vector<T>` of boxed objects.
//!
//! Scalar vectors (`Vector<int>`, `Vector<long>`) are plain `Vec`s handled
//! by [`crate::Serializable`] / [`crate::Deserializable`]. Vectors of objects
//! go through here: marker, count, then each element's own tag and body.

use std::ops::{Deref, DerefMut};

use crate::deserialize::{Buffer, Deserializable, Error};
use crate::object::{read_object, EncodeContext, EncodeError, TlObject};
use crate::serialize::Serializable;

/// Constructor ID of the boxed `Vector` type.
pub const VECTOR_ID: u32 = 0x1cb5c415;

/// Smallest encoding of a boxed element: its tag.
const MIN_ELEMENT_SIZE: usize = 4;

/// Write `items` as a boxed vector.
pub fn encode_objects<T: TlObject>(
    items: &[T],
    ctx: EncodeContext,
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    VECTOR_ID.serialize(buf);
    (items.len() as i32).serialize(buf);
    for item in items {
        item.encode_into(ctx, buf)?;
    }
    Ok(())
}

/// Read a boxed vector whose marker has not been consumed yet.
pub fn decode_objects<T: TlObject + Default>(buf: Buffer) -> Result<Vec<T>, Error> {
    let id = u32::deserialize(buf);
    if buf.is_faulted() {
        return Ok(Vec::new());
    }
    if id != VECTOR_ID {
        return Err(Error::UnknownConstructor { id });
    }
    read_elements(buf)
}

/// Count + elements, after the marker.
fn read_elements<T: TlObject + Default>(buf: Buffer) -> Result<Vec<T>, Error> {
    let len = buf.read_count(MIN_ELEMENT_SIZE);
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        if buf.is_faulted() {
            break;
        }
        out.push(read_object(buf)?);
    }
    Ok(out)
}

/// A standalone `Vector<T>` of objects, e.g. an RPC result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TlVector<T>(pub Vec<T>);

impl<T> Deref for TlVector<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> { &self.0 }
}

impl<T> DerefMut for TlVector<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> { &mut self.0 }
}

impl<T> From<Vec<T>> for TlVector<T> {
    fn from(v: Vec<T>) -> Self { Self(v) }
}

impl<T> IntoIterator for TlVector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<T: TlObject + Default> TlObject for TlVector<T> {
    fn constructor_id(&self) -> u32 { VECTOR_ID }

    fn predicate_name(&self) -> &'static str { "vector" }

    fn identify(&mut self, tag: u32) -> bool { tag == VECTOR_ID }

    fn encode_to(&self, ctx: EncodeContext, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_objects(&self.0, ctx, buf)
    }

    fn decode_body(&mut self, tag: u32, buf: Buffer) -> Result<(), Error> {
        if tag != VECTOR_ID {
            return Err(Error::UnknownConstructor { id: tag });
        }
        self.0 = read_elements(buf)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> { self }
}
