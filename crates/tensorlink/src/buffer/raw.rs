//! Type-erased container for one retrieved result buffer.

use std::sync::Arc;

use anyhow::{ensure, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

use super::dtype::DType;
use super::element::Element;
use super::shape::Shape;

/// One retrieved result as the engine returns it: declared dimensions,
/// declared element type, and the raw little-endian payload.
///
/// The fetch layer only reads the declared dtype and shape; decoding the
/// bytes into host values goes through [`RawBuffer::decode_elements`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawBuffer {
    dtype: DType,
    shape: Shape,
    bytes: Arc<[u8]>,
}

impl RawBuffer {
    /// Wraps a raw payload, validating its length against shape and dtype.
    pub fn new(dtype: DType, shape: Shape, bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes = bytes.into();
        let expected = shape.num_elements() * dtype.size_in_bytes();
        ensure!(
            bytes.len() == expected,
            "buffer payload is {} bytes but {} {} elements require {}",
            bytes.len(),
            shape.num_elements(),
            dtype,
            expected
        );
        Ok(RawBuffer {
            dtype,
            shape,
            bytes,
        })
    }

    /// Encodes host values into a buffer declaring `E::DTYPE`.
    pub fn from_values<E: Element>(shape: Shape, values: &[E]) -> Result<Self> {
        ensure!(
            values.len() == shape.num_elements(),
            "buffer holds {} values but shape {:?} implies {}",
            values.len(),
            shape.dims(),
            shape.num_elements()
        );
        let mut bytes = Vec::with_capacity(values.len() * E::DTYPE.size_in_bytes());
        for value in values {
            value.write_le(&mut bytes);
        }
        Ok(RawBuffer {
            dtype: E::DTYPE,
            shape,
            bytes: Arc::from(bytes.into_boxed_slice()),
        })
    }

    /// Encodes a single host value as a rank-0 buffer.
    pub fn scalar<E: Element>(value: E) -> Self {
        Self::from_values(Shape::scalar(), &[value]).expect("scalar shape always holds one element")
    }

    /// Returns the element type the buffer declares.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the declared shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Borrows the declared dimension slice.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Returns the payload length in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Decodes the payload into a flat element sequence.
    ///
    /// Fails when the declared dtype disagrees with `E`; callers that want a
    /// diagnostic carrying both sides check the tag first.
    pub fn decode_elements<E: Element>(&self) -> Result<Vec<E>> {
        ensure!(
            self.dtype == E::DTYPE,
            "cannot decode {} buffer as {}",
            self.dtype,
            E::DTYPE
        );
        let size = self.dtype.size_in_bytes();
        Ok(self.bytes.chunks_exact(size).map(E::from_le_bytes).collect())
    }
}

impl Serialize for RawBuffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("RawBuffer", 3)?;
        state.serialize_field("dtype", &self.dtype)?;
        state.serialize_field("shape", &self.shape)?;
        state.serialize_field("bytes", &self.bytes.as_ref())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for RawBuffer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBufferHelper {
            dtype: DType,
            shape: Shape,
            bytes: Vec<u8>,
        }

        let helper = RawBufferHelper::deserialize(deserializer)?;
        RawBuffer::new(helper.dtype, helper.shape, Arc::<[u8]>::from(helper.bytes))
            .map_err(serde::de::Error::custom)
    }
}
