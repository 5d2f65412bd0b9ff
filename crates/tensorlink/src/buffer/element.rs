//! Defines the scalar element trait binding host types to declared dtypes.

use super::dtype::DType;

/// Scalar type a raw buffer can decode into.
///
/// Implementations pair a host scalar with the dtype a buffer must declare
/// for it, plus the little-endian byte codec for one element. The fetch layer
/// checks `DTYPE` against the buffer's declared dtype before decoding.
pub trait Element: Copy + Send + Sync + 'static {
    /// Dtype a buffer must declare to decode into this element type.
    const DTYPE: DType;

    /// Decodes one element from its little-endian byte representation.
    ///
    /// `bytes` must be exactly `DTYPE.size_in_bytes()` long.
    fn from_le_bytes(bytes: &[u8]) -> Self;

    /// Appends the little-endian byte representation of the element.
    fn write_le(self, out: &mut Vec<u8>);
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        f32::from_le_bytes(bytes.try_into().expect("f32 element takes 4 bytes"))
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        f64::from_le_bytes(bytes.try_into().expect("f64 element takes 8 bytes"))
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        i32::from_le_bytes(bytes.try_into().expect("i32 element takes 4 bytes"))
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;

    fn from_le_bytes(bytes: &[u8]) -> Self {
        i64::from_le_bytes(bytes.try_into().expect("i64 element takes 8 bytes"))
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}
