//! Buffer model shared between fetch requests and retrieval engines.
//!
//! The buffer layer defines declared dtypes, shapes, the scalar element
//! trait, and the type-erased [`RawBuffer`] an engine hands back for each
//! requested output name.

pub mod dtype;
mod element;
mod raw;
pub mod shape;

pub use dtype::DType;
pub use element::Element;
pub use raw::RawBuffer;
pub use shape::Shape;
