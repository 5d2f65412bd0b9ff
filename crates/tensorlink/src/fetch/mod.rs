//! Typed fetch composition over an already-built dataflow graph.
//!
//! A [`FetchDescriptor`] pairs the exact set of output names one retrieval
//! must return with the pure function that decodes the returned buffers back
//! into a host value. The [`HasNodes`]/[`Fetchable`] capability pair makes
//! leaf handles fetchable directly and tuples/lists fetchable by structural
//! composition, so arbitrarily nested requests collapse into one flat
//! retrieval and rebuild their original nesting from its result.

mod descriptor;
mod fetchable;
mod leaf;
mod results;

pub use descriptor::FetchDescriptor;
pub use fetchable::{Fetchable, HasNodes};
pub use leaf::TensorValue;
pub use results::FetchResults;
