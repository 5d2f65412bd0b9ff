pub mod buffer;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod session;

pub use buffer::{DType, Element, RawBuffer, Shape};
pub use error::FetchError;
pub use fetch::{FetchDescriptor, FetchResults, Fetchable, HasNodes, TensorValue};
pub use graph::{ControlHandle, GraphContext, NodeId, OutputName, TensorHandle};
pub use session::{RetrievalEngine, Session};
