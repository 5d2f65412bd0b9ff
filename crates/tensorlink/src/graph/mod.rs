//! Graph-side bookkeeping the fetch layer builds on.
//!
//! The context stages lazily described operations and hands out the two
//! handle kinds the fetch layer understands: control handles (side effects
//! only) and typed tensor output handles. Finalizing an operation and
//! rendering its output names are idempotent context operations.

mod context;
mod handle;
mod state;

pub use context::GraphContext;
pub use handle::{ControlHandle, GraphHandle, NodeId, OpId, OutputName, TensorHandle};
