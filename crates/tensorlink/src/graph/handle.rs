//! Identifier newtypes and the staged-operation handle types.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::buffer::Element;

/// Index of a staged operation inside its owning [`GraphContext`].
///
/// Opaque outside the crate; only meaningful to the context that staged it.
///
/// [`GraphContext`]: super::GraphContext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub(crate) u32);

/// Identifier of a finalized computation-graph operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Name of one retrievable output slot of a finalized operation.
///
/// Distinct from [`NodeId`]: an operation may expose several named outputs.
/// Rendered as `"{op_name}:{slot}"` by the owning context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputName(String);

impl OutputName {
    pub fn new(name: impl Into<String>) -> Self {
        OutputName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a staged side-effect-only operation.
///
/// Control operations produce no data; fetching one only guarantees the
/// operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlHandle {
    pub(crate) op: OpId,
}

/// Handle to one typed tensor output slot of a staged operation.
///
/// The element type is a phantom: the handle itself carries no data, and the
/// expected dtype is checked against the returned buffer at decode time.
pub struct TensorHandle<E> {
    pub(crate) op: OpId,
    pub(crate) slot: u32,
    pub(crate) marker: PhantomData<fn() -> E>,
}

impl<E> Clone for TensorHandle<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for TensorHandle<E> {}

impl<E> fmt::Debug for TensorHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorHandle")
            .field("op", &self.op)
            .field("slot", &self.slot)
            .finish()
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ControlHandle {}
    impl<E> Sealed for super::TensorHandle<E> {}
}

/// Staged-operation handle accepted by [`GraphContext::register_node`].
///
/// [`GraphContext::register_node`]: super::GraphContext::register_node
pub trait GraphHandle: sealed::Sealed + Copy {
    /// Returns the staged-operation index behind the handle.
    fn op_id(&self) -> OpId;
}

impl GraphHandle for ControlHandle {
    fn op_id(&self) -> OpId {
        self.op
    }
}

impl<E: Element> GraphHandle for TensorHandle<E> {
    fn op_id(&self) -> OpId {
        self.op
    }
}
