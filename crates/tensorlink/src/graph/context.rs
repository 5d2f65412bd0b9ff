//! Graph-building context that stages operations and renders output names.

use std::marker::PhantomData;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::buffer::Element;

use super::handle::{ControlHandle, GraphHandle, NodeId, OpId, OutputName, TensorHandle};
use super::state::{ContextInner, OpState};

/// Single logical build context for one dataflow graph.
///
/// Operations are staged lazily and finalized on demand: fetching a handle
/// (or collecting its node closure) assigns the node id and renders the
/// output names the retrieval step will use. Mutation is serialized behind a
/// mutex, so `&self` methods suffice; independent graphs use independent
/// contexts.
pub struct GraphContext {
    inner: Mutex<ContextInner>,
}

impl GraphContext {
    pub fn new() -> Self {
        GraphContext {
            inner: Mutex::new(ContextInner::new()),
        }
    }

    fn stage(&self, name: &str, outputs: u32) -> OpId {
        let mut inner = self.lock();
        let unique = inner.uniquify(name);
        let op = OpId(inner.ops.len() as u32);
        inner.ops.push(OpState {
            name: unique,
            node: None,
            rendered: vec![None; outputs as usize],
        });
        op
    }

    /// Stages a side-effect-only operation with no data outputs.
    pub fn control(&self, name: &str) -> ControlHandle {
        ControlHandle {
            op: self.stage(name, 0),
        }
    }

    /// Stages a single-output operation and returns its typed output handle.
    pub fn tensor<E: Element>(&self, name: &str) -> TensorHandle<E> {
        TensorHandle {
            op: self.stage(name, 1),
            slot: 0,
            marker: PhantomData,
        }
    }

    /// Stages an operation with `count` output slots, one handle per slot.
    pub fn tensor_outputs<E: Element>(&self, name: &str, count: u32) -> Vec<TensorHandle<E>> {
        let op = self.stage(name, count);
        (0..count)
            .map(|slot| TensorHandle {
                op,
                slot,
                marker: PhantomData,
            })
            .collect()
    }

    /// Finalizes the operation behind `handle` and returns its node id.
    ///
    /// Idempotent: the same handle always resolves to the same id. Handles
    /// staged by a different context are rejected.
    pub fn register_node<H: GraphHandle>(&self, handle: H) -> Result<NodeId> {
        self.lock().finalize(handle.op_id())
    }

    /// Renders the retrievable output name for a tensor handle.
    ///
    /// Idempotent per handle, and finalizes the underlying operation as a
    /// side effect so the rendered name always refers to a registered node.
    pub fn render_output_name<E: Element>(&self, handle: TensorHandle<E>) -> Result<OutputName> {
        let mut inner = self.lock();
        inner.finalize(handle.op)?;
        let state = inner.op_mut(handle.op)?;
        let slot = handle.slot as usize;
        if slot >= state.rendered.len() {
            bail!(
                "output slot {} out of range for operation `{}`",
                handle.slot,
                state.name
            );
        }
        if let Some(name) = &state.rendered[slot] {
            return Ok(name.clone());
        }
        let name = OutputName::new(format!("{}:{}", state.name, handle.slot));
        state.rendered[slot] = Some(name.clone());
        Ok(name)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ContextInner> {
        self.inner.lock().expect("graph context mutex poisoned")
    }
}

impl Default for GraphContext {
    fn default() -> Self {
        Self::new()
    }
}
