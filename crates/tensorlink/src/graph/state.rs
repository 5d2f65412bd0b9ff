//! Internal context bookkeeping shared by the staging and rendering paths.

use std::collections::HashMap;

use anyhow::{bail, Result};

use super::handle::{NodeId, OpId, OutputName};

/// Mutable context storage protected by a mutex inside
/// [`GraphContext`](super::GraphContext). Tracks staged operations, the node
/// id counter, and base-name usage for uniquification.
pub(super) struct ContextInner {
    pub(super) next_node: u32,
    pub(super) ops: Vec<OpState>,
    pub(super) used_names: HashMap<String, usize>,
}

impl ContextInner {
    pub(super) fn new() -> Self {
        ContextInner {
            next_node: 0,
            ops: Vec::new(),
            used_names: HashMap::new(),
        }
    }

    /// Returns a rendered base name, suffixing repeats (`add`, `add_1`, ...).
    pub(super) fn uniquify(&mut self, base: &str) -> String {
        let seen = self.used_names.entry(base.to_string()).or_insert(0);
        let name = if *seen == 0 {
            base.to_string()
        } else {
            format!("{base}_{seen}")
        };
        *seen += 1;
        name
    }

    pub(super) fn op_mut(&mut self, op: OpId) -> Result<&mut OpState> {
        let index = op.0 as usize;
        if index >= self.ops.len() {
            bail!("unknown operation {:?}: handle was not staged by this context", op);
        }
        Ok(&mut self.ops[index])
    }

    /// Finalizes a staged operation, assigning its node id on first call.
    pub(super) fn finalize(&mut self, op: OpId) -> Result<NodeId> {
        let next = self.next_node;
        let state = self.op_mut(op)?;
        match state.node {
            Some(node) => Ok(node),
            None => {
                let node = NodeId(next);
                state.node = Some(node);
                self.next_node += 1;
                Ok(node)
            }
        }
    }
}

/// Recorded operation metadata kept while the op remains lazily staged.
/// The node id stays empty until the op is finalized; rendered output names
/// are cached per slot so repeated rendering is stable.
pub(super) struct OpState {
    pub(super) name: String,
    pub(super) node: Option<NodeId>,
    pub(super) rendered: Vec<Option<OutputName>>,
}
