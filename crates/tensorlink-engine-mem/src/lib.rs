//! In-memory reference retrieval engine backed by preloaded buffers.
//!
//! Stands in for a real execution engine in tests and demos: `retrieve`
//! "executes" by recording the target node set and serving buffers out of a
//! preloaded table. Missing names fail the whole retrieval, matching the
//! all-or-nothing engine contract.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use anyhow::{bail, Result};
use tensorlink::{FetchResults, NodeId, OutputName, RawBuffer, RetrievalEngine};

/// Serves fetches from a table of preloaded buffers.
#[derive(Default)]
pub struct MemoryEngine {
    buffers: HashMap<OutputName, RawBuffer>,
    executed: Mutex<Vec<BTreeSet<NodeId>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads the buffer served for `name`, replacing any previous one.
    pub fn insert(&mut self, name: OutputName, buffer: RawBuffer) {
        self.buffers.insert(name, buffer);
    }

    /// Target sets passed to `retrieve`, in call order.
    pub fn executed(&self) -> Vec<BTreeSet<NodeId>> {
        self.lock().clone()
    }

    /// Number of retrieval round trips performed.
    pub fn runs(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BTreeSet<NodeId>>> {
        self.executed.lock().expect("memory engine mutex poisoned")
    }
}

impl RetrievalEngine for MemoryEngine {
    fn retrieve(
        &self,
        targets: &BTreeSet<NodeId>,
        names: &BTreeSet<OutputName>,
    ) -> Result<FetchResults> {
        let mut results = FetchResults::new();
        for name in names {
            match self.buffers.get(name) {
                Some(buffer) => {
                    results.insert(name.clone(), buffer.clone());
                }
                None => bail!("memory engine holds no buffer named `{name}`"),
            }
        }
        self.lock().push(targets.clone());
        Ok(results)
    }
}
