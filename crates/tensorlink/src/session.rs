//! Engine seam and the run loop tying collection, retrieval, and decode
//! together.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::fetch::{FetchResults, Fetchable};
use crate::graph::{GraphContext, NodeId, OutputName};

/// Executes finalized graph nodes and returns their requested output
/// buffers.
///
/// Implementations must cover every requested name or fail the whole
/// retrieval; partial results never surface into reconstruction. The call
/// may block on a network or device round trip; cancellation and timeouts
/// live here, not in the fetch layer.
pub trait RetrievalEngine {
    fn retrieve(
        &self,
        targets: &BTreeSet<NodeId>,
        names: &BTreeSet<OutputName>,
    ) -> Result<FetchResults>;
}

/// Pairs a graph-building context with the engine that executes it.
pub struct Session<E> {
    context: GraphContext,
    engine: E,
}

impl<E: RetrievalEngine> Session<E> {
    pub fn new(engine: E) -> Self {
        Session {
            context: GraphContext::new(),
            engine,
        }
    }

    pub fn context(&self) -> &GraphContext {
        &self.context
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Retrieves and decodes the computed value of `value` in one round
    /// trip: collect the node closure, build the descriptor, retrieve the
    /// requested buffers, reconstruct.
    pub fn run<F: Fetchable>(&self, value: &F) -> Result<F::Fetched> {
        let targets = value.collect_nodes(&self.context)?;
        let fetch = value.fetch(&self.context)?;
        let results = self.engine.retrieve(&targets, fetch.names())?;
        fetch.reconstruct(&results)
    }
}
