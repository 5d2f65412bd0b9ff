//! Capability traits and the structural composition over tuples and lists.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::graph::{GraphContext, NodeId};

use super::descriptor::FetchDescriptor;

/// Capability of naming the graph nodes a value transitively depends on.
///
/// Collecting may finalize lazily staged operations in the context, so every
/// element of a composite is visited even when its nodes are already in the
/// set. Context failures propagate unchanged.
pub trait HasNodes {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>>;
}

/// Capability of being retrieved and decoded after execution.
///
/// Fetching implies depending, so every fetchable type also names its nodes.
/// Building the descriptor may render output names in the context as a side
/// effect; the descriptor itself is pure afterwards.
pub trait Fetchable: HasNodes {
    /// Host value the fetch reconstructs.
    type Fetched: 'static;

    fn fetch(&self, ctx: &GraphContext) -> Result<FetchDescriptor<Self::Fetched>>;
}

impl<T: HasNodes> HasNodes for &T {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>> {
        (**self).collect_nodes(ctx)
    }
}

impl<T: Fetchable> Fetchable for &T {
    type Fetched = T::Fetched;

    fn fetch(&self, ctx: &GraphContext) -> Result<FetchDescriptor<Self::Fetched>> {
        (**self).fetch(ctx)
    }
}

impl<A: HasNodes, B: HasNodes> HasNodes for (A, B) {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>> {
        let mut nodes = self.0.collect_nodes(ctx)?;
        nodes.extend(self.1.collect_nodes(ctx)?);
        Ok(nodes)
    }
}

impl<A: Fetchable, B: Fetchable> Fetchable for (A, B) {
    type Fetched = (A::Fetched, B::Fetched);

    fn fetch(&self, ctx: &GraphContext) -> Result<FetchDescriptor<Self::Fetched>> {
        Ok(self.0.fetch(ctx)?.combine(self.1.fetch(ctx)?))
    }
}

impl<A: HasNodes, B: HasNodes, C: HasNodes> HasNodes for (A, B, C) {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>> {
        let mut nodes = self.0.collect_nodes(ctx)?;
        nodes.extend(self.1.collect_nodes(ctx)?);
        nodes.extend(self.2.collect_nodes(ctx)?);
        Ok(nodes)
    }
}

impl<A: Fetchable, B: Fetchable, C: Fetchable> Fetchable for (A, B, C) {
    type Fetched = (A::Fetched, B::Fetched, C::Fetched);

    fn fetch(&self, ctx: &GraphContext) -> Result<FetchDescriptor<Self::Fetched>> {
        let pair = self.0.fetch(ctx)?.combine(self.1.fetch(ctx)?);
        Ok(pair
            .combine(self.2.fetch(ctx)?)
            .map(|((a, b), c)| (a, b, c)))
    }
}

impl<T: HasNodes> HasNodes for Vec<T> {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>> {
        let mut nodes = BTreeSet::new();
        for item in self {
            nodes.extend(item.collect_nodes(ctx)?);
        }
        Ok(nodes)
    }
}

impl<T: Fetchable> Fetchable for Vec<T> {
    type Fetched = Vec<T::Fetched>;

    fn fetch(&self, ctx: &GraphContext) -> Result<FetchDescriptor<Self::Fetched>> {
        let descriptors = self
            .iter()
            .map(|item| item.fetch(ctx))
            .collect::<Result<Vec<_>>>()?;
        Ok(FetchDescriptor::collect(descriptors))
    }
}
