//! The fetch descriptor and its combinator algebra.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::graph::OutputName;

use super::results::FetchResults;

type Rebuild<A> = Arc<dyn Fn(&FetchResults) -> Result<A> + Send + Sync>;

/// A typed description of one retrieval: the exact set of output names to
/// request, paired with the pure function that reconstructs a host value
/// from the returned name-to-buffer mapping.
///
/// Descriptors are immutable once built and freely shareable across threads;
/// reconstruction performs no I/O and may run any number of times against
/// the same results. The name set is always the minimal closure of names the
/// reconstruction function reads.
pub struct FetchDescriptor<A> {
    names: BTreeSet<OutputName>,
    rebuild: Rebuild<A>,
}

impl<A> Clone for FetchDescriptor<A> {
    fn clone(&self) -> Self {
        FetchDescriptor {
            names: self.names.clone(),
            rebuild: Arc::clone(&self.rebuild),
        }
    }
}

impl<A> fmt::Debug for FetchDescriptor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchDescriptor")
            .field("names", &self.names)
            .finish()
    }
}

impl<A: 'static> FetchDescriptor<A> {
    /// Builds a descriptor from its raw parts.
    ///
    /// The reconstruction function must only read names present in `names`.
    pub fn new(
        names: BTreeSet<OutputName>,
        rebuild: impl Fn(&FetchResults) -> Result<A> + Send + Sync + 'static,
    ) -> Self {
        FetchDescriptor {
            names,
            rebuild: Arc::new(rebuild),
        }
    }

    /// Descriptor that requests nothing and always reconstructs `value`.
    ///
    /// Identity element for [`combine`](Self::combine).
    pub fn pure(value: A) -> Self
    where
        A: Clone + Send + Sync,
    {
        Self::new(BTreeSet::new(), move |_| Ok(value.clone()))
    }

    /// The output names this descriptor needs the engine to return.
    pub fn names(&self) -> &BTreeSet<OutputName> {
        &self.names
    }

    /// Runs the reconstruction function against one retrieval result.
    pub fn reconstruct(&self, results: &FetchResults) -> Result<A> {
        (self.rebuild)(results)
    }

    /// Composes a pure function after reconstruction. The name set is
    /// untouched.
    pub fn map<B, F>(self, f: F) -> FetchDescriptor<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let rebuild = self.rebuild;
        FetchDescriptor {
            names: self.names,
            rebuild: Arc::new(move |results| rebuild(results).map(&f)),
        }
    }

    /// Fallible sibling of [`map`](Self::map); decode errors propagate.
    pub fn try_map<B, F>(self, f: F) -> FetchDescriptor<B>
    where
        B: 'static,
        F: Fn(A) -> Result<B> + Send + Sync + 'static,
    {
        let rebuild = self.rebuild;
        FetchDescriptor {
            names: self.names,
            rebuild: Arc::new(move |results| f(rebuild(results)?)),
        }
    }

    /// Pairs two descriptors into one request.
    ///
    /// The name set is the union of both sides (a buffer requested twice is
    /// requested once); reconstruction applies each side's function
    /// independently to the same shared read-only mapping.
    pub fn combine<B: 'static>(self, other: FetchDescriptor<B>) -> FetchDescriptor<(A, B)> {
        let mut names = self.names;
        names.extend(other.names);
        let left = self.rebuild;
        let right = other.rebuild;
        FetchDescriptor {
            names,
            rebuild: Arc::new(move |results| Ok((left(results)?, right(results)?))),
        }
    }

    /// N-ary generalization of [`combine`](Self::combine) for homogeneous
    /// lists.
    ///
    /// Reconstruction yields one value per input descriptor, in input order;
    /// the first element decode failure fails the whole list.
    pub fn collect(items: Vec<FetchDescriptor<A>>) -> FetchDescriptor<Vec<A>> {
        let mut names = BTreeSet::new();
        for item in &items {
            names.extend(item.names.iter().cloned());
        }
        let rebuilds: Vec<Rebuild<A>> = items.into_iter().map(|item| item.rebuild).collect();
        FetchDescriptor {
            names,
            rebuild: Arc::new(move |results| {
                rebuilds
                    .iter()
                    .map(|rebuild| rebuild(results))
                    .collect::<Result<Vec<A>>>()
            }),
        }
    }
}
