//! Flat name-to-buffer mapping produced by one retrieval round trip.

use std::collections::HashMap;

use crate::buffer::RawBuffer;
use crate::graph::OutputName;

/// The `{output name -> buffer}` mapping a retrieval engine returns.
///
/// Reconstruction functions read from this mapping only; it is never mutated
/// during reconstruction, so any number of descriptor branches may share it.
#[derive(Debug, Default, Clone)]
pub struct FetchResults {
    buffers: HashMap<OutputName, RawBuffer>,
}

impl FetchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a retrieved buffer, replacing any previous entry for the name.
    pub fn insert(&mut self, name: OutputName, buffer: RawBuffer) -> Option<RawBuffer> {
        self.buffers.insert(name, buffer)
    }

    /// Looks a buffer up without any contract expectation.
    pub fn get(&self, name: &OutputName) -> Option<&RawBuffer> {
        self.buffers.get(name)
    }

    /// Looks up a buffer the retrieval step was obligated to supply.
    ///
    /// Panics when the name is absent: the engine contract guarantees every
    /// requested name is covered, so a miss is a bug in the surrounding
    /// system, not a recoverable condition.
    pub fn buffer(&self, name: &OutputName) -> &RawBuffer {
        match self.buffers.get(name) {
            Some(buffer) => buffer,
            None => panic!(
                "retrieval result is missing requested buffer `{name}`; \
                 the engine must supply every requested name"
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl FromIterator<(OutputName, RawBuffer)> for FetchResults {
    fn from_iter<I: IntoIterator<Item = (OutputName, RawBuffer)>>(iter: I) -> Self {
        FetchResults {
            buffers: iter.into_iter().collect(),
        }
    }
}
