//! Leaf decoders for the terminal fetchable handle types.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::buffer::{Element, Shape};
use crate::error::FetchError;
use crate::graph::{ControlHandle, GraphContext, NodeId, TensorHandle};

use super::descriptor::FetchDescriptor;
use super::fetchable::{Fetchable, HasNodes};

/// Decoded tensor output: the buffer's declared shape plus the flat element
/// sequence in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue<E> {
    shape: Shape,
    values: Vec<E>,
}

impl<E: Element> TensorValue<E> {
    pub fn new(shape: Shape, values: Vec<E>) -> Self {
        TensorValue { shape, values }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn values(&self) -> &[E] {
        &self.values
    }

    /// Drops the shape and keeps the ordered element list.
    pub fn into_values(self) -> Vec<E> {
        self.values
    }

    /// Extracts the single element of a scalar result.
    pub fn into_scalar(self) -> Result<E, FetchError> {
        if self.values.len() != 1 {
            return Err(FetchError::ScalarCount {
                actual: self.values.len(),
            });
        }
        Ok(self.values[0])
    }
}

impl HasNodes for ControlHandle {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>> {
        Ok(BTreeSet::from([ctx.register_node(*self)?]))
    }
}

impl Fetchable for ControlHandle {
    type Fetched = ();

    /// Control fetches carry no data: the descriptor requests nothing and
    /// reconstruction returns unit against any mapping.
    fn fetch(&self, _ctx: &GraphContext) -> Result<FetchDescriptor<()>> {
        Ok(FetchDescriptor::pure(()))
    }
}

impl<E: Element> HasNodes for TensorHandle<E> {
    fn collect_nodes(&self, ctx: &GraphContext) -> Result<BTreeSet<NodeId>> {
        Ok(BTreeSet::from([ctx.register_node(*self)?]))
    }
}

impl<E: Element> Fetchable for TensorHandle<E> {
    type Fetched = TensorValue<E>;

    /// The vector form: one rendered output name, reconstruction validates
    /// the declared dtype against `E` and decodes the payload.
    fn fetch(&self, ctx: &GraphContext) -> Result<FetchDescriptor<TensorValue<E>>> {
        let name = ctx.render_output_name(*self)?;
        let key = name.clone();
        Ok(FetchDescriptor::new(
            BTreeSet::from([name]),
            move |results| {
                let buffer = results.buffer(&key);
                if buffer.dtype() != E::DTYPE {
                    return Err(FetchError::DtypeMismatch {
                        expected: E::DTYPE,
                        actual: buffer.dtype(),
                    }
                    .into());
                }
                let shape = buffer.shape().clone();
                let values = buffer.decode_elements::<E>()?;
                Ok(TensorValue::new(shape, values))
            },
        ))
    }
}

impl<E: Element> TensorHandle<E> {
    /// List form: the ordered element sequence without its shape.
    pub fn fetch_values(&self, ctx: &GraphContext) -> Result<FetchDescriptor<Vec<E>>> {
        Ok(self.fetch(ctx)?.map(TensorValue::into_values))
    }

    /// Scalar form: asserts the decoded sequence holds exactly one element.
    pub fn fetch_scalar(&self, ctx: &GraphContext) -> Result<FetchDescriptor<E>> {
        Ok(self
            .fetch(ctx)?
            .try_map(|value| Ok(value.into_scalar()?)))
    }
}
