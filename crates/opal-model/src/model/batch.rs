//! Batch constraint builds over key sets.

use std::collections::BTreeMap;
use std::time::Instant;

use opal_expr::ConstraintExpr;

use crate::model::error::ModelError;
use crate::model::Model;
use crate::range::{ConstraintRange, IndexedConstraintRange};

/// A fallible row builder used in batch builds. Returning `None` defers the
/// key to the next builder in the chain.
pub type RowBuilder<'a, K> = &'a dyn Fn(&K) -> Option<ConstraintExpr>;

impl Model {
    /// Add one constraint per index in `0..count`.
    pub fn add_constraint_range<F>(&mut self, count: usize, mut build: F) -> ConstraintRange
    where
        F: FnMut(usize) -> ConstraintExpr,
    {
        let offset = self.num_constraints() as u32;
        for index in 0..count {
            self.add_constraint(build(index));
        }
        ConstraintRange::new(offset, count as u32)
    }

    /// Add one constraint per key, choosing the row from a chain of
    /// builders: for each key the builders run in order and the first
    /// `Some` wins. A key every builder declines is an error; the rows
    /// added before it stay in the model.
    pub fn add_constraints<K>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
        builders: &[RowBuilder<'_, K>],
    ) -> Result<IndexedConstraintRange<K>, ModelError>
    where
        K: Ord + std::fmt::Debug,
    {
        let started = Instant::now();
        let mut ids = BTreeMap::new();
        for key in keys {
            let row = builders
                .iter()
                .find_map(|build| build(&key))
                .ok_or_else(|| ModelError::AmbiguousConstraint {
                    key: format!("{key:?}"),
                })?;
            let id = self.add_constraint(row);
            ids.insert(key, id);
        }

        tracing::debug!(
            component = "model",
            operation = "add_constraints",
            status = "success",
            rows = ids.len(),
            builders = builders.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built keyed constraint batch"
        );
        Ok(IndexedConstraintRange::new(ids))
    }
}
