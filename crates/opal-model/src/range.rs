//! Entity ranges: contiguous spans of ids handed out by the model.
//!
//! A range is a lightweight handle; it stores no per-entity state. The
//! indexed variants map domain keys to ids, either through a caller-supplied
//! flattening function (variables) or a stored key map (constraints).
//!
//! Lookup is fail-fast: `get`/`key` panic on an out-of-range index with the
//! corresponding [`ModelError`] message. The `try_` variants return the
//! error instead for callers that validate untrusted input.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use opal_expr::{ConstraintId, LinearExpr, VariableId};

use crate::model::ModelError;

/// A contiguous span of variable ids.
#[derive(Debug, Clone, Copy)]
pub struct VariableRange {
    offset: u32,
    count: u32,
}

impl VariableRange {
    pub(crate) fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn try_get(&self, index: usize) -> Result<VariableId, ModelError> {
        if index < self.count as usize {
            Ok(VariableId::new(self.offset + index as u32))
        } else {
            Err(ModelError::IndexOutOfRange {
                index,
                count: self.count as usize,
            })
        }
    }

    /// Variable at a position within the range.
    ///
    /// # Panics
    /// Panics when `index >= len()`.
    pub fn get(&self, index: usize) -> VariableId {
        match self.try_get(index) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn contains(&self, var: VariableId) -> bool {
        var.inner() >= self.offset && var.inner() < self.offset + self.count
    }

    pub fn iter(&self) -> impl Iterator<Item = VariableId> + '_ {
        (self.offset..self.offset + self.count).map(VariableId::new)
    }

    /// Sum of every variable in the range, as a lazy unit-coefficient span.
    pub fn total(&self) -> LinearExpr {
        LinearExpr::unit_span(self.offset, self.count)
    }
}

impl IntoIterator for VariableRange {
    type Item = VariableId;
    type IntoIter = std::iter::Map<std::ops::Range<u32>, fn(u32) -> VariableId>;

    fn into_iter(self) -> Self::IntoIter {
        (self.offset..self.offset + self.count).map(VariableId::new)
    }
}

/// A [`VariableRange`] addressed by domain keys through a flattening
/// function mapping each key to a position in `0..len`.
#[derive(Debug, Clone)]
pub struct IndexedVariableRange<K, F>
where
    F: Fn(&K) -> usize,
{
    range: VariableRange,
    position_of: F,
    _key: PhantomData<fn(&K)>,
}

impl<K, F> IndexedVariableRange<K, F>
where
    F: Fn(&K) -> usize,
{
    pub(crate) fn new(range: VariableRange, position_of: F) -> Self {
        Self {
            range,
            position_of,
            _key: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn as_range(&self) -> VariableRange {
        self.range
    }

    pub fn try_key(&self, key: &K) -> Result<VariableId, ModelError> {
        self.range.try_get((self.position_of)(key))
    }

    /// Variable for a domain key.
    ///
    /// # Panics
    /// Panics when the key flattens outside the range.
    pub fn key(&self, key: &K) -> VariableId {
        match self.try_key(key) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.range.iter()
    }

    pub fn total(&self) -> LinearExpr {
        self.range.total()
    }
}

/// A contiguous span of constraint ids.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintRange {
    offset: u32,
    count: u32,
}

impl ConstraintRange {
    pub(crate) fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn try_get(&self, index: usize) -> Result<ConstraintId, ModelError> {
        if index < self.count as usize {
            Ok(ConstraintId::new(self.offset + index as u32))
        } else {
            Err(ModelError::IndexOutOfRange {
                index,
                count: self.count as usize,
            })
        }
    }

    /// Constraint at a position within the range.
    ///
    /// # Panics
    /// Panics when `index >= len()`.
    pub fn get(&self, index: usize) -> ConstraintId {
        match self.try_get(index) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        (self.offset..self.offset + self.count).map(ConstraintId::new)
    }
}

/// Constraints addressed by the keys they were built from.
///
/// Unlike variables, keyed constraints have no flattening function; the
/// key-to-id association is recorded at build time.
#[derive(Debug, Clone)]
pub struct IndexedConstraintRange<K: Ord> {
    ids: BTreeMap<K, ConstraintId>,
}

impl<K: Ord> IndexedConstraintRange<K> {
    pub(crate) fn new(ids: BTreeMap<K, ConstraintId>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn try_key(&self, key: &K) -> Result<ConstraintId, ModelError>
    where
        K: std::fmt::Debug,
    {
        self.ids
            .get(key)
            .copied()
            .ok_or_else(|| ModelError::UnknownConstraintKey {
                key: format!("{key:?}"),
            })
    }

    /// Constraint for a domain key.
    ///
    /// # Panics
    /// Panics when the key was not part of the build.
    pub fn key(&self, key: &K) -> ConstraintId
    where
        K: std::fmt::Debug,
    {
        match self.try_key(key) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, ConstraintId)> + '_ {
        self.ids.iter().map(|(key, id)| (key, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_indexing_and_iteration() {
        let range = VariableRange::new(4, 3);
        assert_eq!(range.get(0), VariableId::new(4));
        assert_eq!(range.get(2), VariableId::new(6));
        assert!(range.contains(VariableId::new(5)));
        assert!(!range.contains(VariableId::new(7)));
        let ids: Vec<u32> = range.iter().map(VariableId::inner).collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn out_of_range_is_reported() {
        let range = VariableRange::new(0, 2);
        let err = range.try_get(2).unwrap_err();
        assert_eq!(err.code(), "RANGE_INDEX_OUT_OF_BOUNDS");
    }

    #[test]
    #[should_panic(expected = "RANGE_INDEX_OUT_OF_BOUNDS")]
    fn get_panics_out_of_range() {
        VariableRange::new(0, 2).get(5);
    }

    #[test]
    fn indexed_range_flattens_keys() {
        // 2x3 grid, row-major
        let range = IndexedVariableRange::new(VariableRange::new(10, 6), |&(i, j): &(usize, usize)| {
            3 * i + j
        });
        assert_eq!(range.key(&(0, 0)), VariableId::new(10));
        assert_eq!(range.key(&(1, 2)), VariableId::new(15));
        assert!(range.try_key(&(2, 0)).is_err());
    }

    #[test]
    fn total_spans_the_range() {
        let range = VariableRange::new(2, 2);
        assert_eq!(
            range.total().canonical_terms(),
            vec![(VariableId::new(2), 1.0), (VariableId::new(3), 1.0)]
        );
    }

    #[test]
    fn keyed_constraints_look_up_by_key() {
        let mut ids = BTreeMap::new();
        ids.insert("cap", ConstraintId::new(0));
        ids.insert("flow", ConstraintId::new(1));
        let range = IndexedConstraintRange::new(ids);
        assert_eq!(range.key(&"flow"), ConstraintId::new(1));
        let err = range.try_key(&"demand").unwrap_err();
        assert_eq!(err.code(), "CONSTRAINT_UNKNOWN_KEY");
    }
}
