//! Sparse row assembly with generation-stamped coalescing.
//!
//! Flattening an expression yields terms in arbitrary order with duplicate
//! variables. The assembler merges duplicates in amortized O(1) per term
//! using a per-column stamp: `cache[col] = (generation, slot)` records which
//! pass last touched the column and where its coefficient sits in the staged
//! row. A new pass bumps the generation instead of clearing the cache, so
//! stale entries are invalidated without an O(columns) sweep.

use opal_expr::VariableId;

/// Reusable scratch state for flattening one row at a time.
#[derive(Debug, Default)]
pub struct RowAssembler {
    /// Monotone pass counter. Never reset; starts at 0 and is incremented
    /// before each pass, so the `(0, 0)` cache default can never match.
    generation: u64,
    /// Per-column `(last pass, staged slot)`. Grows lazily to the largest
    /// column id seen.
    cache: Vec<(u64, usize)>,
    vars: Vec<u32>,
    coefs: Vec<f64>,
    scratch: Vec<(u32, f64)>,
}

impl RowAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start flattening a new row. Discards staged terms, keeps the cache.
    pub fn begin_pass(&mut self) {
        self.generation += 1;
        self.vars.clear();
        self.coefs.clear();
    }

    /// Stage one term, merging into the existing slot when this pass already
    /// saw the column.
    pub fn push_term(&mut self, var: VariableId, coef: f64) {
        let col = var.uid();
        if col >= self.cache.len() {
            self.cache.resize(col + 1, (0, 0));
        }
        let (stamp, slot) = self.cache[col];
        if stamp == self.generation {
            self.coefs[slot] += coef;
        } else {
            self.cache[col] = (self.generation, self.vars.len());
            self.vars.push(var.inner());
            self.coefs.push(coef);
        }
    }

    /// Number of distinct columns staged in the current pass.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Sort staged entries by column and drop exact zeros. Call once per
    /// pass, after the last [`push_term`](Self::push_term).
    pub fn canonicalize(&mut self) {
        self.scratch.clear();
        self.scratch.extend(
            self.vars
                .iter()
                .zip(&self.coefs)
                .filter(|(_, coef)| **coef != 0.0)
                .map(|(var, coef)| (*var, *coef)),
        );
        self.scratch.sort_unstable_by_key(|(var, _)| *var);
        self.vars.clear();
        self.coefs.clear();
        for (var, coef) in &self.scratch {
            self.vars.push(*var);
            self.coefs.push(*coef);
        }
    }

    /// Staged entries, parallel slices.
    pub fn entries(&self) -> (&[u32], &[f64]) {
        (&self.vars, &self.coefs)
    }
}
