//! Lazy, restartable term sequences.
//!
//! A term sequence is a finite ordered collection of (variable, coefficient)
//! entries produced by slicing, scaling, concatenating or crossing other
//! sequences. Composition never copies the underlying term storage; a
//! sequence is a pure function of its sources and can be replayed any number
//! of times with identical results (once for printing, once for assembly).
//!
//! Three kinds exist and are deliberately distinct types:
//! - [`LinearSeq`]    — (variable, coefficient)
//! - [`QuadSeq`]      — (variable, variable, coefficient), pair order
//!   insignificant; canonicalization keys on `(min, max)`
//! - [`BilinearSeq`]  — (left variable, right variable, coefficient); the
//!   two positions carry distinct roles and are never symmetrized

use std::rc::Rc;

use crate::ids::VariableId;

/// Lazy sequence of linear terms.
#[derive(Debug, Clone)]
pub enum LinearSeq {
    /// Owned term storage.
    Terms(Vec<(VariableId, f64)>),
    /// Contiguous id span with unit coefficients (an entity range viewed as
    /// the sum of its variables).
    Unit { offset: u32, count: u32 },
    /// Every coefficient of the source multiplied by a factor.
    Scale { seq: Rc<LinearSeq>, factor: f64 },
    /// Concatenation; duplicate variables are legal and left for the
    /// canonicalizer or the assembly engine to merge.
    Chain(Rc<LinearSeq>, Rc<LinearSeq>),
}

impl LinearSeq {
    pub fn empty() -> Self {
        LinearSeq::Terms(Vec::new())
    }

    /// Single term `coef * var`.
    pub fn term(var: VariableId, coef: f64) -> Self {
        LinearSeq::Terms(vec![(var, coef)])
    }

    /// Visit every term in deterministic order.
    pub fn for_each<F: FnMut(VariableId, f64)>(&self, f: &mut F) {
        self.visit(1.0, f);
    }

    fn visit<F: FnMut(VariableId, f64)>(&self, factor: f64, f: &mut F) {
        match self {
            LinearSeq::Terms(terms) => {
                for (var, coef) in terms {
                    f(*var, factor * coef);
                }
            }
            LinearSeq::Unit { offset, count } => {
                for id in *offset..offset + count {
                    f(VariableId::new(id), factor);
                }
            }
            LinearSeq::Scale { seq, factor: by } => seq.visit(factor * by, f),
            LinearSeq::Chain(a, b) => {
                a.visit(factor, f);
                b.visit(factor, f);
            }
        }
    }

    /// Exact number of terms the sequence will yield.
    pub fn len_hint(&self) -> usize {
        match self {
            LinearSeq::Terms(terms) => terms.len(),
            LinearSeq::Unit { count, .. } => *count as usize,
            LinearSeq::Scale { seq, .. } => seq.len_hint(),
            LinearSeq::Chain(a, b) => a.len_hint() + b.len_hint(),
        }
    }

    /// Materialize into an owned vector, duplicates preserved.
    pub fn to_terms(&self) -> Vec<(VariableId, f64)> {
        let mut out = Vec::with_capacity(self.len_hint());
        self.for_each(&mut |var, coef| out.push((var, coef)));
        out
    }

    pub fn scaled(self, factor: f64) -> Self {
        LinearSeq::Scale {
            seq: Rc::new(self),
            factor,
        }
    }

    pub fn chained(self, other: LinearSeq) -> Self {
        LinearSeq::Chain(Rc::new(self), Rc::new(other))
    }
}

/// Lazy sequence of quadratic terms. `(u, v, c)` and `(v, u, c)` denote the
/// same term.
#[derive(Debug, Clone)]
pub enum QuadSeq {
    Terms(Vec<(VariableId, VariableId, f64)>),
    Scale { seq: Rc<QuadSeq>, factor: f64 },
    Chain(Rc<QuadSeq>, Rc<QuadSeq>),
    /// Cartesian product of two linear sequences.
    Cross(Rc<LinearSeq>, Rc<LinearSeq>),
}

impl QuadSeq {
    pub fn empty() -> Self {
        QuadSeq::Terms(Vec::new())
    }

    pub fn for_each<F: FnMut(VariableId, VariableId, f64)>(&self, f: &mut F) {
        self.visit(1.0, f);
    }

    fn visit<F: FnMut(VariableId, VariableId, f64)>(&self, factor: f64, f: &mut F) {
        match self {
            QuadSeq::Terms(terms) => {
                for (u, v, coef) in terms {
                    f(*u, *v, factor * coef);
                }
            }
            QuadSeq::Scale { seq, factor: by } => seq.visit(factor * by, f),
            QuadSeq::Chain(a, b) => {
                a.visit(factor, f);
                b.visit(factor, f);
            }
            QuadSeq::Cross(a, b) => {
                a.for_each(&mut |u, cu| {
                    b.visit(factor * cu, &mut |v, cv| f(u, v, cv));
                });
            }
        }
    }

    pub fn len_hint(&self) -> usize {
        match self {
            QuadSeq::Terms(terms) => terms.len(),
            QuadSeq::Scale { seq, .. } => seq.len_hint(),
            QuadSeq::Chain(a, b) => a.len_hint() + b.len_hint(),
            QuadSeq::Cross(a, b) => a.len_hint() * b.len_hint(),
        }
    }

    pub fn to_terms(&self) -> Vec<(VariableId, VariableId, f64)> {
        let mut out = Vec::with_capacity(self.len_hint());
        self.for_each(&mut |u, v, coef| out.push((u, v, coef)));
        out
    }

    pub fn scaled(self, factor: f64) -> Self {
        QuadSeq::Scale {
            seq: Rc::new(self),
            factor,
        }
    }

    pub fn chained(self, other: QuadSeq) -> Self {
        QuadSeq::Chain(Rc::new(self), Rc::new(other))
    }
}

/// Lazy sequence of bilinear terms. Unlike [`QuadSeq`] the two variable
/// positions are role-distinguished (left margin vs right margin) and must
/// never be swapped.
#[derive(Debug, Clone)]
pub enum BilinearSeq {
    Terms(Vec<(VariableId, VariableId, f64)>),
    Scale { seq: Rc<BilinearSeq>, factor: f64 },
    Chain(Rc<BilinearSeq>, Rc<BilinearSeq>),
    /// Cartesian product: left sequence crossed with right sequence.
    Cross(Rc<LinearSeq>, Rc<LinearSeq>),
}

impl BilinearSeq {
    pub fn empty() -> Self {
        BilinearSeq::Terms(Vec::new())
    }

    pub fn for_each<F: FnMut(VariableId, VariableId, f64)>(&self, f: &mut F) {
        self.visit(1.0, f);
    }

    fn visit<F: FnMut(VariableId, VariableId, f64)>(&self, factor: f64, f: &mut F) {
        match self {
            BilinearSeq::Terms(terms) => {
                for (l, r, coef) in terms {
                    f(*l, *r, factor * coef);
                }
            }
            BilinearSeq::Scale { seq, factor: by } => seq.visit(factor * by, f),
            BilinearSeq::Chain(a, b) => {
                a.visit(factor, f);
                b.visit(factor, f);
            }
            BilinearSeq::Cross(left, right) => {
                left.for_each(&mut |l, cl| {
                    right.visit(factor * cl, &mut |r, cr| f(l, r, cr));
                });
            }
        }
    }

    pub fn len_hint(&self) -> usize {
        match self {
            BilinearSeq::Terms(terms) => terms.len(),
            BilinearSeq::Scale { seq, .. } => seq.len_hint(),
            BilinearSeq::Chain(a, b) => a.len_hint() + b.len_hint(),
            BilinearSeq::Cross(a, b) => a.len_hint() * b.len_hint(),
        }
    }

    pub fn to_terms(&self) -> Vec<(VariableId, VariableId, f64)> {
        let mut out = Vec::with_capacity(self.len_hint());
        self.for_each(&mut |l, r, coef| out.push((l, r, coef)));
        out
    }

    pub fn scaled(self, factor: f64) -> Self {
        BilinearSeq::Scale {
            seq: Rc::new(self),
            factor,
        }
    }

    pub fn chained(self, other: BilinearSeq) -> Self {
        BilinearSeq::Chain(Rc::new(self), Rc::new(other))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn v(id: u32) -> VariableId {
        VariableId::new(id)
    }

    #[test]
    fn terms_yield_in_order() {
        let seq = LinearSeq::Terms(vec![(v(3), 1.0), (v(1), 2.0)]);
        assert_eq!(seq.to_terms(), vec![(v(3), 1.0), (v(1), 2.0)]);
    }

    #[test]
    fn unit_spans_contiguous_ids() {
        let seq = LinearSeq::Unit { offset: 5, count: 3 };
        assert_eq!(seq.to_terms(), vec![(v(5), 1.0), (v(6), 1.0), (v(7), 1.0)]);
        assert_eq!(seq.len_hint(), 3);
    }

    #[test]
    fn scale_composes_multiplicatively() {
        let seq = LinearSeq::term(v(0), 2.0).scaled(3.0).scaled(-1.0);
        assert_eq!(seq.to_terms(), vec![(v(0), -6.0)]);
    }

    #[test]
    fn scale_by_zero_keeps_terms() {
        // zero coefficients survive until canonicalization
        let seq = LinearSeq::term(v(0), 2.0).scaled(0.0);
        assert_eq!(seq.to_terms(), vec![(v(0), 0.0)]);
    }

    #[test]
    fn chain_preserves_duplicates() {
        let seq = LinearSeq::term(v(1), 3.0).chained(LinearSeq::term(v(1), -1.0));
        assert_eq!(seq.to_terms(), vec![(v(1), 3.0), (v(1), -1.0)]);
    }

    #[test]
    fn sequences_are_restartable() {
        let seq = LinearSeq::term(v(1), 1.0).chained(LinearSeq::Unit { offset: 2, count: 2 });
        assert_eq!(seq.to_terms(), seq.to_terms());
    }

    #[test]
    fn quad_cross_is_cartesian_product() {
        let a = LinearSeq::Terms(vec![(v(0), 2.0), (v(1), 1.0)]);
        let b = LinearSeq::term(v(2), 3.0);
        let seq = QuadSeq::Cross(Rc::new(a), Rc::new(b));
        assert_eq!(seq.to_terms(), vec![(v(0), v(2), 6.0), (v(1), v(2), 3.0)]);
        assert_eq!(seq.len_hint(), 2);
    }

    #[test]
    fn bilinear_cross_keeps_roles() {
        let left = LinearSeq::term(v(4), 1.0);
        let right = LinearSeq::term(v(0), 5.0);
        let seq = BilinearSeq::Cross(Rc::new(left), Rc::new(right));
        // left variable stays in the left position even though its id is larger
        assert_eq!(seq.to_terms(), vec![(v(4), v(0), 5.0)]);
    }

    #[test]
    fn quad_scale_distributes_over_cross() {
        let a = LinearSeq::term(v(0), 2.0);
        let b = LinearSeq::term(v(1), 3.0);
        let seq = QuadSeq::Cross(Rc::new(a), Rc::new(b)).scaled(0.5);
        assert_eq!(seq.to_terms(), vec![(v(0), v(1), 3.0)]);
    }
}
