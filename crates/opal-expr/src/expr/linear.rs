//! Linear expressions: a lazy term sequence plus a scalar constant.

use crate::canonical::canonical_linear;
use crate::expr::constraint::{ComparisonSense, ConstraintExpr, RangedConstraintExpr};
use crate::ids::VariableId;
use crate::seq::LinearSeq;

/// A linear expression over decision variables.
///
/// Algebra operations consume their operands and return new lazy views; no
/// term storage is copied. Duplicate variables are legal until the
/// expression is canonicalized or assembled.
#[derive(Debug, Clone)]
pub struct LinearExpr {
    terms: LinearSeq,
    constant: f64,
}

impl LinearExpr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (additive identity).
    pub fn empty() -> Self {
        Self {
            terms: LinearSeq::empty(),
            constant: 0.0,
        }
    }

    /// Just a constant, no variable terms.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: LinearSeq::empty(),
            constant: value,
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var: VariableId) -> Self {
        Self::term(var, 1.0)
    }

    /// Single term `coef * var`.
    pub fn term(var: VariableId, coef: f64) -> Self {
        Self {
            terms: LinearSeq::term(var, coef),
            constant: 0.0,
        }
    }

    /// From owned terms and a constant.
    pub fn new(terms: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self {
            terms: LinearSeq::Terms(terms),
            constant,
        }
    }

    /// Sum of a contiguous id span with unit coefficients.
    pub fn unit_span(offset: u32, count: u32) -> Self {
        Self {
            terms: LinearSeq::Unit { offset, count },
            constant: 0.0,
        }
    }

    pub fn from_parts(terms: LinearSeq, constant: f64) -> Self {
        Self { terms, constant }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> &LinearSeq {
        &self.terms
    }

    pub fn into_parts(self) -> (LinearSeq, f64) {
        (self.terms, self.constant)
    }

    /// Visit every raw term (duplicates included) in sequence order.
    pub fn for_each_term<F: FnMut(VariableId, f64)>(&self, f: &mut F) {
        self.terms.for_each(f);
    }

    /// Canonical sparse terms: sorted, merged, zero-free.
    pub fn canonical_terms(&self) -> Vec<(VariableId, f64)> {
        canonical_linear(&self.terms)
    }

    /// Value of the expression at a point. `values` is indexed by variable
    /// id, matching the layout of a solution's primal vector.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        let mut total = self.constant;
        self.terms
            .for_each(&mut |var, coef| total += coef * values[var.uid()]);
        total
    }

    // ── Algebra (lazy views) ────────────────────────────────

    /// Term-wise negation, constant negated.
    pub fn negate(self) -> Self {
        self.scale(-1.0)
    }

    /// Every coefficient and the constant scaled by a factor. Scaling by
    /// zero is not special-cased; the zero terms fall out at
    /// canonicalization.
    pub fn scale(self, by: f64) -> Self {
        Self {
            terms: self.terms.scaled(by),
            constant: self.constant * by,
        }
    }

    /// Concatenate term sequences, sum constants. Duplicate merging is
    /// deferred to canonicalization or assembly.
    pub fn add(self, other: LinearExpr) -> Self {
        Self {
            terms: self.terms.chained(other.terms),
            constant: self.constant + other.constant,
        }
    }

    pub fn add_constant(self, value: f64) -> Self {
        Self {
            terms: self.terms,
            constant: self.constant + value,
        }
    }

    // ── Comparisons (produce ConstraintExpr) ────────────────

    fn compare(self, rhs: LinearExpr, sense: ComparisonSense) -> ConstraintExpr {
        let combined = self.add(rhs.negate());
        let (terms, constant) = combined.into_parts();
        ConstraintExpr::new(LinearExpr::from_parts(terms, 0.0), sense, -constant)
    }

    pub fn le(self, rhs: LinearExpr) -> ConstraintExpr {
        self.compare(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge(self, rhs: LinearExpr) -> ConstraintExpr {
        self.compare(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq(self, rhs: LinearExpr) -> ConstraintExpr {
        self.compare(rhs, ComparisonSense::Equal)
    }

    pub fn le_scalar(self, rhs: f64) -> ConstraintExpr {
        self.le(LinearExpr::constant(rhs))
    }

    pub fn ge_scalar(self, rhs: f64) -> ConstraintExpr {
        self.ge(LinearExpr::constant(rhs))
    }

    pub fn eq_scalar(self, rhs: f64) -> ConstraintExpr {
        self.eq(LinearExpr::constant(rhs))
    }

    /// Double-bounded form `lower <= self <= upper`. The expression's
    /// constant folds into both bounds.
    pub fn between(self, lower: f64, upper: f64) -> RangedConstraintExpr {
        let (terms, constant) = self.into_parts();
        RangedConstraintExpr::new(
            LinearExpr::from_parts(terms, 0.0),
            lower - constant,
            upper - constant,
        )
    }
}

impl Default for LinearExpr {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<VariableId> for LinearExpr {
    fn from(var: VariableId) -> Self {
        LinearExpr::var(var)
    }
}

/// Sum of many linear expressions (term concatenation, constants summed).
pub fn sum<I>(exprs: I) -> LinearExpr
where
    I: IntoIterator<Item = LinearExpr>,
{
    exprs
        .into_iter()
        .fold(LinearExpr::empty(), |acc, e| acc.add(e))
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for LinearExpr {
    type Output = LinearExpr;

    fn add(self, rhs: LinearExpr) -> Self::Output {
        LinearExpr::add(self, rhs)
    }
}

impl std::ops::Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> Self::Output {
        LinearExpr::add(self, rhs.negate())
    }
}

impl std::ops::Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Add<f64> for LinearExpr {
    type Output = LinearExpr;

    fn add(self, rhs: f64) -> Self::Output {
        self.add_constant(rhs)
    }
}

impl std::ops::Sub<f64> for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: f64) -> Self::Output {
        self.add_constant(-rhs)
    }
}

impl std::ops::Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Mul<LinearExpr> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: LinearExpr) -> Self::Output {
        rhs.scale(self)
    }
}

// Division by zero follows IEEE semantics: coefficients become inf/nan.
impl std::ops::Div<f64> for LinearExpr {
    type Output = LinearExpr;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(1.0 / rhs)
    }
}
