//! Constraint expressions: a normalized left-hand side, a comparison sense,
//! and a right-hand scalar.
//!
//! Built by comparing two expressions: all variable terms move to the left,
//! the net constant moves to the right negated, so the canonical form is
//! always `expr(x) <sense> rhs`, matching what solver row APIs expect.

use crate::expr::linear::LinearExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    /// The comparison symbol used in LP-style rendering.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "=",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: LinearExpr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    /// `expr` must carry a zero constant; the comparison builders on
    /// [`LinearExpr`] guarantee this.
    pub fn new(expr: LinearExpr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (LinearExpr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }

    /// Whether a candidate point satisfies the constraint. `values` is
    /// indexed by variable id, the layout solution vectors use.
    pub fn satisfied(&self, values: &[f64]) -> bool {
        let value = self.expr.evaluate(values);
        match self.sense {
            ComparisonSense::LessEqual => value <= self.rhs,
            ComparisonSense::GreaterEqual => value >= self.rhs,
            ComparisonSense::Equal => value == self.rhs,
        }
    }
}

/// A double-bounded constraint: `lower <= expr <= upper`.
///
/// Built by [`LinearExpr::between`], which folds the expression's constant
/// into both bounds. Equal bounds express an equality row.
#[derive(Debug, Clone)]
pub struct RangedConstraintExpr {
    expr: LinearExpr,
    lower: f64,
    upper: f64,
}

impl RangedConstraintExpr {
    /// `expr` must carry a zero constant; [`LinearExpr::between`]
    /// guarantees this.
    pub fn new(expr: LinearExpr, lower: f64, upper: f64) -> Self {
        Self { expr, lower, upper }
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn into_parts(self) -> (LinearExpr, f64, f64) {
        (self.expr, self.lower, self.upper)
    }

    /// Whether a candidate point lands inside both bounds.
    pub fn satisfied(&self, values: &[f64]) -> bool {
        let value = self.expr.evaluate(values);
        self.lower <= value && value <= self.upper
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ids::VariableId;

    #[test]
    fn exposes_parts() {
        let c = ConstraintExpr::new(
            LinearExpr::var(VariableId::new(3)),
            ComparisonSense::Equal,
            2.5,
        );
        assert_eq!(c.sense(), ComparisonSense::Equal);
        assert_eq!(c.rhs(), 2.5);
        let (expr, sense, rhs) = c.into_parts();
        assert_eq!(sense, ComparisonSense::Equal);
        assert_eq!(rhs, 2.5);
        assert_eq!(expr.canonical_terms().len(), 1);
    }

    #[test]
    fn sense_symbols() {
        assert_eq!(ComparisonSense::LessEqual.symbol(), "<=");
        assert_eq!(ComparisonSense::GreaterEqual.symbol(), ">=");
        assert_eq!(ComparisonSense::Equal.symbol(), "=");
        assert_eq!(ComparisonSense::LessEqual.as_str(), "le");
    }

    #[test]
    fn satisfied_checks_each_sense() {
        let expr = LinearExpr::term(VariableId::new(0), 2.0);
        let values = [3.0];
        assert!(ConstraintExpr::new(expr.clone(), ComparisonSense::LessEqual, 6.0).satisfied(&values));
        assert!(!ConstraintExpr::new(expr.clone(), ComparisonSense::LessEqual, 5.0).satisfied(&values));
        assert!(ConstraintExpr::new(expr.clone(), ComparisonSense::GreaterEqual, 6.0).satisfied(&values));
        assert!(ConstraintExpr::new(expr.clone(), ComparisonSense::Equal, 6.0).satisfied(&values));
        assert!(!ConstraintExpr::new(expr, ComparisonSense::Equal, 6.5).satisfied(&values));
    }

    #[test]
    fn ranged_satisfied_needs_both_bounds() {
        let c = RangedConstraintExpr::new(LinearExpr::var(VariableId::new(0)), 1.0, 5.0);
        assert!(c.satisfied(&[1.0]));
        assert!(c.satisfied(&[5.0]));
        assert!(!c.satisfied(&[0.5]));
        assert!(!c.satisfied(&[5.5]));
    }
}
