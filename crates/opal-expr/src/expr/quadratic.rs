//! Quadratic expressions: a quadratic term sequence plus a linear part.

use std::rc::Rc;

use crate::canonical::canonical_quadratic;
use crate::expr::linear::LinearExpr;
use crate::ids::VariableId;
use crate::seq::{LinearSeq, QuadSeq};

/// A quadratic expression. The pair order of a quadratic term carries no
/// meaning: `(u, v)` and `(v, u)` denote the same term and merge under
/// canonicalization.
#[derive(Debug, Clone)]
pub struct QuadraticExpr {
    quad: QuadSeq,
    linear: LinearExpr,
}

impl QuadraticExpr {
    pub fn new(quad: QuadSeq, linear: LinearExpr) -> Self {
        Self { quad, linear }
    }

    /// Lift a linear expression (no quadratic terms).
    pub fn from_linear(linear: LinearExpr) -> Self {
        Self {
            quad: QuadSeq::empty(),
            linear,
        }
    }

    /// Product of two linear expressions over the same variable space:
    /// `(L1 + c1)(L2 + c2) = L1xL2 + c2*L1 + c1*L2 + c1*c2`.
    pub fn mul(lhs: LinearExpr, rhs: LinearExpr) -> Self {
        let c1 = lhs.constant_part();
        let c2 = rhs.constant_part();
        let t1 = Rc::new(lhs.into_parts().0);
        let t2 = Rc::new(rhs.into_parts().0);
        let quad = QuadSeq::Cross(t1.clone(), t2.clone());
        let linear = LinearExpr::from_parts(
            LinearSeq::Chain(
                Rc::new(LinearSeq::Scale {
                    seq: t1,
                    factor: c2,
                }),
                Rc::new(LinearSeq::Scale {
                    seq: t2,
                    factor: c1,
                }),
            ),
            c1 * c2,
        );
        Self { quad, linear }
    }

    /// Square of a linear expression: `(L + c)^2 = LxL + 2c*L + c^2`.
    pub fn square(e: LinearExpr) -> Self {
        let c = e.constant_part();
        let t = Rc::new(e.into_parts().0);
        Self {
            quad: QuadSeq::Cross(t.clone(), t.clone()),
            linear: LinearExpr::from_parts(
                LinearSeq::Scale {
                    seq: t,
                    factor: 2.0 * c,
                },
                c * c,
            ),
        }
    }

    pub fn quadratic_terms(&self) -> &QuadSeq {
        &self.quad
    }

    pub fn linear_part(&self) -> &LinearExpr {
        &self.linear
    }

    pub fn constant_part(&self) -> f64 {
        self.linear.constant_part()
    }

    /// Canonical quadratic terms keyed on `(min(u, v), max(u, v))`.
    pub fn canonical_quadratic_terms(&self) -> Vec<(VariableId, VariableId, f64)> {
        canonical_quadratic(&self.quad)
    }

    // ── Algebra ─────────────────────────────────────────────

    /// Concatenate quadratic term sequences and add linear parts.
    pub fn add(self, other: QuadraticExpr) -> Self {
        Self {
            quad: self.quad.chained(other.quad),
            linear: self.linear.add(other.linear),
        }
    }

    /// Add a purely linear expression.
    pub fn add_linear(self, other: LinearExpr) -> Self {
        Self {
            quad: self.quad,
            linear: self.linear.add(other),
        }
    }

    pub fn negate(self) -> Self {
        self.scale(-1.0)
    }

    pub fn scale(self, by: f64) -> Self {
        Self {
            quad: self.quad.scaled(by),
            linear: self.linear.scale(by),
        }
    }

    pub fn add_constant(self, value: f64) -> Self {
        Self {
            quad: self.quad,
            linear: self.linear.add_constant(value),
        }
    }
}

impl From<LinearExpr> for QuadraticExpr {
    fn from(linear: LinearExpr) -> Self {
        QuadraticExpr::from_linear(linear)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for QuadraticExpr {
    type Output = QuadraticExpr;

    fn add(self, rhs: QuadraticExpr) -> Self::Output {
        QuadraticExpr::add(self, rhs)
    }
}

impl std::ops::Add<LinearExpr> for QuadraticExpr {
    type Output = QuadraticExpr;

    fn add(self, rhs: LinearExpr) -> Self::Output {
        self.add_linear(rhs)
    }
}

impl std::ops::Sub for QuadraticExpr {
    type Output = QuadraticExpr;

    fn sub(self, rhs: QuadraticExpr) -> Self::Output {
        QuadraticExpr::add(self, rhs.negate())
    }
}

impl std::ops::Neg for QuadraticExpr {
    type Output = QuadraticExpr;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Mul<f64> for QuadraticExpr {
    type Output = QuadraticExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Mul<QuadraticExpr> for f64 {
    type Output = QuadraticExpr;

    fn mul(self, rhs: QuadraticExpr) -> Self::Output {
        rhs.scale(self)
    }
}

impl std::ops::Div<f64> for QuadraticExpr {
    type Output = QuadraticExpr;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(1.0 / rhs)
    }
}

/// Linear times linear in the same variable space.
impl std::ops::Mul for LinearExpr {
    type Output = QuadraticExpr;

    fn mul(self, rhs: LinearExpr) -> Self::Output {
        QuadraticExpr::mul(self, rhs)
    }
}
