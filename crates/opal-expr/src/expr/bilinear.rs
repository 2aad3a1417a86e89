//! Bilinear expressions: products of two independently-indexed linear
//! expressions.
//!
//! A bilinear expression keeps three term sequences apart: the cross terms
//! over `(left variable, right variable)` pairs, and two linear "margins" —
//! the residue of one side's constant multiplying the other side's
//! variables. Margin roles are part of the value: a left-margin variable
//! never migrates to the right margin unless the caller merges it
//! explicitly with [`BilinearExpr::add_left`] / [`BilinearExpr::add_right`].

use std::rc::Rc;

use crate::canonical::{canonical_bilinear, canonical_linear};
use crate::expr::linear::LinearExpr;
use crate::ids::VariableId;
use crate::seq::{BilinearSeq, LinearSeq};

#[derive(Debug, Clone)]
pub struct BilinearExpr {
    cross: BilinearSeq,
    left: LinearSeq,
    right: LinearSeq,
    constant: f64,
}

impl BilinearExpr {
    /// Product of two linear expressions with disjoint roles:
    /// `(L + a)(R + b) = LxR + b*L + a*R + a*b`.
    pub fn mul(left: LinearExpr, right: LinearExpr) -> Self {
        let a = left.constant_part();
        let b = right.constant_part();
        let lt = Rc::new(left.into_parts().0);
        let rt = Rc::new(right.into_parts().0);
        Self {
            cross: BilinearSeq::Cross(lt.clone(), rt.clone()),
            left: LinearSeq::Scale {
                seq: lt,
                factor: b,
            },
            right: LinearSeq::Scale {
                seq: rt,
                factor: a,
            },
            constant: a * b,
        }
    }

    pub fn new(cross: BilinearSeq, left: LinearSeq, right: LinearSeq, constant: f64) -> Self {
        Self {
            cross,
            left,
            right,
            constant,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn cross_terms(&self) -> &BilinearSeq {
        &self.cross
    }

    pub fn left_margin(&self) -> &LinearSeq {
        &self.left
    }

    pub fn right_margin(&self) -> &LinearSeq {
        &self.right
    }

    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// Canonical cross terms with role-ordered `(left, right)` keys.
    pub fn canonical_cross_terms(&self) -> Vec<(VariableId, VariableId, f64)> {
        canonical_bilinear(&self.cross)
    }

    pub fn canonical_left_margin(&self) -> Vec<(VariableId, f64)> {
        canonical_linear(&self.left)
    }

    pub fn canonical_right_margin(&self) -> Vec<(VariableId, f64)> {
        canonical_linear(&self.right)
    }

    // ── Algebra ─────────────────────────────────────────────

    pub fn add(self, other: BilinearExpr) -> Self {
        Self {
            cross: self.cross.chained(other.cross),
            left: self.left.chained(other.left),
            right: self.right.chained(other.right),
            constant: self.constant + other.constant,
        }
    }

    /// Merge a linear expression into the left margin.
    pub fn add_left(self, e: LinearExpr) -> Self {
        let (terms, constant) = e.into_parts();
        Self {
            left: self.left.chained(terms),
            constant: self.constant + constant,
            ..self
        }
    }

    /// Merge a linear expression into the right margin.
    pub fn add_right(self, e: LinearExpr) -> Self {
        let (terms, constant) = e.into_parts();
        Self {
            right: self.right.chained(terms),
            constant: self.constant + constant,
            ..self
        }
    }

    pub fn negate(self) -> Self {
        self.scale(-1.0)
    }

    pub fn scale(self, by: f64) -> Self {
        Self {
            cross: self.cross.scaled(by),
            left: self.left.scaled(by),
            right: self.right.scaled(by),
            constant: self.constant * by,
        }
    }

    pub fn add_constant(self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            ..self
        }
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for BilinearExpr {
    type Output = BilinearExpr;

    fn add(self, rhs: BilinearExpr) -> Self::Output {
        BilinearExpr::add(self, rhs)
    }
}

impl std::ops::Sub for BilinearExpr {
    type Output = BilinearExpr;

    fn sub(self, rhs: BilinearExpr) -> Self::Output {
        BilinearExpr::add(self, rhs.negate())
    }
}

impl std::ops::Neg for BilinearExpr {
    type Output = BilinearExpr;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Mul<f64> for BilinearExpr {
    type Output = BilinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Mul<BilinearExpr> for f64 {
    type Output = BilinearExpr;

    fn mul(self, rhs: BilinearExpr) -> Self::Output {
        rhs.scale(self)
    }
}

impl std::ops::Div<f64> for BilinearExpr {
    type Output = BilinearExpr;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(1.0 / rhs)
    }
}
