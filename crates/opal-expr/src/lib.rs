//! Expression algebra for Opal optimization models.
//!
//! Provides the entity id types, the lazy restartable term sequences, the
//! linear/quadratic/bilinear expression algebra built on top of them, the
//! canonicalizer, and the constraint builder. Nothing here touches a
//! solver; expressions are transient views that downstream code flattens
//! into sparse rows.

pub mod canonical;
pub mod expr;
pub mod ids;
pub mod seq;

pub use canonical::{canonical_bilinear, canonical_linear, canonical_quadratic};
pub use expr::{
    sum, BilinearExpr, ComparisonSense, ConstraintExpr, LinearExpr, QuadraticExpr,
    RangedConstraintExpr,
};
pub use ids::{ConstraintId, VariableId};
pub use seq::{BilinearSeq, LinearSeq, QuadSeq};
