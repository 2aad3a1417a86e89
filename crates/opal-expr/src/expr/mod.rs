//! Expression types for optimization modeling.
//!
//! - `linear`     — LinearExpr: lazy term sequence + constant
//! - `quadratic`  — QuadraticExpr: quadratic terms + linear part
//! - `bilinear`   — BilinearExpr: cross terms + left/right margins
//! - `constraint` — ConstraintExpr: normalized lhs with sense and rhs,
//!   plus the double-bounded RangedConstraintExpr

pub mod bilinear;
pub mod constraint;
pub mod linear;
pub mod quadratic;

pub use bilinear::BilinearExpr;
pub use constraint::{ComparisonSense, ConstraintExpr, RangedConstraintExpr};
pub use linear::{sum, LinearExpr};
pub use quadratic::QuadraticExpr;
