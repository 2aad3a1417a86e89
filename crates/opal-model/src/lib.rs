//! Opal model builder with incremental sparse assembly.
//!
//! A [`Model`] accumulates columns (variables) and rows (constraints) in
//! solver-ready form. Expressions from `opal-expr` stay lazy until a
//! constraint or objective call flattens them through the row assembler,
//! which merges duplicate variables in amortized constant time per term.

pub mod assemble;
pub mod model;
pub mod range;
pub mod types;

pub use assemble::RowAssembler;
pub use model::{Model, ModelError, RowBuilder, RowView};
pub use range::{ConstraintRange, IndexedConstraintRange, IndexedVariableRange, VariableRange};
pub use types::{ObjSense, VarKind, VariableParams};
