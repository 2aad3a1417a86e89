//! The core [`Model`] type: solver-ready sparse storage.
//!
//! # Module Organization
//!
//! - [`error`]: model error types
//! - [`builder`]: adding variables, constraints, and objectives
//! - [`batch`]: batch keyed constraint builds
//! - [`pretty`]: LP-format rendering
//!
//! Columns live in parallel arrays indexed by variable id; rows live in CSR
//! form (`row_begins` offsets into the shared entry arrays). Both grow
//! append-only, so every id handed out stays valid for the model's lifetime.

mod batch;
mod builder;
mod error;
mod pretty;

use std::collections::BTreeMap;

use opal_expr::{ComparisonSense, ConstraintId, VariableId};
use opal_solver::ModelSink;

use crate::assemble::RowAssembler;
use crate::types::{ObjSense, VarKind};

pub use batch::RowBuilder;
pub use error::ModelError;

/// An optimization model under construction.
#[derive(Debug)]
pub struct Model {
    pub(crate) obj_sense: ObjSense,
    pub(crate) obj_coefs: Vec<f64>,
    pub(crate) obj_offset: f64,
    // Column-first parallel arrays, indexed by variable id.
    pub(crate) col_lower: Vec<f64>,
    pub(crate) col_upper: Vec<f64>,
    pub(crate) col_kind: Vec<VarKind>,
    // Rows in CSR form: row_begins has one offset per row plus the total.
    pub(crate) row_senses: Vec<ComparisonSense>,
    pub(crate) row_rhs: Vec<f64>,
    pub(crate) row_begins: Vec<usize>,
    pub(crate) entry_vars: Vec<u32>,
    pub(crate) entry_coefs: Vec<f64>,
    pub(crate) assembler: RowAssembler,
    // Lazy-allocated name storage; most models never name entities.
    pub(crate) variable_names: Option<BTreeMap<VariableId, String>>,
    pub(crate) constraint_names: Option<BTreeMap<ConstraintId, String>>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero-copy view of one assembled constraint row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    pub sense: ComparisonSense,
    pub rhs: f64,
    pub vars: &'a [u32],
    pub coefs: &'a [f64],
}

impl Model {
    /// Create a new empty minimization model.
    pub fn new() -> Self {
        Self::with_sense(ObjSense::Minimize)
    }

    pub fn maximize() -> Self {
        Self::with_sense(ObjSense::Maximize)
    }

    pub fn with_sense(obj_sense: ObjSense) -> Self {
        Self {
            obj_sense,
            obj_coefs: Vec::new(),
            obj_offset: 0.0,
            col_lower: Vec::new(),
            col_upper: Vec::new(),
            col_kind: Vec::new(),
            row_senses: Vec::new(),
            row_rhs: Vec::new(),
            row_begins: vec![0],
            entry_vars: Vec::new(),
            entry_coefs: Vec::new(),
            assembler: RowAssembler::new(),
            variable_names: None,
            constraint_names: None,
        }
    }

    pub fn obj_sense(&self) -> ObjSense {
        self.obj_sense
    }

    pub fn num_variables(&self) -> usize {
        self.col_lower.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.row_senses.len()
    }

    /// Total nonzero entries across all rows.
    pub fn num_entries(&self) -> usize {
        self.entry_vars.len()
    }

    pub fn obj_coef(&self, var: VariableId) -> f64 {
        self.obj_coefs[var.uid()]
    }

    pub fn obj_offset(&self) -> f64 {
        self.obj_offset
    }

    pub fn bounds(&self, var: VariableId) -> (f64, f64) {
        (self.col_lower[var.uid()], self.col_upper[var.uid()])
    }

    pub fn var_kind(&self, var: VariableId) -> VarKind {
        self.col_kind[var.uid()]
    }

    pub fn set_variable_name(&mut self, var: VariableId, name: impl Into<String>) {
        self.variable_names
            .get_or_insert_with(BTreeMap::new)
            .insert(var, name.into());
    }

    pub fn variable_name(&self, var: VariableId) -> Option<&str> {
        self.variable_names
            .as_ref()
            .and_then(|names| names.get(&var))
            .map(String::as_str)
    }

    pub fn set_constraint_name(&mut self, constraint: ConstraintId, name: impl Into<String>) {
        self.constraint_names
            .get_or_insert_with(BTreeMap::new)
            .insert(constraint, name.into());
    }

    pub fn constraint_name(&self, constraint: ConstraintId) -> Option<&str> {
        self.constraint_names
            .as_ref()
            .and_then(|names| names.get(&constraint))
            .map(String::as_str)
    }

    /// View of one assembled row. Entries are sorted by column with no
    /// exact zeros.
    pub fn row(&self, constraint: ConstraintId) -> RowView<'_> {
        let row = constraint.uid();
        let begin = self.row_begins[row];
        let end = self.row_begins[row + 1];
        RowView {
            sense: self.row_senses[row],
            rhs: self.row_rhs[row],
            vars: &self.entry_vars[begin..end],
            coefs: &self.entry_coefs[begin..end],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        (0..self.num_constraints()).map(|row| self.row(ConstraintId::new(row as u32)))
    }

    /// Hand the whole model to a solver adapter: columns first, then all
    /// rows as one CSR block, then the objective.
    pub fn submit<S: ModelSink>(&self, sink: &mut S) {
        for col in 0..self.num_variables() {
            sink.append_column(
                self.obj_coefs[col],
                self.col_lower[col],
                self.col_upper[col],
                matches!(self.col_kind[col], VarKind::Integer | VarKind::Binary),
            );
        }
        sink.append_rows(
            &self.row_begins,
            &self.entry_vars,
            &self.entry_coefs,
            &self.row_senses,
            &self.row_rhs,
        );

        let mut obj_vars = Vec::new();
        let mut obj_coefs = Vec::new();
        for (col, coef) in self.obj_coefs.iter().enumerate() {
            if *coef != 0.0 {
                obj_vars.push(col as u32);
                obj_coefs.push(*coef);
            }
        }
        sink.set_objective(&obj_vars, &obj_coefs, self.obj_offset);

        tracing::debug!(
            component = "model",
            operation = "submit",
            status = "success",
            variables = self.num_variables(),
            constraints = self.num_constraints(),
            entries = self.num_entries(),
            "Submitted model to solver sink"
        );
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::VariableParams;
    use opal_expr::LinearExpr;

    #[test]
    fn new_model_is_empty() {
        let model = Model::new();
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(model.num_entries(), 0);
    }

    #[test]
    fn row_views_are_stable_across_growth() {
        let mut model = Model::new();
        let vars = model.add_variables(3, VariableParams::default()).unwrap();
        let x = vars.get(0);
        let y = vars.get(1);
        let first = model
            .add_constraint((LinearExpr::term(x, 2.0) + LinearExpr::var(y)).le_scalar(5.0));

        // more rows after the first must not disturb it
        for _ in 0..10 {
            model.add_constraint(LinearExpr::var(y).ge_scalar(0.0));
        }

        let row = model.row(first);
        assert_eq!(row.vars, &[0, 1]);
        assert_eq!(row.coefs, &[2.0, 1.0]);
        assert_eq!(row.rhs, 5.0);
        assert_eq!(row.sense, ComparisonSense::LessEqual);
        assert_eq!(model.num_constraints(), 11);
    }
}
