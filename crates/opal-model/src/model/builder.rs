//! Builder methods: variable allocation, objectives, and single constraints.

use std::time::Instant;

use opal_expr::{
    ComparisonSense, ConstraintExpr, ConstraintId, LinearExpr, RangedConstraintExpr, VariableId,
};

use crate::model::error::ModelError;
use crate::model::Model;
use crate::range::{IndexedVariableRange, VariableRange};
use crate::types::VariableParams;

impl Model {
    /// Add a single variable.
    pub fn add_variable(&mut self, params: VariableParams) -> Result<VariableId, ModelError> {
        let range = self.add_variables(1, params)?;
        Ok(range.get(0))
    }

    /// Add a contiguous block of variables sharing the same parameters.
    pub fn add_variables(
        &mut self,
        count: usize,
        params: VariableParams,
    ) -> Result<VariableRange, ModelError> {
        let (lower, upper) = params.resolved_bounds();
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ModelError::InvalidBounds { lower, upper });
        }

        // ids are u32; reject growth past that before touching storage
        let existing = self.num_variables();
        let total = existing
            .checked_add(count)
            .filter(|&total| total <= u32::MAX as usize)
            .ok_or(ModelError::TooManyVariables {
                existing,
                requested: count,
            })?;

        let offset = existing as u32;
        self.obj_coefs.resize(total, params.obj_coef);
        self.col_lower.resize(total, lower);
        self.col_upper.resize(total, upper);
        self.col_kind.resize(total, params.kind);

        tracing::debug!(
            component = "model",
            operation = "add_variables",
            status = "success",
            offset,
            count,
            kind = ?params.kind,
            "Allocated variable range"
        );
        Ok(VariableRange::new(offset, count as u32))
    }

    /// Add a block of variables addressed by domain keys. `position_of`
    /// flattens a key to a position in `0..count`; lookups outside that span
    /// fail fast.
    pub fn add_variables_indexed<K, F>(
        &mut self,
        count: usize,
        params: VariableParams,
        position_of: F,
    ) -> Result<IndexedVariableRange<K, F>, ModelError>
    where
        F: Fn(&K) -> usize,
    {
        let range = self.add_variables(count, params)?;
        Ok(IndexedVariableRange::new(range, position_of))
    }

    /// Replace the objective with a linear expression. The expression's
    /// constant becomes the objective offset.
    pub fn set_objective(&mut self, expr: LinearExpr) {
        self.obj_coefs.iter_mut().for_each(|coef| *coef = 0.0);
        self.obj_offset = 0.0;
        self.add_objective(expr);
    }

    /// Accumulate a linear expression into the objective.
    pub fn add_objective(&mut self, expr: LinearExpr) {
        let terms = expr.canonical_terms();
        let count = terms.len();
        for (var, coef) in terms {
            self.obj_coefs[var.uid()] += coef;
        }
        self.obj_offset += expr.constant_part();

        tracing::debug!(
            component = "model",
            operation = "add_objective",
            status = "success",
            terms = count,
            "Accumulated objective terms"
        );
    }

    /// Flatten a linear expression into owned canonical sparse form:
    /// sorted column indices, merged coefficients, and the constant part.
    pub fn flatten(&mut self, expr: &LinearExpr) -> (Vec<u32>, Vec<f64>, f64) {
        self.assembler.begin_pass();
        expr.for_each_term(&mut |var, coef| self.assembler.push_term(var, coef));
        self.assembler.canonicalize();
        let (vars, coefs) = self.assembler.entries();
        (vars.to_vec(), coefs.to_vec(), expr.constant_part())
    }

    /// Add one constraint, flattening its expression into a sorted,
    /// duplicate-free sparse row.
    pub fn add_constraint(&mut self, constraint: ConstraintExpr) -> ConstraintId {
        let started = Instant::now();
        let (expr, sense, rhs) = constraint.into_parts();

        self.assembler.begin_pass();
        expr.for_each_term(&mut |var, coef| self.assembler.push_term(var, coef));
        let staged = self.assembler.len();
        self.assembler.canonicalize();

        let id = ConstraintId::new(self.num_constraints() as u32);
        let (vars, coefs) = self.assembler.entries();
        self.entry_vars.extend_from_slice(vars);
        self.entry_coefs.extend_from_slice(coefs);
        self.row_begins.push(self.entry_vars.len());
        self.row_senses.push(sense);
        self.row_rhs.push(rhs);

        tracing::debug!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            row = id.inner(),
            terms_in = staged,
            terms_out = vars.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Assembled constraint row"
        );
        id
    }

    /// Add a double-bounded constraint `lower <= expr <= upper` as a pair
    /// of rows sharing one flattened entry block. Returns the ids in
    /// (lower, upper) order.
    pub fn add_ranged_constraint(
        &mut self,
        constraint: RangedConstraintExpr,
    ) -> (ConstraintId, ConstraintId) {
        let started = Instant::now();
        let (expr, lower, upper) = constraint.into_parts();

        self.assembler.begin_pass();
        expr.for_each_term(&mut |var, coef| self.assembler.push_term(var, coef));
        self.assembler.canonicalize();
        let (vars, coefs) = self.assembler.entries();

        let lower_id = ConstraintId::new(self.num_constraints() as u32);
        let upper_id = ConstraintId::new(lower_id.inner() + 1);
        for (sense, rhs) in [
            (ComparisonSense::GreaterEqual, lower),
            (ComparisonSense::LessEqual, upper),
        ] {
            self.entry_vars.extend_from_slice(vars);
            self.entry_coefs.extend_from_slice(coefs);
            self.row_begins.push(self.entry_vars.len());
            self.row_senses.push(sense);
            self.row_rhs.push(rhs);
        }

        tracing::debug!(
            component = "model",
            operation = "add_ranged_constraint",
            status = "success",
            lower_row = lower_id.inner(),
            upper_row = upper_id.inner(),
            terms = vars.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Assembled ranged constraint rows"
        );
        (lower_id, upper_id)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{VarKind, VariableParams};

    #[test]
    fn add_variables_sets_columns() {
        let mut model = Model::new();
        let range = model
            .add_variables(2, VariableParams::default().with_obj_coef(3.0).with_upper_bound(7.0))
            .unwrap();
        assert_eq!(model.num_variables(), 2);
        let x = range.get(1);
        assert_eq!(model.obj_coef(x), 3.0);
        assert_eq!(model.bounds(x), (0.0, 7.0));
        assert_eq!(model.var_kind(x), VarKind::Continuous);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let mut model = Model::new();
        let result = model.add_variables(
            1,
            VariableParams::default().with_lower_bound(5.0).with_upper_bound(1.0),
        );
        assert_eq!(
            result.unwrap_err(),
            ModelError::InvalidBounds {
                lower: 5.0,
                upper: 1.0
            }
        );
        assert_eq!(model.num_variables(), 0);
    }

    #[test]
    fn set_objective_overwrites_previous() {
        let mut model = Model::new();
        let vars = model.add_variables(2, VariableParams::default()).unwrap();
        let (x, y) = (vars.get(0), vars.get(1));

        model.set_objective(LinearExpr::term(x, 2.0) + 1.0);
        model.set_objective(LinearExpr::term(y, 5.0) + 3.0);
        assert_eq!(model.obj_coef(x), 0.0);
        assert_eq!(model.obj_coef(y), 5.0);
        assert_eq!(model.obj_offset(), 3.0);
    }

    #[test]
    fn add_objective_accumulates() {
        let mut model = Model::new();
        let vars = model.add_variables(2, VariableParams::default()).unwrap();
        let (x, y) = (vars.get(0), vars.get(1));

        model.set_objective(LinearExpr::term(x, 2.0));
        model.add_objective(LinearExpr::term(x, 1.0) + LinearExpr::term(y, 4.0) + 0.5);
        assert_eq!(model.obj_coef(x), 3.0);
        assert_eq!(model.obj_coef(y), 4.0);
        assert_eq!(model.obj_offset(), 0.5);
    }

    #[test]
    fn constraint_rows_are_canonical() {
        let mut model = Model::new();
        let vars = model.add_variables(3, VariableParams::default()).unwrap();
        let (x1, x2, x3) = (vars.get(0), vars.get(1), vars.get(2));

        // 3*x1 - x1 + 3*x2 + x3 <= 5 assembles as 2*x1 + 3*x2 + x3 <= 5
        let expr = LinearExpr::term(x1, 3.0)
            + LinearExpr::term(x1, -1.0)
            + LinearExpr::term(x2, 3.0)
            + LinearExpr::var(x3);
        let id = model.add_constraint(expr.le_scalar(5.0));

        let row = model.row(id);
        assert_eq!(row.vars, &[0, 1, 2]);
        assert_eq!(row.coefs, &[2.0, 3.0, 1.0]);
        assert_eq!(row.sense, ComparisonSense::LessEqual);
        assert_eq!(row.rhs, 5.0);
    }

    #[test]
    fn oversized_allocation_is_rejected_before_growth() {
        let mut model = Model::new();
        let result = model.add_variables(usize::MAX, VariableParams::default());
        assert_eq!(
            result.unwrap_err(),
            ModelError::TooManyVariables {
                existing: 0,
                requested: usize::MAX
            }
        );
        assert_eq!(model.num_variables(), 0);
    }

    #[test]
    fn ranged_constraint_emits_two_rows() {
        let mut model = Model::new();
        let vars = model.add_variables(2, VariableParams::default()).unwrap();
        let (x, y) = (vars.get(0), vars.get(1));

        // 1 <= x + 2y + 3 <= 10  =>  -2 <= x + 2y <= 7
        let expr = LinearExpr::var(x) + LinearExpr::term(y, 2.0) + 3.0;
        let (lo, hi) = model.add_ranged_constraint(expr.between(1.0, 10.0));

        assert_eq!(model.num_constraints(), 2);
        let lower = model.row(lo);
        assert_eq!(lower.vars, &[0, 1]);
        assert_eq!(lower.coefs, &[1.0, 2.0]);
        assert_eq!(lower.sense, ComparisonSense::GreaterEqual);
        assert_eq!(lower.rhs, -2.0);
        let upper = model.row(hi);
        assert_eq!(upper.vars, &[0, 1]);
        assert_eq!(upper.coefs, &[1.0, 2.0]);
        assert_eq!(upper.sense, ComparisonSense::LessEqual);
        assert_eq!(upper.rhs, 7.0);
    }

    #[test]
    fn ranged_rows_coalesce_duplicates() {
        let mut model = Model::new();
        let x = model.add_variable(VariableParams::default()).unwrap();

        let expr = LinearExpr::term(x, 3.0) - LinearExpr::var(x);
        let (lo, hi) = model.add_ranged_constraint(expr.between(0.0, 4.0));
        assert_eq!(model.row(lo).coefs, &[2.0]);
        assert_eq!(model.row(hi).coefs, &[2.0]);
    }

    #[test]
    fn flatten_returns_owned_canonical_form() {
        let mut model = Model::new();
        let vars = model.add_variables(2, VariableParams::default()).unwrap();
        let (x, y) = (vars.get(0), vars.get(1));

        let expr = LinearExpr::term(y, 2.0) + LinearExpr::var(x) + LinearExpr::var(y) + 7.0;
        let (cols, coefs, constant) = model.flatten(&expr);
        assert_eq!(cols, vec![0, 1]);
        assert_eq!(coefs, vec![1.0, 3.0]);
        assert_eq!(constant, 7.0);
    }

    #[test]
    fn cancelled_terms_leave_no_entry() {
        let mut model = Model::new();
        let vars = model.add_variables(2, VariableParams::default()).unwrap();
        let (x, y) = (vars.get(0), vars.get(1));

        let expr = LinearExpr::var(x) - LinearExpr::var(x) + LinearExpr::var(y);
        let id = model.add_constraint(expr.eq_scalar(1.0));
        let row = model.row(id);
        assert_eq!(row.vars, &[1]);
        assert_eq!(row.coefs, &[1.0]);
    }
}
