//! The three traits an adapter implements.

use opal_expr::{ComparisonSense, ConstraintId, VariableId};

use crate::{SolverConfig, SolverError, SolverStatus};

/// Receives a fully assembled model in solver-ready sparse form.
///
/// Rows arrive canonical: per row, column indices strictly increase and no
/// coefficient is exactly zero. Implementations may hand the slices straight
/// to a native API without copying.
pub trait ModelSink {
    /// Declares a column with its objective coefficient and bounds.
    /// `lower`/`upper` use infinities for free directions.
    fn append_column(&mut self, obj_coef: f64, lower: f64, upper: f64, integer: bool);

    /// Appends one constraint row.
    fn append_row(&mut self, sense: ComparisonSense, rhs: f64, indices: &[u32], coefs: &[f64]);

    /// Appends a block of rows in CSR layout. `begins` has one offset per row
    /// plus a trailing total; `senses` and `rhss` have one entry per row.
    fn append_rows(
        &mut self,
        begins: &[usize],
        indices: &[u32],
        coefs: &[f64],
        senses: &[ComparisonSense],
        rhss: &[f64],
    ) {
        for (row, window) in begins.windows(2).enumerate() {
            self.append_row(
                senses[row],
                rhss[row],
                &indices[window[0]..window[1]],
                &coefs[window[0]..window[1]],
            );
        }
    }

    /// Replaces the objective. `offset` is the constant part.
    fn set_objective(&mut self, indices: &[u32], coefs: &[f64], offset: f64);
}

/// Read access to the result of a solve, keyed by the modeling-side ids.
pub trait SolutionView {
    fn status(&self) -> SolverStatus;

    fn objective_value(&self) -> f64;

    /// Primal value of one variable.
    fn primal(&self, var: VariableId) -> f64;

    /// Dual value (shadow price) of one constraint. LP relaxations only;
    /// adapters without duals return 0.0.
    fn dual(&self, constraint: ConstraintId) -> f64 {
        let _ = constraint;
        0.0
    }

    /// All primal values, indexed by column.
    fn primal_values(&self) -> &[f64];

    /// All dual values, indexed by row. Empty when the adapter has none.
    fn dual_values(&self) -> &[f64] {
        &[]
    }
}

/// Drives one solve over whatever the adapter accumulated via [`ModelSink`].
pub trait Solve {
    type Solution: SolutionView;

    fn solve(&mut self, config: &SolverConfig) -> Result<Self::Solution, SolverError>;
}
