//! Errors surfaced at the solver boundary.

use crate::SolverStatus;

#[derive(Debug, Clone)]
pub enum SolverError {
    /// Nothing to solve: the model has no variables.
    EmptyModel,
    /// The solve finished without a usable solution.
    SolveFailure { status: SolverStatus },
    /// Error reported by the backend library or process.
    Backend(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "MODEL_EMPTY",
            SolverError::SolveFailure { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                _ => "SOLVER_NO_SOLUTION",
            },
            SolverError::Backend(_) => "SOLVER_BACKEND",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] Solve finished with status {}", self.code(), status)
            }
            SolverError::Backend(msg) => {
                write!(f, "[{}] Solver backend error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}
