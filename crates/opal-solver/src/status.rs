//! Solve outcome classification shared by all adapters.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// Proven optimal solution.
    Optimal,
    /// Feasible solution found but optimality not proven (limit reached).
    Feasible,
    /// Proven infeasible.
    Infeasible,
    /// Proven unbounded.
    Unbounded,
    /// Stopped before any classification (interrupt, failure).
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolverStatus::Optimal)
    }

    /// True when a usable solution exists.
    pub fn has_solution(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_has_solution() {
        assert!(SolverStatus::Optimal.is_optimal());
        assert!(SolverStatus::Optimal.has_solution());
        assert!(SolverStatus::Feasible.has_solution());
    }

    #[test]
    fn failure_statuses_have_no_solution() {
        assert!(!SolverStatus::Infeasible.has_solution());
        assert!(!SolverStatus::Unbounded.has_solution());
        assert!(!SolverStatus::Unknown.has_solution());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(SolverStatus::Infeasible.to_string(), "infeasible");
    }
}
