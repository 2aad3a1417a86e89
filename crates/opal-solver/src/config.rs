//! Solver run configuration.

use std::time::Duration;

/// Options passed to an adapter's [`Solve::solve`](crate::Solve::solve).
///
/// The modeling core itself has no timeout or cancellation concept; limits
/// apply only at this boundary.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Wall-clock limit for the solve, unlimited when `None`.
    pub time_limit: Option<Duration>,
    /// Relative MIP gap at which the solver may stop, solver default when
    /// `None`.
    pub mip_gap: Option<f64>,
    /// Forward solver log output.
    pub verbose: bool,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited_and_quiet() {
        let config = SolverConfig::new();
        assert!(config.time_limit.is_none());
        assert!(config.mip_gap.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn builder_methods_compose() {
        let config = SolverConfig::new()
            .with_time_limit(Duration::from_secs(30))
            .with_mip_gap(0.01)
            .with_verbose(true);
        assert_eq!(config.time_limit, Some(Duration::from_secs(30)));
        assert_eq!(config.mip_gap, Some(0.01));
        assert!(config.verbose);
    }
}
