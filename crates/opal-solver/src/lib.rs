//! The boundary between Opal's modeling core and external solver adapters.
//!
//! Adapters (HiGHS, CBC, Gurobi wrappers, ...) live outside this workspace;
//! this crate pins down the contract they implement:
//!
//! - [`ModelSink`]: accepts solver-ready sparse rows and the objective
//! - [`SolutionView`]: maps entity ids back to primal/dual values
//! - [`Solve`]: drives one solve under a [`SolverConfig`]
//! - [`SolverStatus`] / [`SolverError`]: outcome translation

mod config;
mod error;
mod status;
mod traits;

pub use config::SolverConfig;
pub use error::SolverError;
pub use status::SolverStatus;
pub use traits::{ModelSink, SolutionView, Solve};
