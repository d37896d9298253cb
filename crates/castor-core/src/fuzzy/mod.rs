//! Fuzzy inference subsystem: membership shapes, the dam-capacity rule base,
//! and the Mamdani engine that turns four reach covariates into a crisp
//! capacity density.

pub mod engine;
pub mod membership;
pub mod rules;
pub mod variables;

pub use engine::{CapacityFis, FisInput};

use thiserror::Error;

/// Fatal configuration errors, raised at engine construction time.
/// Evaluation itself never fails (out-of-range inputs are clamped, degenerate
/// aggregation returns 0).
#[derive(Debug, Clone, Error)]
pub enum FisError {
    #[error("variable `{variable}`, term `{term}`: breakpoints must be non-decreasing")]
    MalformedShape { variable: String, term: String },

    #[error("variable `{variable}`: universe [{min}, {max}) step {step} is not a valid discretization")]
    MalformedUniverse {
        variable: String,
        min: f64,
        max: f64,
        step: f64,
    },

    #[error("rule {rule}: variable `{variable}` has no term `{term}`")]
    UnknownTerm {
        rule: usize,
        variable: String,
        term: String,
    },

    #[error("rule {rule}: output variable has no term `{term}`")]
    UnknownConsequent { rule: usize, term: String },
}
