//! Beaver dam building capacity model.
//!
//! Estimates how many dams a stream reach can support from four covariates
//! (vegetation suitability, stream power at the 2-year flood and at baseflow,
//! channel slope) using Mamdani fuzzy inference over a 67-rule base, then
//! applies domain corrections (vegetation ceiling, drainage-area cutoff,
//! none-band snap) and derives per-reach dam counts. The model runs twice —
//! historic baseline and existing conditions — and reconciles the two into a
//! historic-departure field.

pub mod fuzzy;
pub mod pipeline;
pub mod postprocess;
pub mod reach;

pub use fuzzy::{CapacityFis, FisError, FisInput};
pub use pipeline::{BatchReport, BatchWarning, CapacityModel, ModelRun};
pub use postprocess::{correct_density, dam_count, historic_departure, CapacityCategory};
pub use reach::{Reach, ReachTable};
