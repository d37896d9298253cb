//! Dual-run batch controller: runs the capacity model over the whole reach
//! table once with historic field bindings, once with existing bindings, then
//! reconciles the two into a per-reach historic departure.
//!
//! Each run is three bulk stages: read the covariates into a job list,
//! compute per reach (pure, parallel under the `threading` feature), write
//! results back keyed by reach id. Reaches that cannot be resolved at
//! write-back or reconcile time are skipped and reported, never fatal.

use serde::Serialize;

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::fuzzy::{CapacityFis, FisError, FisInput};
use crate::postprocess::{correct_density, dam_count, historic_departure};
use crate::reach::{Reach, ReachTable};

/// Which vegetation input a run reads and which output slots it writes.
/// The model itself is identical for both runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelRun {
    Historic,
    Existing,
}

impl ModelRun {
    pub fn label(self) -> &'static str {
        match self {
            ModelRun::Historic => "historic",
            ModelRun::Existing => "existing",
        }
    }

    fn vegetation(self, reach: &Reach) -> f64 {
        match self {
            ModelRun::Historic => reach.veg_historic,
            ModelRun::Existing => reach.veg_existing,
        }
    }

    fn write(self, reach: &mut Reach, density: f64, count: i32) {
        match self {
            ModelRun::Historic => {
                reach.capacity_historic = Some(density);
                reach.dam_count_historic = Some(count);
            }
            ModelRun::Existing => {
                reach.capacity_existing = Some(density);
                reach.dam_count_existing = Some(count);
            }
        }
    }
}

/// A reach skipped during a batch stage, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct BatchWarning {
    pub reach_id: i64,
    /// "historic", "existing" or "reconcile".
    pub stage: &'static str,
    pub reason: String,
}

/// Summary of a completed dual run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub historic_processed: usize,
    pub existing_processed: usize,
    pub reconciled: usize,
    pub warnings: Vec<BatchWarning>,
}

/// The full capacity model: inference engine plus the drainage-area cutoff.
pub struct CapacityModel {
    fis: CapacityFis,
    max_drainage_sq_km: f64,
}

struct Job {
    reach_id: i64,
    input: FisInput,
    drainage_sq_km: f64,
    length_m: f64,
}

impl CapacityModel {
    /// Build the engine and validate its configuration. Fails before any
    /// reach is touched if a shape, universe or rule is malformed.
    pub fn new(max_drainage_sq_km: f64) -> Result<Self, FisError> {
        Ok(Self { fis: CapacityFis::new()?, max_drainage_sq_km })
    }

    pub fn fis(&self) -> &CapacityFis {
        &self.fis
    }

    /// Historic run → existing run → reconcile. Completes every reach it
    /// can; anything skipped is listed in the report.
    pub fn run_both(&self, reaches: &mut ReachTable) -> BatchReport {
        let mut warnings = Vec::new();
        let historic_processed = self.run_one(ModelRun::Historic, reaches, &mut warnings);
        let existing_processed = self.run_one(ModelRun::Existing, reaches, &mut warnings);
        let reconciled = reconcile(reaches, &mut warnings);
        BatchReport { historic_processed, existing_processed, reconciled, warnings }
    }

    fn run_one(&self, run: ModelRun, reaches: &mut ReachTable, warnings: &mut Vec<BatchWarning>) -> usize {
        // Bulk read.
        let jobs: Vec<Job> = reaches
            .values()
            .map(|r| Job {
                reach_id: r.reach_id,
                input: FisInput::clamped(
                    run.vegetation(r),
                    r.stream_power_hi,
                    r.stream_power_lo,
                    r.slope,
                ),
                drainage_sq_km: r.drainage_sq_km,
                length_m: r.length_m,
            })
            .collect();

        // Per-reach compute: reaches are independent, no shared mutable state.
        let compute = |job: &Job| {
            let raw = self.fis.evaluate(&job.input);
            let density = correct_density(
                raw,
                job.input.vegetation,
                job.drainage_sq_km,
                self.max_drainage_sq_km,
                self.fis.none_centroid(),
            );
            (job.reach_id, density, dam_count(density, job.length_m))
        };
        #[cfg(feature = "threading")]
        let results: Vec<(i64, f64, i32)> = jobs.par_iter().map(compute).collect();
        #[cfg(not(feature = "threading"))]
        let results: Vec<(i64, f64, i32)> = jobs.iter().map(compute).collect();

        // Bulk write-back.
        let mut processed = 0;
        for (reach_id, density, count) in results {
            match reaches.get_mut(&reach_id) {
                Some(reach) => {
                    run.write(reach, density, count);
                    processed += 1;
                }
                None => warnings.push(BatchWarning {
                    reach_id,
                    stage: run.label(),
                    reason: "reach missing from table at write-back".to_string(),
                }),
            }
        }
        processed
    }
}

/// Fill in the historic departure for every reach carrying both counts.
fn reconcile(reaches: &mut ReachTable, warnings: &mut Vec<BatchWarning>) -> usize {
    let mut reconciled = 0;
    for reach in reaches.values_mut() {
        match (reach.dam_count_historic, reach.dam_count_existing) {
            (Some(historic), Some(existing)) => {
                reach.historic_departure = Some(historic_departure(historic, existing));
                reconciled += 1;
            }
            (historic, existing) => {
                let missing = match (historic, existing) {
                    (None, None) => "both runs",
                    (None, _) => "historic run",
                    _ => "existing run",
                };
                warnings.push(BatchWarning {
                    reach_id: reach.reach_id,
                    stage: "reconcile",
                    reason: format!("dam count missing for {missing}"),
                });
            }
        }
    }
    reconciled
}
