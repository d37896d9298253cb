//! Per-reach records: the in-process interface between the external
//! attribute pipeline and the capacity model.
//!
//! Input fields are mandatory — a record missing one fails deserialization,
//! and schema completeness is the producer's responsibility. Output fields
//! default to `None` and are filled in by the batch controller; nothing else
//! in the record is touched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stream reach with its capacity covariates and model outputs.
/// Lengths are metres; drainage areas are km²; densities are dams/km.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reach {
    pub reach_id: i64,

    /// Vegetation dam-building capacity under existing conditions.
    pub veg_existing: f64,
    /// Vegetation capacity under the reconstructed historic baseline.
    pub veg_historic: f64,
    /// Stream power at the 2-year flood (W/m).
    pub stream_power_hi: f64,
    /// Stream power at baseflow (W/m).
    pub stream_power_lo: f64,
    /// Channel slope (m/m).
    pub slope: f64,
    pub length_m: f64,
    pub drainage_sq_km: f64,

    #[serde(default)]
    pub capacity_existing: Option<f64>,
    #[serde(default)]
    pub capacity_historic: Option<f64>,
    #[serde(default)]
    pub dam_count_existing: Option<i32>,
    #[serde(default)]
    pub dam_count_historic: Option<i32>,
    /// Historic minus existing dam count; set once both runs are complete.
    #[serde(default)]
    pub historic_departure: Option<i32>,
}

/// The reach collection, keyed by reach id. Owned by the attribute pipeline;
/// the capacity model only writes the output fields above.
pub type ReachTable = BTreeMap<i64, Reach>;
