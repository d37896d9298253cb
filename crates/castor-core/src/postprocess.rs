//! Domain corrections applied to the raw defuzzified density, plus dam-count
//! and departure derivation.
//!
//! Correction order per reach: vegetation ceiling → drainage-area cutoff →
//! none-band snap. The snap compares at 6 decimals against the centroid of
//! the isolated "none" output term ([`CapacityFis::none_centroid`]), removing
//! residual centroid drift for reaches with no real capacity.
//!
//! [`CapacityFis::none_centroid`]: crate::fuzzy::CapacityFis::none_centroid

use serde::{Deserialize, Serialize};

use crate::fuzzy::engine::round6;

/// Correct a raw inference result for one reach.
///
/// * `vegetation` — the clamped vegetation capacity the engine saw; the
///   combined output can never exceed it (vegetation is the limiting factor).
/// * `drainage_sq_km` ≥ `max_drainage_sq_km` forces 0: dams are not built or
///   do not persist past that stream size regardless of other covariates.
pub fn correct_density(
    raw: f64,
    vegetation: f64,
    drainage_sq_km: f64,
    max_drainage_sq_km: f64,
    none_centroid: f64,
) -> f64 {
    let mut density = raw.min(vegetation);
    if drainage_sq_km >= max_drainage_sq_km {
        density = 0.0;
    }
    if round6(density) == none_centroid {
        density = 0.0;
    }
    density
}

/// Dam count for a reach: density (dams/km) × length (km).
///
/// A raw product strictly inside (0, 1) rounds up to 1 — nonzero capacity
/// must manifest as at least one dam. Everything else rounds half away from
/// zero, so a raw product of exactly 1.0 stays 1.
pub fn dam_count(density: f64, length_m: f64) -> i32 {
    let raw = density * (length_m / 1000.0);
    if raw > 0.0 && raw < 1.0 {
        1
    } else {
        raw.round() as i32
    }
}

/// Historic-minus-existing dam count. Negative when a reach supports more
/// dams today than the historic baseline.
pub fn historic_departure(historic_count: i32, existing_count: i32) -> i32 {
    historic_count - existing_count
}

/// Reporting bands for a corrected capacity density, matching the output
/// variable's linguistic terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityCategory {
    None,
    Rare,
    Occasional,
    Frequent,
    Pervasive,
}

impl CapacityCategory {
    /// Band edges: 0 / (0, 1] / (1, 5] / (5, 15] / > 15 dams/km.
    pub fn of(density: f64) -> Self {
        if density <= 0.0 {
            CapacityCategory::None
        } else if density <= 1.0 {
            CapacityCategory::Rare
        } else if density <= 5.0 {
            CapacityCategory::Occasional
        } else if density <= 15.0 {
            CapacityCategory::Frequent
        } else {
            CapacityCategory::Pervasive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CapacityCategory::None => "None",
            CapacityCategory::Rare => "Rare",
            CapacityCategory::Occasional => "Occasional",
            CapacityCategory::Frequent => "Frequent",
            CapacityCategory::Pervasive => "Pervasive",
        }
    }
}
