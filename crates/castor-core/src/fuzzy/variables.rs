//! The five fuzzy variables of the dam capacity model.
//!
//! Breakpoints are calibration constants: they define the classification
//! boundaries of the model (e.g. slopes ≥ 0.23 are fully "cannot build") and
//! must not be changed without re-deriving the rule base.

use super::membership::{Shape, Universe, Variable};

fn tri(left: f64, peak: f64, right: f64) -> Shape {
    Shape::Triangle { left, peak, right }
}

fn trap(left: f64, left_top: f64, right_top: f64, right: f64) -> Shape {
    Shape::Trapezoid { left, left_top, right_top, right }
}

/// Vegetation dam-building capacity, dams/km, [0, 45].
pub fn vegetation() -> Variable {
    Variable::new(
        "vegetation",
        Universe::new(0.0, 45.0, 0.01),
        vec![
            ("none", tri(0.0, 0.0, 0.1)),
            ("rare", trap(0.0, 0.1, 0.5, 1.5)),
            ("occasional", trap(0.5, 1.5, 4.0, 8.0)),
            ("frequent", trap(4.0, 8.0, 12.0, 25.0)),
            ("pervasive", trap(12.0, 25.0, 45.0, 45.0)),
        ],
    )
}

/// Stream power at the 2-year flood, W/m, [0, 10000].
/// Terms describe dam fate at high flow.
pub fn stream_power_hi() -> Variable {
    Variable::new(
        "stream_power_hi",
        Universe::new(0.0, 10000.0, 1.0),
        vec![
            ("persists", trap(0.0, 0.0, 1000.0, 1200.0)),
            ("breach", tri(1000.0, 1200.0, 1600.0)),
            ("oblowout", tri(1200.0, 1600.0, 2400.0)),
            ("blowout", trap(1600.0, 2400.0, 10000.0, 10000.0)),
        ],
    )
}

/// Stream power at baseflow, W/m, [0, 10000].
/// Gates whether beaver can build a dam at all at low flow.
pub fn stream_power_lo() -> Variable {
    Variable::new(
        "stream_power_lo",
        Universe::new(0.0, 10000.0, 1.0),
        vec![
            ("can", trap(0.0, 0.0, 150.0, 175.0)),
            ("probably", trap(150.0, 175.0, 180.0, 190.0)),
            ("cannot", trap(180.0, 190.0, 10000.0, 10000.0)),
        ],
    )
}

/// Channel slope, m/m, [0, 1].
pub fn slope() -> Variable {
    Variable::new(
        "slope",
        Universe::new(0.0, 1.0, 0.0001),
        vec![
            ("flat", trap(0.0, 0.0, 0.0002, 0.005)),
            ("can", trap(0.0002, 0.005, 0.12, 0.15)),
            ("probably", trap(0.12, 0.15, 0.17, 0.23)),
            ("cannot", trap(0.17, 0.23, 1.0, 1.0)),
        ],
    )
}

/// Output: dam capacity density, dams/km, [0, 45]. Same banding as vegetation.
pub fn density() -> Variable {
    Variable::new(
        "density",
        Universe::new(0.0, 45.0, 0.01),
        vec![
            ("none", tri(0.0, 0.0, 0.1)),
            ("rare", trap(0.0, 0.1, 0.5, 1.5)),
            ("occasional", trap(0.5, 1.5, 4.0, 8.0)),
            ("frequent", trap(4.0, 8.0, 12.0, 25.0)),
            ("pervasive", trap(12.0, 25.0, 45.0, 45.0)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn all_variables_are_well_formed() {
        for v in [vegetation(), stream_power_hi(), stream_power_lo(), slope(), density()] {
            assert!(v.validate().is_ok(), "variable `{}` failed validation", v.name);
        }
    }

    #[test]
    fn slope_cannot_threshold() {
        let v = slope();
        let cannot = v.term_index("cannot").unwrap();
        assert_relative_eq!(v.shape(cannot).membership(0.17), 0.0);
        assert_relative_eq!(v.shape(cannot).membership(0.20), 0.5);
        assert_relative_eq!(v.shape(cannot).membership(0.23), 1.0);
        assert_relative_eq!(v.shape(cannot).membership(1.0), 1.0);
    }

    #[test]
    fn low_flow_gate_closes_at_190() {
        let v = stream_power_lo();
        let cannot = v.term_index("cannot").unwrap();
        assert_relative_eq!(v.shape(cannot).membership(180.0), 0.0);
        assert_relative_eq!(v.shape(cannot).membership(185.0), 0.5);
        assert_relative_eq!(v.shape(cannot).membership(190.0), 1.0);
        let can = v.term_index("can").unwrap();
        assert_relative_eq!(v.shape(can).membership(50.0), 1.0);
        assert_relative_eq!(v.shape(can).membership(190.0), 0.0);
    }

    #[test]
    fn vegetation_bands_cover_the_universe() {
        // No crisp value in [0, 45] should have zero membership in every term.
        let v = vegetation();
        for i in 0..=450 {
            let x = i as f64 * 0.1;
            let total: f64 = v.fuzzify(x).iter().sum();
            assert!(total > 0.0, "no term covers vegetation = {x}");
        }
    }

    #[test]
    fn vegetation_max_is_fully_pervasive() {
        let v = vegetation();
        let m = v.fuzzify(45.0);
        let pervasive = v.term_index("pervasive").unwrap();
        assert_relative_eq!(m[pervasive], 1.0);
        assert_relative_eq!(m[v.term_index("frequent").unwrap()], 0.0);
    }
}
