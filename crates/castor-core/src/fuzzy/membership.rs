//! Membership shapes and fuzzy variables.
//!
//! A shape maps any real x to a membership degree in [0, 1]. Outside its
//! support membership is 0, except open-ended trapezoids (a flat top touching
//! an endpoint) which stay saturated at 1 past that end. Inputs are clamped
//! to the variable universe before fuzzification, so saturation only matters
//! exactly at the universe bounds.

use serde::{Deserialize, Serialize};

use super::FisError;

/// Piecewise-linear membership shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// 0 at `left`, rising to 1 at `peak`, falling to 0 at `right`.
    /// A degenerate edge (`left == peak` or `peak == right`) is a step to 1.
    Triangle { left: f64, peak: f64, right: f64 },
    /// 0 at `left`, 1 over [`left_top`, `right_top`], 0 at `right`.
    Trapezoid {
        left: f64,
        left_top: f64,
        right_top: f64,
        right: f64,
    },
}

impl Shape {
    /// Membership degree at `x`. Total over the real line.
    pub fn membership(&self, x: f64) -> f64 {
        match *self {
            Shape::Triangle { left, peak, right } => {
                if x < left || x > right {
                    0.0
                } else if x < peak {
                    if peak == left { 1.0 } else { (x - left) / (peak - left) }
                } else if x > peak {
                    if right == peak { 1.0 } else { (right - x) / (right - peak) }
                } else {
                    1.0
                }
            }
            Shape::Trapezoid {
                left,
                left_top,
                right_top,
                right,
            } => {
                if x < left {
                    // Open left end saturates.
                    if left == left_top { 1.0 } else { 0.0 }
                } else if x > right {
                    if right == right_top { 1.0 } else { 0.0 }
                } else if x < left_top {
                    if left_top == left { 1.0 } else { (x - left) / (left_top - left) }
                } else if x > right_top {
                    if right == right_top { 1.0 } else { (right - x) / (right - right_top) }
                } else {
                    1.0
                }
            }
        }
    }

    /// Breakpoints must be non-decreasing and finite.
    pub fn validate(&self, variable: &str, term: &str) -> Result<(), FisError> {
        let pts: Vec<f64> = match *self {
            Shape::Triangle { left, peak, right } => vec![left, peak, right],
            Shape::Trapezoid {
                left,
                left_top,
                right_top,
                right,
            } => vec![left, left_top, right_top, right],
        };
        let ok = pts.iter().all(|p| p.is_finite()) && pts.windows(2).all(|w| w[0] <= w[1]);
        if ok {
            Ok(())
        } else {
            Err(FisError::MalformedShape {
                variable: variable.to_string(),
                term: term.to_string(),
            })
        }
    }
}

/// Evenly discretized half-open range [min, max): min, min+step, …
/// Matches the sampling resolution the capacity model was calibrated at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn validate(&self, variable: &str) -> Result<(), FisError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.max > self.min;
        if ok {
            Ok(())
        } else {
            Err(FisError::MalformedUniverse {
                variable: variable.to_string(),
                min: self.min,
                max: self.max,
                step: self.step,
            })
        }
    }

    /// Number of sample points in [min, max).
    pub fn sample_count(&self) -> usize {
        (((self.max - self.min) / self.step).round() as usize).max(1)
    }

    /// Sample points min, min+step, …, < max.
    pub fn samples(&self) -> Vec<f64> {
        (0..self.sample_count())
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

/// A named fuzzy variable: a universe plus an ordered set of named terms.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: &'static str,
    pub universe: Universe,
    terms: Vec<(&'static str, Shape)>,
}

impl Variable {
    pub fn new(name: &'static str, universe: Universe, terms: Vec<(&'static str, Shape)>) -> Self {
        Self { name, universe, terms }
    }

    /// Universe and every term shape must be well-formed.
    pub fn validate(&self) -> Result<(), FisError> {
        self.universe.validate(self.name)?;
        for (term, shape) in &self.terms {
            shape.validate(self.name, term)?;
        }
        Ok(())
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|(t, _)| *t == name)
    }

    pub fn term_name(&self, index: usize) -> &'static str {
        self.terms[index].0
    }

    pub fn shape(&self, index: usize) -> &Shape {
        &self.terms[index].1
    }

    /// Membership degree of `x` in each term, in term order.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        self.terms.iter().map(|(_, s)| s.membership(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn triangle_degenerate_left_edge_steps_to_one() {
        // The "none" shape: full membership exactly at 0, gone by 0.1.
        let s = Shape::Triangle { left: 0.0, peak: 0.0, right: 0.1 };
        assert_relative_eq!(s.membership(0.0), 1.0);
        assert_relative_eq!(s.membership(0.05), 0.5);
        assert_relative_eq!(s.membership(0.1), 0.0);
        assert_relative_eq!(s.membership(0.2), 0.0);
        assert_relative_eq!(s.membership(-1.0), 0.0);
    }

    #[test]
    fn trapezoid_edges_and_plateau() {
        let s = Shape::Trapezoid { left: 4.0, left_top: 8.0, right_top: 12.0, right: 25.0 };
        assert_relative_eq!(s.membership(4.0), 0.0);
        assert_relative_eq!(s.membership(6.0), 0.5);
        assert_relative_eq!(s.membership(8.0), 1.0);
        assert_relative_eq!(s.membership(10.0), 1.0);
        assert_relative_eq!(s.membership(12.0), 1.0);
        assert_relative_eq!(s.membership(18.5), 0.5);
        assert_relative_eq!(s.membership(25.0), 0.0);
    }

    #[test]
    fn open_trapezoid_saturates_past_its_flat_end() {
        let s = Shape::Trapezoid { left: 1600.0, left_top: 2400.0, right_top: 10000.0, right: 10000.0 };
        assert_relative_eq!(s.membership(10000.0), 1.0);
        assert_relative_eq!(s.membership(12000.0), 1.0);
        assert_relative_eq!(s.membership(1600.0), 0.0);
        let s = Shape::Trapezoid { left: 0.0, left_top: 0.0, right_top: 150.0, right: 175.0 };
        assert_relative_eq!(s.membership(0.0), 1.0);
        assert_relative_eq!(s.membership(-5.0), 1.0);
    }

    #[test]
    fn decreasing_breakpoints_are_rejected() {
        let s = Shape::Trapezoid { left: 5.0, left_top: 4.0, right_top: 12.0, right: 25.0 };
        assert!(s.validate("veg", "frequent").is_err());
        let s = Shape::Triangle { left: 0.0, peak: 2.0, right: 1.0 };
        assert!(s.validate("veg", "x").is_err());
    }

    #[test]
    fn universe_sampling_matches_calibration_grid() {
        let u = Universe::new(0.0, 45.0, 0.01);
        assert_eq!(u.sample_count(), 4500);
        let pts = u.samples();
        assert_relative_eq!(pts[0], 0.0);
        assert_relative_eq!(pts[1], 0.01);
        assert!(*pts.last().unwrap() < 45.0);

        let u = Universe::new(0.0, 1.0, 0.0001);
        assert_eq!(u.sample_count(), 10000);
    }

    #[test]
    fn degenerate_universe_is_rejected() {
        assert!(Universe::new(0.0, 45.0, 0.0).validate("veg").is_err());
        assert!(Universe::new(45.0, 0.0, 0.01).validate("veg").is_err());
        assert!(Universe::new(0.0, f64::NAN, 0.01).validate("veg").is_err());
    }

    #[test]
    fn fuzzify_reports_every_term_in_order() {
        let v = Variable::new(
            "demo",
            Universe::new(0.0, 10.0, 0.1),
            vec![
                ("low", Shape::Trapezoid { left: 0.0, left_top: 0.0, right_top: 2.0, right: 4.0 }),
                ("high", Shape::Trapezoid { left: 2.0, left_top: 4.0, right_top: 10.0, right: 10.0 }),
            ],
        );
        assert!(v.validate().is_ok());
        let m = v.fuzzify(3.0);
        assert_relative_eq!(m[0], 0.5);
        assert_relative_eq!(m[1], 0.5);
        assert_eq!(v.term_index("high"), Some(1));
        assert_eq!(v.term_name(1), "high");
        assert_eq!(v.term_index("mid"), None);
        assert_relative_eq!(v.universe.clamp(12.0), 10.0);
        assert_relative_eq!(v.universe.clamp(-1.0), 0.0);
    }
}
