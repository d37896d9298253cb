//! Mamdani inference engine for the capacity rule base.
//!
//! Evaluation per reach:
//!   1. Fuzzify the four crisp inputs against their term shapes.
//!   2. Firing strength per rule: recursive AND = min, OR = max, NOT = 1 − x.
//!   3. Implication: clip each consequent term curve at its firing strength.
//!   4. Aggregation: pointwise max of all clipped curves over the density grid.
//!   5. Defuzzify: discrete centroid Σ m·x / Σ m; 0 if nothing fired.
//!
//! Rules sharing a consequent collapse to one clip level (their max strength)
//! before aggregation, which is equivalent and keeps the hot loop at
//! terms × grid rather than rules × grid.

use super::membership::Variable;
use super::rules::{capacity_rules, Expr, Rule};
use super::{variables, FisError};

/// Crisp input vector, one reach. Build via [`FisInput::clamped`] so values
/// are inside each variable's universe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisInput {
    pub vegetation: f64,
    pub stream_power_hi: f64,
    pub stream_power_lo: f64,
    pub slope: f64,
}

impl FisInput {
    /// Clamp raw covariates into model range. Out-of-range values are policy,
    /// not errors: vegetation to [0, 45], stream power to [0.0001, 10000]
    /// (non-positive floored so the fate terms stay distinguishable), slope
    /// capped at 1.
    pub fn clamped(vegetation: f64, stream_power_hi: f64, stream_power_lo: f64, slope: f64) -> Self {
        let floor_power = |p: f64| if p <= 0.0 { 0.0001 } else { p.min(10000.0) };
        Self {
            vegetation: vegetation.clamp(0.0, 45.0),
            stream_power_hi: floor_power(stream_power_hi),
            stream_power_lo: floor_power(stream_power_lo),
            slope: slope.min(1.0),
        }
    }
}

/// Antecedent with term names resolved to indices into each variable.
enum Compiled {
    Leaf { input: usize, term: usize },
    Not(Box<Compiled>),
    And(Vec<Compiled>),
    Or(Vec<Compiled>),
}

struct CompiledRule {
    antecedent: Compiled,
    /// Output term index.
    consequent: usize,
}

/// The capacity fuzzy inference system: variables, compiled rule base, and
/// the sampled output curves. Construction validates everything; evaluation
/// is pure and infallible.
pub struct CapacityFis {
    inputs: [Variable; 4],
    output: Variable,
    rules: Vec<CompiledRule>,
    /// Density universe sample points.
    grid: Vec<f64>,
    /// Per output term, membership sampled over `grid`.
    term_curves: Vec<Vec<f64>>,
    none_centroid: f64,
}

impl CapacityFis {
    pub fn new() -> Result<Self, FisError> {
        let inputs = [
            variables::vegetation(),
            variables::stream_power_hi(),
            variables::stream_power_lo(),
            variables::slope(),
        ];
        let output = variables::density();

        for v in &inputs {
            v.validate()?;
        }
        output.validate()?;

        let rules = compile_rules(&capacity_rules(), &inputs, &output)?;

        let grid = output.universe.samples();
        let term_curves: Vec<Vec<f64>> = (0..output.term_count())
            .map(|t| grid.iter().map(|&x| output.shape(t).membership(x)).collect())
            .collect();

        // Defuzzified value of the pure "none" band, used by the
        // post-processor to snap no-capacity reaches to exactly 0. Derived
        // here so a change to the shape propagates.
        let none_idx = output
            .term_index("none")
            .ok_or_else(|| FisError::UnknownConsequent { rule: 0, term: "none".to_string() })?;
        let none_centroid = round6(centroid(&grid, &term_curves[none_idx]));

        Ok(Self { inputs, output, rules, grid, term_curves, none_centroid })
    }

    /// Centroid of the isolated "none" output term, rounded to 6 decimals.
    pub fn none_centroid(&self) -> f64 {
        self.none_centroid
    }

    pub fn output_variable(&self) -> &Variable {
        &self.output
    }

    /// Run inference on one clamped input vector. Returns the raw capacity
    /// density in [0, 45); 0 when no rule fires.
    pub fn evaluate(&self, input: &FisInput) -> f64 {
        let crisp = [
            input.vegetation,
            input.stream_power_hi,
            input.stream_power_lo,
            input.slope,
        ];
        let memberships: Vec<Vec<f64>> = self
            .inputs
            .iter()
            .zip(crisp)
            .map(|(v, x)| v.fuzzify(x))
            .collect();

        // Max firing strength per output term (implication + per-term merge).
        let mut clip = vec![0.0f64; self.output.term_count()];
        for rule in &self.rules {
            let strength = eval(&rule.antecedent, &memberships);
            if strength > clip[rule.consequent] {
                clip[rule.consequent] = strength;
            }
        }

        // Aggregate clipped curves and take the centroid in one pass.
        let mut moment = 0.0;
        let mut area = 0.0;
        for (i, &x) in self.grid.iter().enumerate() {
            let mut m = 0.0f64;
            for (t, curve) in self.term_curves.iter().enumerate() {
                m = m.max(clip[t].min(curve[i]));
            }
            moment += m * x;
            area += m;
        }
        if area == 0.0 { 0.0 } else { moment / area }
    }
}

fn eval(expr: &Compiled, memberships: &[Vec<f64>]) -> f64 {
    match expr {
        Compiled::Leaf { input, term } => memberships[*input][*term],
        Compiled::Not(inner) => 1.0 - eval(inner, memberships),
        Compiled::And(parts) => parts
            .iter()
            .map(|p| eval(p, memberships))
            .fold(f64::INFINITY, f64::min),
        Compiled::Or(parts) => parts
            .iter()
            .map(|p| eval(p, memberships))
            .fold(f64::NEG_INFINITY, f64::max),
    }
}

fn compile_rules(rules: &[Rule], inputs: &[Variable; 4], output: &Variable) -> Result<Vec<CompiledRule>, FisError> {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let rule_no = i + 1;
            let antecedent = compile_expr(&rule.antecedent, inputs, rule_no)?;
            let consequent = output.term_index(rule.consequent).ok_or_else(|| {
                FisError::UnknownConsequent { rule: rule_no, term: rule.consequent.to_string() }
            })?;
            Ok(CompiledRule { antecedent, consequent })
        })
        .collect()
}

fn compile_expr(expr: &Expr, inputs: &[Variable; 4], rule_no: usize) -> Result<Compiled, FisError> {
    Ok(match expr {
        Expr::Is(input, term) => {
            let var = &inputs[input.index()];
            let idx = var.term_index(term).ok_or_else(|| FisError::UnknownTerm {
                rule: rule_no,
                variable: var.name.to_string(),
                term: term.to_string(),
            })?;
            Compiled::Leaf { input: input.index(), term: idx }
        }
        Expr::Not(inner) => Compiled::Not(Box::new(compile_expr(inner, inputs, rule_no)?)),
        Expr::And(parts) => Compiled::And(
            parts.iter().map(|p| compile_expr(p, inputs, rule_no)).collect::<Result<_, _>>()?,
        ),
        Expr::Or(parts) => Compiled::Or(
            parts.iter().map(|p| compile_expr(p, inputs, rule_no)).collect::<Result<_, _>>()?,
        ),
    })
}

/// Discrete centroid Σ m·x / Σ m; 0 for an identically-zero membership.
fn centroid(grid: &[f64], membership: &[f64]) -> f64 {
    let mut moment = 0.0;
    let mut area = 0.0;
    for (&x, &m) in grid.iter().zip(membership) {
        moment += m * x;
        area += m;
    }
    if area == 0.0 { 0.0 } else { moment / area }
}

pub(crate) fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fis() -> CapacityFis {
        CapacityFis::new().expect("rule base should compile")
    }

    #[test]
    fn none_centroid_is_derived_from_the_none_shape() {
        // tri(0, 0, 0.1) sampled at 0.01: m = 1.0, 0.9, …, 0.1, then zeros.
        // Centroid = 0.165 / 5.5 = 0.03 exactly.
        let fis = fis();
        assert_relative_eq!(fis.none_centroid(), 0.03);
        assert_eq!(fis.output_variable().term_count(), 5);
    }

    #[test]
    fn centroid_of_empty_membership_is_zero() {
        let grid = vec![0.0, 1.0, 2.0];
        assert_eq!(centroid(&grid, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn no_vegetation_yields_the_none_band() {
        let fis = fis();
        let out = fis.evaluate(&FisInput::clamped(0.0, 500.0, 50.0, 0.05));
        assert_relative_eq!(out, 0.03, epsilon = 1e-9);
    }

    #[test]
    fn steep_slope_vetoes_everything() {
        let fis = fis();
        // Well-vegetated reach, benign stream power, but slope fully "cannot".
        let out = fis.evaluate(&FisInput::clamped(30.0, 100.0, 50.0, 0.5));
        assert_relative_eq!(out, 0.03, epsilon = 1e-9);
    }

    #[test]
    fn closed_low_flow_gate_vetoes_everything() {
        let fis = fis();
        let out = fis.evaluate(&FisInput::clamped(30.0, 100.0, 500.0, 0.05));
        assert_relative_eq!(out, 0.03, epsilon = 1e-9);
    }

    #[test]
    fn pervasive_reach_lands_in_the_top_band() {
        let fis = fis();
        // vegetation = 45 (fully pervasive), dams persist at high flow,
        // building possible at low flow and on this slope: only the
        // pervasive/persists/can/can rule fires, at strength 1.
        let out = fis.evaluate(&FisInput::clamped(45.0, 500.0, 50.0, 0.05));
        assert!(out > 25.0 && out < 45.0, "expected top-band density, got {out}");
    }

    #[test]
    fn evaluation_is_deterministic() {
        let fis = fis();
        let input = FisInput::clamped(7.3, 900.0, 160.0, 0.11);
        let a = fis.evaluate(&input);
        let b = fis.evaluate(&input);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn inputs_are_clamped_into_model_range() {
        let input = FisInput::clamped(-5.0, -1.0, 20000.0, 5.0);
        assert_relative_eq!(input.vegetation, 0.0);
        assert_relative_eq!(input.stream_power_hi, 0.0001);
        assert_relative_eq!(input.stream_power_lo, 10000.0);
        assert_relative_eq!(input.slope, 1.0);
    }

    #[test]
    fn mid_band_reach_is_bounded_by_its_vegetation_band() {
        let fis = fis();
        // Occasional vegetation (fully in trap(0.5, 1.5, 4, 8) plateau).
        let out = fis.evaluate(&FisInput::clamped(2.5, 500.0, 50.0, 0.05));
        assert!(out > 0.5 && out < 8.0, "expected occasional-band density, got {out}");
    }
}
