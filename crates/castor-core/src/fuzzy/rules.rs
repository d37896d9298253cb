//! The dam capacity rule base: 67 rules mapping the four covariates onto a
//! density band. Rules are plain data (an antecedent expression tree plus one
//! consequent term); they are resolved against the variable definitions when
//! the engine is built, so a typo in a term name fails construction rather
//! than silently evaluating to 0.

use self::Input::{Slope, StreamPowerHi, StreamPowerLo, Vegetation};

/// The four antecedent variables, in crisp-input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Vegetation,
    StreamPowerHi,
    StreamPowerLo,
    Slope,
}

impl Input {
    pub fn index(self) -> usize {
        match self {
            Vegetation => 0,
            StreamPowerHi => 1,
            StreamPowerLo => 2,
            Slope => 3,
        }
    }
}

/// Antecedent expression: AND = min, OR = max, NOT = 1 − x over term leaves.
#[derive(Debug, Clone)]
pub enum Expr {
    Is(Input, &'static str),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub antecedent: Expr,
    pub consequent: &'static str,
}

fn is(input: Input, term: &'static str) -> Expr {
    Expr::Is(input, term)
}

fn not(e: Expr) -> Expr {
    Expr::Not(Box::new(e))
}

/// veg ∧ sp-hi ∧ sp-lo ∧ slope → density.
fn combo(veg: &'static str, hi: &'static str, lo: &'static str, slope: Expr, out: &'static str) -> Rule {
    Rule {
        antecedent: Expr::And(vec![
            is(Vegetation, veg),
            is(StreamPowerHi, hi),
            is(StreamPowerLo, lo),
            slope,
        ]),
        consequent: out,
    }
}

/// The full capacity rule base.
///
/// Structure: three absolute vetoes (no vegetation, low-flow gate closed,
/// slope too steep), then the rare/occasional bands gated only against
/// not-too-steep slope, then the frequent and pervasive bands enumerated
/// over every stream-power × low-flow × slope combination.
pub fn capacity_rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule { antecedent: is(Vegetation, "none"), consequent: "none" },
        Rule { antecedent: is(StreamPowerLo, "cannot"), consequent: "none" },
        Rule { antecedent: is(Slope, "cannot"), consequent: "none" },
    ];

    // Rare and occasional vegetation: dam fate at high flow decides the band,
    // any slope short of "cannot" is acceptable.
    let buildable = || not(is(Slope, "cannot"));
    for lo in ["can", "probably"] {
        rules.push(combo("rare", "persists", lo, buildable(), "rare"));
    }
    for lo in ["can", "probably"] {
        rules.push(combo("rare", "breach", lo, buildable(), "rare"));
    }
    for lo in ["can", "probably"] {
        rules.push(combo("rare", "oblowout", lo, buildable(), "rare"));
    }
    for lo in ["can", "probably"] {
        rules.push(combo("rare", "blowout", lo, buildable(), "none"));
    }
    for hi in ["persists", "breach", "oblowout"] {
        for lo in ["can", "probably"] {
            rules.push(combo("occasional", hi, lo, buildable(), "occasional"));
        }
    }
    for lo in ["can", "probably"] {
        rules.push(combo("occasional", "blowout", lo, buildable(), "rare"));
    }

    // Frequent vegetation: (sp-hi, sp-lo, slope) → density.
    let frequent: [(&str, &str, &str, &str); 24] = [
        ("persists", "can", "flat", "occasional"),
        ("persists", "can", "can", "frequent"),
        ("persists", "can", "probably", "occasional"),
        ("persists", "probably", "flat", "occasional"),
        ("persists", "probably", "can", "frequent"),
        ("persists", "probably", "probably", "occasional"),
        ("breach", "can", "flat", "occasional"),
        ("breach", "can", "can", "frequent"),
        ("breach", "can", "probably", "occasional"),
        ("breach", "probably", "flat", "occasional"),
        ("breach", "probably", "can", "frequent"),
        ("breach", "probably", "probably", "occasional"),
        ("oblowout", "can", "flat", "occasional"),
        ("oblowout", "can", "can", "frequent"),
        ("oblowout", "can", "probably", "occasional"),
        ("oblowout", "probably", "flat", "rare"),
        ("oblowout", "probably", "can", "occasional"),
        ("oblowout", "probably", "probably", "rare"),
        ("blowout", "can", "flat", "rare"),
        ("blowout", "can", "can", "rare"),
        ("blowout", "can", "probably", "rare"),
        ("blowout", "probably", "flat", "rare"),
        ("blowout", "probably", "can", "rare"),
        ("blowout", "probably", "probably", "rare"),
    ];
    for (hi, lo, sl, out) in frequent {
        rules.push(combo("frequent", hi, lo, is(Slope, sl), out));
    }

    // Pervasive vegetation.
    let pervasive: [(&str, &str, &str, &str); 24] = [
        ("persists", "can", "flat", "frequent"),
        ("persists", "can", "can", "pervasive"),
        ("persists", "can", "probably", "frequent"),
        ("persists", "probably", "flat", "frequent"),
        ("persists", "probably", "can", "pervasive"),
        ("persists", "probably", "probably", "frequent"),
        ("breach", "can", "flat", "frequent"),
        ("breach", "can", "can", "pervasive"),
        ("breach", "can", "probably", "frequent"),
        ("breach", "probably", "flat", "frequent"),
        ("breach", "probably", "can", "pervasive"),
        ("breach", "probably", "probably", "frequent"),
        ("oblowout", "can", "flat", "frequent"),
        ("oblowout", "can", "can", "pervasive"),
        ("oblowout", "can", "probably", "frequent"),
        ("oblowout", "probably", "flat", "occasional"),
        ("oblowout", "probably", "can", "frequent"),
        ("oblowout", "probably", "probably", "occasional"),
        ("blowout", "can", "flat", "occasional"),
        ("blowout", "can", "can", "occasional"),
        ("blowout", "can", "probably", "rare"),
        ("blowout", "probably", "flat", "occasional"),
        ("blowout", "probably", "can", "occasional"),
        ("blowout", "probably", "probably", "rare"),
    ];
    for (hi, lo, sl, out) in pervasive {
        rules.push(combo("pervasive", hi, lo, is(Slope, sl), out));
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_base_has_67_rules() {
        assert_eq!(capacity_rules().len(), 67);
    }

    #[test]
    fn consequent_band_counts() {
        let mut none = 0;
        let mut rare = 0;
        let mut occasional = 0;
        let mut frequent = 0;
        let mut pervasive = 0;
        for rule in capacity_rules() {
            match rule.consequent {
                "none" => none += 1,
                "rare" => rare += 1,
                "occasional" => occasional += 1,
                "frequent" => frequent += 1,
                "pervasive" => pervasive += 1,
                other => panic!("unexpected consequent `{other}`"),
            }
        }
        assert_eq!((none, rare, occasional, frequent, pervasive), (5, 18, 23, 16, 5));
    }

    #[test]
    fn pervasive_band_requires_persisting_dams_and_buildable_slope() {
        for rule in capacity_rules() {
            if rule.consequent != "pervasive" {
                continue;
            }
            let Expr::And(parts) = &rule.antecedent else {
                panic!("pervasive rules are conjunctions");
            };
            assert!(matches!(parts[0], Expr::Is(Input::Vegetation, "pervasive")));
            assert!(matches!(parts[3], Expr::Is(Input::Slope, "can")));
            assert!(!matches!(parts[1], Expr::Is(_, "blowout")));
        }
    }
}
