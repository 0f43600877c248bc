//! Level generation
//!
//! Builds `Ax + C1 = Bx + C2` backwards from a chosen answer so every level
//! reduces to an integer `x` through crosses, merges and at most one divide.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Difficulty;
use super::term::{Equation, IdAllocator, Side, Term};
use crate::consts::SPLIT_CHANCE;
use crate::floor_half;

/// A freshly generated equation and the value of x that solves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub equation: Equation,
    pub answer: i64,
}

/// Raw term before ids are assigned
#[derive(Debug, Clone, Copy)]
struct RawTerm {
    coefficient: i64,
    has_variable: bool,
    side: Side,
}

/// Nonzero coefficients x may end with once difficulty allows a divide step
const FINAL_COEFFICIENT_MAGNITUDES: std::ops::RangeInclusive<i64> = 2..=5;

/// Symmetric integer bound `round(scale * difficulty)`
fn scaled_bound(scale: f64, difficulty: Difficulty) -> i64 {
    (scale * difficulty.value()).round() as i64
}

/// Generate a solvable level for `difficulty`, drawing from `rng` and `ids`
pub fn generate<R: Rng>(difficulty: Difficulty, rng: &mut R, ids: &mut IdAllocator) -> Level {
    // Coefficient x has after full simplification (A - B)
    let final_coeff = if difficulty.unit_coefficient_only() {
        1
    } else {
        let magnitude = rng.random_range(FINAL_COEFFICIENT_MAGNITUDES);
        if rng.random_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    };

    let answer_bound = scaled_bound(5.0, difficulty);
    let answer = rng.random_range(-answer_bound..=answer_bound);

    let a_max = scaled_bound(6.0, difficulty).max(4);
    let a = rng.random_range(2..=a_max);
    let b = a - final_coeff;

    let c_bound = scaled_bound(10.0, difficulty);
    let mut c1 = rng.random_range(-c_bound..=c_bound);
    // With B = 0 and x = 0 only the constants can keep Ax company
    while b == 0 && answer == 0 && c1 == 0 {
        c1 = rng.random_range(-c_bound..=c_bound);
    }
    let c2 = c1 + final_coeff * answer;

    let raw = [
        RawTerm { coefficient: a, has_variable: true, side: Side::Left },
        RawTerm { coefficient: b, has_variable: true, side: Side::Right },
        RawTerm { coefficient: c1, has_variable: false, side: Side::Left },
        RawTerm { coefficient: c2, has_variable: false, side: Side::Right },
    ];

    let mut pieces = Vec::with_capacity(raw.len() * 2);
    for term in raw {
        if difficulty.splits_terms() && term.coefficient != 0 && rng.random_bool(SPLIT_CHANCE) {
            let half = floor_half(term.coefficient);
            pieces.push(RawTerm { coefficient: half, ..term });
            pieces.push(RawTerm { coefficient: term.coefficient - half, ..term });
        } else {
            pieces.push(term);
        }
    }

    let terms = pieces
        .into_iter()
        .filter(|t| t.coefficient != 0)
        .map(|t| Term {
            id: ids.next_id(),
            coefficient: t.coefficient,
            has_variable: t.has_variable,
            side: t.side,
        })
        .collect();
    let equation = Equation::new(terms);

    log::debug!(
        "Generated level at difficulty {:.1}: {} (x = {}, {} terms)",
        difficulty.value(),
        equation,
        answer,
        equation.len()
    );

    Level { equation, answer }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level(difficulty: f64, seed: u64) -> Level {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAllocator::new();
        generate(Difficulty::new(difficulty), &mut rng, &mut ids)
    }

    #[test]
    fn test_easy_levels_have_four_raw_shape() {
        for seed in 0..200 {
            let level = level(1.0, seed);
            let eq = &level.equation;
            let vars_left: Vec<_> = eq.side(Side::Left).filter(|t| t.has_variable).collect();
            let vars_right: Vec<_> = eq.side(Side::Right).filter(|t| t.has_variable).collect();
            assert_eq!(vars_left.len(), 1);
            assert_eq!(vars_right.len(), 1);
            // B = A - 1
            assert_eq!(vars_right[0].coefficient, vars_left[0].coefficient - 1);
            assert!((2..=6).contains(&vars_left[0].coefficient));
            assert!(eq.len() <= 4);
            assert_eq!(eq.net_variable_coefficient(), 1);
            assert!((-5..=5).contains(&level.answer));
        }
    }

    #[test]
    fn test_levels_are_balanced() {
        for difficulty in [1.0, 1.2, 1.4, 1.6, 2.0, 3.0] {
            for seed in 0..100 {
                let level = level(difficulty, seed);
                assert_eq!(level.equation.residual(level.answer), 0);
                assert_eq!(level.equation.solution(), Some(level.answer));
                assert!(level.equation.len() >= 2);
                assert!(level.equation.terms().iter().all(|t| t.coefficient != 0));
            }
        }
    }

    #[test]
    fn test_never_starts_with_a_single_term() {
        // Seeds 4641, 14147 and 31323 draw A = final coefficient, x = 0, C1 = 0
        for seed in 0..40_000 {
            let level = level(1.4, seed);
            assert!(level.equation.len() >= 2, "seed {seed}: {}", level.equation);
            assert_eq!(level.equation.residual(level.answer), 0);
        }
    }

    #[test]
    fn test_divide_step_gated_by_difficulty() {
        for seed in 0..100 {
            assert_eq!(level(1.2, seed).equation.net_variable_coefficient(), 1);
        }
        let non_unit = (0..100)
            .filter(|&seed| level(1.4, seed).equation.net_variable_coefficient().abs() >= 2)
            .count();
        assert_eq!(non_unit, 100);
    }

    #[test]
    fn test_splitting_only_above_threshold() {
        // Without splitting there is at most one term per (side, kind)
        for seed in 0..100 {
            assert!(level(1.4, seed).equation.len() <= 4);
        }
        let max_terms = (0..200).map(|seed| level(2.0, seed).equation.len()).max();
        assert!(max_terms.unwrap_or(0) > 4);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ids = IdAllocator::new();
        let first = generate(Difficulty::new(2.0), &mut rng, &mut ids);
        let second = generate(Difficulty::new(2.0), &mut rng, &mut ids);
        let mut all: Vec<_> = first
            .equation
            .terms()
            .iter()
            .chain(second.equation.terms())
            .map(|t| t.id)
            .collect();
        let count = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), count);
    }

    #[test]
    fn test_determinism() {
        assert_eq!(level(1.8, 4242), level(1.8, 4242));
    }
}
