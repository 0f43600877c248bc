//! Property tests for the equation engine

use equation_balance::sim::{
    Difficulty, Entry, GameState, GameStatus, IdAllocator, Move, Side, Term, TermId, generate,
    next_move, play,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

/// Arbitrary nonzero terms with ids 1..=n
fn terms() -> impl Strategy<Value = Vec<Term>> {
    prop::collection::vec((-20i64..=20, any::<bool>(), side()), 1..8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .filter(|(_, (c, _, _))| *c != 0)
            .map(|(i, (coefficient, has_variable, side))| Term {
                id: TermId(i as u32 + 1),
                coefficient,
                has_variable,
                side,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn generated_levels_balance(seed in any::<u64>(), difficulty in 1.0f64..4.0) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAllocator::new();
        let level = generate(Difficulty::new(difficulty), &mut rng, &mut ids);
        prop_assert_eq!(level.equation.residual(level.answer), 0);
        prop_assert!(level.equation.len() >= 2);
        prop_assert!(level.equation.terms().iter().all(|t| t.coefficient != 0));

        let bound = (5.0 * difficulty).round() as i64;
        prop_assert!(level.answer.abs() <= bound);
    }

    #[test]
    fn generated_levels_solve_with_legal_moves(seed in any::<u64>(), solved in 0u32..20) {
        let mut state = GameState::new(seed);
        state.solved_count = solved;
        state.reset();
        let answer = state.answer();

        let mut moves = 0;
        while let Some(mv) = next_move(&state) {
            let before = state.equation().solution();
            play(&mut state, mv);
            // Every accepted move keeps the same solution
            if !state.is_won() {
                prop_assert_eq!(state.equation().solution(), before);
            }
            moves += 1;
            prop_assert!(moves < 40);
        }
        prop_assert!(state.is_won());
        prop_assert_eq!(state.equation().solution(), answer);
        prop_assert_eq!(state.solved_count, solved + 1);
    }

    #[test]
    fn crossing_twice_is_identity(terms in terms(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!terms.is_empty());
        let mut state = GameState::from_terms(terms.clone());
        prop_assume!(!state.is_won());
        let original = terms[pick.index(terms.len())];

        state.drag_ended(original.id, original.side.opposite(), None);
        if !state.is_won() {
            state.drag_ended(original.id, original.side, None);
            let back = state.equation().get(original.id).copied();
            prop_assert_eq!(back, Some(original));
        }
    }

    #[test]
    fn status_matches_shape(terms in terms()) {
        let state = GameState::from_terms(terms);
        let t = state.terms();
        let two_term = t.len() == 2 && t[0].side != t[1].side && t[0].has_variable != t[1].has_variable;
        let lone = t.len() == 1 && t[0].has_variable;
        let var_coefficient = t.iter().find(|x| x.has_variable).map(|x| x.coefficient);
        match state.status() {
            GameStatus::Won => {
                prop_assert!(two_term || lone);
                prop_assert_eq!(var_coefficient, Some(1));
            }
            GameStatus::DivisionReady { divisor, .. } => {
                prop_assert!(two_term || lone);
                prop_assert_eq!(var_coefficient, Some(divisor));
                prop_assert_ne!(divisor, 1);
            }
            GameStatus::Playing => prop_assert!(!(two_term || lone)),
        }
    }

    #[test]
    fn rejected_submissions_cost_two(terms in terms(), guess in -50i64..50) {
        let mut state = GameState::from_terms(terms);
        prop_assume!(!state.is_won());
        let before = state.terms().to_vec();
        let score = state.score;

        if let GameStatus::DivisionReady { divisor, dividend } = state.status() {
            prop_assume!(guess.checked_mul(divisor) != Some(dividend));
            let outcome = state.submit_division(&Entry::Integer(divisor), &Entry::Integer(guess));
            prop_assert!(!outcome.accepted);
        } else {
            let pair = before.iter().enumerate().find_map(|(i, a)| {
                before[i + 1..].iter().find(|b| b.is_like(a)).map(|b| (*a, *b))
            });
            prop_assume!(pair.is_some());
            let (a, b) = pair.unwrap();
            prop_assume!(a.coefficient + b.coefficient != guess);
            let outcome = state.submit_merge(a.id, b.id, &Entry::Integer(guess));
            prop_assert!(!outcome.accepted);
        }
        prop_assert_eq!(state.score, score - 2);
        prop_assert_eq!(state.terms(), before.as_slice());
    }

    #[test]
    fn accepted_merge_sums_and_prunes(terms in terms()) {
        let mut state = GameState::from_terms(terms);
        prop_assume!(!state.is_won());
        let live = state.terms().to_vec();
        let pair = live.iter().enumerate().find_map(|(i, a)| {
            live[i + 1..].iter().find(|b| b.is_like(a)).map(|b| (*a, *b))
        });
        prop_assume!(pair.is_some());
        let (a, b) = pair.unwrap();
        let sum = a.coefficient + b.coefficient;

        play(&mut state, Move::Merge { moved: a.id, target: b.id, sum });
        prop_assert!(state.equation().get(a.id).is_none());
        prop_assert!(state.equation().get(b.id).is_none());
        prop_assert!(state.terms().iter().all(|t| t.coefficient != 0));
        let expected_len = if sum == 0 { live.len() - 2 } else { live.len() - 1 };
        prop_assert_eq!(state.terms().len(), expected_len);
        if sum != 0 {
            let merged = state
                .terms()
                .iter()
                .find(|t| !live.iter().any(|l| l.id == t.id))
                .copied();
            prop_assert_eq!(merged.map(|t| (t.coefficient, t.has_variable, t.side)), Some((sum, a.has_variable, b.side)));
        }
    }
}
