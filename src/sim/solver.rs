//! Move planner for hints and demo mode
//!
//! Gathers variables on the left and constants on the right, merges like
//! cards, then divides. Moves go through the same reducer the UI uses.

use serde::{Deserialize, Serialize};

use super::input::{Entry, GameInput};
use super::reducer::{Response, apply};
use super::state::{GameState, GameStatus};
use super::term::{Side, Term, TermId};

/// One legal player move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Move {
    Cross { term: TermId, to: Side },
    Merge { moved: TermId, target: TermId, sum: i64 },
    Divide { divisor: i64, result: i64 },
}

/// Side each kind of card is collected on
fn home_side(term: &Term) -> Side {
    if term.has_variable {
        Side::Left
    } else {
        Side::Right
    }
}

/// Next move toward `x = answer`, or None once solved
pub fn next_move(state: &GameState) -> Option<Move> {
    match state.status() {
        GameStatus::Won => return None,
        GameStatus::DivisionReady { divisor, dividend } => {
            if dividend % divisor != 0 {
                return None;
            }
            return Some(Move::Divide {
                divisor,
                result: dividend / divisor,
            });
        }
        GameStatus::Playing => {}
    }

    let terms = state.terms();
    if let Some(stray) = terms.iter().find(|t| t.side != home_side(t)) {
        return Some(Move::Cross {
            term: stray.id,
            to: home_side(stray),
        });
    }

    for (i, moved) in terms.iter().enumerate() {
        if let Some(target) = terms[i + 1..].iter().find(|t| t.is_like(moved)) {
            return Some(Move::Merge {
                moved: moved.id,
                target: target.id,
                sum: moved.coefficient + target.coefficient,
            });
        }
    }
    None
}

/// Play a move the way a player would (drop, then answer the dialog)
pub fn play(state: &mut GameState, mv: Move) -> Response {
    match mv {
        Move::Cross { term, to } => apply(
            state,
            GameInput::DragEnded {
                term,
                side: to,
                overlapping: None,
            },
        ),
        Move::Merge { moved, target, sum } => {
            // A stale target skips the drop; the submission reports it
            if let Some(side) = state.equation().get(target).map(|t| t.side) {
                apply(
                    state,
                    GameInput::DragEnded {
                        term: moved,
                        side,
                        overlapping: Some(target),
                    },
                );
            }
            apply(
                state,
                GameInput::SubmitMerge {
                    a: moved,
                    b: target,
                    sum: Entry::Integer(sum),
                },
            )
        }
        Move::Divide { divisor, result } => apply(
            state,
            GameInput::SubmitDivision {
                divisor: Entry::Integer(divisor),
                result: Entry::Integer(result),
            },
        ),
    }
}

/// Play hints until solved or `max_moves` is reached. Returns the moves made.
pub fn auto_solve(state: &mut GameState, max_moves: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    while moves.len() < max_moves {
        let Some(mv) = next_move(state) else {
            break;
        };
        log::debug!("Auto move: {:?}", mv);
        play(state, mv);
        moves.push(mv);
    }
    moves
}

impl GameState {
    /// Suggested next move for the player
    pub fn hint(&self) -> Option<Move> {
        next_move(self)
    }
}
