//! Render-ready view of the game state

use serde::{Deserialize, Serialize};

use super::state::{GameState, GameStatus, PendingMerge};
use super::term::Term;
use crate::error::ErrorReport;

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub terms: Vec<Term>,
    pub score: i64,
    pub solved_count: u32,
    pub difficulty: f64,
    pub status: GameStatus,
    /// Formatted equation, e.g. `3x - 4 = x + 5`
    pub equation: String,
    pub pending_merge: Option<PendingMerge>,
    pub error: Option<ErrorReport>,
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            terms: self.terms().to_vec(),
            score: self.score,
            solved_count: self.solved_count,
            difficulty: self.difficulty().value(),
            status: self.status(),
            equation: self.equation().to_string(),
            pending_merge: self.pending_merge(),
            error: self.last_error().cloned(),
        }
    }
}
