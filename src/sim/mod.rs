//! Deterministic equation engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (generator takes any `rand::Rng`)
//! - One input at a time, status derived before the next is accepted
//! - Time only through explicit ticks
//! - No rendering or platform dependencies

pub mod event;
pub mod generator;
pub mod input;
pub mod reducer;
pub mod snapshot;
pub mod solver;
pub mod state;
pub mod term;

pub use event::GameEvent;
pub use generator::{Level, generate};
pub use input::{Entry, GameInput};
pub use reducer::{DragOutcome, Response, SubmitOutcome, apply};
pub use snapshot::GameSnapshot;
pub use solver::{Move, auto_solve, next_move, play};
pub use state::{Difficulty, DismissTimer, GameState, GameStatus, PendingMerge};
pub use term::{Equation, IdAllocator, Side, Term, TermId};
