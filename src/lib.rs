//! Equation Balance - drag term cards across the equals sign until `x` stands alone
//!
//! Core modules:
//! - `sim`: Deterministic equation engine (generator, state machine, solver)
//! - `error`: Player input and protocol errors surfaced to the UI
//! - `platform`: Clock, card hit testing, browser bindings
//! - `settings`: UX tuning (merge overlap, dismiss grace period)

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ErrorKind, ErrorReport, MoveError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Score awarded for solving an equation
    pub const WIN_REWARD: i64 = 10;
    /// Score deducted for every rejected merge or division submission
    pub const WRONG_ANSWER_PENALTY: i64 = 2;

    /// Difficulty at the start of a fresh game
    pub const BASE_DIFFICULTY: f64 = 1.0;
    /// Highest difficulty; keeps generated magnitudes small
    pub const MAX_DIFFICULTY: f64 = 10.0;
    /// Difficulty gained per step
    pub const DIFFICULTY_STEP: f64 = 0.2;
    /// Solved equations needed for one difficulty step
    pub const SOLVES_PER_STEP: u32 = 3;

    /// Up to this difficulty x always ends with coefficient 1 (no divide step)
    pub const UNIT_COEFFICIENT_MAX_DIFFICULTY: f64 = 1.2;
    /// Above this difficulty raw terms may be split in two
    pub const SPLIT_MIN_DIFFICULTY: f64 = 1.4;
    /// Chance that an eligible raw term gets split
    pub const SPLIT_CHANCE: f64 = 0.5;

    /// Tolerance for difficulty threshold comparisons
    pub const DIFFICULTY_EPSILON: f64 = 1e-9;
}

/// Floor division (rounds toward negative infinity)
#[inline]
pub fn floor_half(value: i64) -> i64 {
    value.div_euclid(2)
}
