//! Errors surfaced to the UI
//!
//! None of these are fatal. Wrong answers cost points; protocol rejections
//! (a stale card id, a submission in the wrong state) cost nothing. Either
//! way the live terms are left untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::WRONG_ANSWER_PENALTY;
use crate::sim::TermId;

/// Why a move or submission was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveError {
    /// Submitted text is not a number
    #[error("'{0}' is not a number")]
    InvalidNumericInput(String),

    /// Merge answer does not equal the sum of the two cards
    #[error("{proposed} is not the sum of the two cards")]
    WrongMergeSum { proposed: String },

    /// Divisor is not the coefficient of x (result was right)
    #[error("Divide both sides by the number in front of x, not {proposed}")]
    WrongDivisor { proposed: String },

    /// Divisor right, quotient wrong
    #[error("The divisor is right, but {dividend} / {divisor} is not {proposed}")]
    WrongDivisionResult {
        divisor: i64,
        dividend: i64,
        proposed: String,
    },

    /// Both divisor and quotient wrong
    #[error("Divide both sides by the number in front of x, not {divisor}; {result} is not the result either")]
    WrongDivisorAndResult { divisor: String, result: String },

    /// Card id is not on the board
    #[error("Term {0} is not on the board")]
    UnknownTerm(TermId),

    /// A card cannot be merged with itself
    #[error("Term {0} cannot be merged with itself")]
    SameTerm(TermId),

    /// Cards are on different sides or of different kinds
    #[error("Terms {0} and {1} are not on the same side or not the same kind")]
    IncompatibleTerms(TermId, TermId),

    /// Division submitted while the equation is not `kx = c`
    #[error("The equation is not ready to divide")]
    NotDivisionReady,

    /// Equation already solved, waiting for reset
    #[error("The equation is already solved")]
    AlreadySolved,
}

/// Error category for the UI (serializable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidNumericInput,
    WrongMergeSum,
    WrongDivisor,
    WrongDivisionResult,
    WrongDivisorAndResult,
    UnknownTerm,
    SameTerm,
    IncompatibleTerms,
    NotDivisionReady,
    AlreadySolved,
}

impl MoveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoveError::InvalidNumericInput(_) => ErrorKind::InvalidNumericInput,
            MoveError::WrongMergeSum { .. } => ErrorKind::WrongMergeSum,
            MoveError::WrongDivisor { .. } => ErrorKind::WrongDivisor,
            MoveError::WrongDivisionResult { .. } => ErrorKind::WrongDivisionResult,
            MoveError::WrongDivisorAndResult { .. } => ErrorKind::WrongDivisorAndResult,
            MoveError::UnknownTerm(_) => ErrorKind::UnknownTerm,
            MoveError::SameTerm(_) => ErrorKind::SameTerm,
            MoveError::IncompatibleTerms(..) => ErrorKind::IncompatibleTerms,
            MoveError::NotDivisionReady => ErrorKind::NotDivisionReady,
            MoveError::AlreadySolved => ErrorKind::AlreadySolved,
        }
    }

    /// Whether this rejection costs the player points
    pub fn is_penalized(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidNumericInput
                | ErrorKind::WrongMergeSum
                | ErrorKind::WrongDivisor
                | ErrorKind::WrongDivisionResult
                | ErrorKind::WrongDivisorAndResult
        )
    }

    /// Score change the rejection carries
    pub fn score_delta(&self) -> i64 {
        if self.is_penalized() {
            -WRONG_ANSWER_PENALTY
        } else {
            0
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Error as data, ready to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}
