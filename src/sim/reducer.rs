//! Event reducer
//!
//! Every input is applied synchronously and atomically: validate against the
//! live state, mutate, re-derive status, return the outcome. Rejected input
//! never changes the terms.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::input::{Entry, GameInput};
use super::state::{Difficulty, DismissTimer, GameState, GameStatus, PendingMerge};
use super::term::{Side, Term, TermId};
use crate::error::{ErrorReport, MoveError};

/// Result of a drag ending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragOutcome {
    /// Dropped back on its own side with nothing to merge with
    Unchanged,
    /// Moved across the equals sign (term shows the flipped coefficient)
    Crossed { term: Term },
    /// Dropped onto a like card; the merge dialog is open
    MergeOpened { pending: PendingMerge },
    /// Drag refused (stale id, solved equation)
    Rejected { error: ErrorReport },
}

/// Result of a merge or division submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub score_delta: i64,
    /// Live terms after an accepted submission
    pub terms: Option<Vec<Term>>,
    pub error: Option<ErrorReport>,
}

impl SubmitOutcome {
    fn accepted(state: &GameState, score_delta: i64) -> Self {
        Self {
            accepted: true,
            score_delta,
            terms: Some(state.terms().to_vec()),
            error: None,
        }
    }

    fn rejected(err: &MoveError) -> Self {
        Self {
            accepted: false,
            score_delta: err.score_delta(),
            terms: None,
            error: Some(err.report()),
        }
    }
}

/// Response to one [`GameInput`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "camelCase")]
pub enum Response {
    Drag(DragOutcome),
    Submit(SubmitOutcome),
    /// Reset, start, cancel and tick carry no outcome beyond the new state
    Ack,
}

/// Apply one input to the game state
pub fn apply(state: &mut GameState, input: GameInput) -> Response {
    match input {
        GameInput::StartGame { difficulty } => {
            state.start_game(Difficulty::new(difficulty));
            Response::Ack
        }
        GameInput::Reset => {
            state.reset();
            Response::Ack
        }
        GameInput::DragEnded {
            term,
            side,
            overlapping,
        } => Response::Drag(state.drag_ended(term, side, overlapping)),
        GameInput::SubmitMerge { a, b, sum } => Response::Submit(state.submit_merge(a, b, &sum)),
        GameInput::SubmitDivision { divisor, result } => {
            Response::Submit(state.submit_division(&divisor, &result))
        }
        GameInput::CancelMerge => {
            state.cancel_merge();
            Response::Ack
        }
        GameInput::Tick { now_ms } => {
            state.tick(now_ms);
            Response::Ack
        }
    }
}

impl GameState {
    /// Fresh game: score and solved count back to zero
    pub fn start_game(&mut self, difficulty: Difficulty) {
        log::info!("Starting game at difficulty {:.1}", difficulty.value());
        self.score = 0;
        self.solved_count = 0;
        self.base_difficulty = difficulty;
        self.next_equation();
    }

    /// Skip the current equation (or move on after solving it)
    pub fn reset(&mut self) {
        self.next_equation();
    }

    /// A card was dropped on `side`, possibly over `overlapping`
    pub fn drag_ended(
        &mut self,
        term_id: TermId,
        side: Side,
        overlapping: Option<TermId>,
    ) -> DragOutcome {
        if self.is_won() {
            return DragOutcome::Rejected {
                error: MoveError::AlreadySolved.report(),
            };
        }
        let Some(term) = self.equation.get(term_id).copied() else {
            log::warn!("Drag ended for unknown term {}", term_id);
            return DragOutcome::Rejected {
                error: MoveError::UnknownTerm(term_id).report(),
            };
        };

        // A new drag supersedes any open merge dialog
        if let Some(previous) = self.pending_merge {
            log::debug!(
                "Merge {} -> {} superseded by a new drag",
                previous.moved,
                previous.target
            );
            self.clear_negotiation();
        }
        self.last_error = None;

        if let Some(candidate_id) = overlapping {
            match self.merge_target(&term, candidate_id, side) {
                Ok(target) => {
                    let pending = PendingMerge {
                        moved: term.id,
                        target: target.id,
                        effective_coefficient: term.coefficient_on(side),
                        side,
                    };
                    log::debug!(
                        "Merge opened: {} ({}) onto {}",
                        term.label(),
                        pending.effective_coefficient,
                        target.label()
                    );
                    self.pending_merge = Some(pending);
                    self.emit(GameEvent::MergeOpened {
                        moved: pending.moved,
                        target: pending.target,
                        effective_coefficient: pending.effective_coefficient,
                    });
                    return DragOutcome::MergeOpened { pending };
                }
                Err(err) => {
                    log::warn!("Ignoring merge candidate {}: {}", candidate_id, err);
                }
            }
        }

        let Some(live) = self.equation.get_mut(term_id) else {
            return DragOutcome::Unchanged;
        };
        if !live.cross_to(side) {
            return DragOutcome::Unchanged;
        }
        let crossed = *live;
        log::debug!("Crossed {} to the {} side", crossed.label(), side.as_str());
        self.emit(GameEvent::TermCrossed {
            term: crossed.id,
            to: side,
            coefficient: crossed.coefficient,
        });
        self.derive_status();
        DragOutcome::Crossed { term: crossed }
    }

    /// Check a reported overlap: must be another live card of the same kind on `side`
    fn merge_target(&self, moved: &Term, candidate: TermId, side: Side) -> Result<Term, MoveError> {
        if candidate == moved.id {
            return Err(MoveError::SameTerm(candidate));
        }
        let target = self
            .equation
            .get(candidate)
            .copied()
            .ok_or(MoveError::UnknownTerm(candidate))?;
        if target.side != side || target.has_variable != moved.has_variable {
            return Err(MoveError::IncompatibleTerms(moved.id, candidate));
        }
        Ok(target)
    }

    /// Player's answer for `a + b`
    pub fn submit_merge(&mut self, a: TermId, b: TermId, sum: &Entry) -> SubmitOutcome {
        if self.is_won() {
            return SubmitOutcome::rejected(&MoveError::AlreadySolved);
        }
        let pending = self
            .pending_merge
            .filter(|p| p.moved == a && p.target == b);

        let (moved, target) = match self.merge_pair(a, b, pending) {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("Merge {} + {} refused: {}", a, b, err);
                return SubmitOutcome::rejected(&err);
            }
        };

        let (moved_coefficient, side) = match pending {
            Some(p) => (p.effective_coefficient, p.side),
            None => (moved.coefficient, target.side),
        };
        let expected = moved_coefficient + target.coefficient;

        if sum.as_integer() != Some(expected) {
            let err = if sum.is_invalid() {
                MoveError::InvalidNumericInput(sum.to_string())
            } else {
                MoveError::WrongMergeSum {
                    proposed: sum.to_string(),
                }
            };
            log::debug!("Wrong merge answer {} (expected {})", sum, expected);
            return self.reject_merge(err, pending.is_some());
        }

        let created = self.next_term_id();
        let merged = Term {
            id: created,
            coefficient: expected,
            has_variable: expected != 0 && moved.has_variable,
            side,
        };
        self.equation.replace_pair(moved.id, target.id, merged);

        // Drop any dialog that referred to the consumed cards
        if let Some(open) = self.pending_merge {
            if [open.moved, open.target].iter().any(|id| *id == a || *id == b) {
                self.clear_negotiation();
            }
        }
        self.last_error = None;

        if expected == 0 {
            log::debug!("{} and {} cancelled out", moved.label(), target.label());
            self.emit(GameEvent::PairCancelled { removed: [a, b] });
        } else {
            log::debug!("Merged into {}", merged.label());
            self.emit(GameEvent::TermsMerged {
                removed: [a, b],
                created,
                coefficient: expected,
            });
        }

        let score_before = self.score;
        self.derive_status();
        SubmitOutcome::accepted(self, self.score - score_before)
    }

    /// Resolve both cards of a merge, checking they can be added together
    fn merge_pair(
        &self,
        a: TermId,
        b: TermId,
        pending: Option<PendingMerge>,
    ) -> Result<(Term, Term), MoveError> {
        if a == b {
            return Err(MoveError::SameTerm(a));
        }
        let moved = self.equation.get(a).copied().ok_or(MoveError::UnknownTerm(a))?;
        let target = self.equation.get(b).copied().ok_or(MoveError::UnknownTerm(b))?;
        let compatible = match pending {
            // The moved card has not crossed yet; it joins the target's side
            Some(p) => target.side == p.side && moved.has_variable == target.has_variable,
            None => moved.is_like(&target),
        };
        if !compatible {
            return Err(MoveError::IncompatibleTerms(a, b));
        }
        Ok((moved, target))
    }

    fn reject_merge(&mut self, err: MoveError, keep_dialog: bool) -> SubmitOutcome {
        self.score += err.score_delta();
        let report = err.report();
        if keep_dialog {
            // Retry or close is possible until the timer fires
            let due_ms = self.clock_ms.saturating_add(self.settings.merge_error_dismiss_ms);
            self.dismiss_timer = Some(DismissTimer { due_ms });
        }
        self.last_error = Some(report.clone());
        self.emit(GameEvent::MergeRejected {
            kind: report.kind,
            score_delta: err.score_delta(),
        });
        SubmitOutcome::rejected(&err)
    }

    /// Player's answer for the divide step
    pub fn submit_division(&mut self, divisor: &Entry, result: &Entry) -> SubmitOutcome {
        let GameStatus::DivisionReady {
            divisor: expected_divisor,
            dividend,
        } = self.status
        else {
            let err = if self.is_won() {
                MoveError::AlreadySolved
            } else {
                MoveError::NotDivisionReady
            };
            return SubmitOutcome::rejected(&err);
        };

        let divisor_ok = divisor.as_integer() == Some(expected_divisor);
        // Exact: result * divisor must reproduce the dividend
        let result_ok = result
            .as_integer()
            .and_then(|r| r.checked_mul(expected_divisor))
            == Some(dividend);

        if divisor_ok && result_ok {
            let quotient = dividend / expected_divisor;
            self.equation.collapse_to(quotient);
            self.last_error = None;
            log::debug!("Divided by {}: {}", expected_divisor, self.equation);
            self.emit(GameEvent::DivisionApplied {
                divisor: expected_divisor,
                result: quotient,
            });
            let score_before = self.score;
            self.derive_status();
            return SubmitOutcome::accepted(self, self.score - score_before);
        }

        let err = if divisor.is_invalid() {
            MoveError::InvalidNumericInput(divisor.to_string())
        } else if result.is_invalid() {
            MoveError::InvalidNumericInput(result.to_string())
        } else if !divisor_ok && !result_ok {
            MoveError::WrongDivisorAndResult {
                divisor: divisor.to_string(),
                result: result.to_string(),
            }
        } else if !divisor_ok {
            MoveError::WrongDivisor {
                proposed: divisor.to_string(),
            }
        } else {
            MoveError::WrongDivisionResult {
                divisor: expected_divisor,
                dividend,
                proposed: result.to_string(),
            }
        };
        log::debug!("Division rejected: {}", err);

        self.score += err.score_delta();
        let report = err.report();
        self.last_error = Some(report.clone());
        self.emit(GameEvent::DivisionRejected {
            kind: report.kind,
            score_delta: err.score_delta(),
        });
        SubmitOutcome::rejected(&err)
    }

    /// Close the merge dialog without answering. Returns false if none was open.
    pub fn cancel_merge(&mut self) -> bool {
        let Some(pending) = self.pending_merge else {
            return false;
        };
        self.clear_negotiation();
        self.last_error = None;
        self.emit(GameEvent::MergeCancelled {
            moved: pending.moved,
            target: pending.target,
        });
        true
    }

    /// Advance the engine clock, firing the merge dismiss timer when due.
    /// Returns true if a failed merge was dismissed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.clock_ms = self.clock_ms.max(now_ms);
        let Some(timer) = self.dismiss_timer else {
            return false;
        };
        if timer.due_ms > self.clock_ms {
            return false;
        }

        let pending = self.pending_merge;
        self.clear_negotiation();
        self.last_error = None;
        if let Some(pending) = pending {
            log::debug!("Dismissed failed merge {} -> {}", pending.moved, pending.target);
            self.emit(GameEvent::MergeDismissed {
                moved: pending.moved,
                target: pending.target,
            });
        }
        true
    }
}
