//! Game state and core engine types
//!
//! Everything the reducer reads or writes lives here. Transient UI state
//! (form strings, drag pixels) never does.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::generator::{Level, generate};
use super::term::{Equation, IdAllocator, Side, Term, TermId};
use crate::consts::*;
use crate::error::ErrorReport;
use crate::settings::Settings;

/// Difficulty scalar (>= 1), controls magnitudes and which mechanics appear
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(f64);

impl Default for Difficulty {
    fn default() -> Self {
        Self(BASE_DIFFICULTY)
    }
}

impl Difficulty {
    /// Clamp into `BASE_DIFFICULTY..=MAX_DIFFICULTY`
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(BASE_DIFFICULTY, MAX_DIFFICULTY))
        } else {
            Self::default()
        }
    }

    /// Difficulty reached after `solved` equations starting from `base`
    pub fn for_progress(base: Difficulty, solved: u32) -> Self {
        let steps = solved / SOLVES_PER_STEP;
        Self::new(base.0 + steps as f64 * DIFFICULTY_STEP)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// x ends with coefficient 1, so no divide step is needed
    pub fn unit_coefficient_only(&self) -> bool {
        self.0 <= UNIT_COEFFICIENT_MAX_DIFFICULTY + DIFFICULTY_EPSILON
    }

    /// Raw terms may be split into two cards
    pub fn splits_terms(&self) -> bool {
        self.0 > SPLIT_MIN_DIFFICULTY + DIFFICULTY_EPSILON
    }
}

/// Derived status of the live equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameStatus {
    /// Terms still need crossing or merging
    Playing,
    /// Equation reads `divisor * x = dividend` with `divisor != 1`
    DivisionReady { divisor: i64, dividend: i64 },
    /// Equation reads `x = value`; frozen until reset
    Won,
}

/// Open merge dialog between a dropped card and the card it landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMerge {
    /// Card the player dragged
    pub moved: TermId,
    /// Card it was dropped onto
    pub target: TermId,
    /// Coefficient the moved card carries on the target's side
    pub effective_coefficient: i64,
    /// Side the merged term ends up on
    pub side: Side,
}

/// Deferred auto-dismiss of a failed merge (engine clock, milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissTimer {
    pub due_ms: u64,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live equation
    pub(crate) equation: Equation,
    /// Answer the current equation was generated for
    pub(crate) answer: Option<i64>,
    /// Score (may go negative)
    pub score: i64,
    /// Equations solved so far
    pub solved_count: u32,
    /// Difficulty the game started at
    pub base_difficulty: Difficulty,
    pub(crate) status: GameStatus,
    pub(crate) pending_merge: Option<PendingMerge>,
    pub(crate) dismiss_timer: Option<DismissTimer>,
    pub(crate) last_error: Option<ErrorReport>,
    /// Engine clock (ms), advanced by ticks
    pub(crate) clock_ms: u64,
    pub(crate) settings: Settings,
    pub(crate) events: Vec<GameEvent>,
    rng: Pcg32,
    ids: IdAllocator,
}

impl GameState {
    /// Create a new game with the given seed and a freshly generated equation
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    /// New game starting at the settings' difficulty
    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let mut state = Self::empty(seed, settings);
        state.base_difficulty = Difficulty::new(state.settings.start_difficulty);
        state.next_equation();
        state
    }

    /// Start from a fixed set of terms instead of a generated one.
    /// Ids of the given terms are kept; later ids are allocated above them.
    pub fn from_terms(terms: Vec<Term>) -> Self {
        let mut state = Self::empty(0, Settings::default());
        let max_id = terms.iter().map(|t| t.id.0).max().unwrap_or(0);
        state.ids = IdAllocator::after(TermId(max_id));
        state.equation = Equation::new(terms);
        state.answer = state.equation.solution();
        state.status = Self::status_of(&state.equation);
        state
    }

    fn empty(seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            equation: Equation::default(),
            answer: None,
            score: 0,
            solved_count: 0,
            base_difficulty: Difficulty::default(),
            status: GameStatus::Playing,
            pending_merge: None,
            dismiss_timer: None,
            last_error: None,
            clock_ms: 0,
            settings,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ids: IdAllocator::new(),
        }
    }

    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    pub fn terms(&self) -> &[Term] {
        self.equation.terms()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    /// Answer the current equation was generated for (or solved to, for fixed terms)
    pub fn answer(&self) -> Option<i64> {
        self.answer
    }

    pub fn pending_merge(&self) -> Option<PendingMerge> {
        self.pending_merge
    }

    pub fn dismiss_timer(&self) -> Option<DismissTimer> {
        self.dismiss_timer
    }

    pub fn last_error(&self) -> Option<&ErrorReport> {
        self.last_error.as_ref()
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap UX settings mid-game; the live equation and score stay
    pub fn set_settings(&mut self, settings: Settings) {
        log::info!("Settings updated");
        self.settings = settings;
    }

    /// Current difficulty (steps up every few solved equations)
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_progress(self.base_difficulty, self.solved_count)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Allocate a new term ID
    pub(crate) fn next_term_id(&mut self) -> TermId {
        self.ids.next_id()
    }

    /// Replace the equation with a fresh one at the current difficulty.
    /// Clears won/division-ready, any open merge and any surfaced error.
    pub(crate) fn next_equation(&mut self) {
        let difficulty = self.difficulty();
        let Level { equation, answer } = generate(difficulty, &mut self.rng, &mut self.ids);
        log::info!(
            "New equation (difficulty {:.1}): {}",
            difficulty.value(),
            equation
        );
        self.equation = equation;
        self.answer = Some(answer);
        self.status = GameStatus::Playing;
        self.clear_negotiation();
        self.last_error = None;
        self.emit(GameEvent::EquationGenerated {
            difficulty: difficulty.value(),
            term_count: self.equation.len(),
        });
        self.derive_status();
    }

    /// Drop the open merge dialog and its dismiss timer
    pub(crate) fn clear_negotiation(&mut self) {
        self.pending_merge = None;
        self.dismiss_timer = None;
    }

    /// Status implied by the live terms alone (side-effect free)
    pub fn status_of(equation: &Equation) -> GameStatus {
        let terms = equation.terms();
        let solved_form = match terms {
            // kx = c (either way round)
            [a, b] if a.side != b.side && a.has_variable != b.has_variable => {
                let (var, constant) = if a.has_variable { (a, b) } else { (b, a) };
                Some((var.coefficient, constant.coefficient))
            }
            // kx = 0: zero terms are pruned, so x = 0 would otherwise never finish
            [a] if a.has_variable => Some((a.coefficient, 0)),
            _ => None,
        };

        match solved_form {
            Some((1, _)) => GameStatus::Won,
            Some((divisor, dividend)) => GameStatus::DivisionReady { divisor, dividend },
            None => GameStatus::Playing,
        }
    }

    /// Re-derive status after a mutation of the terms.
    /// Entering `Won` awards the solve exactly once.
    pub(crate) fn derive_status(&mut self) {
        if self.status == GameStatus::Won {
            return;
        }
        let next = Self::status_of(&self.equation);
        if next == self.status {
            return;
        }
        self.status = next;

        match next {
            GameStatus::Won => {
                self.score += WIN_REWARD;
                self.solved_count += 1;
                self.clear_negotiation();
                log::info!(
                    "Solved {} (score {}, solved {})",
                    self.equation,
                    self.score,
                    self.solved_count
                );
                self.emit(GameEvent::Solved {
                    score: self.score,
                    solved_count: self.solved_count,
                });
            }
            GameStatus::DivisionReady { divisor, dividend } => {
                log::debug!("Division ready: {}x = {}", divisor, dividend);
                self.emit(GameEvent::DivisionReady { divisor, dividend });
            }
            GameStatus::Playing => {}
        }
    }
}
