//! Browser bindings
//!
//! Wraps the engine for JavaScript. Inputs arrive as plain numbers and form
//! strings; every result leaves as a JSON string.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::clock::now_ms;
use super::layout::{CardRect, PlacedCard, find_merge_candidate, midline_x, resolve_side};
use crate::settings::Settings;
use crate::sim::{Entry, GameInput, GameState, Side, TermId, apply};

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize response: {}", e);
        "null".to_string()
    })
}

/// One game instance owned by the page
#[wasm_bindgen]
pub struct EquationGame {
    state: GameState,
}

#[wasm_bindgen]
impl EquationGame {
    /// New game; a seed of 0 picks one from the settings or the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> EquationGame {
        let settings = Settings::load();
        let seed = match seed {
            0 => settings.seed.unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64),
            s => s as u64,
        };
        let state = GameState::with_settings(seed, settings);
        log::info!("Started new game with seed: {}", seed);
        EquationGame { state }
    }

    /// Current state as JSON (`GameSnapshot`)
    pub fn snapshot(&self) -> String {
        to_json(&self.state.snapshot())
    }

    pub fn equation(&self) -> String {
        self.state.equation().to_string()
    }

    /// Apply a JSON-encoded `GameInput`
    pub fn dispatch(&mut self, input_json: &str) -> String {
        match serde_json::from_str::<GameInput>(input_json) {
            Ok(input) => to_json(&apply(&mut self.state, input)),
            Err(e) => {
                log::warn!("Bad input {}: {}", input_json, e);
                "null".to_string()
            }
        }
    }

    pub fn start_game(&mut self, difficulty: f64) -> String {
        to_json(&apply(&mut self.state, GameInput::StartGame { difficulty }))
    }

    /// Skip to (or move on to) the next equation
    pub fn reset(&mut self) -> String {
        to_json(&apply(&mut self.state, GameInput::Reset))
    }

    /// Drop with ids already resolved by the page
    pub fn drag_ended(&mut self, term: u32, side: &str, overlapping: Option<u32>) -> String {
        let Some(side) = Side::from_str(side) else {
            log::warn!("Unknown side '{}'", side);
            return "null".to_string();
        };
        let input = GameInput::DragEnded {
            term: TermId(term),
            side,
            overlapping: overlapping.map(TermId),
        };
        to_json(&apply(&mut self.state, input))
    }

    /// Drop a card by geometry: `cards_json` is `[{id, rect: {min, size}}]` for
    /// every card on the board. The equals line sits at `midline_fraction` of
    /// the board's width.
    #[allow(clippy::too_many_arguments)]
    pub fn drop_card(
        &mut self,
        term: u32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        board_left: f32,
        board_width: f32,
        cards_json: &str,
    ) -> String {
        let cards: Vec<PlacedCard> = match serde_json::from_str(cards_json) {
            Ok(cards) => cards,
            Err(e) => {
                log::warn!("Bad card layout: {}", e);
                Vec::new()
            }
        };
        let dragged_id = TermId(term);
        let dragged = CardRect::new(x, y, w, h);
        let midline = midline_x(board_left, board_width, self.state.settings().midline_fraction);
        let side = resolve_side(dragged.center().x, midline);

        let kind = self.state.equation().get(dragged_id).map(|t| t.has_variable);
        let like: Vec<PlacedCard> = cards
            .into_iter()
            .filter(|c| {
                self.state
                    .equation()
                    .get(c.id)
                    .is_some_and(|t| t.side == side && Some(t.has_variable) == kind)
            })
            .collect();
        let threshold = self.state.settings().merge_overlap_threshold;
        let overlapping = find_merge_candidate(dragged_id, &dragged, &like, threshold);

        let input = GameInput::DragEnded {
            term: dragged_id,
            side,
            overlapping,
        };
        to_json(&apply(&mut self.state, input))
    }

    /// Merge dialog answer, as typed
    pub fn submit_merge(&mut self, a: u32, b: u32, sum: &str) -> String {
        let input = GameInput::SubmitMerge {
            a: TermId(a),
            b: TermId(b),
            sum: Entry::parse(sum),
        };
        to_json(&apply(&mut self.state, input))
    }

    /// Divide dialog answer, as typed
    pub fn submit_division(&mut self, divisor: &str, result: &str) -> String {
        let input = GameInput::SubmitDivision {
            divisor: Entry::parse(divisor),
            result: Entry::parse(result),
        };
        to_json(&apply(&mut self.state, input))
    }

    pub fn cancel_merge(&mut self) -> String {
        to_json(&apply(&mut self.state, GameInput::CancelMerge))
    }

    /// Call from the animation frame loop; closes failed merge dialogs when due
    pub fn tick(&mut self) -> String {
        to_json(&apply(&mut self.state, GameInput::Tick { now_ms: now_ms() }))
    }

    /// Current settings as JSON
    pub fn settings(&self) -> String {
        self.state.settings().to_json().unwrap_or_else(|e| {
            log::error!("{}", e);
            "null".to_string()
        })
    }

    /// Replace and persist the settings; returns false if the JSON is rejected
    pub fn update_settings(&mut self, settings_json: &str) -> bool {
        match Settings::from_json(settings_json) {
            Ok(settings) => {
                settings.save();
                self.state.set_settings(settings);
                true
            }
            Err(e) => {
                log::warn!("Settings not applied: {}", e);
                false
            }
        }
    }

    pub fn hint(&self) -> String {
        to_json(&self.state.hint())
    }

    /// Events since the last call, for animation and sound cues
    pub fn drain_events(&mut self) -> String {
        to_json(&self.state.drain_events())
    }
}
