//! Engine events for the UI (animation and sound cues)

use serde::{Deserialize, Serialize};

use super::term::{Side, TermId};
use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    EquationGenerated { difficulty: f64, term_count: usize },
    /// Card moved across the equals sign (coefficient is the new, flipped value)
    TermCrossed {
        term: TermId,
        to: Side,
        coefficient: i64,
    },
    #[serde(rename_all = "camelCase")]
    MergeOpened {
        moved: TermId,
        target: TermId,
        effective_coefficient: i64,
    },
    TermsMerged {
        removed: [TermId; 2],
        created: TermId,
        coefficient: i64,
    },
    /// Two cards summed to zero and vanished
    PairCancelled { removed: [TermId; 2] },
    #[serde(rename_all = "camelCase")]
    MergeRejected { kind: ErrorKind, score_delta: i64 },
    /// Failed merge dialog closed by its timer
    MergeDismissed { moved: TermId, target: TermId },
    MergeCancelled { moved: TermId, target: TermId },
    DivisionReady { divisor: i64, dividend: i64 },
    DivisionApplied { divisor: i64, result: i64 },
    #[serde(rename_all = "camelCase")]
    DivisionRejected { kind: ErrorKind, score_delta: i64 },
    #[serde(rename_all = "camelCase")]
    Solved { score: i64, solved_count: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::sim::{Entry, GameState, Term};

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = GameEvent::MergeRejected {
            kind: ErrorKind::WrongMergeSum,
            score_delta: -2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "mergeRejected");
        assert_eq!(json["kind"], "wrongMergeSum");
        assert_eq!(json["scoreDelta"], -2);
        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_drained_events_serialize() {
        let mut state = GameState::from_terms(vec![
            Term::variable(TermId(1), 2, Side::Left),
            Term::variable(TermId(2), 1, Side::Right),
            Term::constant(TermId(3), 3, Side::Right),
        ]);
        state.drag_ended(TermId(2), Side::Left, Some(TermId(1)));
        state.submit_merge(TermId(2), TermId(1), &Entry::Integer(7));
        state.submit_merge(TermId(2), TermId(1), &Entry::Integer(1));
        state.submit_division(&Entry::Integer(2), &Entry::Integer(1));

        let events = state.drain_events();
        assert!(state.drain_events().is_empty());
        let json = serde_json::to_value(&events).unwrap();
        let types: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap())
            .collect();
        assert_eq!(types, ["mergeOpened", "mergeRejected", "termsMerged", "solved"]);
        assert_eq!(json[1]["kind"], "wrongMergeSum");
    }
}
