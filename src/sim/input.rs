//! Inputs the engine consumes
//!
//! The UI turns gestures and form submissions into these. Form text is parsed
//! into an [`Entry`] before it reaches the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::term::{Side, TermId};

/// A parsed numeric form entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Entry {
    /// Whole number (`"-3"`, `"4.0"`)
    Integer(i64),
    /// Finite number with a fractional part (`"-4.5"`)
    NonInteger(f64),
    /// Not a number at all; keeps the raw text for the error message
    Invalid(String),
}

impl Entry {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Ok(value) = text.parse::<i64>() {
            return Entry::Integer(value);
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    Entry::Integer(value as i64)
                } else {
                    Entry::NonInteger(value)
                }
            }
            _ => Entry::Invalid(text.to_string()),
        }
    }

    /// The value if this entry is a whole number
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Entry::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Entry::Invalid(_))
    }
}

impl From<i64> for Entry {
    fn from(value: i64) -> Self {
        Entry::Integer(value)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Integer(value) => write!(f, "{value}"),
            Entry::NonInteger(value) => write!(f, "{value}"),
            Entry::Invalid(text) => write!(f, "{text}"),
        }
    }
}

/// One engine event (processed strictly in arrival order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameInput {
    /// New game: score and solved count back to zero
    StartGame { difficulty: f64 },
    /// Skip or move on to the next equation
    Reset,
    /// A card was dropped on `side`, possibly overlapping another card
    #[serde(rename_all = "camelCase")]
    DragEnded {
        term: TermId,
        side: Side,
        #[serde(default)]
        overlapping: Option<TermId>,
    },
    /// Answer to the merge dialog: `a + b = sum`
    SubmitMerge { a: TermId, b: TermId, sum: Entry },
    /// Answer to the divide dialog
    SubmitDivision { divisor: Entry, result: Entry },
    /// Merge dialog closed without answering
    CancelMerge,
    /// Advance the engine clock
    #[serde(rename_all = "camelCase")]
    Tick { now_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        assert_eq!(Entry::parse(" -3 "), Entry::Integer(-3));
        assert_eq!(Entry::parse("4.0"), Entry::Integer(4));
        assert_eq!(Entry::parse("-4.5"), Entry::NonInteger(-4.5));
        assert_eq!(Entry::parse("seven"), Entry::Invalid("seven".into()));
        assert_eq!(Entry::parse(""), Entry::Invalid(String::new()));
        assert!(Entry::parse("NaN").is_invalid());
        assert!(Entry::parse("inf").is_invalid());
        assert_eq!(Entry::parse("12").as_integer(), Some(12));
        assert_eq!(Entry::parse("1.5").as_integer(), None);
    }

    #[test]
    fn test_input_from_json() {
        let input: GameInput = serde_json::from_str(
            r#"{"type":"dragEnded","term":3,"side":"right","overlapping":5}"#,
        )
        .unwrap();
        assert_eq!(
            input,
            GameInput::DragEnded {
                term: TermId(3),
                side: Side::Right,
                overlapping: Some(TermId(5)),
            }
        );

        let input: GameInput =
            serde_json::from_str(r#"{"type":"dragEnded","term":3,"side":"left"}"#).unwrap();
        assert!(matches!(input, GameInput::DragEnded { overlapping: None, .. }));

        let input: GameInput = serde_json::from_str(
            r#"{"type":"submitMerge","a":1,"b":2,"sum":{"kind":"integer","value":-2}}"#,
        )
        .unwrap();
        assert_eq!(
            input,
            GameInput::SubmitMerge {
                a: TermId(1),
                b: TermId(2),
                sum: Entry::Integer(-2),
            }
        );

        let input: GameInput = serde_json::from_str(r#"{"type":"tick","nowMs":1500}"#).unwrap();
        assert_eq!(input, GameInput::Tick { now_ms: 1500 });
    }
}
