//! Card hit testing for the drag-and-drop UI
//!
//! The engine never looks at pixels. The UI uses these helpers to turn a drop
//! position into a side and at most one merge candidate, then hands the engine
//! plain ids.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Side, TermId};

/// Axis-aligned card bounds in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardRect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl CardRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h).max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Area shared with `other`
    pub fn intersection_area(&self, other: &CardRect) -> f32 {
        let overlap = (self.max().min(other.max()) - self.min.max(other.min)).max(Vec2::ZERO);
        overlap.x * overlap.y
    }
}

/// Fraction of `dragged`'s area covered by `target` (0 for a degenerate card)
pub fn overlap_ratio(dragged: &CardRect, target: &CardRect) -> f32 {
    let area = dragged.area();
    if area <= 0.0 {
        return 0.0;
    }
    dragged.intersection_area(target) / area
}

/// Equals line position for a board spanning `board_left..board_left + board_width`
pub fn midline_x(board_left: f32, board_width: f32, fraction: f32) -> f32 {
    board_left + board_width.max(0.0) * fraction
}

/// Side of the equals line a card centered at `center_x` lands on
pub fn resolve_side(center_x: f32, midline_x: f32) -> Side {
    if center_x < midline_x {
        Side::Left
    } else {
        Side::Right
    }
}

/// A card on the board as the UI sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedCard {
    pub id: TermId,
    pub rect: CardRect,
}

/// The card `dragged` should merge with, if any.
///
/// Only cards in `candidates` overlapping by more than `threshold` of the
/// dragged card's area qualify; the largest overlap wins and ties go to the
/// earliest card. The caller filters candidates to the drop side and kind.
pub fn find_merge_candidate(
    dragged_id: TermId,
    dragged: &CardRect,
    candidates: &[PlacedCard],
    threshold: f32,
) -> Option<TermId> {
    let mut best: Option<(TermId, f32)> = None;
    for card in candidates.iter().filter(|c| c.id != dragged_id) {
        let ratio = overlap_ratio(dragged, &card.rect);
        if ratio <= threshold {
            continue;
        }
        if best.is_none_or(|(_, best_ratio)| ratio > best_ratio) {
            best = Some((card.id, ratio));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32, x: f32, y: f32) -> PlacedCard {
        PlacedCard {
            id: TermId(id),
            rect: CardRect::new(x, y, 100.0, 60.0),
        }
    }

    #[test]
    fn test_overlap_ratio() {
        let a = CardRect::new(0.0, 0.0, 100.0, 60.0);
        assert_eq!(overlap_ratio(&a, &a), 1.0);
        let b = CardRect::new(50.0, 0.0, 100.0, 60.0);
        assert!((overlap_ratio(&a, &b) - 0.5).abs() < 1e-6);
        let c = CardRect::new(300.0, 0.0, 100.0, 60.0);
        assert_eq!(overlap_ratio(&a, &c), 0.0);
        let empty = CardRect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(overlap_ratio(&empty, &a), 0.0);
    }

    #[test]
    fn test_midline_from_fraction() {
        let settings = crate::Settings::default();
        assert_eq!(midline_x(100.0, 800.0, settings.midline_fraction), 500.0);
        assert_eq!(midline_x(0.0, 600.0, 0.25), 150.0);
        assert_eq!(midline_x(40.0, -10.0, 0.5), 40.0);
        assert_eq!(resolve_side(480.0, midline_x(100.0, 800.0, 0.5)), Side::Left);
    }

    #[test]
    fn test_resolve_side() {
        assert_eq!(resolve_side(100.0, 400.0), Side::Left);
        assert_eq!(resolve_side(500.0, 400.0), Side::Right);
        assert_eq!(resolve_side(400.0, 400.0), Side::Right);
    }

    #[test]
    fn test_merge_candidate_threshold() {
        let dragged = CardRect::new(0.0, 0.0, 100.0, 60.0);
        // 20% overlap: below the 30% threshold
        assert_eq!(
            find_merge_candidate(TermId(1), &dragged, &[card(2, 80.0, 0.0)], 0.3),
            None
        );
        // 40% overlap
        assert_eq!(
            find_merge_candidate(TermId(1), &dragged, &[card(2, 60.0, 0.0)], 0.3),
            Some(TermId(2))
        );
    }

    #[test]
    fn test_merge_candidate_picks_one() {
        let dragged = CardRect::new(0.0, 0.0, 100.0, 60.0);
        let cards = [card(1, 0.0, 0.0), card(2, 50.0, 0.0), card(3, -20.0, 0.0), card(4, 20.0, 0.0)];
        // Card 1 is the dragged card itself; 3 and 4 tie at 80%, first wins
        assert_eq!(
            find_merge_candidate(TermId(1), &dragged, &cards, 0.3),
            Some(TermId(3))
        );
    }
}
