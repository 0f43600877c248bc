//! Terms and equations
//!
//! A term is one addend (`coefficient` or `coefficient * x`) sitting on one
//! side of the equals sign. An equation is the live set of terms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of `=` a term sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other side of the equals sign
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Side::Left),
            "right" | "r" => Some(Side::Right),
            _ => None,
        }
    }
}

/// Opaque term identifier, unique for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u32);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh term ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next_id: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator whose first id comes after `last`
    pub fn after(last: TermId) -> Self {
        Self {
            next_id: last.0.saturating_add(1),
        }
    }

    /// Allocate a new term ID
    pub fn next_id(&mut self) -> TermId {
        let id = self.next_id;
        self.next_id += 1;
        TermId(id)
    }
}

/// One addend of the equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: TermId,
    pub coefficient: i64,
    /// `true` means `coefficient * x`, `false` a bare constant
    pub has_variable: bool,
    pub side: Side,
}

impl Term {
    pub fn variable(id: TermId, coefficient: i64, side: Side) -> Self {
        Self {
            id,
            coefficient,
            has_variable: true,
            side,
        }
    }

    pub fn constant(id: TermId, coefficient: i64, side: Side) -> Self {
        Self {
            id,
            coefficient,
            has_variable: false,
            side,
        }
    }

    /// Value of this term at `x`
    #[inline]
    pub fn value_at(&self, x: i64) -> i64 {
        if self.has_variable {
            self.coefficient * x
        } else {
            self.coefficient
        }
    }

    /// Coefficient this term would carry on `side` (negated when it crosses)
    #[inline]
    pub fn coefficient_on(&self, side: Side) -> i64 {
        if side == self.side {
            self.coefficient
        } else {
            -self.coefficient
        }
    }

    /// Move the term to `side`, flipping its sign if it crosses the equals sign.
    /// Returns true if the term actually changed sides.
    pub fn cross_to(&mut self, side: Side) -> bool {
        if side == self.side {
            return false;
        }
        self.coefficient = -self.coefficient;
        self.side = side;
        true
    }

    /// Whether two terms can be added together (same side, same kind)
    pub fn is_like(&self, other: &Term) -> bool {
        self.side == other.side && self.has_variable == other.has_variable
    }

    /// Card label, e.g. `x`, `-x`, `3x`, `-7`
    pub fn label(&self) -> String {
        if self.has_variable {
            match self.coefficient {
                1 => "x".to_string(),
                -1 => "-x".to_string(),
                c => format!("{c}x"),
            }
        } else {
            self.coefficient.to_string()
        }
    }

    /// Label without sign, used after an explicit `+`/`-` joiner
    fn magnitude_label(&self) -> String {
        let magnitude = self.coefficient.unsigned_abs();
        if self.has_variable {
            if magnitude == 1 {
                "x".to_string()
            } else {
                format!("{magnitude}x")
            }
        } else {
            magnitude.to_string()
        }
    }
}

/// The live set of terms (vector order is display order)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Equation {
    terms: Vec<Term>,
}

impl Equation {
    /// Build an equation, dropping any zero-coefficient terms
    pub fn new(terms: Vec<Term>) -> Self {
        let mut equation = Self { terms };
        equation.prune_zero_terms();
        equation
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TermId) -> Option<&mut Term> {
        self.terms.iter_mut().find(|t| t.id == id)
    }

    fn position(&self, id: TermId) -> Option<usize> {
        self.terms.iter().position(|t| t.id == id)
    }

    /// Terms on one side, in display order
    pub fn side(&self, side: Side) -> impl Iterator<Item = &Term> {
        self.terms.iter().filter(move |t| t.side == side)
    }

    /// Remove `removed`, and put `replacement` where `slot` was.
    /// Both ids must exist; the replacement is dropped if its coefficient is 0.
    pub(crate) fn replace_pair(&mut self, removed: TermId, slot: TermId, replacement: Term) {
        if let Some(index) = self.position(slot) {
            self.terms[index] = replacement;
        }
        if let Some(index) = self.position(removed) {
            self.terms.remove(index);
        }
        self.prune_zero_terms();
    }

    /// Rewrite every coefficient: variable terms become 1, constants become `value`
    pub(crate) fn collapse_to(&mut self, value: i64) {
        for term in &mut self.terms {
            term.coefficient = if term.has_variable { 1 } else { value };
        }
        self.prune_zero_terms();
    }

    /// Drop terms whose coefficient reached 0
    pub fn prune_zero_terms(&mut self) {
        self.terms.retain(|t| t.coefficient != 0);
    }

    /// `left(x) - right(x)`; zero when `x` solves the equation
    pub fn residual(&self, x: i64) -> i64 {
        self.terms
            .iter()
            .map(|t| match t.side {
                Side::Left => t.value_at(x),
                Side::Right => -t.value_at(x),
            })
            .sum()
    }

    /// Net coefficient of x once everything is gathered on the left
    pub fn net_variable_coefficient(&self) -> i64 {
        self.terms
            .iter()
            .filter(|t| t.has_variable)
            .map(|t| t.coefficient_on(Side::Left))
            .sum()
    }

    /// Net constant once everything is gathered on the right
    pub fn net_constant(&self) -> i64 {
        self.terms
            .iter()
            .filter(|t| !t.has_variable)
            .map(|t| t.coefficient_on(Side::Right))
            .sum()
    }

    /// The integer solution, if the equation has exactly one and it is integral
    pub fn solution(&self) -> Option<i64> {
        let k = self.net_variable_coefficient();
        let c = self.net_constant();
        if k == 0 || c % k != 0 {
            return None;
        }
        Some(c / k)
    }

    fn format_side(&self, side: Side) -> String {
        let mut out = String::new();
        for (i, term) in self.side(side).enumerate() {
            if i == 0 {
                out.push_str(&term.label());
            } else {
                out.push_str(if term.coefficient < 0 { " - " } else { " + " });
                out.push_str(&term.magnitude_label());
            }
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}",
            self.format_side(Side::Left),
            self.format_side(Side::Right)
        )
    }
}
