//! Additive dice notation: `2d6 + 1d8 + 4`.
//!
//! An expression is a `+`-separated list of terms. A term containing `d` is
//! a die term (`NdS`, `dS`); anything else is a flat modifier. There is no
//! subtraction, grouping, or multiplication.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{AdMode, DieSource};

/// Upper bound on dice rolled for a single term.
pub const MAX_DICE_PER_TERM: u32 = 1_000;

/// Largest flat modifier magnitude accepted in a single term.
pub const MAX_MODIFIER: i64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed dice term '{term}': side count must be a number")]
    MalformedDie { term: String },
    #[error("malformed dice term '{term}': a die needs at least one side")]
    ZeroSides { term: String },
    #[error("dice term '{term}' rolls more than {} dice", MAX_DICE_PER_TERM)]
    TooManyDice { term: String },
    #[error("modifier '{term}' exceeds {} in magnitude", MAX_MODIFIER)]
    ModifierOutOfRange { term: String },
}

impl ParseError {
    /// The offending term, as written after whitespace removal.
    pub fn term(&self) -> &str {
        match self {
            ParseError::MalformedDie { term }
            | ParseError::ZeroSides { term }
            | ParseError::TooManyDice { term }
            | ParseError::ModifierOutOfRange { term } => term,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiceTerm {
    Dice { count: u32, sides: u32 },
    Modifier(i64),
}

impl DiceTerm {
    /// Smallest and largest contribution under [`AdMode::Normal`].
    pub fn bounds(&self) -> (i64, i64) {
        match *self {
            DiceTerm::Dice { count, sides } => (count as i64, count as i64 * sides as i64),
            DiceTerm::Modifier(m) => (m, m),
        }
    }

    /// True when advantage/disadvantage applies to this term.
    pub fn is_single_d20(&self) -> bool {
        matches!(self, DiceTerm::Dice { count: 1, sides: 20 })
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceTerm::Dice { count, sides } => write!(f, "{}d{}", count, sides),
            DiceTerm::Modifier(m) => write!(f, "{}", m),
        }
    }
}

/// A parsed expression; terms keep their source text for the breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    terms: Vec<(String, DiceTerm)>,
}

impl Expression {
    pub fn terms(&self) -> impl Iterator<Item = &DiceTerm> + '_ {
        self.terms.iter().map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn bounds(&self) -> (i64, i64) {
        self.terms().fold((0, 0), |(lo, hi), t| {
            let (a, b) = t.bounds();
            (lo.saturating_add(a), hi.saturating_add(b))
        })
    }

    /// Roll every term once. Parsing already succeeded, so this cannot fail.
    pub fn evaluate(&self, mode: AdMode, source: &mut impl DieSource) -> RollResult {
        let mut total = 0i64;
        let mut details = Vec::with_capacity(self.terms.len());

        for (text, term) in &self.terms {
            match *term {
                DiceTerm::Dice { .. } if term.is_single_d20() && mode != AdMode::Normal => {
                    let a = source.roll_die(20);
                    let b = source.roll_die(20);
                    let kept = match mode {
                        AdMode::Disadvantage => a.min(b),
                        _ => a.max(b),
                    };
                    total = total.saturating_add(kept as i64);
                    details.push(format!("{} ({}, {}) -> {}", text, a, b, kept));
                }
                DiceTerm::Dice { count, sides } => {
                    let rolls: Vec<u32> = (0..count).map(|_| source.roll_die(sides)).collect();
                    let sub: i64 = rolls.iter().map(|&r| r as i64).sum();
                    total = total.saturating_add(sub);
                    let joined = rolls
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    details.push(format!("{} ({}) = {}", text, joined, sub));
                }
                DiceTerm::Modifier(m) => {
                    total = total.saturating_add(m);
                    if m != 0 {
                        details.push(text.clone());
                    }
                }
            }
        }

        tracing::trace!(total, terms = self.terms.len(), ?mode, "rolled expression");
        RollResult { total, details }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollResult {
    pub total: i64,
    pub details: Vec<String>,
}

impl RollResult {
    /// Per-term details joined the way the roller displays them.
    pub fn breakdown(&self) -> String {
        self.details.join(" + ")
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {}\nDetails: {}", self.total, self.breakdown())
    }
}

/// Parse the whole expression up front; nothing is rolled here.
pub fn parse(expression: &str) -> Result<Expression, ParseError> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let terms = compact
        .split('+')
        .map(|raw| parse_term(raw).map(|t| (raw.to_string(), t)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression { terms })
}

/// Parse then roll. A malformed term fails the whole expression before any die is rolled.
pub fn evaluate(
    expression: &str,
    mode: AdMode,
    source: &mut impl DieSource,
) -> Result<RollResult, ParseError> {
    Ok(parse(expression)?.evaluate(mode, source))
}

fn parse_term(raw: &str) -> Result<DiceTerm, ParseError> {
    let Some((count, sides)) = raw.split_once('d') else {
        // Empty segments (`1d4+`, `++`) land here and read as +0.
        return leading_int(raw)
            .map(DiceTerm::Modifier)
            .ok_or_else(|| ParseError::ModifierOutOfRange { term: raw.to_string() });
    };

    let malformed = || ParseError::MalformedDie { term: raw.to_string() };

    if sides.is_empty() || !sides.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let sides: u32 = sides.parse().map_err(|_| malformed())?;
    if sides == 0 {
        return Err(ParseError::ZeroSides { term: raw.to_string() });
    }

    let count = if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) {
        count.parse::<u32>().map_err(|_| malformed())?
    } else {
        1
    };
    if count > MAX_DICE_PER_TERM {
        return Err(ParseError::TooManyDice { term: raw.to_string() });
    }

    Ok(DiceTerm::Dice { count, sides })
}

/// Optional sign followed by leading digits; anything unreadable is 0.
/// `None` when the digits exceed [`MAX_MODIFIER`].
fn leading_int(s: &str) -> Option<i64> {
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return Some(0);
    }
    let value = rest[..end]
        .parse::<i64>()
        .ok()
        .filter(|v| *v <= MAX_MODIFIER)?;
    Some(if neg { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dice;
    use proptest::prelude::*;

    #[test]
    fn count_defaults_to_one() {
        let e = parse("d8").unwrap();
        assert_eq!(e.terms().next(), Some(&DiceTerm::Dice { count: 1, sides: 8 }));
    }

    #[test]
    fn non_numeric_count_defaults_to_one() {
        let e = parse("xd6").unwrap();
        assert_eq!(e.terms().next(), Some(&DiceTerm::Dice { count: 1, sides: 6 }));
    }

    #[test]
    fn split_at_first_d_only() {
        let err = parse("2d6d8").unwrap_err();
        assert_eq!(err, ParseError::MalformedDie { term: "2d6d8".into() });
    }

    #[test]
    fn leading_int_reads_prefix() {
        assert_eq!(leading_int("4"), Some(4));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("7abc"), Some(7));
        assert_eq!(leading_int("abc"), Some(0));
        assert_eq!(leading_int(""), Some(0));
        assert_eq!(leading_int("-"), Some(0));
        assert_eq!(leading_int("1000000000"), Some(MAX_MODIFIER));
        assert_eq!(leading_int("-1000000001"), None);
        assert_eq!(leading_int("99999999999999999999"), None);
    }

    #[test]
    fn zero_sides_is_rejected() {
        assert!(matches!(parse("1d0"), Err(ParseError::ZeroSides { .. })));
    }

    #[test]
    fn huge_count_is_rejected() {
        assert!(matches!(parse("5000d6"), Err(ParseError::TooManyDice { .. })));
        assert!(matches!(parse("99999999999d6"), Err(ParseError::MalformedDie { .. })));
    }

    #[test]
    fn display_matches_roller_output() {
        let mut dice = Dice::from_scripted(vec![3, 5, 7]);
        let res = evaluate("2d6 + 1d8 + 4", AdMode::Normal, &mut dice).unwrap();
        insta::assert_snapshot!(res.to_string(), @r"
        Total: 19
        Details: 2d6 (3, 5) = 8 + 1d8 (7) = 7 + 4
        ");
    }

    proptest! {
        #[test]
        fn modifiers_only_sum(mods in prop::collection::vec(-50i64..50, 1..8)) {
            let expr = mods.iter().map(|m| m.to_string()).collect::<Vec<_>>().join("+");
            let mut dice = Dice::from_seed(1);
            let res = evaluate(&expr, AdMode::Normal, &mut dice).unwrap();
            prop_assert_eq!(res.total, mods.iter().sum::<i64>());
            let shown: Vec<String> = mods.iter().filter(|m| **m != 0).map(|m| m.to_string()).collect();
            prop_assert_eq!(res.details, shown);
        }

        #[test]
        fn dice_stay_in_bounds(count in 0u32..30, sides in 1u32..100, seed: u64) {
            let expr = format!("{}d{}", count, sides);
            let mut dice = Dice::from_seed(seed);
            let res = evaluate(&expr, AdMode::Normal, &mut dice).unwrap();
            let (lo, hi) = parse(&expr).unwrap().bounds();
            prop_assert!(res.total >= lo && res.total <= hi);
            prop_assert_eq!(lo, count as i64);
            prop_assert_eq!(hi, count as i64 * sides as i64);
        }
    }
}
