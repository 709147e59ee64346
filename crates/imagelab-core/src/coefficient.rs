//! Kernel mask coefficients entered as free-form text.
//!
//! Users type coefficients as integers (`-1`), decimals (`0.25`), or
//! fractions (`1/16`).  [`Coefficient::parse`] classifies the text into
//! an explicit variant and [`Coefficient::value`] reduces it to a finite
//! `f64`.  Neither step fails: text that cannot be understood reduces to
//! zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single kernel coefficient in the form the user wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coefficient {
    /// Whole number, e.g. `5` or `-1`.
    Integer(i64),
    /// Decimal number, e.g. `0.0625`.
    Decimal(f64),
    /// Quotient of two numbers, e.g. `1/16`.
    Fraction {
        /// Value before the `/`.
        numerator: f64,
        /// Value after the `/`.  May be zero, in which case the
        /// coefficient reduces to zero.
        denominator: f64,
    },
}

impl Coefficient {
    /// The coefficient every unparseable input collapses to.
    pub const ZERO: Self = Self::Integer(0);

    /// Classify user-entered text.
    ///
    /// - `a/b` with both sides numeric becomes [`Coefficient::Fraction`]
    /// - text that parses as an `i64` becomes [`Coefficient::Integer`]
    /// - text that parses as a finite `f64` becomes [`Coefficient::Decimal`]
    /// - anything else (including the empty string) becomes [`Coefficient::ZERO`]
    ///
    /// Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if let Some((numerator, denominator)) = text.split_once('/') {
            return match (parse_finite(numerator), parse_finite(denominator)) {
                (Some(numerator), Some(denominator)) => Self::Fraction {
                    numerator,
                    denominator,
                },
                _ => Self::ZERO,
            };
        }

        if let Ok(n) = text.parse::<i64>() {
            return Self::Integer(n);
        }

        parse_finite(text).map_or(Self::ZERO, Self::Decimal)
    }

    /// Reduce to a finite floating-point value.
    ///
    /// A fraction with a zero denominator (or any other non-finite
    /// quotient) reduces to `0.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Decimal(x) => finite_or_zero(x),
            Self::Fraction {
                numerator,
                denominator,
            } => finite_or_zero(numerator / denominator),
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Coefficient {
    /// Wrap a numeric value, preferring the integer form when the value
    /// is whole so preset grids display as `1` rather than `1.0`.
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: f64) -> Self {
        let value = finite_or_zero(value);
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            Self::Integer(value as i64)
        } else {
            Self::Decimal(value)
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(x) => write!(f, "{x}"),
            Self::Fraction {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
        }
    }
}

/// Parse user-entered coefficient text straight to its numeric value.
///
/// Shorthand for `Coefficient::parse(text).value()`.
#[must_use]
pub fn parse(text: &str) -> f64 {
    Coefficient::parse(text).value()
}

/// `f64` parsing that rejects `inf`/`NaN` spellings.
fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fraction() {
        assert!((parse("3/4") - 0.75).abs() < f64::EPSILON);
        assert_eq!(
            Coefficient::parse("1/16"),
            Coefficient::Fraction {
                numerator: 1.0,
                denominator: 16.0
            }
        );
    }

    #[test]
    fn parses_negative_fraction() {
        assert!((parse("-1/8") + 0.125).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(Coefficient::parse(""), Coefficient::ZERO);
        assert!(parse("").abs() < f64::EPSILON);
        assert!(parse("   ").abs() < f64::EPSILON);
    }

    #[test]
    fn garbage_is_zero() {
        assert!(parse("abc").abs() < f64::EPSILON);
        assert!(parse("1/x").abs() < f64::EPSILON);
        assert!(parse("1/2/3").abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_prefixes_are_not_accepted() {
        for text in ["1.5abc", "2e", "0.5.", "3px", "1/2x"] {
            assert_eq!(Coefficient::parse(text), Coefficient::ZERO, "{text:?}");
        }
    }

    #[test]
    fn parses_integer() {
        assert_eq!(Coefficient::parse("2"), Coefficient::Integer(2));
        assert!((parse("2") - 2.0).abs() < f64::EPSILON);
        assert_eq!(Coefficient::parse(" -5 "), Coefficient::Integer(-5));
    }

    #[test]
    fn parses_decimal() {
        assert_eq!(Coefficient::parse("0.25"), Coefficient::Decimal(0.25));
        assert!((parse(".5") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_denominator_reduces_to_zero() {
        assert!(parse("1/0").abs() < f64::EPSILON);
        assert!(parse("0/0").abs() < f64::EPSILON);
        // The variant is still a fraction; only the reduction is zero.
        assert!(matches!(
            Coefficient::parse("5/0"),
            Coefficient::Fraction { .. }
        ));
    }

    #[test]
    fn non_finite_spellings_are_zero() {
        assert!(parse("inf").abs() < f64::EPSILON);
        assert!(parse("NaN").abs() < f64::EPSILON);
        assert!(parse("-infinity").abs() < f64::EPSILON);
    }

    #[test]
    fn from_whole_float_prefers_integer() {
        assert_eq!(Coefficient::from(5.0), Coefficient::Integer(5));
        assert_eq!(Coefficient::from(-1.0), Coefficient::Integer(-1));
        assert_eq!(Coefficient::from(0.5), Coefficient::Decimal(0.5));
        assert_eq!(Coefficient::from(f64::NAN), Coefficient::ZERO);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["3", "-0.5", "1/16"] {
            let c = Coefficient::parse(text);
            assert_eq!(Coefficient::parse(&c.to_string()), c);
        }
    }
}
