//! Value coercion between field text and typed values.
//!
//! Every elementary (non-byte) field decodes through the same pipeline: the
//! raw slice is decoded to text with the configured charset, trimmed, and an
//! empty result is absence. Non-empty text is handed to [`FieldValue::parse`]
//! for the field's declared type. Encoding mirrors this with
//! [`FieldValue::render`]; absent values render as empty text and are padded
//! like any other value.
//!
//! Integer implementations additionally act as width/count sources for
//! length-by-reference fields, advertised through [`FieldValue::COUNTABLE`].

use crate::error::ValueError;
use chrono::{DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime};

/// A value type storable in an elementary telegram field.
///
/// Built-in implementations cover text, booleans, fixed-size integers,
/// floats, and the chrono calendar/time types. User enumerations implement
/// this by hand:
///
/// ```
/// use flatwire::{FieldValue, ValueError};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Side {
///     #[default]
///     Buy,
///     Sell,
/// }
///
/// impl FieldValue for Side {
///     fn parse(text: &str, _format: Option<&str>) -> Result<Self, ValueError> {
///         match text {
///             "BUY" => Ok(Side::Buy),
///             "SELL" => Ok(Side::Sell),
///             other => Err(ValueError::InvalidLiteral(other.to_owned())),
///         }
///     }
///
///     fn render(&self, _format: Option<&str>) -> Result<String, ValueError> {
///         Ok(match self {
///             Side::Buy => "BUY".to_owned(),
///             Side::Sell => "SELL".to_owned(),
///         })
///     }
/// }
/// ```
pub trait FieldValue: Clone + Sized + 'static {
    /// Whether this type may serve as a width/count reference source.
    ///
    /// Only integer types set this. Checked once, at layout registration.
    const COUNTABLE: bool = false;

    /// Parses a value from trimmed, non-empty field text.
    ///
    /// `format` is the field's configured pattern; only calendar/time types
    /// consult it.
    fn parse(text: &str, format: Option<&str>) -> Result<Self, ValueError>;

    /// Renders the value back to field text.
    fn render(&self, format: Option<&str>) -> Result<String, ValueError>;

    /// The value as a width/count, for length-by-reference resolution.
    fn as_count(&self) -> Option<i128> {
        None
    }
}

impl FieldValue for String {
    fn parse(text: &str, _format: Option<&str>) -> Result<Self, ValueError> {
        Ok(text.to_owned())
    }

    fn render(&self, _format: Option<&str>) -> Result<String, ValueError> {
        Ok(self.clone())
    }
}

impl FieldValue for bool {
    fn parse(text: &str, _format: Option<&str>) -> Result<Self, ValueError> {
        text.parse()
            .map_err(|_| ValueError::InvalidLiteral(text.to_owned()))
    }

    fn render(&self, _format: Option<&str>) -> Result<String, ValueError> {
        Ok(self.to_string())
    }
}

// Implements `FieldValue` for the fixed-size integer types.
//
// `usize` and `isize` are omitted to prevent behavior from depending on the
// target architecture.
macro_rules! impl_integer {
    ($($type:ty),*) => {$(
        impl FieldValue for $type {
            const COUNTABLE: bool = true;

            fn parse(text: &str, _format: Option<&str>) -> Result<Self, ValueError> {
                text.parse()
                    .map_err(|_| ValueError::InvalidLiteral(text.to_owned()))
            }

            fn render(&self, _format: Option<&str>) -> Result<String, ValueError> {
                Ok(self.to_string())
            }

            fn as_count(&self) -> Option<i128> {
                i128::try_from(*self).ok()
            }
        }
    )*};
}
impl_integer!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

macro_rules! impl_float {
    ($($type:ty),*) => {$(
        impl FieldValue for $type {
            fn parse(text: &str, _format: Option<&str>) -> Result<Self, ValueError> {
                text.parse()
                    .map_err(|_| ValueError::InvalidLiteral(text.to_owned()))
            }

            fn render(&self, _format: Option<&str>) -> Result<String, ValueError> {
                Ok(self.to_string())
            }
        }
    )*};
}
impl_float!(f32, f64);

// Implements `FieldValue` for the chrono calendar/time types. These require
// an explicit format pattern; the failure surfaces at point of use, not at
// registration.
macro_rules! impl_temporal {
    ($($type:ty),*) => {$(
        impl FieldValue for $type {
            fn parse(text: &str, format: Option<&str>) -> Result<Self, ValueError> {
                let format = require_format(format)?;
                <$type>::parse_from_str(text, format)
                    .map_err(|_| ValueError::InvalidLiteral(text.to_owned()))
            }

            fn render(&self, format: Option<&str>) -> Result<String, ValueError> {
                Ok(self.format(require_format(format)?).to_string())
            }
        }
    )*};
}
impl_temporal!(NaiveDate, NaiveDateTime, NaiveTime, DateTime<FixedOffset>);

// Months travel as their ordinal (1 through 12), not as a name.
impl FieldValue for Month {
    fn parse(text: &str, _format: Option<&str>) -> Result<Self, ValueError> {
        let ordinal: u8 = text
            .parse()
            .map_err(|_| ValueError::InvalidLiteral(text.to_owned()))?;
        Month::try_from(ordinal).map_err(|_| ValueError::InvalidLiteral(text.to_owned()))
    }

    fn render(&self, _format: Option<&str>) -> Result<String, ValueError> {
        Ok(self.number_from_month().to_string())
    }
}

fn require_format(format: Option<&str>) -> Result<&str, ValueError> {
    match format {
        Some(format) if !format.trim().is_empty() => Ok(format),
        _ => Err(ValueError::MissingFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", 42; "plain")]
    #[test_case("-7", -7; "negative")]
    #[test_case("0", 0; "zero")]
    fn test_integer_parse(text: &str, expected: i32) {
        assert_eq!(i32::parse(text, None), Ok(expected));
    }

    #[test_case("abc"; "letters")]
    #[test_case("1.5"; "fractional")]
    #[test_case(""; "empty")]
    fn test_integer_parse_rejects(text: &str) {
        assert_eq!(
            i32::parse(text, None),
            Err(ValueError::InvalidLiteral(text.to_owned()))
        );
    }

    #[test]
    fn test_integer_as_count() {
        assert_eq!(5u32.as_count(), Some(5));
        assert_eq!((-1i8).as_count(), Some(-1));
        assert_eq!(u128::MAX.as_count(), None);
        assert_eq!(String::new().as_count(), None);
    }

    #[test]
    fn test_bool_round_trip() {
        assert_eq!(bool::parse("true", None), Ok(true));
        assert_eq!(bool::parse("false", None), Ok(false));
        assert!(bool::parse("TRUE", None).is_err());
        assert_eq!(true.render(None), Ok("true".to_owned()));
    }

    #[test]
    fn test_float_round_trip() {
        assert_eq!(f64::parse("2.5", None), Ok(2.5));
        assert_eq!(2.5f64.render(None), Ok("2.5".to_owned()));
    }

    #[test]
    fn test_month_ordinal() {
        assert_eq!(Month::parse("7", None), Ok(Month::July));
        assert_eq!(Month::July.render(None), Ok("7".to_owned()));
        assert!(Month::parse("13", None).is_err());
        assert!(Month::parse("JULY", None).is_err());
    }

    #[test]
    fn test_date_requires_format() {
        assert_eq!(
            NaiveDate::parse("2024-06-01", None),
            Err(ValueError::MissingFormat)
        );
        assert_eq!(
            NaiveDate::parse("2024-06-01", Some("  ")),
            Err(ValueError::MissingFormat)
        );
        let date = NaiveDate::parse("2024-06-01", Some("%Y-%m-%d")).unwrap();
        assert_eq!(date.render(None), Err(ValueError::MissingFormat));
        assert_eq!(date.render(Some("%Y-%m-%d")), Ok("2024-06-01".to_owned()));
    }

    #[test]
    fn test_datetime_round_trip() {
        let format = "%Y-%m-%d %H:%M:%S";
        let parsed = NaiveDateTime::parse("2024-06-01 10:30:00", Some(format)).unwrap();
        assert_eq!(parsed.render(Some(format)), Ok("2024-06-01 10:30:00".to_owned()));
    }

    #[test]
    fn test_offset_datetime_round_trip() {
        let format = "%Y-%m-%dT%H:%M:%S%z";
        let parsed =
            <DateTime<FixedOffset>>::parse("2024-06-01T10:30:00+0900", Some(format)).unwrap();
        assert_eq!(
            parsed.render(Some(format)),
            Ok("2024-06-01T10:30:00+0900".to_owned())
        );
    }

    #[test]
    fn test_string_passthrough() {
        assert_eq!(String::parse("hello", None), Ok("hello".to_owned()));
        assert!(!String::COUNTABLE);
    }
}
