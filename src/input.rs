// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Accepted input shapes and their conversion to a wall-clock instant.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use log::warn;

use crate::error::{Error, Result};
use crate::formats::FormatTable;
use crate::value::{within_calendar, TimeValue};

/// Anything a [`TimeValue`] can be built from.
///
/// Most callers never name this type: every constructor takes
/// `impl Into<TimeInput>`, and conversions exist for strings, integer and
/// float epochs, chrono date-times and six-element component tuples.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    /// Text in one of the layouts of a [`FormatTable`].
    Text(String),
    /// Unix epoch, in seconds unless read as milliseconds.
    Integer(i64),
    /// Fractional Unix epoch.
    Float(f64),
    /// A wall-clock instant, adopted as is.
    DateTime(NaiveDateTime),
    /// `(year, month, day, hour, minute, second)`.
    Components(Vec<TimeInput>),
}

impl TimeInput {
    /// Human-readable name of the input shape.
    pub fn kind(&self) -> &'static str {
        match self {
            TimeInput::Text(_) => "text",
            TimeInput::Integer(_) => "integer",
            TimeInput::Float(_) => "float",
            TimeInput::DateTime(_) => "datetime",
            TimeInput::Components(_) => "sequence",
        }
    }

    pub(crate) fn resolve<Tz: TimeZone>(
        self,
        is_millis: bool,
        tz: &Tz,
        table: &FormatTable,
    ) -> Result<NaiveDateTime> {
        match self {
            TimeInput::Text(text) => table.parse(&text),
            TimeInput::Integer(value) => epoch_from_integer(value, is_millis, tz),
            TimeInput::Float(value) => epoch_from_float(value, is_millis, tz),
            TimeInput::DateTime(datetime) => {
                within_calendar(datetime).ok_or_else(|| Error::OutOfRange {
                    what: format!("date-time {datetime}"),
                })
            }
            TimeInput::Components(items) => table.parse(&join_components(&items)?),
        }
    }
}

// ── epoch conversion ──────────────────────────────────────────────────────

fn wall_clock<Tz: TimeZone>(secs: i64, nanos: u32, tz: &Tz) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(secs, nanos)?;
    // Keeps the zone offset from overflowing chrono's own range.
    within_calendar(utc.naive_utc())?;
    within_calendar(utc.with_timezone(tz).naive_local())
}

fn split_millis(millis: i64) -> (i64, u32) {
    let nanos = millis.rem_euclid(1000) as u32 * 1_000_000;
    (millis.div_euclid(1000), nanos)
}

fn split_seconds(seconds: f64) -> Option<(i64, u32)> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    let nanos = ((seconds - whole) * 1e9) as u32;
    Some((whole as i64, nanos.min(999_999_999)))
}

fn epoch_from_integer<Tz: TimeZone>(
    value: i64,
    is_millis: bool,
    tz: &Tz,
) -> Result<NaiveDateTime> {
    let (secs, nanos) = if is_millis {
        split_millis(value)
    } else {
        (value, 0)
    };
    with_millis_fallback(value, wall_clock(secs, nanos, tz), || {
        let (secs, nanos) = split_millis(secs);
        wall_clock(secs, nanos, tz)
    })
}

fn epoch_from_float<Tz: TimeZone>(
    value: f64,
    is_millis: bool,
    tz: &Tz,
) -> Result<NaiveDateTime> {
    let seconds = if is_millis { value / 1000.0 } else { value };
    let read = |seconds: f64| split_seconds(seconds).and_then(|(s, n)| wall_clock(s, n, tz));
    with_millis_fallback(value, read(seconds), || read(seconds / 1000.0))
}

fn with_millis_fallback(
    value: impl fmt::Display,
    primary: Option<NaiveDateTime>,
    fallback: impl FnOnce() -> Option<NaiveDateTime>,
) -> Result<NaiveDateTime> {
    if let Some(datetime) = primary {
        return Ok(datetime);
    }
    match fallback() {
        Some(datetime) => {
            warn!(
                "epoch value {value} is out of range in seconds and was read as milliseconds; \
                 pass is_millis = true for millisecond input"
            );
            Ok(datetime)
        }
        None => Err(Error::OutOfRange {
            what: format!("epoch value {value}"),
        }),
    }
}

// ── component sequences ───────────────────────────────────────────────────

fn join_components(items: &[TimeInput]) -> Result<String> {
    if items.len() != 6 {
        return Err(Error::UnsupportedType {
            received: format!("sequence of {} elements", items.len()),
        });
    }
    let parts = items
        .iter()
        .map(component_text)
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{} {}", parts[..3].join("-"), parts[3..].join(":")))
}

/// Integral floats render as integers (`4.0` reads as `4`); any other float
/// is rejected rather than spliced into the text as `4.5`.
fn component_text(item: &TimeInput) -> Result<String> {
    match item {
        TimeInput::Text(text) => Ok(text.clone()),
        TimeInput::Integer(value) => Ok(value.to_string()),
        TimeInput::Float(value) if value.is_finite() && value.fract() == 0.0 => {
            Ok(format!("{value:.0}"))
        }
        TimeInput::Float(_) => Err(Error::UnsupportedType {
            received: "non-integral float inside a component sequence".into(),
        }),
        other => Err(Error::UnsupportedType {
            received: format!("{} inside a component sequence", other.kind()),
        }),
    }
}

// ── conversions ───────────────────────────────────────────────────────────

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        TimeInput::Text(text.to_owned())
    }
}

impl From<String> for TimeInput {
    fn from(text: String) -> Self {
        TimeInput::Text(text)
    }
}

impl From<&String> for TimeInput {
    fn from(text: &String) -> Self {
        TimeInput::Text(text.clone())
    }
}

macro_rules! integer_input {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TimeInput {
                fn from(value: $ty) -> Self {
                    TimeInput::Integer(i64::from(value))
                }
            }
        )*
    };
}

integer_input!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for TimeInput {
    fn from(value: f32) -> Self {
        TimeInput::Float(f64::from(value))
    }
}

impl From<f64> for TimeInput {
    fn from(value: f64) -> Self {
        TimeInput::Float(value)
    }
}

impl From<NaiveDateTime> for TimeInput {
    fn from(datetime: NaiveDateTime) -> Self {
        TimeInput::DateTime(datetime)
    }
}

impl From<NaiveDate> for TimeInput {
    fn from(date: NaiveDate) -> Self {
        TimeInput::DateTime(date.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeInput {
    fn from(datetime: DateTime<Tz>) -> Self {
        TimeInput::DateTime(datetime.naive_local())
    }
}

impl From<TimeValue> for TimeInput {
    fn from(value: TimeValue) -> Self {
        TimeInput::DateTime(value.naive())
    }
}

impl From<&TimeValue> for TimeInput {
    fn from(value: &TimeValue) -> Self {
        TimeInput::DateTime(value.naive())
    }
}

impl From<(i32, u32, u32, u32, u32, u32)> for TimeInput {
    fn from((y, mo, d, h, mi, s): (i32, u32, u32, u32, u32, u32)) -> Self {
        TimeInput::Components(vec![
            y.into(),
            mo.into(),
            d.into(),
            h.into(),
            mi.into(),
            s.into(),
        ])
    }
}

impl From<[i64; 6]> for TimeInput {
    fn from(components: [i64; 6]) -> Self {
        TimeInput::Components(components.map(TimeInput::Integer).to_vec())
    }
}

impl From<Vec<TimeInput>> for TimeInput {
    fn from(items: Vec<TimeInput>) -> Self {
        TimeInput::Components(items)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<serde_json::Value> for TimeInput {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        let unsupported = |received: &str| Error::UnsupportedType {
            received: received.to_owned(),
        };
        match value {
            Value::String(text) => Ok(TimeInput::Text(text)),
            Value::Number(number) => number
                .as_i64()
                .map(TimeInput::Integer)
                .or_else(|| number.as_f64().map(TimeInput::Float))
                .ok_or_else(|| unsupported("number")),
            Value::Array(items) => items
                .into_iter()
                .map(TimeInput::try_from)
                .collect::<Result<Vec<_>>>()
                .map(TimeInput::Components),
            Value::Bool(_) => Err(unsupported("boolean")),
            Value::Null => Err(unsupported("null")),
            Value::Object(_) => Err(unsupported("object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn beijing() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn resolve(input: impl Into<TimeInput>, is_millis: bool) -> Result<NaiveDateTime> {
        input
            .into()
            .resolve(is_millis, &beijing(), FormatTable::standard())
    }

    #[test]
    fn test_integer_epoch_uses_zone_wall_clock() {
        let dt = resolve(1_617_531_792, false).unwrap();
        assert_eq!(dt.to_string(), "2021-04-04 18:23:12");

        let utc = TimeInput::from(1_617_531_792)
            .resolve(false, &Utc, FormatTable::standard())
            .unwrap();
        assert_eq!(utc.to_string(), "2021-04-04 10:23:12");
    }

    #[test]
    fn test_integer_millis_keep_subseconds() {
        let dt = resolve(1_617_531_792_250_i64, true).unwrap();
        assert_eq!(dt.to_string(), "2021-04-04 18:23:12.250");
    }

    #[test]
    fn test_negative_millis_split_towards_negative_infinity() {
        assert_eq!(split_millis(-1), (-1, 999_000_000));
        assert_eq!(split_millis(1_500), (1, 500_000_000));
    }

    #[test]
    fn test_float_epoch() {
        let dt = resolve(1_617_531_792.123, false).unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2021-04-04 18:23:12");

        let ms = resolve(1_617_531_792_000.0, true).unwrap();
        assert_eq!(ms.to_string(), "2021-04-04 18:23:12");
    }

    #[test]
    fn test_millis_without_flag_fall_back() {
        assert_eq!(
            resolve(1_617_531_792_000_i64, false).unwrap().to_string(),
            "2021-04-04 18:23:12"
        );
        assert_eq!(
            resolve(1_617_531_792_000.0, false).unwrap().to_string(),
            "2021-04-04 18:23:12"
        );
    }

    #[test]
    fn test_unrepresentable_epoch_is_out_of_range() {
        assert!(matches!(
            resolve(i64::MAX, false),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            resolve(f64::NAN, false),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            resolve(f64::INFINITY, true),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_components_are_joined_and_parsed() {
        let dt = resolve((2021, 4, 4, 18, 23, 12), false).unwrap();
        assert_eq!(dt.to_string(), "2021-04-04 18:23:12");

        let mixed = TimeInput::Components(vec![
            "2021".into(),
            "04".into(),
            4.into(),
            0.into(),
            0.into(),
            "0".into(),
        ]);
        assert_eq!(resolve(mixed, false).unwrap().to_string(), "2021-04-04 00:00:00");
    }

    #[test]
    fn test_float_components() {
        let whole = TimeInput::Components(vec![
            2021.0_f64.into(),
            4.0_f64.into(),
            4.0_f64.into(),
            18.0_f64.into(),
            23.0_f64.into(),
            12.0_f64.into(),
        ]);
        assert_eq!(resolve(whole, false).unwrap().to_string(), "2021-04-04 18:23:12");

        let fractional = TimeInput::Components(vec![
            2021.into(),
            4.into(),
            4.5_f64.into(),
            18.into(),
            23.into(),
            12.into(),
        ]);
        assert_eq!(
            resolve(fractional, false),
            Err(Error::UnsupportedType {
                received: "non-integral float inside a component sequence".into()
            })
        );
    }

    #[test]
    fn test_invalid_components_fail_to_parse() {
        assert!(matches!(
            resolve([2021_i64, 2, 30, 0, 0, 0], false),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_wrong_sequence_shapes_are_unsupported() {
        let short = TimeInput::Components(vec![2021.into(), 4.into(), 4.into()]);
        assert_eq!(
            resolve(short, false),
            Err(Error::UnsupportedType {
                received: "sequence of 3 elements".into()
            })
        );

        let nested = TimeInput::Components(vec![
            2021.into(),
            4.into(),
            4.into(),
            18.into(),
            23.into(),
            TimeInput::Components(vec![]),
        ]);
        assert_eq!(
            resolve(nested, false),
            Err(Error::UnsupportedType {
                received: "sequence inside a component sequence".into()
            })
        );
    }

    #[test]
    fn test_datetime_inputs_are_adopted() {
        let naive = NaiveDate::from_ymd_opt(2021, 4, 4)
            .unwrap()
            .and_hms_opt(18, 23, 12)
            .unwrap();
        assert_eq!(resolve(naive, false).unwrap(), naive);

        let aware = beijing().from_local_datetime(&naive).unwrap();
        assert_eq!(resolve(aware, false).unwrap(), naive);

        let date = NaiveDate::from_ymd_opt(2021, 4, 4).unwrap();
        assert_eq!(resolve(date, false).unwrap().to_string(), "2021-04-04 00:00:00");
    }

    #[test]
    fn test_datetime_inputs_outside_the_calendar_are_rejected() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        assert!(matches!(resolve(far, false), Err(Error::OutOfRange { .. })));

        let before = NaiveDate::from_ymd_opt(0, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert!(matches!(resolve(before, false), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TimeInput::from("x").kind(), "text");
        assert_eq!(TimeInput::from(1_u8).kind(), "integer");
        assert_eq!(TimeInput::from(1.5_f32).kind(), "float");
        assert_eq!(TimeInput::from([0_i64; 6]).kind(), "sequence");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_values() {
        use serde_json::json;

        assert_eq!(
            TimeInput::try_from(json!("2021-04-04")),
            Ok(TimeInput::Text("2021-04-04".into()))
        );
        assert_eq!(
            TimeInput::try_from(json!(1_617_531_792)),
            Ok(TimeInput::Integer(1_617_531_792))
        );
        assert_eq!(
            TimeInput::try_from(json!([2021, 4, 4, 18, 23, 12])),
            Ok(TimeInput::from([2021_i64, 4, 4, 18, 23, 12]))
        );
        assert_eq!(
            TimeInput::try_from(json!(true)),
            Err(Error::UnsupportedType {
                received: "boolean".into()
            })
        );
        assert!(TimeInput::try_from(json!({"year": 2021})).is_err());
    }
}
