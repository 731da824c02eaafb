// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The chainable wall-clock value.
//!
//! [`TimeValue`] wraps a single `chrono::NaiveDateTime`.  Every operation
//! returns a new value, so calls chain naturally:
//!
//! ```
//! use itime::{Bucket, TimeValue};
//!
//! let bucket = TimeValue::new("2021-07-21 23:23:12")?
//!     .shifted_by(0, 0, 40, 0)?
//!     .downsample(Bucket::new().minutes(15))?;
//! assert_eq!(bucket.to_string(), "2021-07-22 00:00:00");
//! # Ok::<(), itime::Error>(())
//! ```

use std::fmt::{self, Write as _};
use std::ops::{RangeInclusive, Sub};

use chrono::format::{Parsed, StrftimeItems};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::formats::{parse_naive, FormatTable, DEFAULT_DATE_SEPARATOR, DEFAULT_TIME_SEPARATOR};
use crate::input::TimeInput;

/// Years a value may take when built from an epoch or moved by arithmetic.
const CALENDAR_YEARS: RangeInclusive<i32> = 1..=9999;

/// `Some(datetime)` when its year renders as four plain digits.
pub(crate) fn within_calendar(datetime: NaiveDateTime) -> Option<NaiveDateTime> {
    CALENDAR_YEARS
        .contains(&datetime.year())
        .then_some(datetime)
}

/// A fully specified date and time of day, without a time zone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeValue {
    datetime: NaiveDateTime,
}

impl TimeValue {
    // ── constructors ──────────────────────────────────────────────────

    /// Wrap a chrono value.
    #[inline]
    pub const fn from_naive(datetime: NaiveDateTime) -> Self {
        Self { datetime }
    }

    /// Build from text, an epoch in seconds, a date-time or components.
    ///
    /// Epochs are read in the system's local time zone.
    pub fn new(input: impl Into<TimeInput>) -> Result<Self> {
        Self::from_input(input, false)
    }

    /// Like [`TimeValue::new`], reading integer and float epochs as
    /// milliseconds when `is_millis` is set.
    pub fn from_input(input: impl Into<TimeInput>, is_millis: bool) -> Result<Self> {
        Self::from_input_in(input, is_millis, &Local)
    }

    /// Like [`TimeValue::from_input`], reading epochs in the wall clock of `tz`.
    pub fn from_input_in<Tz: TimeZone>(
        input: impl Into<TimeInput>,
        is_millis: bool,
        tz: &Tz,
    ) -> Result<Self> {
        FormatTable::standard().read(input, is_millis, tz)
    }

    /// The current local time.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Local midnight of the current date.
    pub fn today() -> Self {
        Self::now().start_of_day()
    }

    /// Parse `text` with an arbitrary strftime `pattern`.
    ///
    /// Fields the pattern does not carry default to `1900-01-01 00:00:00`,
    /// so `%H:%M` lands on 1900-01-01 and `%Y-%m` on the first of the month.
    pub fn parse_with_format(text: &str, pattern: &str) -> Result<Self> {
        parse_naive(text, pattern)
            .map(Self::from_naive)
            .ok_or_else(|| format_error(text, pattern))
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// The wrapped chrono value.
    #[inline]
    pub const fn naive(&self) -> NaiveDateTime {
        self.datetime
    }

    /// Unix timestamp of this wall clock read in the local time zone.
    pub fn timestamp(&self) -> Result<i64> {
        self.timestamp_in(&Local)
    }

    /// Unix timestamp in milliseconds, read in the local time zone.
    pub fn timestamp_millis(&self) -> Result<i64> {
        self.timestamp_millis_in(&Local)
    }

    /// Unix timestamp of this wall clock read in `tz`.
    ///
    /// Ambiguous wall clocks (DST fold) resolve to the earliest instant.
    pub fn timestamp_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<i64> {
        self.localize(tz).map(|dt| dt.timestamp())
    }

    /// Unix timestamp in milliseconds of this wall clock read in `tz`.
    pub fn timestamp_millis_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<i64> {
        self.localize(tz).map(|dt| dt.timestamp_millis())
    }

    fn localize<Tz: TimeZone>(&self, tz: &Tz) -> Result<chrono::DateTime<Tz>> {
        tz.from_local_datetime(&self.datetime)
            .earliest()
            .ok_or(Error::NonexistentLocalTime {
                datetime: self.datetime,
            })
    }

    // ── formatting ────────────────────────────────────────────────────

    /// Date portion, e.g. `2021-04-04` for `"-"`.
    ///
    /// Separators outside the standard table fall back to `"-"` with a warning.
    pub fn date_string(&self, separator: &str) -> String {
        FormatTable::standard().date_string(self, separator)
    }

    /// Time-of-day portion, e.g. `18:23:12` for `":"`.
    pub fn time_string(&self, separator: &str) -> String {
        FormatTable::standard().time_string(self, separator)
    }

    /// Date and time joined by a space.
    pub fn combined_string(&self, date_separator: &str, time_separator: &str) -> String {
        FormatTable::standard().combined_string(self, date_separator, time_separator)
    }

    /// Render with an arbitrary strftime `pattern`.
    pub fn custom_format(&self, pattern: &str) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", self.datetime.format(pattern)).map_err(|_| Error::Format {
            input: pattern.to_owned(),
            attempted: vec![pattern.to_owned()],
        })?;
        Ok(out)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Move by a signed duration.
    pub fn shifted(&self, delta: TimeDelta) -> Result<Self> {
        self.datetime
            .checked_add_signed(delta)
            .and_then(within_calendar)
            .map(Self::from_naive)
            .ok_or_else(|| Error::OutOfRange {
                what: format!("{self} shifted by {delta}"),
            })
    }

    /// Move by the signed sum of the given units.
    pub fn shifted_by(&self, days: i64, seconds: i64, minutes: i64, hours: i64) -> Result<Self> {
        let delta = [
            TimeDelta::try_days(days),
            TimeDelta::try_seconds(seconds),
            TimeDelta::try_minutes(minutes),
            TimeDelta::try_hours(hours),
        ]
        .into_iter()
        .try_fold(TimeDelta::zero(), |acc, part| acc.checked_add(&part?))
        .ok_or_else(|| Error::OutOfRange {
            what: format!(
                "shift of {days} days, {hours} hours, {minutes} minutes and {seconds} seconds"
            ),
        })?;
        self.shifted(delta)
    }

    // ── substitution ──────────────────────────────────────────────────

    /// Replace the fields `pattern` supplies with those parsed from `text`.
    ///
    /// Fields the pattern does not mention are kept from `self`.
    ///
    /// ```
    /// use itime::TimeValue;
    ///
    /// let t = TimeValue::new("2021-04-04 18:23:12")?;
    /// assert_eq!(t.with_components("10", "%d")?.to_string(), "2021-04-10 18:23:12");
    /// # Ok::<(), itime::Error>(())
    /// ```
    pub fn with_components(&self, text: &str, pattern: &str) -> Result<Self> {
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, StrftimeItems::new(pattern))
            .map_err(|_| format_error(text, pattern))?;

        let current = self.datetime;
        let year = parsed.year().unwrap_or(current.year());
        let month = parsed.month().unwrap_or(current.month());
        let day = parsed.day().unwrap_or(current.day());
        let hour = match (parsed.hour_div_12(), parsed.hour_mod_12()) {
            (Some(div), Some(rem)) => div * 12 + rem,
            _ => current.hour(),
        };
        let minute = parsed.minute().unwrap_or(current.minute());
        let second = parsed.second().unwrap_or(current.second());

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .and_then(within_calendar)
            .map(Self::from_naive)
            .ok_or_else(|| Error::OutOfRange {
                what: format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ),
            })
    }
}

fn format_error(text: &str, pattern: &str) -> Error {
    Error::Format {
        input: text.to_owned(),
        attempted: vec![pattern.to_owned()],
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait implementations
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.combined_string(DEFAULT_DATE_SEPARATOR, DEFAULT_TIME_SEPARATOR))
    }
}

impl Sub for TimeValue {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.datetime - rhs.datetime
    }
}

impl From<NaiveDateTime> for TimeValue {
    #[inline]
    fn from(datetime: NaiveDateTime) -> Self {
        Self::from_naive(datetime)
    }
}

impl From<TimeValue> for NaiveDateTime {
    #[inline]
    fn from(value: TimeValue) -> Self {
        value.datetime
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TimeValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        TimeValue::new(text).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
