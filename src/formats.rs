// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Separator-driven strftime pattern table.
//!
//! A [`FormatTable`] is the cross product of a set of **date separators**
//! and a set of **time separators**.  Every separator pair produces up to
//! three patterns:
//!
//! | Layout | Pattern |
//! |--------|---------|
//! | [`Layout::Date`] | `%Y{d}%m{d}%d` |
//! | [`Layout::Time`] | `%H{t}%M{t}%S` |
//! | [`Layout::DateTime`] | `%Y{d}%m{d}%d %H{t}%M{t}%S` |
//!
//! The same table drives both directions: parsing probes every `Date` and
//! `DateTime` pattern in insertion order, rendering looks a pattern up by
//! its separators.  The standard table (`"-"`, `"/"`, `""` for dates and
//! `":"`, `""` for times) is built once on first use and shared; custom
//! tables can be built and passed around explicitly.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::format::{self, ParseErrorKind, Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::input::TimeInput;
use crate::value::{within_calendar, TimeValue};

/// Date separators of the standard table, in probing order.
pub const DEFAULT_DATE_SEPARATORS: [&str; 3] = ["-", "/", ""];

/// Time separators of the standard table, in probing order.
pub const DEFAULT_TIME_SEPARATORS: [&str; 2] = [":", ""];

/// Date separator used when a requested one is not supported.
pub const DEFAULT_DATE_SEPARATOR: &str = "-";

/// Time separator used when a requested one is not supported.
pub const DEFAULT_TIME_SEPARATOR: &str = ":";

static STANDARD: LazyLock<FormatTable> = LazyLock::new(FormatTable::default);

// ═══════════════════════════════════════════════════════════════════════════
// Patterns
// ═══════════════════════════════════════════════════════════════════════════

/// Which calendar fields a pattern covers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Year, month and day.
    Date,
    /// Hour, minute and second.
    Time,
    /// Date and time joined by a single space.
    DateTime,
}

impl Layout {
    /// Build the pattern of this layout for a separator pair.
    pub fn compose(self, date_separator: &str, time_separator: &str) -> String {
        let d = date_separator;
        let t = time_separator;
        match self {
            Layout::Date => format!("%Y{d}%m{d}%d"),
            Layout::Time => format!("%H{t}%M{t}%S"),
            Layout::DateTime => format!("%Y{d}%m{d}%d %H{t}%M{t}%S"),
        }
    }
}

/// One entry of a [`FormatTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    layout: Layout,
    date_separator: String,
    time_separator: String,
    pattern: String,
}

impl Pattern {
    fn new(layout: Layout, date_separator: &str, time_separator: &str) -> Self {
        // Fields the layout does not render are irrelevant for lookup.
        let date_separator = match layout {
            Layout::Time => "",
            _ => date_separator,
        };
        let time_separator = match layout {
            Layout::Date => "",
            _ => time_separator,
        };
        Self {
            layout,
            date_separator: date_separator.to_owned(),
            time_separator: time_separator.to_owned(),
            pattern: layout.compose(date_separator, time_separator),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The strftime pattern string.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    fn matches(&self, layout: Layout, date_separator: &str, time_separator: &str) -> bool {
        self.layout == layout
            && (layout == Layout::Time || self.date_separator == date_separator)
            && (layout == Layout::Date || self.time_separator == time_separator)
    }

    fn is_candidate(&self) -> bool {
        self.layout != Layout::Time
    }
}

/// Year used when a pattern carries no year field.
const DEFAULT_YEAR: i32 = 1900;

/// Parse `text` with `pattern`, filling fields the pattern lacks with
/// `1900-01-01 00:00:00`.
///
/// The whole text must match the pattern. Fields the pattern does supply
/// are never discarded: `%Y-%m-%d %H` keeps its hour.
pub(crate) fn parse_naive(text: &str, pattern: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(pattern)).ok()?;

    let date = match parsed.to_naive_date() {
        Ok(date) => date,
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {
            let year = parsed
                .year()
                .or_else(|| parsed.year_mod_100().map(century_of))
                .unwrap_or(DEFAULT_YEAR);
            NaiveDate::from_ymd_opt(year, parsed.month().unwrap_or(1), parsed.day().unwrap_or(1))?
        }
        Err(_) => return None,
    };
    let time = match parsed.to_naive_time() {
        Ok(time) => time,
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {
            let hour = parsed.hour_div_12().unwrap_or(0) * 12 + parsed.hour_mod_12().unwrap_or(0);
            NaiveTime::from_hms_nano_opt(
                hour,
                parsed.minute().unwrap_or(0),
                parsed.second().unwrap_or(0),
                parsed.nanosecond().unwrap_or(0),
            )?
        }
        Err(_) => return None,
    };
    within_calendar(date.and_time(time))
}

/// Two-digit years: `70..=99` are 19xx, `0..=69` are 20xx, the same split
/// chrono applies when the date is complete.
fn century_of(year_mod_100: i32) -> i32 {
    if year_mod_100 >= 70 {
        1900 + year_mod_100
    } else {
        2000 + year_mod_100
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// Separator sets a [`FormatTable`] is built from.
///
/// With the `serde` feature this can be deserialised from any configuration
/// source; missing fields fall back to the standard sets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatTableConfig {
    pub date_separators: Vec<String>,
    pub time_separators: Vec<String>,
}

impl Default for FormatTableConfig {
    fn default() -> Self {
        Self {
            date_separators: DEFAULT_DATE_SEPARATORS.map(String::from).to_vec(),
            time_separators: DEFAULT_TIME_SEPARATORS.map(String::from).to_vec(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FormatTable
// ═══════════════════════════════════════════════════════════════════════════

/// Ordered, immutable table of date/time patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTable {
    date_separators: Vec<String>,
    time_separators: Vec<String>,
    patterns: Vec<Pattern>,
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::build(
            DEFAULT_DATE_SEPARATORS.map(String::from).to_vec(),
            DEFAULT_TIME_SEPARATORS.map(String::from).to_vec(),
        )
    }
}

impl FormatTable {
    // ── constructors ──────────────────────────────────────────────────

    /// The shared standard table.
    pub fn standard() -> &'static FormatTable {
        &STANDARD
    }

    /// Build a table from custom separator sets.
    ///
    /// Duplicated separators are collapsed; separators containing `%`,
    /// ASCII digits or whitespace are rejected since they would make the
    /// generated patterns invalid or ambiguous.
    pub fn new<D, T>(date_separators: D, time_separators: T) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Ok(Self::build(
            validated(date_separators)?,
            validated(time_separators)?,
        ))
    }

    /// Build a table from a [`FormatTableConfig`].
    pub fn from_config(config: &FormatTableConfig) -> Result<Self> {
        Self::new(&config.date_separators, &config.time_separators)
    }

    fn build(date_separators: Vec<String>, time_separators: Vec<String>) -> Self {
        let mut patterns: Vec<Pattern> = Vec::new();
        for d in &date_separators {
            for t in &time_separators {
                for layout in [Layout::Date, Layout::Time, Layout::DateTime] {
                    if !patterns.iter().any(|p| p.matches(layout, d, t)) {
                        patterns.push(Pattern::new(layout, d, t));
                    }
                }
            }
        }
        Self {
            date_separators,
            time_separators,
            patterns,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────

    pub fn date_separators(&self) -> &[String] {
        &self.date_separators
    }

    pub fn time_separators(&self) -> &[String] {
        &self.time_separators
    }

    /// Every entry, in insertion order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// The entries probed when parsing text, in probing order.
    pub fn candidates(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(|p| p.is_candidate())
    }

    /// Pattern registered for a layout and separator pair, if any.
    pub fn pattern(
        &self,
        layout: Layout,
        date_separator: &str,
        time_separator: &str,
    ) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(layout, date_separator, time_separator))
            .map(Pattern::as_str)
    }

    // ── parsing ───────────────────────────────────────────────────────

    /// Probe the candidates in order and return the first match.
    pub fn try_parse(&self, text: &str) -> Option<(NaiveDateTime, &Pattern)> {
        self.candidates()
            .find_map(|p| parse_naive(text, p.as_str()).map(|dt| (dt, p)))
    }

    /// Parse `text` against the candidates, failing once all are exhausted.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime> {
        match self.try_parse(text) {
            Some((datetime, pattern)) => {
                debug!("parsed {text:?} with {:?}", pattern.as_str());
                Ok(datetime)
            }
            None => Err(Error::Format {
                input: text.to_owned(),
                attempted: self.candidates().map(|p| p.as_str().to_owned()).collect(),
            }),
        }
    }

    /// Build a [`TimeValue`] from any supported input.
    ///
    /// Text is probed against this table; epoch numbers are converted to the
    /// wall clock of `tz`.
    pub fn read<Tz: TimeZone>(
        &self,
        input: impl Into<TimeInput>,
        is_millis: bool,
        tz: &Tz,
    ) -> Result<TimeValue> {
        input
            .into()
            .resolve(is_millis, tz, self)
            .map(TimeValue::from_naive)
    }

    // ── rendering ─────────────────────────────────────────────────────

    /// Render the date portion of `value`.
    pub fn date_string(&self, value: &TimeValue, separator: &str) -> String {
        self.render(value, Layout::Date, separator, DEFAULT_TIME_SEPARATOR)
    }

    /// Render the time-of-day portion of `value`.
    pub fn time_string(&self, value: &TimeValue, separator: &str) -> String {
        self.render(value, Layout::Time, DEFAULT_DATE_SEPARATOR, separator)
    }

    /// Render date and time of `value` joined by a space.
    pub fn combined_string(
        &self,
        value: &TimeValue,
        date_separator: &str,
        time_separator: &str,
    ) -> String {
        self.render(value, Layout::DateTime, date_separator, time_separator)
    }

    fn render(
        &self,
        value: &TimeValue,
        layout: Layout,
        date_separator: &str,
        time_separator: &str,
    ) -> String {
        let pattern = self.pattern_for(layout, date_separator, time_separator);
        value.naive().format(&pattern).to_string()
    }

    /// Resolve the pattern for a layout, falling back to the default
    /// separator for each unsupported one.
    fn pattern_for(
        &self,
        layout: Layout,
        date_separator: &str,
        time_separator: &str,
    ) -> Cow<'_, str> {
        let d = match layout {
            Layout::Time => DEFAULT_DATE_SEPARATOR,
            _ => resolve(
                "date",
                &self.date_separators,
                date_separator,
                DEFAULT_DATE_SEPARATOR,
            ),
        };
        let t = match layout {
            Layout::Date => DEFAULT_TIME_SEPARATOR,
            _ => resolve(
                "time",
                &self.time_separators,
                time_separator,
                DEFAULT_TIME_SEPARATOR,
            ),
        };
        match self.pattern(layout, d, t) {
            Some(pattern) => Cow::Borrowed(pattern),
            None => Cow::Owned(layout.compose(d, t)),
        }
    }
}

fn resolve<'a>(
    kind: &str,
    supported: &[String],
    requested: &'a str,
    fallback: &'static str,
) -> &'a str {
    if supported.iter().any(|s| s == requested) {
        requested
    } else {
        warn!(
            "unsupported {kind} separator {requested:?}, expected one of {supported:?}; \
             falling back to {fallback:?} (use custom_format for other layouts)"
        );
        fallback
    }
}

fn validated<I>(separators: I) -> Result<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for separator in separators {
        let separator = separator.as_ref();
        if separator
            .chars()
            .any(|c| c == '%' || c.is_ascii_digit() || c.is_whitespace())
        {
            return Err(Error::InvalidSeparator {
                separator: separator.to_owned(),
            });
        }
        if !out.iter().any(|s| s == separator) {
            out.push(separator.to_owned());
        }
    }
    Ok(out)
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
