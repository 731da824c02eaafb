// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Midnight-anchored down-sampling.
//!
//! A [`Bucket`] describes a fixed width (`hours·3600 + minutes·60 + seconds`).
//! [`TimeValue::downsample`] floors a value to the start of the bucket that
//! contains it, counting buckets from midnight of the value's own date, so
//! a 5-hour bucket yields `00:00`, `05:00`, `10:00`, `15:00` and `20:00`.

use std::ops::RangeInclusive;

use chrono::{NaiveTime, TimeDelta, Timelike};

use crate::error::{Error, Result};
use crate::value::TimeValue;

const HOURS: RangeInclusive<u32> = 1..=24;
const MINUTES: RangeInclusive<u32> = 1..=60;
const SECONDS: RangeInclusive<u32> = 1..=60;

/// Width of a down-sampling bucket.
///
/// Each component is optional; a supplied component must lie in its
/// inclusive range (hours `1..=24`, minutes and seconds `1..=60`).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
}

impl Bucket {
    /// An empty bucket; supply at least one component before use.
    pub const fn new() -> Self {
        Self {
            hours: None,
            minutes: None,
            seconds: None,
        }
    }

    pub const fn hours(self, hours: u32) -> Self {
        Self {
            hours: Some(hours),
            ..self
        }
    }

    pub const fn minutes(self, minutes: u32) -> Self {
        Self {
            minutes: Some(minutes),
            ..self
        }
    }

    pub const fn seconds(self, seconds: u32) -> Self {
        Self {
            seconds: Some(seconds),
            ..self
        }
    }

    /// Total width in seconds.
    pub fn width_seconds(&self) -> Result<i64> {
        if self.hours.is_none() && self.minutes.is_none() && self.seconds.is_none() {
            return Err(Error::InvalidBucket);
        }
        let width = 3600 * checked("hours", self.hours, HOURS)?
            + 60 * checked("minutes", self.minutes, MINUTES)?
            + checked("seconds", self.seconds, SECONDS)?;
        if width == 0 {
            return Err(Error::InvalidBucket);
        }
        Ok(width)
    }
}

fn checked(unit: &'static str, value: Option<u32>, bounds: RangeInclusive<u32>) -> Result<i64> {
    match value {
        None => Ok(0),
        Some(v) if bounds.contains(&v) => Ok(i64::from(v)),
        Some(v) => Err(Error::Range {
            unit,
            value: v,
            min: *bounds.start(),
            max: *bounds.end(),
        }),
    }
}

impl TimeValue {
    /// Floor to the start of the enclosing midnight-anchored bucket.
    pub fn downsample(&self, bucket: Bucket) -> Result<Self> {
        let width = bucket.width_seconds()?;
        let datetime = self.naive();
        let elapsed = i64::from(datetime.num_seconds_from_midnight());
        let floored = elapsed / width * width;
        datetime
            .date()
            .and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::seconds(floored))
            .map(Self::from_naive)
            .ok_or_else(|| Error::OutOfRange {
                what: format!("{self} floored to a {width}s bucket"),
            })
    }

    /// Midnight of this value's date.
    pub fn start_of_day(&self) -> Self {
        Self::from_naive(self.naive().date().and_time(NaiveTime::MIN))
    }
}
