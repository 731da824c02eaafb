// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible operation of the crate.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while building, shifting or bucketing a [`TimeValue`](crate::TimeValue).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input shape is not one of text, epoch number, calendar instant or
    /// six-element component sequence.
    #[error("unsupported time input: expected text, epoch number, datetime or a 6-element sequence, got {received}")]
    UnsupportedType { received: String },

    /// Text did not match any of the attempted patterns.
    #[error("time input {input:?} does not match any of [{}]", .attempted.join(", "))]
    Format {
        input: String,
        attempted: Vec<String>,
    },

    /// A down-sampling unit lies outside its inclusive bounds.
    #[error("{unit} must lie in [{min}, {max}], got {value}")]
    Range {
        unit: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Down-sampling was requested without an effective bucket width.
    #[error("no-op bucket request: at least one of hours, minutes or seconds is required")]
    InvalidBucket,

    /// The result would fall outside the representable calendar.
    #[error("{what} is outside the representable calendar range")]
    OutOfRange { what: String },

    /// The wall-clock time does not exist in the requested time zone.
    #[error("{datetime} does not exist in the requested time zone")]
    NonexistentLocalTime { datetime: NaiveDateTime },

    /// A separator cannot be used to build an unambiguous pattern.
    #[error("separator {separator:?} cannot contain '%', digits or whitespace")]
    InvalidSeparator { separator: String },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
