// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chained-call wall-clock time values.
//!
//! This crate wraps a `chrono::NaiveDateTime` in a small value type that
//! parses heterogeneous inputs, renders a fixed family of layouts, and
//! returns a new value from every operation so calls chain.
//!
//! # Core types
//!
//! - [`TimeValue`] — the wall-clock value and its operations.
//! - [`TimeInput`] — the accepted input shapes (text, epoch, date-time, components).
//! - [`FormatTable`] — separator-driven pattern table used for parsing and rendering.
//! - [`Bucket`] — width of a midnight-anchored down-sampling bucket.
//! - [`Error`] — every failure the crate reports.
//!
//! # Accepted text
//!
//! | Date separator | Date-only | With time (`:` or none) |
//! |----------------|-----------|-------------------------|
//! | `-` | `2021-04-04` | `2021-04-04 18:23:12`, `2021-04-04 182312` |
//! | `/` | `2021/04/04` | `2021/04/04 18:23:12`, `2021/04/04 182312` |
//! | none | `20210404` | `20210404 18:23:12`, `20210404 182312` |
//!
//! Anything else goes through [`TimeValue::parse_with_format`].
//!
//! # Warnings
//!
//! Recoverable oddities (an unsupported separator, an epoch in milliseconds
//! passed as seconds) are reported through the [`log`] facade and do not fail.
//!
//! ```
//! use itime::{Bucket, TimeValue};
//!
//! let t = TimeValue::new("2021-07-21 23:23:12")?;
//! assert_eq!(t.downsample(Bucket::new().hours(5))?.to_string(), "2021-07-21 20:00:00");
//! assert_eq!(t.date_string("/"), "2021/07/21");
//! # Ok::<(), itime::Error>(())
//! ```

mod bucket;
mod error;
pub(crate) mod formats;
mod input;
pub(crate) mod value;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use bucket::Bucket;
pub use error::{Error, Result};
pub use formats::{
    FormatTable, FormatTableConfig, Layout, Pattern, DEFAULT_DATE_SEPARATOR,
    DEFAULT_DATE_SEPARATORS, DEFAULT_TIME_SEPARATOR, DEFAULT_TIME_SEPARATORS,
};
pub use input::TimeInput;
pub use value::TimeValue;
