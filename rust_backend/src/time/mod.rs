//! Local-time utilities for the modal-day chart.
//!
//! Readings are bucketed by their position on the local clock, and date
//! windows snap to local day boundaries, so everything here is parameterised
//! by the active [`chrono_tz::Tz`].
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use modal_day::time::{resolve_timezone, window_ending_at};
//!
//! let tz = resolve_timezone(true, Some("UTC")).unwrap();
//! let latest = Utc.with_ymd_and_hms(2020, 1, 15, 10, 0, 0).unwrap();
//! let window = window_ending_at(latest, 14, tz).unwrap();
//! assert_eq!(window.end(), Utc.with_ymd_and_hms(2020, 1, 16, 0, 0, 0).unwrap());
//! assert_eq!(window.start(), Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap());
//! ```

pub mod local;


pub use local::{
    ceil_to_day, format_hour_label, format_window_title, local_clock, resolve_timezone,
    window_ending_at,
};
