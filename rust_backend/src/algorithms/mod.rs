//! Aggregation algorithms for the modal-day chart.
//!
//! # Components
//!
//! - [`quantile`]: Order-statistic primitives (min, max, median, quantiles)
//! - [`binning`]: Time-of-day binning and per-bin reduction
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use modal_day::algorithms::{bin_readings, DEFAULT_BIN_SIZE_MS};
//! use modal_day::core::{DayOfWeek, Reading, ReadingKind};
//!
//! let at = Utc.with_ymd_and_hms(2020, 1, 15, 0, 16, 40).unwrap();
//! let readings = vec![
//!     Reading::with_clock("a", ReadingKind::Cbg, 100.0, at, 1_000_000, DayOfWeek::Wednesday),
//!     Reading::with_clock("b", ReadingKind::Cbg, 200.0, at, 1_000_000, DayOfWeek::Wednesday),
//! ];
//! let bins = bin_readings(&readings, DEFAULT_BIN_SIZE_MS).unwrap();
//! assert_eq!(bins[0].key, 900_000);
//! assert_eq!(bins[0].stats.median, 150.0);
//! ```

pub mod binning;
pub mod quantile;

#[cfg(test)]
mod binning_tests;

pub use binning::{bin_key, bin_readings, Bin, Binner, DEFAULT_BIN_SIZE_MS};
pub use quantile::{extent, median, quantile, quantile_sorted, QuantileSummary};
