//! Filtering of reading streams ahead of binning.
//!
//! # Modules
//!
//! - [`filtering`]: Per-stream multi-index collection with independent
//!   date-range and day-of-week predicate slots
//! - [`activity`]: The shared day/week activity filter over both streams
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use chrono_tz::Tz;
//! use modal_day::core::{ActiveDays, DayOfWeek, Reading, ReadingKind};
//! use modal_day::transformations::ActivityFilter;
//!
//! let at = Utc.with_ymd_and_hms(2020, 1, 15, 10, 0, 0).unwrap();
//! let smbg = vec![Reading::new("s1", ReadingKind::Smbg, 120.0, at, Tz::UTC)];
//! let mut filter = ActivityFilter::new(vec![], smbg, ActiveDays::all(), 14, Tz::UTC, None).unwrap();
//!
//! filter.set_active_days(ActiveDays::only(&[DayOfWeek::Monday]));
//! assert!(filter.current_view(ReadingKind::Smbg).is_empty());
//! ```

pub mod activity;
pub mod filtering;


pub use activity::{default_window, later_window, ActivityFilter, FilteredView};
pub use filtering::ReadingIndex;
