//! Domain models for glucose readings and the filters applied to them.
//!
//! This module provides the core data structures that flow through the modal-day
//! pipeline: individual readings with their derived clock position, the
//! day-of-week inclusion predicate, and the end-exclusive date window.

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, ModalError, ModalResult};

/// Milliseconds in a (nominal) 24-hour day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Conversion factor between mmol/L and mg/dL.
pub const MGDL_PER_MMOLL: f64 = 18.01559;

/// Day of the week, as used by the day-of-week filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Lowercase English name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Source stream a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    /// Continuous glucose monitor
    Cbg,
    /// Self-monitored (finger stick) blood glucose
    Smbg,
}

/// Blood glucose units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlucoseUnits {
    #[default]
    #[serde(rename = "mg/dL")]
    MgDl,
    #[serde(rename = "mmol/L")]
    MmolL,
}

impl GlucoseUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseUnits::MgDl => "mg/dL",
            GlucoseUnits::MmolL => "mmol/L",
        }
    }

    /// Convert `value` expressed in `from` into these units.
    ///
    /// mg/dL results are rounded to whole numbers, as meters report them.
    pub fn convert_from(&self, value: f64, from: GlucoseUnits) -> f64 {
        match (from, *self) {
            (GlucoseUnits::MmolL, GlucoseUnits::MgDl) => (value * MGDL_PER_MMOLL).round(),
            (GlucoseUnits::MgDl, GlucoseUnits::MmolL) => value / MGDL_PER_MMOLL,
            _ => value,
        }
    }
}

/// A single glucose observation.
///
/// `ms_per_24` and `day_of_week` are derived once, at ingestion, from the
/// timestamp shifted into the active timezone. Filtering never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub kind: ReadingKind,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    /// Milliseconds since local midnight, in `[0, MS_PER_DAY)`
    pub ms_per_24: u32,
    pub day_of_week: DayOfWeek,
}

impl Reading {
    /// Creates a reading, deriving its local clock position in `tz`.
    pub fn new(
        id: impl Into<String>,
        kind: ReadingKind,
        value: f64,
        timestamp: DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let (ms_per_24, day_of_week) = crate::time::local_clock(timestamp, tz);
        Self {
            id: id.into(),
            kind,
            value,
            timestamp,
            ms_per_24,
            day_of_week,
        }
    }

    /// Creates a reading whose clock position was already derived elsewhere.
    pub fn with_clock(
        id: impl Into<String>,
        kind: ReadingKind,
        value: f64,
        timestamp: DateTime<Utc>,
        ms_per_24: u32,
        day_of_week: DayOfWeek,
    ) -> Self {
        debug_assert!((ms_per_24 as i64) < MS_PER_DAY);
        Self {
            id: id.into(),
            kind,
            value,
            timestamp,
            ms_per_24,
            day_of_week,
        }
    }
}

/// Day-of-week inclusion predicate.
///
/// Toggling a day only changes which readings are visible; readings themselves
/// are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDays {
    #[serde(default = "enabled")]
    pub monday: bool,
    #[serde(default = "enabled")]
    pub tuesday: bool,
    #[serde(default = "enabled")]
    pub wednesday: bool,
    #[serde(default = "enabled")]
    pub thursday: bool,
    #[serde(default = "enabled")]
    pub friday: bool,
    #[serde(default = "enabled")]
    pub saturday: bool,
    #[serde(default = "enabled")]
    pub sunday: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ActiveDays {
    fn default() -> Self {
        Self::all()
    }
}

impl ActiveDays {
    /// Every day enabled.
    pub fn all() -> Self {
        Self::uniform(true)
    }

    /// Every day disabled.
    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(flag: bool) -> Self {
        Self {
            monday: flag,
            tuesday: flag,
            wednesday: flag,
            thursday: flag,
            friday: flag,
            saturday: flag,
            sunday: flag,
        }
    }

    /// Build a predicate enabling exactly `days`.
    pub fn only(days: &[DayOfWeek]) -> Self {
        let mut active = Self::none();
        for day in days {
            active.set(*day, true);
        }
        active
    }

    pub fn is_active(&self, day: DayOfWeek) -> bool {
        match day {
            DayOfWeek::Monday => self.monday,
            DayOfWeek::Tuesday => self.tuesday,
            DayOfWeek::Wednesday => self.wednesday,
            DayOfWeek::Thursday => self.thursday,
            DayOfWeek::Friday => self.friday,
            DayOfWeek::Saturday => self.saturday,
            DayOfWeek::Sunday => self.sunday,
        }
    }

    pub fn set(&mut self, day: DayOfWeek, flag: bool) {
        let slot = match day {
            DayOfWeek::Monday => &mut self.monday,
            DayOfWeek::Tuesday => &mut self.tuesday,
            DayOfWeek::Wednesday => &mut self.wednesday,
            DayOfWeek::Thursday => &mut self.thursday,
            DayOfWeek::Friday => &mut self.friday,
            DayOfWeek::Saturday => &mut self.saturday,
            DayOfWeek::Sunday => &mut self.sunday,
        };
        *slot = flag;
    }

    pub fn toggle(&mut self, day: DayOfWeek) {
        let flag = self.is_active(day);
        self.set(day, !flag);
    }

    /// Number of enabled days.
    pub fn active_count(&self) -> usize {
        DayOfWeek::ALL.iter().filter(|d| self.is_active(**d)).count()
    }

    pub fn includes(&self, reading: &Reading) -> bool {
        self.is_active(reading.day_of_week)
    }
}

/// End-exclusive window `[start, end)` of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRangeWindow {
    /// Creates a window, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ModalResult<Self> {
        if start >= end {
            return Err(ModalError::invalid_argument_with_context(
                "date range start must precede its end",
                ErrorContext::new("date_range_window")
                    .with_details(format!("start={} end={}", start, end)),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Window length in (24-hour) days.
    pub fn duration_days(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / MS_PER_DAY as f64
    }
}
