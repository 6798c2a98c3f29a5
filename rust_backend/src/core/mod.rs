//! Core domain types shared by every stage of the pipeline.

pub mod domain;

pub use domain::{
    ActiveDays, DateRangeWindow, DayOfWeek, GlucoseUnits, Reading, ReadingKind, MGDL_PER_MMOLL,
    MS_PER_DAY,
};
