//! Multi-index collection of readings for one source stream.
//!
//! The collection keeps its readings sorted by timestamp and holds two
//! independent predicate slots, a date range and a day-of-week predicate. Each
//! slot can be replaced or cleared without touching the other; queries return
//! the intersection of whatever slots are set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::algorithms::quantile::extent;
use crate::core::domain::{ActiveDays, DateRangeWindow, Reading, ReadingKind};

/// Readings of one kind with independent date-range and day-of-week filters.
#[derive(Debug, Clone)]
pub struct ReadingIndex {
    kind: ReadingKind,
    /// Ascending by timestamp
    readings: Vec<Reading>,
    range: Option<DateRangeWindow>,
    days: Option<ActiveDays>,
}

impl ReadingIndex {
    /// Build an index, sorting by timestamp and dropping repeated ids.
    pub fn new(kind: ReadingKind, readings: Vec<Reading>) -> Self {
        let total = readings.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(total);
        let mut readings: Vec<Reading> = readings
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();
        if readings.len() < total {
            log::warn!(
                "dropped {} duplicate {:?} readings",
                total - readings.len(),
                kind
            );
        }
        readings.sort_by_key(|r| r.timestamp);
        Self {
            kind,
            readings,
            range: None,
            days: None,
        }
    }

    pub fn kind(&self) -> ReadingKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Every reading, ignoring filters, ascending by timestamp.
    pub fn all(&self) -> &[Reading] {
        &self.readings
    }

    /// Most recent timestamp in the collection, ignoring filters.
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.readings.last().map(|r| r.timestamp)
    }

    /// Replace (or clear, with `None`) the date-range predicate.
    pub fn filter_range(&mut self, window: Option<DateRangeWindow>) {
        self.range = window;
    }

    /// Replace (or clear, with `None`) the day-of-week predicate.
    pub fn filter_days(&mut self, days: Option<ActiveDays>) {
        self.days = days;
    }

    /// Clear every predicate.
    pub fn filter_all(&mut self) {
        self.range = None;
        self.days = None;
    }

    pub fn range_filter(&self) -> Option<DateRangeWindow> {
        self.range
    }

    pub fn day_filter(&self) -> Option<ActiveDays> {
        self.days
    }

    /// Readings inside the date range, before the day predicate.
    fn in_range(&self) -> &[Reading] {
        match self.range {
            None => &self.readings,
            Some(window) => {
                let lo = self
                    .readings
                    .partition_point(|r| r.timestamp < window.start());
                let hi = self.readings.partition_point(|r| r.timestamp < window.end());
                &self.readings[lo..hi]
            }
        }
    }

    fn passes_days(&self, reading: &Reading) -> bool {
        self.days.map_or(true, |days| days.includes(reading))
    }

    /// Readings passing every predicate, ascending by timestamp.
    pub fn matching(&self) -> Vec<Reading> {
        self.in_range()
            .iter()
            .filter(|r| self.passes_days(r))
            .cloned()
            .collect()
    }

    /// Up to `n` most recent readings passing every predicate, newest first.
    pub fn top(&self, n: usize) -> Vec<Reading> {
        self.in_range()
            .iter()
            .rev()
            .filter(|r| self.passes_days(r))
            .take(n)
            .cloned()
            .collect()
    }

    /// `(min, max)` glucose value over every reading, ignoring filters.
    pub fn global_value_extent(&self) -> Option<(f64, f64)> {
        extent(self.readings.iter().map(|r| r.value))
    }
}
