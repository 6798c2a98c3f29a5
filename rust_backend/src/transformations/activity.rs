//! Day/week activity filter shared by the continuous and finger-stick streams.
//!
//! [`ActivityFilter`] owns one [`ReadingIndex`] per stream and the two filter
//! dimensions (active days, date window) that apply to both. Setters only record
//! the new value; [`ActivityFilter::apply`] re-applies the dimensions that
//! actually changed and publishes fresh immutable snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::algorithms::quantile::extent;
use crate::core::domain::{ActiveDays, DateRangeWindow, Reading, ReadingKind};
use crate::error::ModalResult;
use crate::time::window_ending_at;

use super::filtering::ReadingIndex;

/// Immutable result of one filter application.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredView {
    pub cbg: Arc<[Reading]>,
    pub smbg: Arc<[Reading]>,
    pub window: Option<DateRangeWindow>,
    pub active_days: ActiveDays,
    /// Incremented every time the snapshots are rebuilt
    pub revision: u64,
}

impl FilteredView {
    pub fn readings(&self, kind: ReadingKind) -> &Arc<[Reading]> {
        match kind {
            ReadingKind::Cbg => &self.cbg,
            ReadingKind::Smbg => &self.smbg,
        }
    }

    /// `(min, max)` glucose value across both visible streams.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        extent(self.cbg.iter().chain(self.smbg.iter()).map(|r| r.value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PendingChanges {
    days: bool,
    range: bool,
}

impl PendingChanges {
    fn any(&self) -> bool {
        self.days || self.range
    }
}

/// Default window for one stream: `extent_days` ending at the local day after
/// its most recent reading.
pub fn default_window(
    index: &ReadingIndex,
    extent_days: u32,
    tz: Tz,
) -> ModalResult<Option<DateRangeWindow>> {
    index
        .latest_timestamp()
        .map(|latest| window_ending_at(latest, extent_days, tz))
        .transpose()
}

/// The later of two windows (by end, then start); either may be absent.
pub fn later_window(
    a: Option<DateRangeWindow>,
    b: Option<DateRangeWindow>,
) -> Option<DateRangeWindow> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if (b.end(), b.start()) > (a.end(), a.start()) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

/// Two-dimensional filter over both reading streams.
#[derive(Debug)]
pub struct ActivityFilter {
    cbg: ReadingIndex,
    smbg: ReadingIndex,
    active_days: ActiveDays,
    window: Option<DateRangeWindow>,
    pending: PendingChanges,
    view: FilteredView,
}

impl ActivityFilter {
    /// Build the filter and derive its initial window.
    ///
    /// Each stream derives its own default window from its latest reading; the
    /// later of the two wins and applies to both. With no readings at all the
    /// window ends at the ceiling of `anchor`, or stays unset without one.
    ///
    /// # Arguments
    /// * `cbg`, `smbg` - readings for each stream, in any order
    /// * `active_days` - initial day-of-week predicate
    /// * `extent_days` - default window length in days
    /// * `tz` - timezone for local-day boundaries
    /// * `anchor` - fallback "now" used only when both streams are empty
    pub fn new(
        cbg: Vec<Reading>,
        smbg: Vec<Reading>,
        active_days: ActiveDays,
        extent_days: u32,
        tz: Tz,
        anchor: Option<DateTime<Utc>>,
    ) -> ModalResult<Self> {
        let cbg = ReadingIndex::new(ReadingKind::Cbg, cbg);
        let smbg = ReadingIndex::new(ReadingKind::Smbg, smbg);

        let derived = later_window(
            default_window(&cbg, extent_days, tz)?,
            default_window(&smbg, extent_days, tz)?,
        );
        let window = match (derived, anchor) {
            (Some(window), _) => Some(window),
            (None, Some(anchor)) => Some(window_ending_at(anchor, extent_days, tz)?),
            (None, None) => None,
        };

        let mut filter = Self {
            cbg,
            smbg,
            active_days,
            window,
            pending: PendingChanges {
                days: true,
                range: true,
            },
            view: FilteredView {
                cbg: Arc::from(Vec::new()),
                smbg: Arc::from(Vec::new()),
                window,
                active_days,
                revision: 0,
            },
        };
        filter.apply();
        Ok(filter)
    }

    /// Record a new day-of-week predicate. Returns whether it differs.
    pub fn set_active_days(&mut self, days: ActiveDays) -> bool {
        if days == self.active_days {
            return false;
        }
        self.active_days = days;
        self.pending.days = true;
        true
    }

    /// Record a new date window. Returns whether it differs.
    pub fn set_date_range(&mut self, window: DateRangeWindow) -> bool {
        if Some(window) == self.window {
            return false;
        }
        self.window = Some(window);
        self.pending.range = true;
        true
    }

    pub fn active_days(&self) -> ActiveDays {
        self.active_days
    }

    pub fn window(&self) -> Option<DateRangeWindow> {
        self.window
    }

    /// Whether a setter recorded a change not yet applied.
    pub fn is_dirty(&self) -> bool {
        self.pending.any()
    }

    /// Re-apply changed dimensions and rebuild the snapshots.
    ///
    /// Without pending changes the previous view, including its snapshot
    /// identities, is returned untouched.
    pub fn apply(&mut self) -> &FilteredView {
        if !self.pending.any() {
            return &self.view;
        }
        let pending = std::mem::take(&mut self.pending);

        for index in [&mut self.cbg, &mut self.smbg] {
            if pending.range {
                index.filter_range(self.window);
            }
            if pending.days {
                index.filter_days(Some(self.active_days));
            }
        }

        self.view = FilteredView {
            cbg: Arc::from(self.cbg.matching()),
            smbg: Arc::from(self.smbg.matching()),
            window: self.window,
            active_days: self.active_days,
            revision: self.view.revision + 1,
        };

        log::debug!(
            "re-filtered (days changed: {}, range changed: {}): {} cbg, {} smbg visible",
            pending.days,
            pending.range,
            self.view.cbg.len(),
            self.view.smbg.len()
        );

        &self.view
    }

    /// The last applied view.
    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Apply pending changes, then return the visible readings of one stream.
    pub fn current_view(&mut self, kind: ReadingKind) -> Arc<[Reading]> {
        Arc::clone(self.apply().readings(kind))
    }

    pub fn source(&self, kind: ReadingKind) -> &ReadingIndex {
        match kind {
            ReadingKind::Cbg => &self.cbg,
            ReadingKind::Smbg => &self.smbg,
        }
    }

    /// `(min, max)` glucose value across both streams, ignoring every filter.
    pub fn global_value_extent(&self) -> Option<(f64, f64)> {
        let cbg = self.cbg.global_value_extent();
        let smbg = self.smbg.global_value_extent();
        extent(
            cbg.into_iter()
                .chain(smbg)
                .flat_map(|(lo, hi)| [lo, hi]),
        )
    }
}
