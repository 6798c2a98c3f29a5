//! The modal-day pipeline.
//!
//! [`ModalDay`] owns every stage: the activity filter over both reading
//! streams, the binning stage and the chart scales. Preference changes go
//! through [`ModalDay::update_chart_prefs`], which forwards only the values
//! that actually changed, and [`ModalDay::frame`] runs the stages in order
//! (filters, then bins, then scales) and returns everything a renderer needs.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use modal_day::core::{DayOfWeek, Reading, ReadingKind};
//! use modal_day::models::ModalConfig;
//! use modal_day::services::ModalDay;
//!
//! let ts = Utc.with_ymd_and_hms(2020, 1, 15, 0, 16, 40).unwrap();
//! let cbg = vec![
//!     Reading::with_clock("a", ReadingKind::Cbg, 100.0, ts, 1_000_000, DayOfWeek::Wednesday),
//!     Reading::with_clock("b", ReadingKind::Cbg, 200.0, ts, 1_000_000, DayOfWeek::Wednesday),
//! ];
//! let mut chart = ModalDay::new(cbg, Vec::new(), ModalConfig::default(), None).unwrap();
//! let frame = chart.frame().unwrap();
//! assert_eq!(frame.bins.len(), 1);
//! assert_eq!(frame.title.as_deref(), Some("Jan 2, 2020 - Jan 15, 2020"));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::algorithms::binning::{Bin, Binner};
use crate::core::domain::{ActiveDays, DateRangeWindow, GlucoseUnits, Reading, ReadingKind};
use crate::error::ModalResult;
use crate::models::config::ModalConfig;
use crate::models::prefs::{ActiveDomain, BgClass, ChartPrefs, ExtentPolicy};
use crate::parsing::json_parser::parse_readings_json_str;
use crate::time::{format_window_title, window_ending_at};
use crate::transformations::activity::ActivityFilter;

use super::background::{background_rects, BandRect};
use super::scales::{ChartLayout, LinearScale};
use super::slices::{cbg_slices, CbgSlice};

/// Glucose axis maximum when there is nothing to measure, in mg/dL.
const FALLBACK_MAX_MGDL: f64 = 400.0;

/// Glucose axis used when no reading is available.
pub fn fallback_y_domain(units: GlucoseUnits) -> (f64, f64) {
    (0.0, units.convert_from(FALLBACK_MAX_MGDL, GlucoseUnits::MgDl))
}

/// One finger-stick reading placed on the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmbgPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub class: BgClass,
}

/// Everything the renderer draws for one state of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ModalFrame {
    pub window: Option<DateRangeWindow>,
    pub title: Option<String>,
    pub active_days: ActiveDays,
    /// Filter revision the frame was built from
    pub revision: u64,
    pub cbg: Arc<[Reading]>,
    pub smbg: Arc<[Reading]>,
    pub bins: Arc<[Bin]>,
    pub y_domain: (f64, f64),
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub slices: Vec<CbgSlice>,
    pub smbg_points: Vec<SmbgPoint>,
    pub background: Vec<BandRect>,
    pub prefs: ChartPrefs,
}

impl ModalFrame {
    /// Whether both visible streams are empty.
    pub fn is_empty(&self) -> bool {
        self.cbg.is_empty() && self.smbg.is_empty()
    }
}

/// Modal-day chart pipeline.
#[derive(Debug)]
pub struct ModalDay {
    config: ModalConfig,
    tz: Tz,
    layout: ChartLayout,
    filter: ActivityFilter,
    binner: Binner,
    load_domain: (f64, f64),
}

impl ModalDay {
    /// Build the pipeline over already ingested readings.
    ///
    /// # Arguments
    /// * `cbg`, `smbg` - readings whose clock fields were derived in the
    ///   configured timezone
    /// * `config` - validated preferences
    /// * `anchor` - "now" used for the initial window when there is no data
    pub fn new(
        cbg: Vec<Reading>,
        smbg: Vec<Reading>,
        config: ModalConfig,
        anchor: Option<DateTime<Utc>>,
    ) -> ModalResult<Self> {
        config.validate()?;
        let tz = config.time.timezone()?;
        let filter = ActivityFilter::new(
            cbg,
            smbg,
            config.chart.active_days,
            config.chart.extent_size,
            tz,
            anchor,
        )?;
        let binner = Binner::new(config.chart.bin_size_ms)?;
        let load_domain = match filter.global_value_extent() {
            Some(domain) => domain,
            None => {
                log::warn!("no glucose readings loaded, using the default glucose axis");
                fallback_y_domain(config.bg.units)
            }
        };
        log::debug!(
            "modal day loaded: {} cbg, {} smbg, glucose domain {:?}",
            filter.source(ReadingKind::Cbg).len(),
            filter.source(ReadingKind::Smbg).len(),
            load_domain
        );

        let mut pipeline = Self {
            config,
            tz,
            layout: ChartLayout::default(),
            filter,
            binner,
            load_domain,
        };
        if let Some(window) = pipeline.filter.window() {
            pipeline.config.chart.sync_extent_to_window(&window);
        }
        Ok(pipeline)
    }

    /// Ingest a JSON device export and build the pipeline over it.
    pub fn from_json_str(
        json_str: &str,
        config: ModalConfig,
        anchor: Option<DateTime<Utc>>,
    ) -> ModalResult<Self> {
        let tz = config.time.timezone()?;
        let data = parse_readings_json_str(json_str, config.bg.units, tz)?;
        Self::new(data.cbg, data.smbg, config, anchor)
    }

    /// Replace the default chart geometry.
    pub fn with_layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn chart_prefs(&self) -> &ChartPrefs {
        &self.config.chart
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn window(&self) -> Option<DateRangeWindow> {
        self.filter.window()
    }

    pub fn filter(&self) -> &ActivityFilter {
        &self.filter
    }

    /// How many times the bins were rebuilt.
    pub fn bin_recomputations(&self) -> usize {
        self.binner.recomputations()
    }

    /// Apply new chart preferences.
    ///
    /// Only the dimensions that differ from the current preferences reach the
    /// filter and binning stages. A new `extent_size` moves the window start,
    /// keeping its end. Returns whether any data-affecting value changed.
    pub fn update_chart_prefs(&mut self, prefs: ChartPrefs) -> ModalResult<bool> {
        prefs.validate()?;
        let current = &self.config.chart;
        let mut changed = false;

        if prefs.bin_size_ms != current.bin_size_ms {
            self.binner.set_bin_size(prefs.bin_size_ms)?;
            changed = true;
        }
        if prefs.active_days != current.active_days {
            changed |= self.filter.set_active_days(prefs.active_days);
        }
        if prefs.extent_size != current.extent_size {
            if let Some(window) = self.filter.window() {
                let resized = window_ending_at(last_instant(&window), prefs.extent_size, self.tz)?;
                changed |= self.filter.set_date_range(resized);
            }
        }

        self.config.chart = prefs;
        Ok(changed)
    }

    /// Switch to a preset span ending where the current window ends.
    ///
    /// Returns the new window, or `None` when the pipeline has no window yet.
    pub fn select_domain(&mut self, domain: ActiveDomain) -> ModalResult<Option<DateRangeWindow>> {
        let Some(window) = self.filter.window() else {
            self.config.chart.active_domain = domain;
            self.config.chart.extent_size = domain.extent_days();
            return Ok(None);
        };
        let selected = self
            .config
            .chart
            .select_domain(domain, last_instant(&window), self.tz)?;
        self.filter.set_date_range(selected);
        Ok(Some(selected))
    }

    /// Move to a window the user navigated to; `extent_size` follows it.
    pub fn set_window(&mut self, window: DateRangeWindow) -> bool {
        self.config.chart.sync_extent_to_window(&window);
        self.filter.set_date_range(window)
    }

    /// Glucose axis domain for the current state.
    pub fn y_domain(&mut self) -> (f64, f64) {
        match self.config.chart.extent_policy {
            ExtentPolicy::OnLoad => self.load_domain,
            ExtentPolicy::Visible => {
                let view = self.filter.apply();
                match view.value_extent() {
                    Some(domain) => {
                        log::debug!("glucose domain rebuilt from visible readings: {:?}", domain);
                        domain
                    }
                    None => self.load_domain,
                }
            }
        }
    }

    /// Run the pipeline and build a frame.
    pub fn frame(&mut self) -> ModalResult<ModalFrame> {
        let y_domain = self.y_domain();
        let view = self.filter.apply().clone();
        let bins = self.binner.bins_for(&view.cbg)?;

        let x_scale = self.layout.x_scale();
        let y_scale = self.layout.y_scale(y_domain);
        let classes = self.config.bg.classes();

        let smbg_points = view
            .smbg
            .iter()
            .map(|r| SmbgPoint {
                id: r.id.clone(),
                x: x_scale.scale(r.ms_per_24 as f64),
                y: y_scale.scale(r.value),
                value: r.value,
                class: classes.classify(r.value),
            })
            .collect();

        Ok(ModalFrame {
            window: view.window,
            title: view.window.map(|w| format_window_title(&w, self.tz)),
            active_days: view.active_days,
            revision: view.revision,
            slices: cbg_slices(&bins, &x_scale, &y_scale),
            background: background_rects(&self.layout, &x_scale, &y_scale, &classes),
            cbg: view.cbg,
            smbg: view.smbg,
            bins,
            y_domain,
            x_scale,
            y_scale,
            smbg_points,
            prefs: self.config.chart.clone(),
        })
    }
}

// The day containing this instant is the last one shown.
fn last_instant(window: &DateRangeWindow) -> DateTime<Utc> {
    window.end() - Duration::milliseconds(1)
}
