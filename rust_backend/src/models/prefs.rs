//! Statically typed chart, glucose and time preferences.
//!
//! These replace the loosely typed preference bag the chart used to receive:
//! every option the pipeline reads is a named field with a default.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::algorithms::binning::DEFAULT_BIN_SIZE_MS;
use crate::core::domain::{ActiveDays, DateRangeWindow, DayOfWeek, GlucoseUnits};
use crate::error::{ErrorContext, ModalError, ModalResult};
use crate::time::{resolve_timezone, window_ending_at};

/// Preset display spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveDomain {
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "2 weeks")]
    TwoWeeks,
    #[serde(rename = "4 weeks")]
    FourWeeks,
}

impl ActiveDomain {
    pub fn label(&self) -> &'static str {
        match self {
            ActiveDomain::OneWeek => "1 week",
            ActiveDomain::TwoWeeks => "2 weeks",
            ActiveDomain::FourWeeks => "4 weeks",
        }
    }

    pub fn extent_days(&self) -> u32 {
        match self {
            ActiveDomain::OneWeek => 7,
            ActiveDomain::TwoWeeks => 14,
            ActiveDomain::FourWeeks => 28,
        }
    }

    pub fn from_extent_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(ActiveDomain::OneWeek),
            14 => Some(ActiveDomain::TwoWeeks),
            28 => Some(ActiveDomain::FourWeeks),
            _ => None,
        }
    }
}

/// When the glucose (vertical) domain is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtentPolicy {
    /// Once per data load, from every reading of both streams
    #[default]
    OnLoad,
    /// On every filter application, from the visible readings
    Visible,
}

fn default_active_domain() -> ActiveDomain {
    ActiveDomain::TwoWeeks
}

fn default_extent_size() -> u32 {
    14
}

fn default_bin_size_ms() -> i64 {
    DEFAULT_BIN_SIZE_MS
}

fn enabled() -> bool {
    true
}

/// Modal-day chart preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPrefs {
    #[serde(default)]
    pub active_days: ActiveDays,
    #[serde(default = "default_active_domain")]
    pub active_domain: ActiveDomain,
    /// Window length in days
    #[serde(default = "default_extent_size")]
    pub extent_size: u32,
    #[serde(default = "default_bin_size_ms")]
    pub bin_size_ms: i64,
    /// Connect finger-stick readings of the same day with lines
    #[serde(default)]
    pub showing_lines: bool,
    /// Group finger-stick readings into time-of-day clusters
    #[serde(default = "enabled")]
    pub grouped: bool,
    /// Draw the finger-stick range overlay
    #[serde(default = "enabled")]
    pub box_overlay: bool,
    #[serde(default = "enabled")]
    pub showing_cbg: bool,
    #[serde(default = "enabled")]
    pub showing_smbg: bool,
    #[serde(default)]
    pub cbg_day_traces: bool,
    #[serde(default)]
    pub extent_policy: ExtentPolicy,
}

impl Default for ChartPrefs {
    fn default() -> Self {
        Self {
            active_days: ActiveDays::all(),
            active_domain: default_active_domain(),
            extent_size: default_extent_size(),
            bin_size_ms: default_bin_size_ms(),
            showing_lines: false,
            grouped: true,
            box_overlay: true,
            showing_cbg: true,
            showing_smbg: true,
            cbg_day_traces: false,
            extent_policy: ExtentPolicy::OnLoad,
        }
    }
}

const WEEKDAYS: [DayOfWeek; 5] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
];

const WEEKEND: [DayOfWeek; 2] = [DayOfWeek::Saturday, DayOfWeek::Sunday];

impl ChartPrefs {
    pub fn toggle_day(&mut self, day: DayOfWeek) {
        self.active_days.toggle(day);
    }

    /// Set Monday to Friday to `!all_active`, leaving the weekend alone.
    pub fn toggle_weekdays(&mut self, all_active: bool) {
        for day in WEEKDAYS {
            self.active_days.set(day, !all_active);
        }
    }

    /// Set Saturday and Sunday to `!all_active`, leaving weekdays alone.
    pub fn toggle_weekends(&mut self, all_active: bool) {
        for day in WEEKEND {
            self.active_days.set(day, !all_active);
        }
    }

    pub fn toggle_smbg(&mut self) {
        self.showing_smbg = !self.showing_smbg;
    }

    pub fn toggle_cbg(&mut self) {
        self.showing_cbg = !self.showing_cbg;
    }

    pub fn toggle_box_overlay(&mut self) {
        self.box_overlay = !self.box_overlay;
    }

    pub fn toggle_grouped(&mut self) {
        self.grouped = !self.grouped;
    }

    pub fn toggle_lines(&mut self) {
        self.showing_lines = !self.showing_lines;
    }

    /// Switch to a preset span and compute its window ending at the day after `current`.
    pub fn select_domain(
        &mut self,
        domain: ActiveDomain,
        current: DateTime<Utc>,
        tz: Tz,
    ) -> ModalResult<DateRangeWindow> {
        let window = window_ending_at(current, domain.extent_days(), tz)?;
        self.active_domain = domain;
        self.extent_size = domain.extent_days();
        Ok(window)
    }

    /// Derive `extent_size` back from a window the user navigated to.
    pub fn sync_extent_to_window(&mut self, window: &DateRangeWindow) {
        self.extent_size = window.duration_days().round().max(1.0) as u32;
        if let Some(domain) = ActiveDomain::from_extent_days(self.extent_size) {
            self.active_domain = domain;
        }
    }

    pub fn validate(&self) -> ModalResult<()> {
        if self.bin_size_ms <= 0 {
            return Err(ModalError::configuration_with_context(
                "bin size must be positive",
                ErrorContext::new("validate_chart_prefs")
                    .with_field("chart.bin_size_ms")
                    .with_details(format!("got {}", self.bin_size_ms)),
            ));
        }
        if self.extent_size == 0 {
            return Err(ModalError::configuration_with_context(
                "extent size must be at least one day",
                ErrorContext::new("validate_chart_prefs").with_field("chart.extent_size"),
            ));
        }
        Ok(())
    }
}

/// Glucose range classification of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BgClass {
    VeryLow,
    Low,
    Target,
    High,
    VeryHigh,
}

/// Upper boundaries of the glucose classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BgClasses {
    pub very_low: f64,
    pub low: f64,
    pub target: f64,
    pub high: f64,
}

impl BgClasses {
    pub fn default_for(units: GlucoseUnits) -> Self {
        match units {
            GlucoseUnits::MgDl => Self {
                very_low: 55.0,
                low: 70.0,
                target: 180.0,
                high: 300.0,
            },
            GlucoseUnits::MmolL => Self {
                very_low: 3.1,
                low: 3.9,
                target: 10.0,
                high: 16.7,
            },
        }
    }

    pub fn classify(&self, value: f64) -> BgClass {
        if value < self.very_low {
            BgClass::VeryLow
        } else if value < self.low {
            BgClass::Low
        } else if value <= self.target {
            BgClass::Target
        } else if value <= self.high {
            BgClass::High
        } else {
            BgClass::VeryHigh
        }
    }

    pub fn validate(&self) -> ModalResult<()> {
        let bounds = [self.very_low, self.low, self.target, self.high];
        if bounds.iter().any(|b| !b.is_finite()) || bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ModalError::configuration_with_context(
                "glucose class boundaries must be finite and strictly ascending",
                ErrorContext::new("validate_bg_classes")
                    .with_field("bg.classes")
                    .with_details(format!("{:?}", bounds)),
            ));
        }
        Ok(())
    }
}

/// Glucose display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BgPrefs {
    #[serde(default)]
    pub units: GlucoseUnits,
    /// Overrides the unit-specific default boundaries
    #[serde(default)]
    pub classes: Option<BgClasses>,
}

impl BgPrefs {
    pub fn classes(&self) -> BgClasses {
        self.classes
            .unwrap_or_else(|| BgClasses::default_for(self.units))
    }
}

/// Timezone display preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimePrefs {
    #[serde(default)]
    pub timezone_aware: bool,
    #[serde(default)]
    pub timezone_name: Option<String>,
}

impl TimePrefs {
    pub fn utc() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            timezone_aware: true,
            timezone_name: Some(name.into()),
        }
    }

    /// The zone used for local-day boundaries.
    pub fn timezone(&self) -> ModalResult<Tz> {
        resolve_timezone(self.timezone_aware, self.timezone_name.as_deref())
    }
}
