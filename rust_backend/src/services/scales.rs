//! Domain to pixel mapping for the modal-day chart.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::domain::MS_PER_DAY;
use crate::error::{ErrorContext, ModalError, ModalResult};

/// Chart canvas width in pixels.
pub const SVG_WIDTH: f64 = 960.0;
/// Chart canvas height in pixels.
pub const SVG_HEIGHT: f64 = 689.0;
/// Padding between the plot edge and the glucose axis extremes.
pub const BUMPER: f64 = 30.0;
/// Largest radius an SMBG marker is drawn with.
pub const SMBG_MAX_RADIUS: f64 = 7.5;

/// Chart margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 10.0,
            bottom: 10.0,
            left: 40.0,
        }
    }
}

/// Continuous linear mapping from a numeric domain onto a pixel range.
///
/// The range may be inverted (`range.0 > range.1`), which is how the glucose
/// axis puts high values at the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Restrict outputs to the range.
    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn is_clamped(&self) -> bool {
        self.clamp
    }

    /// Map a domain value to a pixel.
    ///
    /// A degenerate domain (`d0 == d1`) maps everything to `range.0`.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let t = if d1 == d0 {
            0.0
        } else {
            (value - d0) / (d1 - d0)
        };
        interpolate(self.range, self.bounded(t))
    }

    /// Map a pixel back to a domain value.
    pub fn invert(&self, pixel: f64) -> f64 {
        let (r0, r1) = self.range;
        let t = if r1 == r0 {
            0.0
        } else {
            (pixel - r0) / (r1 - r0)
        };
        interpolate(self.domain, self.bounded(t))
    }

    fn bounded(&self, t: f64) -> f64 {
        if self.clamp {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }
}

// Exact at both endpoints, so a clamped value lands on the boundary pixel.
fn interpolate((a, b): (f64, f64), t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Linear scale over UTC instants, used by the week view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f64, f64)) -> Self {
        Self {
            start,
            end,
            inner: LinearScale::new((0.0, (end - start).num_milliseconds() as f64), range),
        }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    pub fn scale(&self, instant: DateTime<Utc>) -> f64 {
        self.inner
            .scale((instant - self.start).num_milliseconds() as f64)
    }

    pub fn invert(&self, pixel: f64) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.inner.invert(pixel).round() as i64)
    }
}

/// Pixel geometry of the modal-day chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub bumper_top: f64,
    pub bumper_bottom: f64,
    pub smbg_max_radius: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: SVG_WIDTH,
            height: SVG_HEIGHT,
            margins: Margins::default(),
            bumper_top: BUMPER,
            bumper_bottom: BUMPER,
            smbg_max_radius: SMBG_MAX_RADIUS,
        }
    }
}

impl ChartLayout {
    /// Validate a custom layout.
    pub fn new(width: f64, height: f64, margins: Margins) -> ModalResult<Self> {
        let layout = Self {
            width,
            height,
            margins,
            ..Self::default()
        };
        let (x0, x1) = layout.x_range();
        let (y_bottom, y_top) = layout.y_range();
        if x0 >= x1 || y_top >= y_bottom {
            return Err(ModalError::invalid_argument_with_context(
                "chart dimensions leave no room to plot",
                ErrorContext::new("chart_layout")
                    .with_details(format!("{}x{}", width, height)),
            ));
        }
        Ok(layout)
    }

    /// Horizontal pixel range for the time-of-day axis, inset by the rounded
    /// SMBG radius.
    pub fn x_range(&self) -> (f64, f64) {
        let inset = self.smbg_max_radius.round();
        (
            self.margins.left + inset,
            self.width - self.margins.right - inset,
        )
    }

    /// Vertical pixel range for the glucose axis, bottom first.
    pub fn y_range(&self) -> (f64, f64) {
        (
            self.height - self.margins.bottom - self.bumper_bottom,
            self.margins.top + self.bumper_top,
        )
    }

    /// Time-of-day axis over a full day; never clamped.
    pub fn x_scale(&self) -> LinearScale {
        LinearScale::new((0.0, MS_PER_DAY as f64), self.x_range())
    }

    /// Glucose axis over `domain`; clamped so outliers stay on the canvas.
    pub fn y_scale(&self, domain: (f64, f64)) -> LinearScale {
        LinearScale::new(domain, self.y_range()).clamped()
    }
}
