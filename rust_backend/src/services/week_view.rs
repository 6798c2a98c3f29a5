//! Printable week view: both streams plotted on a continuous time axis.

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::core::domain::{DateRangeWindow, Reading, ReadingKind};
use crate::time::format_hour_label;
use crate::transformations::filtering::ReadingIndex;

use super::scales::{LinearScale, Margins, TimeScale};

const HOUR_TICK_HOURS: i64 = 3;

/// Page geometry of the week view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekLayout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Glucose axis domain in mg/dL
    pub y_domain: (f64, f64),
}

impl Default for WeekLayout {
    fn default() -> Self {
        Self {
            width: 1300.0,
            height: 340.0,
            margins: Margins {
                top: 40.0,
                right: 0.0,
                bottom: 0.0,
                left: 67.0,
            },
            y_domain: (0.0, 400.0),
        }
    }
}

impl WeekLayout {
    pub fn x_scale(&self, range: &DateRangeWindow) -> TimeScale {
        TimeScale::new(
            range.start(),
            range.end(),
            (0.0, self.width - self.margins.left - self.margins.right),
        )
    }

    pub fn y_scale(&self) -> LinearScale {
        LinearScale::new(self.y_domain, (self.height, 0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPoint {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Axis tick; the tick at the range end carries no label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekTick {
    pub at: DateTime<Utc>,
    pub x: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub range: DateRangeWindow,
    pub x_scale: TimeScale,
    pub y_scale: LinearScale,
    pub cbg: Vec<WeekPoint>,
    pub smbg: Vec<WeekPoint>,
    /// One tick per day, labelled like `Mon 6`
    pub day_ticks: Vec<WeekTick>,
    /// One tick every three hours, every other one labelled
    pub hour_ticks: Vec<WeekTick>,
}

/// Lay out the readings inside `range`, ascending by time.
pub fn week_view(
    cbg: &[Reading],
    smbg: &[Reading],
    range: DateRangeWindow,
    layout: &WeekLayout,
    tz: Tz,
) -> WeekView {
    let x_scale = layout.x_scale(&range);
    let y_scale = layout.y_scale();

    let points = |kind: ReadingKind, readings: &[Reading]| -> Vec<WeekPoint> {
        let mut index = ReadingIndex::new(kind, readings.to_vec());
        index.filter_range(Some(range));
        index
            .matching()
            .into_iter()
            .map(|r| WeekPoint {
                x: x_scale.scale(r.timestamp),
                y: y_scale.scale(r.value),
                timestamp: r.timestamp,
                value: r.value,
                id: r.id,
            })
            .collect()
    };
    let cbg = points(ReadingKind::Cbg, cbg);
    let smbg = points(ReadingKind::Smbg, smbg);

    let day_ticks = ticks(&range, &x_scale, Duration::days(1), |at, _| {
        Some(at.with_timezone(&tz).format("%a %-d").to_string())
    });
    let hour_ticks = ticks(&range, &x_scale, Duration::hours(HOUR_TICK_HOURS), |at, i| {
        (i % 2 == 0).then(|| format_hour_label(at.with_timezone(&tz).hour()))
    });

    log::debug!(
        "week view {} - {}: {} cbg, {} smbg",
        range.start(),
        range.end(),
        cbg.len(),
        smbg.len()
    );

    WeekView {
        range,
        x_scale,
        y_scale,
        cbg,
        smbg,
        day_ticks,
        hour_ticks,
    }
}

fn ticks(
    range: &DateRangeWindow,
    x_scale: &TimeScale,
    step: Duration,
    label: impl Fn(DateTime<Utc>, usize) -> Option<String>,
) -> Vec<WeekTick> {
    let mut out = Vec::new();
    let mut at = range.start();
    let mut i = 0;
    while at <= range.end() {
        out.push(WeekTick {
            at,
            x: x_scale.scale(at),
            label: if at == range.end() { None } else { label(at, i) },
        });
        at += step;
        i += 1;
    }
    out
}
