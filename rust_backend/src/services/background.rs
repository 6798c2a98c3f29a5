//! Target-range background bands behind the modal-day chart.
//!
//! The day is split into eight 3-hour bands. Each band is drawn as three
//! stacked rectangles: above the target boundary, inside the target range
//! and below the low boundary.

use serde::Serialize;

use crate::models::prefs::BgClasses;

use super::scales::{ChartLayout, LinearScale};

/// Width of one band in milliseconds since midnight.
pub const BAND_MS: i64 = 10_800_000;

/// Number of bands across the day.
pub const BAND_COUNT: usize = 8;

/// Fill class for each band, left to right.
pub const FILL_CLASSES: [&str; BAND_COUNT] = [
    "d3-fill-darkest",
    "d3-fill-dark",
    "d3-fill-lighter",
    "d3-fill-light",
    "d3-fill-lightest",
    "d3-fill-lighter",
    "d3-fill-dark",
    "d3-fill-darker",
];

/// Vertical zone a rectangle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandZone {
    AboveTarget,
    InTarget,
    BelowTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandRect {
    pub band: usize,
    pub zone: BandZone,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_class: &'static str,
    /// In-target rectangles are drawn faded
    pub faded: bool,
}

/// Compute every background rectangle, grouped by zone: the eight above-target
/// rects, then in-target, then below-target.
pub fn background_rects(
    layout: &ChartLayout,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    classes: &BgClasses,
) -> Vec<BandRect> {
    let (x0, x1) = x_scale.range();
    let base_width = (x1 - x0) / BAND_COUNT as f64;
    let target_y = y_scale.scale(classes.target);
    let low_y = y_scale.scale(classes.low);

    let zones = [
        (
            BandZone::AboveTarget,
            layout.margins.top,
            target_y - layout.margins.top,
        ),
        (BandZone::InTarget, target_y, low_y - target_y),
        (
            BandZone::BelowTarget,
            low_y,
            layout.height - layout.margins.bottom - low_y,
        ),
    ];

    let mut rects = Vec::with_capacity(BAND_COUNT * zones.len());
    for (zone, y, height) in zones {
        for band in 0..BAND_COUNT {
            let x = if band == 0 {
                layout.margins.left
            } else {
                x_scale.scale((band as i64 * BAND_MS) as f64)
            };
            let width = if band == 0 || band == BAND_COUNT - 1 {
                base_width + layout.smbg_max_radius
            } else {
                base_width
            };
            rects.push(BandRect {
                band,
                zone,
                x,
                y,
                width,
                height,
                fill_class: FILL_CLASSES[band],
                faded: zone == BandZone::InTarget,
            });
        }
    }
    rects
}
