//! CBG slice geometry, one vertical set of segments per bin.

use serde::Serialize;

use crate::algorithms::binning::Bin;

use super::scales::LinearScale;

/// Vertical segment at a fixed x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CbgSlice {
    pub bin_key: i64,
    pub count: usize,
    /// min to max
    pub range: Segment,
    /// 10th to 90th percentile
    pub outer: Segment,
    /// first to third quartile
    pub quartile: Segment,
    pub median: (f64, f64),
}

/// Map each bin's summary through the chart scales.
pub fn cbg_slices(bins: &[Bin], x_scale: &LinearScale, y_scale: &LinearScale) -> Vec<CbgSlice> {
    bins.iter()
        .map(|bin| {
            let x = x_scale.scale(bin.key as f64);
            let segment = |low: f64, high: f64| Segment {
                x,
                y1: y_scale.scale(low),
                y2: y_scale.scale(high),
            };
            let stats = &bin.stats;
            CbgSlice {
                bin_key: bin.key,
                count: bin.len(),
                range: segment(stats.min, stats.max),
                outer: segment(stats.tenth_quantile, stats.ninetieth_quantile),
                quartile: segment(stats.first_quartile, stats.third_quartile),
                median: (x, y_scale.scale(stats.median)),
            }
        })
        .collect()
}
