//! Property tests for binning, filtering and scale mapping.

use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;

use modal_day::algorithms::{bin_key, bin_readings};
use modal_day::core::{ActiveDays, DateRangeWindow, DayOfWeek, Reading, ReadingKind};
use modal_day::services::ChartLayout;
use modal_day::transformations::ActivityFilter;

/// Readings spread over sixty days from 2020-01-01.
fn readings_strategy(max_len: usize) -> impl Strategy<Value = Vec<Reading>> {
    prop::collection::vec((0i64..60, 0i64..86_400_000, 0.0f64..600.0), 0..max_len).prop_map(
        |rows| {
            let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (day, ms, value))| {
                    let ts = base + Duration::days(day) + Duration::milliseconds(ms);
                    Reading::new(format!("r{}", i), ReadingKind::Cbg, value, ts, Tz::UTC)
                })
                .collect()
        },
    )
}

fn active_days_strategy() -> impl Strategy<Value = ActiveDays> {
    prop::collection::vec(any::<bool>(), 7).prop_map(|flags| {
        let days: Vec<DayOfWeek> = DayOfWeek::ALL
            .iter()
            .zip(flags)
            .filter(|(_, on)| *on)
            .map(|(day, _)| *day)
            .collect();
        ActiveDays::only(&days)
    })
}

fn window_strategy() -> impl Strategy<Value = DateRangeWindow> {
    (0i64..60, 1i64..30).prop_map(|(start_day, len)| {
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let start = base + Duration::days(start_day);
        DateRangeWindow::new(start, start + Duration::days(len)).unwrap()
    })
}

proptest! {
    #[test]
    fn bins_partition_input(readings in readings_strategy(200), width in 1i64..7_200_000) {
        let bins = bin_readings(&readings, width).unwrap();

        let total: usize = bins.iter().map(|b| b.len()).sum();
        prop_assert_eq!(total, readings.len());
        for bin in &bins {
            prop_assert!(!bin.is_empty());
            for member in &bin.members {
                prop_assert_eq!(bin_key(member.ms_per_24, width), bin.key);
            }
        }
        for pair in bins.windows(2) {
            prop_assert!(pair[0].key < pair[1].key);
        }
    }

    #[test]
    fn bin_statistics_are_ordered(readings in readings_strategy(200), width in 60_000i64..7_200_000) {
        for bin in bin_readings(&readings, width).unwrap() {
            let s = bin.stats.as_array();
            for pair in s.windows(2) {
                prop_assert!(pair[0] <= pair[1], "{:?}", s);
            }
        }
    }

    #[test]
    fn binning_is_idempotent(readings in readings_strategy(100), width in 1i64..7_200_000) {
        prop_assert_eq!(
            bin_readings(&readings, width).unwrap(),
            bin_readings(&readings, width).unwrap()
        );
    }

    #[test]
    fn day_and_date_filters_commute(
        readings in readings_strategy(100),
        days in active_days_strategy(),
        window in window_strategy(),
    ) {
        let mut days_first =
            ActivityFilter::new(readings.clone(), vec![], ActiveDays::all(), 14, Tz::UTC, None).unwrap();
        days_first.set_active_days(days);
        days_first.apply();
        days_first.set_date_range(window);
        let a = days_first.current_view(ReadingKind::Cbg);

        let mut range_first =
            ActivityFilter::new(readings.clone(), vec![], ActiveDays::all(), 14, Tz::UTC, None).unwrap();
        range_first.set_date_range(window);
        range_first.apply();
        range_first.set_active_days(days);
        let b = range_first.current_view(ReadingKind::Cbg);

        prop_assert_eq!(&a[..], &b[..]);

        let mut expected: Vec<Reading> = readings
            .into_iter()
            .filter(|r| window.contains(r.timestamp) && days.includes(r))
            .collect();
        expected.sort_by_key(|r| r.timestamp);
        prop_assert_eq!(a.len(), expected.len());
        for (got, want) in a.iter().zip(&expected) {
            prop_assert_eq!(got.timestamp, want.timestamp);
        }
    }

    #[test]
    fn glucose_axis_clamps_to_top_pixel(lo in 0.0f64..300.0, span in 1.0f64..300.0, over in 0.0f64..500.0) {
        let layout = ChartLayout::default();
        let y = layout.y_scale((lo, lo + span));
        let (bottom, top) = layout.y_range();
        prop_assert_eq!(y.scale(lo + span + over), top);
        prop_assert_eq!(y.scale(lo - over - 1.0), bottom);
    }
}

#[test]
fn empty_input_has_no_bins() {
    assert!(bin_readings(&[], 1_800_000).unwrap().is_empty());
}
