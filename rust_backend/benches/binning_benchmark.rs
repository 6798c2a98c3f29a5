use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use modal_day::algorithms::bin_readings;
use modal_day::core::{ActiveDays, DayOfWeek, Reading, ReadingKind};
use modal_day::models::ModalConfig;
use modal_day::services::ModalDay;

/// Five-minute CGM readings over `days` days.
fn cgm_readings(days: i64) -> Vec<Reading> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    (0..days * 288)
        .map(|i| {
            let ts = start + Duration::minutes(5 * i);
            let value = 120.0 + 60.0 * ((i as f64) / 36.0).sin();
            Reading::new(format!("cbg-{}", i), ReadingKind::Cbg, value, ts, Tz::UTC)
        })
        .collect()
}

fn bench_bin_readings(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_readings");

    for days in [7i64, 14, 28] {
        let readings = cgm_readings(days);
        group.bench_with_input(BenchmarkId::new("30min", days), &readings, |b, input| {
            b.iter(|| bin_readings(black_box(input), black_box(1_800_000)));
        });
    }

    let readings = cgm_readings(28);
    group.bench_with_input(BenchmarkId::new("1h", 28), &readings, |b, input| {
        b.iter(|| bin_readings(black_box(input), black_box(3_600_000)));
    });

    group.finish();
}

fn bench_day_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let mut chart = ModalDay::new(cgm_readings(28), vec![], ModalConfig::default(), None).unwrap();
    let weekdays = ActiveDays::only(&[
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ]);
    let mut toggle = false;
    group.bench_function("toggle_weekends_and_frame", |b| {
        b.iter(|| {
            let mut prefs = chart.chart_prefs().clone();
            prefs.active_days = if toggle { ActiveDays::all() } else { weekdays };
            toggle = !toggle;
            chart.update_chart_prefs(prefs).unwrap();
            black_box(chart.frame().unwrap());
        });
    });

    group.bench_function("unchanged_frame", |b| {
        b.iter(|| black_box(chart.frame().unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_bin_readings, bench_day_toggle);
criterion_main!(benches);
