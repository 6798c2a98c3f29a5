use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::core::domain::{DateRangeWindow, DayOfWeek, MS_PER_DAY};
use crate::error::{ErrorContext, ModalError, ModalResult};

/// Resolve the timezone used for local-day boundaries.
///
/// Timezone-unaware display, or an aware display without a zone name, falls
/// back to UTC.
///
/// # Arguments
/// * `timezone_aware` - whether the user asked for local-time display
/// * `timezone_name` - IANA zone name, e.g. `"US/Pacific"`
///
/// # Returns
/// * `Ok(Tz)` - the resolved zone
/// * `Err(ModalError::Configuration)` - if the name is not a known zone
pub fn resolve_timezone(timezone_aware: bool, timezone_name: Option<&str>) -> ModalResult<Tz> {
    if !timezone_aware {
        return Ok(Tz::UTC);
    }
    match timezone_name.map(str::trim).filter(|n| !n.is_empty()) {
        None => Ok(Tz::UTC),
        Some(name) => name.parse::<Tz>().map_err(|e| {
            ModalError::configuration_with_context(
                format!("unknown timezone '{}'", name),
                ErrorContext::new("resolve_timezone")
                    .with_field("timezone_name")
                    .with_details(e.to_string()),
            )
        }),
    }
}

/// Milliseconds since local midnight and local day of week for `instant`.
///
/// Uses wall-clock time, so on DST transition days the value reflects the
/// clock reading rather than the elapsed time since midnight.
pub fn local_clock(instant: DateTime<Utc>, tz: Tz) -> (u32, DayOfWeek) {
    let local = instant.with_timezone(&tz);
    // nanosecond() exceeds 1e9 during a leap second
    let millis = (local.nanosecond() / 1_000_000).min(999);
    let ms_per_24 = local.num_seconds_from_midnight() * 1000 + millis;
    debug_assert!((ms_per_24 as i64) < MS_PER_DAY);
    (ms_per_24, DayOfWeek::from(local.weekday()))
}

/// The instant local `date` begins in `tz`.
///
/// A midnight skipped by a DST gap resolves to the first valid local time after it.
fn local_day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut candidate = date.and_time(NaiveTime::MIN);
    for _ in 0..4 {
        if let Some(start) = tz.from_local_datetime(&candidate).earliest() {
            return start.with_timezone(&Utc);
        }
        candidate += Duration::minutes(30);
    }
    // No zone skips more than two hours
    log::warn!(
        "no valid local start for {} in {}, using UTC midnight",
        date,
        tz.name()
    );
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Start of the local day following the one containing `instant` in `tz`.
///
/// An instant exactly at local midnight still moves to the next midnight, so
/// the day it opens stays inside an end-exclusive window ending at the result.
pub fn ceil_to_day(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = instant.with_timezone(&tz).date_naive();
    match date.succ_opt() {
        Some(next) => local_day_start(next, tz),
        None => instant,
    }
}

/// Window of `extent_days` days ending at the ceiling of `anchor`.
///
/// The start steps back in whole 24-hour UTC days from the ceiling, so across a
/// DST change the start is not necessarily a local midnight.
pub fn window_ending_at(
    anchor: DateTime<Utc>,
    extent_days: u32,
    tz: Tz,
) -> ModalResult<DateRangeWindow> {
    if extent_days == 0 {
        return Err(ModalError::invalid_argument_with_context(
            "extent size must be at least one day",
            ErrorContext::new("window_ending_at").with_field("extent_days"),
        ));
    }
    let end = ceil_to_day(anchor, tz);
    let start = end - Duration::days(extent_days as i64);
    DateRangeWindow::new(start, end)
}

/// Human-readable title for a window, e.g. `"Jan 2, 2020 - Jan 15, 2020"`.
///
/// The end bound is exclusive, so the last displayed date is one day before it.
pub fn format_window_title(window: &DateRangeWindow, tz: Tz) -> String {
    let last = window.end() - Duration::days(1);
    format!(
        "{} - {}",
        window.start().with_timezone(&tz).format("%b %-d, %Y"),
        last.with_timezone(&tz).format("%b %-d, %Y")
    )
}

/// Compact clock label for an hour of the day: `12a`, `3a`, `12p`, `9p`.
pub fn format_hour_label(hour: u32) -> String {
    match hour % 24 {
        0 => "12a".to_string(),
        h if h < 12 => format!("{}a", h),
        12 => "12p".to_string(),
        h => format!("{}p", h - 12),
    }
}
