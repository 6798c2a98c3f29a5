#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use modal_day::core::{Reading, ReadingKind};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Variables are restored on unwind, and access to the process environment is
/// serialized across tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn utc(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// A reading whose clock position is derived in UTC.
pub fn reading(id: &str, kind: ReadingKind, rfc3339: &str, value: f64) -> Reading {
    Reading::new(id, kind, value, utc(rfc3339), Tz::UTC)
}

/// Continuous readings spread over two weeks, plus one older outlier.
///
/// Inside `[2020-01-02, 2020-01-16)`: Mon 13th 08:10 (100), Tue 14th 08:20
/// (200), Wed 15th 10:00 (150). Outside it: Wed 1st 08:00 (300).
pub fn sample_cbg() -> Vec<Reading> {
    vec![
        reading("c-mon", ReadingKind::Cbg, "2020-01-13T08:10:00Z", 100.0),
        reading("c-tue", ReadingKind::Cbg, "2020-01-14T08:20:00Z", 200.0),
        reading("c-wed", ReadingKind::Cbg, "2020-01-15T10:00:00Z", 150.0),
        reading("c-old", ReadingKind::Cbg, "2020-01-01T08:00:00Z", 300.0),
    ]
}

/// Weekend finger sticks: Sat 11th and Sun 12th at noon.
pub fn sample_smbg() -> Vec<Reading> {
    vec![
        reading("s-sat", ReadingKind::Smbg, "2020-01-11T12:00:00Z", 60.0),
        reading("s-sun", ReadingKind::Smbg, "2020-01-12T12:00:00Z", 90.0),
    ]
}

pub fn ids(readings: &[Reading]) -> Vec<&str> {
    readings.iter().map(|r| r.id.as_str()).collect()
}
