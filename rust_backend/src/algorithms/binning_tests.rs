#[cfg(test)]
mod tests {
    use crate::algorithms::binning::{bin_key, bin_readings, Binner, DEFAULT_BIN_SIZE_MS};
    use crate::core::domain::{DayOfWeek, Reading, ReadingKind};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn reading(id: &str, value: f64, ms_per_24: u32) -> Reading {
        Reading::with_clock(
            id,
            ReadingKind::Cbg,
            value,
            Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap()
                + chrono::Duration::milliseconds(ms_per_24 as i64),
            ms_per_24,
            DayOfWeek::Wednesday,
        )
    }

    #[test]
    fn test_bin_key_centers_window() {
        assert_eq!(bin_key(1_000_000, DEFAULT_BIN_SIZE_MS), 900_000);
        assert_eq!(bin_key(1_700_000, DEFAULT_BIN_SIZE_MS), 900_000);
        assert_eq!(bin_key(1_800_001, DEFAULT_BIN_SIZE_MS), 2_700_000);
    }

    #[test]
    fn test_bin_key_boundary_joins_earlier_bin() {
        assert_eq!(bin_key(1_800_000, DEFAULT_BIN_SIZE_MS), 900_000);
    }

    #[test]
    fn test_bin_key_midnight() {
        assert_eq!(bin_key(0, DEFAULT_BIN_SIZE_MS), -900_000);
    }

    #[test]
    fn test_bin_key_odd_width_rounds_center_up() {
        assert_eq!(bin_key(1, 3), 2);
        assert_eq!(bin_key(4, 3), 5);
    }

    #[test]
    fn test_bin_key_widest_width() {
        assert_eq!(bin_key(1_000_000, i64::MAX), i64::MAX - i64::MAX / 2);
        assert_eq!(bin_key(0, i64::MAX), -(i64::MAX / 2));
    }

    #[test]
    fn test_bin_readings_widest_width_single_bin() {
        let readings = vec![reading("a", 100.0, 1_000_000), reading("b", 140.0, 86_399_999)];
        let bins = bin_readings(&readings, i64::MAX).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].key, i64::MAX - i64::MAX / 2);
        assert_eq!(bins[0].len(), 2);
    }

    #[test]
    fn test_bin_key_last_bin_of_day() {
        assert_eq!(bin_key(86_399_999, DEFAULT_BIN_SIZE_MS), 85_500_000);
    }

    #[test]
    fn test_worked_example_single_bin() {
        let readings = vec![
            reading("a", 100.0, 1_000_000),
            reading("b", 200.0, 1_000_000),
            reading("c", 150.0, 1_700_000),
        ];
        let bins = bin_readings(&readings, DEFAULT_BIN_SIZE_MS).unwrap();

        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].key, 900_000);
        assert_eq!(bins[0].len(), 3);
        assert_eq!(bins[0].stats.min, 100.0);
        assert_eq!(bins[0].stats.median, 150.0);
        assert_eq!(bins[0].stats.max, 200.0);
    }

    #[test]
    fn test_bins_sorted_and_only_non_empty() {
        let readings = vec![
            reading("late", 180.0, 80_000_000),
            reading("early", 90.0, 100),
            reading("mid", 120.0, 43_200_000),
        ];
        let bins = bin_readings(&readings, DEFAULT_BIN_SIZE_MS).unwrap();

        assert_eq!(bins.len(), 3);
        let keys: Vec<i64> = bins.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![900_000, 42_300_000, 80_100_000]);
    }

    #[test]
    fn test_members_keep_input_order() {
        let readings = vec![
            reading("x", 300.0, 10),
            reading("y", 100.0, 20),
            reading("z", 200.0, 30),
        ];
        let bins = bin_readings(&readings, DEFAULT_BIN_SIZE_MS).unwrap();
        let ids: Vec<&str> = bins[0].members.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_empty_input_yields_no_bins() {
        assert!(bin_readings(&[], DEFAULT_BIN_SIZE_MS).unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_width_rejected() {
        let readings = vec![reading("a", 100.0, 10)];
        assert!(bin_readings(&readings, 0).unwrap_err().is_invalid_argument());
        assert!(bin_readings(&[], -5).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_hourly_bins() {
        let readings = vec![reading("a", 100.0, 3_600_000), reading("b", 110.0, 3_600_001)];
        let bins = bin_readings(&readings, 3_600_000).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].key, 1_800_000);
        assert_eq!(bins[1].key, 5_400_000);
    }

    #[test]
    fn test_binner_reuses_same_snapshot() {
        let snapshot: Arc<[Reading]> = Arc::from(vec![reading("a", 100.0, 10)]);
        let mut binner = Binner::new(DEFAULT_BIN_SIZE_MS).unwrap();

        let first = binner.bins_for(&snapshot).unwrap();
        let second = binner.bins_for(&snapshot).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(binner.recomputations(), 1);
    }

    #[test]
    fn test_binner_recomputes_on_new_identity() {
        let readings = vec![reading("a", 100.0, 10)];
        let first: Arc<[Reading]> = Arc::from(readings.clone());
        let second: Arc<[Reading]> = Arc::from(readings);
        let mut binner = Binner::new(DEFAULT_BIN_SIZE_MS).unwrap();

        let a = binner.bins_for(&first).unwrap();
        let b = binner.bins_for(&second).unwrap();

        assert_eq!(binner.recomputations(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_binner_recomputes_on_width_change() {
        let snapshot: Arc<[Reading]> = Arc::from(vec![reading("a", 100.0, 10)]);
        let mut binner = Binner::new(DEFAULT_BIN_SIZE_MS).unwrap();
        binner.bins_for(&snapshot).unwrap();

        binner.set_bin_size(DEFAULT_BIN_SIZE_MS).unwrap();
        binner.bins_for(&snapshot).unwrap();
        assert_eq!(binner.recomputations(), 1);

        binner.set_bin_size(3_600_000).unwrap();
        let bins = binner.bins_for(&snapshot).unwrap();
        assert_eq!(binner.recomputations(), 2);
        assert_eq!(bins[0].key, 1_800_000);
    }

    #[test]
    fn test_binner_rejects_bad_width() {
        assert!(Binner::new(0).is_err());
        let mut binner = Binner::new(DEFAULT_BIN_SIZE_MS).unwrap();
        assert!(binner.set_bin_size(-1).is_err());
        assert_eq!(binner.bin_size_ms(), DEFAULT_BIN_SIZE_MS);
    }
}
