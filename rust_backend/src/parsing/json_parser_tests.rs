#[cfg(test)]
mod tests {
    use crate::core::domain::{DayOfWeek, GlucoseUnits, ReadingKind};
    use crate::parsing::json_parser::{parse_readings_json, parse_readings_json_str};
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"[
        {"id": "c1", "type": "cbg", "time": "2020-01-15T10:00:00.000Z", "value": 120},
        {"id": 42, "type": "smbg", "time": "2020-01-14T07:30:00Z", "value": 6.5, "units": "mmol/L"},
        {"id": "b1", "type": "bolus", "time": "2020-01-14T07:31:00Z", "normal": 2.5},
        {"id": "c2", "type": "cbg", "time": "2020-01-15T10:05:00+01:00", "value": 140, "units": "mg/dL"}
    ]"#;

    /// Test parsing a mixed export
    #[test]
    fn test_parse_mixed_records() {
        let data = parse_readings_json_str(SAMPLE, GlucoseUnits::MgDl, Tz::UTC).unwrap();

        assert_eq!(data.cbg.len(), 2);
        assert_eq!(data.smbg.len(), 1);
        assert_eq!(data.skipped, 0);
        assert_eq!(data.len(), 3);

        let c1 = &data.cbg[0];
        assert_eq!(c1.id, "c1");
        assert_eq!(c1.kind, ReadingKind::Cbg);
        assert_eq!(c1.timestamp, Utc.with_ymd_and_hms(2020, 1, 15, 10, 0, 0).unwrap());
        assert_eq!(c1.ms_per_24, 36_000_000);
        assert_eq!(c1.day_of_week, DayOfWeek::Wednesday);

        // 6.5 * 18.01559 = 117.1
        let s = &data.smbg[0];
        assert_eq!(s.id, "42");
        assert_eq!(s.value, 117.0);
    }

    /// Test that offsets are normalized to UTC
    #[test]
    fn test_offset_times_normalized() {
        let data = parse_readings_json_str(SAMPLE, GlucoseUnits::MgDl, Tz::UTC).unwrap();
        let c2 = &data.cbg[1];
        assert_eq!(c2.timestamp, Utc.with_ymd_and_hms(2020, 1, 15, 9, 5, 0).unwrap());
        assert_eq!(c2.value, 140.0);
    }

    /// Test conversion into mmol/L
    #[test]
    fn test_convert_to_mmol() {
        let data = parse_readings_json_str(SAMPLE, GlucoseUnits::MmolL, Tz::UTC).unwrap();
        assert_eq!(data.smbg[0].value, 6.5);
        assert!((data.cbg[1].value - 140.0 / 18.01559).abs() < 1e-12);
    }

    /// Test clock fields follow the requested timezone
    #[test]
    fn test_clock_in_timezone() {
        let data =
            parse_readings_json_str(SAMPLE, GlucoseUnits::MgDl, Tz::America__Los_Angeles).unwrap();
        // 10:00Z is 02:00 PST
        assert_eq!(data.cbg[0].ms_per_24, 7_200_000);
        assert_eq!(data.cbg[0].day_of_week, DayOfWeek::Wednesday);
    }

    /// Test malformed glucose records are skipped, not fatal
    #[test]
    fn test_skips_bad_records() {
        let json = r#"[
            {"id": "ok", "type": "cbg", "time": "2020-01-15T10:00:00Z", "value": 100},
            {"id": "no-time", "type": "cbg", "value": 100},
            {"id": "bad-time", "type": "cbg", "time": "yesterday", "value": 100},
            {"id": "negative", "type": "smbg", "time": "2020-01-15T10:00:00Z", "value": -3},
            {"id": "weird-units", "type": "smbg", "time": "2020-01-15T10:00:00Z", "value": 3, "units": "furlongs"}
        ]"#;
        let data = parse_readings_json_str(json, GlucoseUnits::MgDl, Tz::UTC).unwrap();
        assert_eq!(data.cbg.len(), 1);
        assert!(data.smbg.is_empty());
        assert_eq!(data.skipped, 4);
    }

    /// Test an empty export
    #[test]
    fn test_empty_array() {
        let data = parse_readings_json_str("[]", GlucoseUnits::MgDl, Tz::UTC).unwrap();
        assert!(data.is_empty());
    }

    /// Test invalid JSON syntax
    #[test]
    fn test_invalid_json() {
        let err = parse_readings_json_str("[{", GlucoseUnits::MgDl, Tz::UTC).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON syntax"));
        assert_eq!(
            err.context().operation.as_deref(),
            Some("parse_readings_json_str")
        );
    }

    /// Test a top-level object is rejected
    #[test]
    fn test_object_rejected() {
        let err = parse_readings_json_str(r#"{"cbg": []}"#, GlucoseUnits::MgDl, Tz::UTC)
            .unwrap_err();
        assert!(err.to_string().contains("found an object"));
    }

    /// Test reading from a file
    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let data = parse_readings_json(file.path(), GlucoseUnits::MgDl, Tz::UTC).unwrap();
        assert_eq!(data.len(), 3);
    }

    /// Test a missing file
    #[test]
    fn test_missing_file() {
        let path = std::path::Path::new("/nonexistent/device_data.json");
        let err = parse_readings_json(path, GlucoseUnits::MgDl, Tz::UTC).unwrap_err();
        assert!(err.to_string().contains("Failed to read JSON file"));
    }
}
