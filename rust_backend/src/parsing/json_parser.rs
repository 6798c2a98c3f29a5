use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::core::domain::{GlucoseUnits, Reading, ReadingKind};
use crate::error::{ErrorContext, ModalError, ModalResult};

/// Custom deserializer that accepts either string or integer record ids
fn deserialize_record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => Ok(s),
        StringOrInt::Int(i) => Ok(i.to_string()),
    }
}

/// Raw JSON structure for one device record
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(deserialize_with = "deserialize_record_id")]
    id: String,
    #[serde(rename = "type")]
    kind: String,
    time: String,
    value: f64,
    units: Option<String>,
}

/// Readings ingested from a device data export.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub cbg: Vec<Reading>,
    pub smbg: Vec<Reading>,
    /// Glucose records dropped because they could not be read
    pub skipped: usize,
}

impl IngestedData {
    pub fn len(&self) -> usize {
        self.cbg.len() + self.smbg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cbg.is_empty() && self.smbg.is_empty()
    }
}

fn parse_units(raw: &str) -> Result<GlucoseUnits> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mg/dl" => Ok(GlucoseUnits::MgDl),
        "mmol/l" => Ok(GlucoseUnits::MmolL),
        other => anyhow::bail!("unknown glucose units '{}'", other),
    }
}

/// Turn one raw record into a reading; `Ok(None)` for non-glucose types.
fn convert_record(raw: RawRecord, units: GlucoseUnits, tz: Tz) -> Result<Option<Reading>> {
    let kind = match raw.kind.as_str() {
        "cbg" => ReadingKind::Cbg,
        "smbg" => ReadingKind::Smbg,
        _ => return Ok(None),
    };

    let timestamp = DateTime::parse_from_rfc3339(&raw.time)
        .with_context(|| format!("invalid time '{}'", raw.time))?
        .with_timezone(&Utc);

    if !raw.value.is_finite() || raw.value < 0.0 {
        anyhow::bail!("invalid glucose value {}", raw.value);
    }
    let value = match raw.units.as_deref() {
        Some(from) => units.convert_from(raw.value, parse_units(from)?),
        None => raw.value,
    };

    Ok(Some(Reading::new(raw.id, kind, value, timestamp, tz)))
}

fn ingest_str(json_str: &str, units: GlucoseUnits, tz: Tz) -> Result<IngestedData> {
    let json_value: serde_json::Value = serde_json::from_str(json_str).with_context(|| {
        let preview: String = json_str.chars().take(200).collect();
        format!("Invalid JSON syntax. First 200 chars: {}", preview)
    })?;

    let records = match json_value {
        serde_json::Value::Array(records) => records,
        other => anyhow::bail!(
            "device data must be a JSON array of records, found {}",
            match other {
                serde_json::Value::Object(_) => "an object",
                _ => "a scalar",
            }
        ),
    };

    let mut data = IngestedData::default();
    for (idx, record) in records.into_iter().enumerate() {
        // Non-glucose records may have any shape
        let is_glucose = matches!(
            record.get("type").and_then(|t| t.as_str()),
            Some("cbg") | Some("smbg")
        );
        if !is_glucose {
            continue;
        }

        let reading = serde_path_to_error::deserialize::<_, RawRecord>(record)
            .with_context(|| format!("malformed record at index {}", idx))
            .and_then(|raw| {
                convert_record(raw, units, tz)
                    .with_context(|| format!("unusable record at index {}", idx))
            });

        match reading {
            Ok(Some(reading)) => match reading.kind {
                ReadingKind::Cbg => data.cbg.push(reading),
                ReadingKind::Smbg => data.smbg.push(reading),
            },
            Ok(None) => {}
            Err(e) => {
                log::warn!("skipping glucose record: {:#}", e);
                data.skipped += 1;
            }
        }
    }

    log::debug!(
        "ingested {} cbg and {} smbg readings ({} skipped)",
        data.cbg.len(),
        data.smbg.len(),
        data.skipped
    );
    Ok(data)
}

/// Parse device records from a JSON string.
///
/// Records whose `type` is neither `cbg` nor `smbg` are ignored. Glucose
/// records that cannot be read are skipped with a warning and counted in
/// [`IngestedData::skipped`]. Values are converted into `units`; a record
/// without `units` is taken to be in `units` already.
///
/// # Arguments
/// * `json_str` - a JSON array of `{id, type, time, value, units?}` objects
/// * `units` - display units to convert into
/// * `tz` - timezone the clock position of each reading is derived in
pub fn parse_readings_json_str(
    json_str: &str,
    units: GlucoseUnits,
    tz: Tz,
) -> ModalResult<IngestedData> {
    ingest_str(json_str, units, tz).map_err(|e| {
        ModalError::parse_with_context(
            format!("{:#}", e),
            ErrorContext::new("parse_readings_json_str"),
        )
    })
}

/// Parse device records from a JSON file.
pub fn parse_readings_json(
    json_path: &Path,
    units: GlucoseUnits,
    tz: Tz,
) -> ModalResult<IngestedData> {
    std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))
        .and_then(|content| ingest_str(&content, units, tz))
        .map_err(|e| {
            ModalError::parse_with_context(
                format!("{:#}", e),
                ErrorContext::new("parse_readings_json")
                    .with_details(json_path.display().to_string()),
            )
        })
}
