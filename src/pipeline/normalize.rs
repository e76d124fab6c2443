//! Maps loosely-typed OMM records onto quantized positional records.
//!
//! Every numeric element goes through [`numeric_field`], which never fails:
//! absent and uncoercible values both fall back to zero. Only the name and the
//! epoch can cause a record to be skipped.

use crate::constants::{ELEMENT_PRECISION, EPOCH, NORAD_CAT_ID, OBJECT_NAME};
use crate::types::{FieldWarning, Normalized, NormalizedRecord, RawRecord, RecordOutcome, SkipReason};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Result of reading one numeric element
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<'a> {
    Number(f64),
    Missing,
    NonNumeric(&'a Value),
}

impl Coerced<'_> {
    pub fn or_zero(&self) -> f64 {
        match self {
            Coerced::Number(v) => *v,
            Coerced::Missing | Coerced::NonNumeric(_) => 0.0,
        }
    }
}

/// Normalize one raw record, or say why it has to be skipped.
pub fn normalize_record(raw: &RawRecord) -> RecordOutcome {
    let catalog_id = raw.get(NORAD_CAT_ID).cloned().unwrap_or(Value::Null);
    let object_name = name_field(raw)?;
    let epoch_unix_seconds = epoch_field(raw)?;

    let mut warnings = Vec::new();
    let mut elements = [0.0_f64; 7];
    for (slot, (field, digits)) in elements.iter_mut().zip(ELEMENT_PRECISION) {
        let coerced = numeric_field(raw, field);
        if let Coerced::NonNumeric(value) = coerced {
            warnings.push(FieldWarning {
                field,
                value: value.clone(),
            });
        }
        *slot = round_to(coerced.or_zero(), digits);
    }
    let [inclination_deg, raan_deg, eccentricity, arg_perigee_deg, mean_anomaly_deg, mean_motion_revs_per_day, drag_term] =
        elements;

    Ok(Normalized {
        record: NormalizedRecord {
            catalog_id,
            object_name,
            epoch_unix_seconds,
            inclination_deg,
            raan_deg,
            eccentricity,
            arg_perigee_deg,
            mean_anomaly_deg,
            mean_motion_revs_per_day,
            drag_term,
        },
        warnings,
    })
}

/// Trimmed object name; an absent key becomes the empty string.
fn name_field(raw: &RawRecord) -> Result<String, SkipReason> {
    match raw.get(OBJECT_NAME) {
        None => Ok(String::new()),
        Some(Value::String(name)) => Ok(name.trim().to_string()),
        Some(_) => Err(SkipReason::InvalidName),
    }
}

fn epoch_field(raw: &RawRecord) -> Result<i64, SkipReason> {
    let text = match raw.get(EPOCH) {
        None | Some(Value::Null) => "",
        Some(Value::String(text)) => text.as_str(),
        Some(other) => {
            return Err(SkipReason::InvalidEpoch {
                value: other.to_string(),
            })
        }
    };
    if text.is_empty() {
        return Err(SkipReason::MissingEpoch);
    }
    parse_epoch(text).ok_or_else(|| SkipReason::InvalidEpoch {
        value: text.to_string(),
    })
}

/// Read a numeric element. Numbers pass through, numeric strings are parsed,
/// booleans become 1 or 0. Anything else, including non-finite values, is
/// reported as non-numeric.
pub fn numeric_field<'a>(raw: &'a RawRecord, field: &str) -> Coerced<'a> {
    let value = match raw.get(field) {
        None | Some(Value::Null) => return Coerced::Missing,
        Some(value) => value,
    };
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Coerced::Number(v),
        _ => Coerced::NonNumeric(value),
    }
}

/// Parse an ISO-8601-like epoch into whole Unix seconds.
///
/// A trailing `Z` means UTC; text without any offset is also taken as UTC.
/// Fractional seconds are truncated toward zero. The only whitespace allowed
/// is a single space used as the date/time separator.
pub fn parse_epoch(text: &str) -> Option<i64> {
    // chrono skips whitespace in the input, so padding has to be rejected up front
    let stray_space = text
        .char_indices()
        .any(|(i, c)| c.is_whitespace() && !(i == 10 && c == ' '));
    if stray_space {
        return None;
    }

    let rewritten;
    let text = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(stem) => {
            rewritten = format!("{}+00:00", stem);
            rewritten.as_str()
        }
        None => text,
    };

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(seconds_toward_zero(&dt));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(seconds_toward_zero(&Utc.from_utc_datetime(&naive)));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| seconds_toward_zero(&Utc.from_utc_datetime(&naive)))
}

// `timestamp()` floors; pre-1970 instants with a fractional part need one second added back.
fn seconds_toward_zero<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    let secs = dt.timestamp();
    if secs < 0 && dt.timestamp_subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Round to `digits` fractional decimal digits.
///
/// Goes through decimal formatting, which is correctly rounded, so the result
/// is the closest double to the decimal a reader would expect.
pub fn round_to(value: f64, digits: u32) -> f64 {
    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(value)
}
