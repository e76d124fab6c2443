use crate::constants::{GEO_MAX_MEAN_MOTION, LEO_MIN_MEAN_MOTION, RECORD_WIDTH};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One object's orbital elements as received from upstream
pub type RawRecord = serde_json::Map<String, Value>;

/// Fixed-shape, quantized orbital elements for a single object.
///
/// Serializes as a 10-element positional array:
/// `[id, name, epoch, inclination, raan, eccentricity, arg_perigee,
/// mean_anomaly, mean_motion, bstar]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// NORAD catalog id, passed through exactly as received (`null` if absent)
    pub catalog_id: Value,
    pub object_name: String,
    pub epoch_unix_seconds: i64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_revs_per_day: f64,
    pub drag_term: f64,
}

impl NormalizedRecord {
    pub fn orbit_regime(&self) -> OrbitRegime {
        OrbitRegime::from_mean_motion(self.mean_motion_revs_per_day)
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(RECORD_WIDTH)?;
        tuple.serialize_element(&self.catalog_id)?;
        tuple.serialize_element(&self.object_name)?;
        tuple.serialize_element(&self.epoch_unix_seconds)?;
        tuple.serialize_element(&self.inclination_deg)?;
        tuple.serialize_element(&self.raan_deg)?;
        tuple.serialize_element(&self.eccentricity)?;
        tuple.serialize_element(&self.arg_perigee_deg)?;
        tuple.serialize_element(&self.mean_anomaly_deg)?;
        tuple.serialize_element(&self.mean_motion_revs_per_day)?;
        tuple.serialize_element(&self.drag_term)?;
        tuple.end()
    }
}

/// Why a raw record was left out of the output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("epoch missing or empty")]
    MissingEpoch,

    #[error("epoch could not be parsed: {value:?}")]
    InvalidEpoch { value: String },

    #[error("object name is not a string")]
    InvalidName,
}

impl SkipReason {
    /// Stable label used for counters and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::MissingEpoch => "missing_epoch",
            SkipReason::InvalidEpoch { .. } => "invalid_epoch",
            SkipReason::InvalidName => "invalid_name",
        }
    }
}

/// A numeric field that was present but could not be coerced, so it fell back to zero
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWarning {
    pub field: &'static str,
    pub value: Value,
}

/// Successful normalization plus any coercion warnings raised along the way
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: NormalizedRecord,
    pub warnings: Vec<FieldWarning>,
}

pub type RecordOutcome = std::result::Result<Normalized, SkipReason>;

/// Coarse orbit class derived from mean motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrbitRegime {
    Leo,
    Meo,
    Heo,
}

impl OrbitRegime {
    pub fn from_mean_motion(mean_motion: f64) -> Self {
        if mean_motion >= LEO_MIN_MEAN_MOTION {
            OrbitRegime::Leo
        } else if mean_motion > GEO_MAX_MEAN_MOTION {
            OrbitRegime::Meo
        } else {
            OrbitRegime::Heo
        }
    }
}

impl fmt::Display for OrbitRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrbitRegime::Leo => "LEO",
            OrbitRegime::Meo => "MEO",
            OrbitRegime::Heo => "HEO",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> NormalizedRecord {
        NormalizedRecord {
            catalog_id: json!(25544),
            object_name: "ISS (ZARYA)".to_string(),
            epoch_unix_seconds: 1705320000,
            inclination_deg: 51.6416,
            raan_deg: 247.4627,
            eccentricity: 0.0006703,
            arg_perigee_deg: 130.536,
            mean_anomaly_deg: 325.0288,
            mean_motion_revs_per_day: 15.72125391,
            drag_term: 0.0001027,
        }
    }

    #[test]
    fn test_serializes_as_positional_array() {
        let value = serde_json::to_value(sample()).unwrap();
        let items = value.as_array().expect("array");
        assert_eq!(items.len(), RECORD_WIDTH);
        assert_eq!(items[0], json!(25544));
        assert_eq!(items[1], json!("ISS (ZARYA)"));
        assert_eq!(items[2], json!(1705320000));
        assert_eq!(items[8], json!(15.72125391));
    }

    #[test]
    fn test_missing_catalog_id_serializes_as_null() {
        let mut record = sample();
        record.catalog_id = Value::Null;
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.starts_with("[null,\"ISS (ZARYA)\","));
    }

    #[test]
    fn test_orbit_regime_thresholds() {
        assert_eq!(OrbitRegime::from_mean_motion(15.5), OrbitRegime::Leo);
        assert_eq!(OrbitRegime::from_mean_motion(11.25), OrbitRegime::Leo);
        assert_eq!(OrbitRegime::from_mean_motion(2.0), OrbitRegime::Meo);
        assert_eq!(OrbitRegime::from_mean_motion(1.0027), OrbitRegime::Heo);
        assert_eq!(OrbitRegime::from_mean_motion(0.0), OrbitRegime::Heo);
    }

    #[test]
    fn test_skip_reason_kinds() {
        assert_eq!(SkipReason::MissingEpoch.kind(), "missing_epoch");
        let invalid = SkipReason::InvalidEpoch { value: "soon".into() };
        assert_eq!(invalid.kind(), "invalid_epoch");
        assert_eq!(invalid.to_string(), "epoch could not be parsed: \"soon\"");
    }
}
