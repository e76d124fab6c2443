/// Field names used by CelesTrak's OMM/GP JSON format.
pub const NORAD_CAT_ID: &str = "NORAD_CAT_ID";
pub const OBJECT_NAME: &str = "OBJECT_NAME";
pub const EPOCH: &str = "EPOCH";
pub const INCLINATION: &str = "INCLINATION";
pub const RA_OF_ASC_NODE: &str = "RA_OF_ASC_NODE";
pub const ECCENTRICITY: &str = "ECCENTRICITY";
pub const ARG_OF_PERICENTER: &str = "ARG_OF_PERICENTER";
pub const MEAN_ANOMALY: &str = "MEAN_ANOMALY";
pub const MEAN_MOTION: &str = "MEAN_MOTION";
pub const BSTAR: &str = "BSTAR";

/// Numeric orbital elements in output order, with the number of fractional
/// digits each one keeps.
pub const ELEMENT_PRECISION: [(&str, u32); 7] = [
    (INCLINATION, 6),
    (RA_OF_ASC_NODE, 6),
    (ECCENTRICITY, 7),
    (ARG_OF_PERICENTER, 6),
    (MEAN_ANOMALY, 6),
    (MEAN_MOTION, 8),
    (BSTAR, 10),
];

/// Number of positional fields in a compacted record.
pub const RECORD_WIDTH: usize = 10;

pub const DEFAULT_SOURCE: &str = "active.json";
pub const DEFAULT_OUTPUT: &str = "minified.json";
pub const DEFAULT_CONFIG_FILE: &str = "omm_compactor.toml";

pub const SOURCE_ENV: &str = "OMM_SOURCE";
pub const OUTPUT_ENV: &str = "OMM_OUTPUT";

// Mean motion thresholds in revolutions per day.
pub const LEO_MIN_MEAN_MOTION: f64 = 11.25;
pub const GEO_MAX_MEAN_MOTION: f64 = 1.0027;
