pub mod encode;
pub mod normalize;
pub mod report;
pub mod source;

use crate::app::ports::HttpClientPort;
use crate::error::Result;
use crate::types::{NormalizedRecord, OrbitRegime, RawRecord};
use encode::EncodedArtifact;
use metrics::{counter, histogram};
use report::SizeReport;
use source::{SourceLoader, SourceLocator};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Normalized records in input order, plus what was dropped or defaulted on the way
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<NormalizedRecord>,
    /// Skipped record counts keyed by [`SkipReason::kind`](crate::types::SkipReason::kind)
    pub skipped: BTreeMap<&'static str, usize>,
    /// Non-numeric values that fell back to zero, keyed by field name
    pub field_warnings: BTreeMap<&'static str, usize>,
    pub regimes: BTreeMap<OrbitRegime, usize>,
}

impl NormalizedBatch {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Normalize every raw record, keeping survivors in their original order.
pub fn normalize_all(raw_records: &[RawRecord]) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        records: Vec::with_capacity(raw_records.len()),
        ..Default::default()
    };

    for (i, raw) in raw_records.iter().enumerate() {
        match normalize::normalize_record(raw) {
            Ok(normalized) => {
                for warning in &normalized.warnings {
                    debug!(index = i, field = warning.field, value = %warning.value, "Non-numeric value defaulted to 0");
                    *batch.field_warnings.entry(warning.field).or_default() += 1;
                    counter!("omm_field_warnings_total", "field" => warning.field).increment(1);
                }
                *batch
                    .regimes
                    .entry(normalized.record.orbit_regime())
                    .or_default() += 1;
                batch.records.push(normalized.record);
            }
            Err(reason) => {
                debug!(index = i, reason = %reason, "Skipping record");
                *batch.skipped.entry(reason.kind()).or_default() += 1;
                counter!("omm_records_skipped_total", "reason" => reason.kind()).increment(1);
            }
        }
    }

    counter!("omm_records_normalized_total").increment(batch.records.len() as u64);
    batch
}

/// Summary of a complete run
#[derive(Debug)]
pub struct PipelineResult {
    pub source: String,
    pub total_records: usize,
    pub batch: NormalizedBatch,
    pub artifact: EncodedArtifact,
    pub size: SizeReport,
}

/// Summary of a dry run that normalizes without writing
#[derive(Debug)]
pub struct InspectResult {
    pub source: String,
    pub total_records: usize,
    pub bytes_read: u64,
    pub batch: NormalizedBatch,
}

pub struct Pipeline {
    loader: SourceLoader,
}

impl Pipeline {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self {
            loader: SourceLoader::new(http),
        }
    }

    /// Load, normalize and write. Source failures abort before the output is touched.
    #[instrument(skip_all, fields(source = %locator, output = %output.display()))]
    pub async fn run(&self, locator: &SourceLocator, output: &Path) -> Result<PipelineResult> {
        let t_pipeline = Instant::now();
        info!("Starting compaction");

        let t_fetch = Instant::now();
        let loaded = self.loader.load(locator).await?;
        histogram!("omm_fetch_duration_seconds").record(t_fetch.elapsed().as_secs_f64());
        counter!("omm_records_total").increment(loaded.records.len() as u64);

        let total_records = loaded.records.len();
        let batch = normalize_all(&loaded.records);
        info!(
            "Normalized {} of {} records ({} skipped)",
            batch.records.len(),
            total_records,
            batch.skipped_total()
        );

        let artifact = encode::write_artifact(&batch.records, output)?;
        let size = SizeReport::new(loaded.bytes_read, artifact.bytes_written);
        info!(
            input_bytes = size.input_bytes,
            output_bytes = size.output_bytes,
            reduction_percent = size.reduction_percent(),
            sha256 = %artifact.sha256,
            "Compaction finished"
        );
        histogram!("omm_pipeline_duration_seconds").record(t_pipeline.elapsed().as_secs_f64());

        Ok(PipelineResult {
            source: locator.to_string(),
            total_records,
            batch,
            artifact,
            size,
        })
    }

    #[instrument(skip_all, fields(source = %locator))]
    pub async fn inspect(&self, locator: &SourceLocator) -> Result<InspectResult> {
        let loaded = self.loader.load(locator).await?;
        let batch = normalize_all(&loaded.records);
        Ok(InspectResult {
            source: locator.to_string(),
            total_records: loaded.records.len(),
            bytes_read: loaded.bytes_read,
            batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().expect("object")
    }

    fn object(id: u64, epoch: &str, mean_motion: f64) -> RawRecord {
        raw(json!({
            "NORAD_CAT_ID": id,
            "OBJECT_NAME": format!("OBJECT {id}"),
            "EPOCH": epoch,
            "MEAN_MOTION": mean_motion,
        }))
    }

    #[test]
    fn test_skips_invalid_epoch_and_preserves_order() {
        let raws = vec![
            object(1, "2024-01-15T12:00:00Z", 15.5),
            object(2, "2024-01-15T12:00:00Z", 2.0),
            object(3, "garbage", 15.5),
            object(4, "2024-01-15T12:00:00Z", 1.0027),
            object(5, "2024-01-15T12:00:00Z", 14.0),
        ];
        let batch = normalize_all(&raws);

        let ids: Vec<_> = batch.records.iter().map(|r| r.catalog_id.clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(4), json!(5)]);
        assert_eq!(batch.skipped_total(), 1);
        assert_eq!(batch.skipped.get("invalid_epoch"), Some(&1));
    }

    #[test]
    fn test_counts_regimes_and_warnings() {
        let mut odd = object(6, "2024-01-15T12:00:00Z", 15.5);
        odd.insert("BSTAR".to_string(), json!("unknown"));
        let raws = vec![
            object(1, "2024-01-15T12:00:00Z", 15.5),
            object(2, "2024-01-15T12:00:00Z", 2.0),
            object(3, "2024-01-15T12:00:00Z", 1.0),
            odd,
        ];
        let batch = normalize_all(&raws);

        assert_eq!(batch.regimes.get(&OrbitRegime::Leo), Some(&2));
        assert_eq!(batch.regimes.get(&OrbitRegime::Meo), Some(&1));
        assert_eq!(batch.regimes.get(&OrbitRegime::Heo), Some(&1));
        assert_eq!(batch.field_warnings.get("BSTAR"), Some(&1));
    }

    #[test]
    fn test_empty_input() {
        let batch = normalize_all(&[]);
        assert!(batch.records.is_empty());
        assert_eq!(batch.skipped_total(), 0);
    }
}
