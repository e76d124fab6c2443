use crate::error::Result;
use crate::types::NormalizedRecord;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, instrument};

/// What landed on disk
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    pub path: PathBuf,
    pub bytes_written: u64,
    /// Hex SHA-256 of the artifact bytes
    pub sha256: String,
}

/// Serialize records as a JSON array of positional arrays with no whitespace.
pub fn encode(records: &[NormalizedRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}

/// Encode `records` and replace `path` with the result in one rename, so
/// readers see either the previous file or the complete new one.
#[instrument(skip_all, fields(records = records.len(), path = %path.display()))]
pub fn write_artifact(records: &[NormalizedRecord], path: &Path) -> Result<EncodedArtifact> {
    let bytes = encode(records)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut staged = NamedTempFile::new_in(&dir)?;
    staged.write_all(&bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    let sha256 = hex::encode(Sha256::digest(&bytes));
    info!("Wrote {} bytes to {}", bytes.len(), path.display());

    Ok(EncodedArtifact {
        path: path.to_path_buf(),
        bytes_written: bytes.len() as u64,
        sha256,
    })
}
