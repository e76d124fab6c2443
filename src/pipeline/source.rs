use crate::app::ports::HttpClientPort;
use crate::error::{CompactorError, Result};
use crate::types::RawRecord;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Where the OMM catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    LocalPath(PathBuf),
    Remote(String),
}

impl SourceLocator {
    /// Identifiers with an `http://` or `https://` scheme are remote; anything
    /// else is treated as a filesystem path.
    pub fn parse(identifier: &str) -> Self {
        let lower = identifier.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocator::Remote(identifier.to_string())
        } else {
            SourceLocator::LocalPath(PathBuf::from(identifier))
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocator::LocalPath(path) => write!(f, "{}", path.display()),
            SourceLocator::Remote(url) => f.write_str(url),
        }
    }
}

/// Fully materialized input
#[derive(Debug)]
pub struct LoadedSource {
    pub records: Vec<RawRecord>,
    /// Size of the raw document, before parsing
    pub bytes_read: u64,
}

pub struct SourceLoader {
    http: Arc<dyn HttpClientPort>,
}

impl SourceLoader {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    #[instrument(skip_all, fields(source = %locator))]
    pub async fn load(&self, locator: &SourceLocator) -> Result<LoadedSource> {
        let loaded = match locator {
            SourceLocator::LocalPath(path) => Self::load_local(path)?,
            SourceLocator::Remote(url) => self.load_remote(url).await?,
        };
        info!(
            records = loaded.records.len(),
            bytes = loaded.bytes_read,
            "Loaded source"
        );
        Ok(loaded)
    }

    fn load_local(path: &Path) -> Result<LoadedSource> {
        if !path.is_file() {
            return Err(CompactorError::SourceNotFound { path: path.to_path_buf() });
        }
        let bytes = fs::read(path).map_err(|e| CompactorError::SourceParse {
            source_name: path.display().to_string(),
            message: format!("read failed: {}", e),
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        let records = parse_records(&bytes).map_err(|e| CompactorError::SourceParse {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(LoadedSource {
            records,
            bytes_read: bytes.len() as u64,
        })
    }

    async fn load_remote(&self, url: &str) -> Result<LoadedSource> {
        let resp = self
            .http
            .get(url)
            .await
            .map_err(|e| CompactorError::fetch(url, e))?;
        debug!(
            status = resp.status,
            content_type = %resp.content_type,
            "Fetched {} bytes",
            resp.bytes.len()
        );

        if !resp.is_success() {
            return Err(CompactorError::fetch(
                url,
                format!("HTTP status {}", resp.status),
            ));
        }

        let records = parse_records(&resp.bytes)
            .map_err(|e| CompactorError::fetch(url, format!("malformed payload: {}", e)))?;
        Ok(LoadedSource {
            records,
            bytes_read: resp.bytes.len() as u64,
        })
    }
}

/// Parse a JSON document that must be an array of objects
pub fn parse_records(bytes: &[u8]) -> std::result::Result<Vec<RawRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpGetResult;
    use async_trait::async_trait;
    use std::io::Write;

    struct StaticHttp {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClientPort for StaticHttp {
        async fn get(&self, _url: &str) -> std::result::Result<HttpGetResult, String> {
            Ok(HttpGetResult {
                status: self.status,
                bytes: self.body.as_bytes().to_vec(),
                content_type: "application/json".to_string(),
            })
        }
    }

    struct UnreachableHttp;

    #[async_trait]
    impl HttpClientPort for UnreachableHttp {
        async fn get(&self, _url: &str) -> std::result::Result<HttpGetResult, String> {
            Err("connection refused".to_string())
        }
    }

    fn loader(http: impl HttpClientPort + 'static) -> SourceLoader {
        SourceLoader::new(Arc::new(http))
    }

    #[test]
    fn test_locator_detects_scheme() {
        assert_eq!(
            SourceLocator::parse("https://celestrak.org/gp.json"),
            SourceLocator::Remote("https://celestrak.org/gp.json".to_string())
        );
        assert_eq!(
            SourceLocator::parse("HTTP://example.com/a.json"),
            SourceLocator::Remote("HTTP://example.com/a.json".to_string())
        );
        assert_eq!(
            SourceLocator::parse("data/active.json"),
            SourceLocator::LocalPath(PathBuf::from("data/active.json"))
        );
        assert_eq!(
            SourceLocator::parse("httpdocs/active.json"),
            SourceLocator::LocalPath(PathBuf::from("httpdocs/active.json"))
        );
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = loader(UnreachableHttp)
            .load(&SourceLocator::LocalPath(path.clone()))
            .await
            .unwrap_err();
        match err {
            CompactorError::SourceNotFound { path: p } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_directory_is_not_a_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader(UnreachableHttp)
            .load(&SourceLocator::LocalPath(dir.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(err.is_source_error());
        assert!(matches!(err, CompactorError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_local_file_not_a_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"OBJECT_NAME\": \"ISS\"}}").unwrap();
        let err = loader(UnreachableHttp)
            .load(&SourceLocator::LocalPath(file.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(matches!(err, CompactorError::SourceParse { .. }));
    }

    #[tokio::test]
    async fn test_local_list_with_non_object_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{\"OBJECT_NAME\": \"ISS\"}}, 42]").unwrap();
        let err = loader(UnreachableHttp)
            .load(&SourceLocator::LocalPath(file.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(matches!(err, CompactorError::SourceParse { .. }));
    }

    #[tokio::test]
    async fn test_local_file_loads_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = r#"[{"OBJECT_NAME": "ISS (ZARYA)"}, {}]"#;
        write!(file, "{}", body).unwrap();
        let loaded = loader(UnreachableHttp)
            .load(&SourceLocator::LocalPath(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.bytes_read, body.len() as u64);
    }

    #[tokio::test]
    async fn test_remote_success() {
        let http = StaticHttp {
            status: 200,
            body: r#"[{"NORAD_CAT_ID": 25544}]"#,
        };
        let loaded = loader(http)
            .load(&SourceLocator::parse("https://example.com/gp.json"))
            .await
            .unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0]["NORAD_CAT_ID"], 25544);
    }

    #[tokio::test]
    async fn test_remote_error_status() {
        let http = StaticHttp {
            status: 503,
            body: "unavailable",
        };
        let err = loader(http)
            .load(&SourceLocator::parse("https://example.com/gp.json"))
            .await
            .unwrap_err();
        match err {
            CompactorError::SourceFetch { message, .. } => assert_eq!(message, "HTTP status 503"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_remote_malformed_payload() {
        let http = StaticHttp {
            status: 200,
            body: "<html>rate limited</html>",
        };
        let err = loader(http)
            .load(&SourceLocator::parse("https://example.com/gp.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompactorError::SourceFetch { .. }));
    }

    #[tokio::test]
    async fn test_remote_unreachable() {
        let err = loader(UnreachableHttp)
            .load(&SourceLocator::parse("http://localhost:1/gp.json"))
            .await
            .unwrap_err();
        assert!(err.is_source_error());
        assert!(err.to_string().contains("connection refused"));
    }
}
