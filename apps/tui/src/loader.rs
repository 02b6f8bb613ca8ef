use crate::domain::MarketingRecord;
use crate::store::Records;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_DATA_PATH: &str = "marketing_dashboard_data.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the whole data document. Any failure fails the load; there is no
/// partial result.
pub async fn load_marketing_data(path: &Path) -> Result<Records, LoadError> {
    let started = Instant::now();
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_marketing_data(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        records = records.len(),
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "marketing data loaded"
    );
    Ok(records)
}

/// Parses a JSON array of records.
pub fn parse_marketing_data(bytes: &[u8]) -> Result<Records, serde_json::Error> {
    let records: Vec<MarketingRecord> = serde_json::from_slice(bytes)?;
    Ok(records.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"[
        {"id": 1, "channel": "Search", "region": "US", "spend": 100.0, "impressions": 1000, "clicks": 50, "conversions": 5},
        {"id": 2, "channel": "Social", "region": "EU", "spend": 200.5, "impressions": 2000, "clicks": 100, "conversions": 20}
    ]"#;

    fn fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_record_array() {
        let file = fixture(DOCUMENT);
        let records = load_marketing_data(file.path()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].channel, "Social");
        assert!((records[1].spend - 200.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_array_is_a_valid_dataset() {
        let file = fixture("[]");
        assert!(load_marketing_data(file.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_document_fails_with_path() {
        let file = fixture(r#"[{"id": 1, "channel": "Search"}]"#);
        let error = load_marketing_data(file.path()).await.unwrap_err();

        assert!(matches!(error, LoadError::Parse { .. }));
        assert!(error.to_string().contains(&file.path().display().to_string()));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let error = load_marketing_data(&path).await.unwrap_err();

        assert!(matches!(error, LoadError::Io { .. }));
        assert!(error.to_string().starts_with("failed to read"));
    }

    #[test]
    fn object_top_level_is_rejected() {
        assert!(parse_marketing_data(br#"{"data": []}"#).is_err());
    }
}
