// JSON pipeline output parser
// reason: serde_json maps the file straight onto ParsedData
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use vetting_core::domain::ParsedData;
use vetting_core::port::{ParseError, Parser};

/// Parses the JSON rendering of a pipeline output file:
///
/// ```text
/// {
///   "sys_header": { "RMIN": "0.5" },
///   "observations": ["1616681p22", "1616692p22"],
///   "sources": [ { "readings": [ { "frame": "1616681p22", "x": 911.0, "y": 3989.6 } ] } ]
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Parser for JsonParser {
    async fn parse(&self, path: &Path) -> Result<ParsedData, ParseError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ParseError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let parsed: ParsedData =
            serde_json::from_slice(&bytes).map_err(|e| ParseError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!(
            path = %path.display(),
            sources = parsed.sources.len(),
            readings = parsed.reading_count(),
            "Parsed pipeline output"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parses_sources_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.cands.astrom");
        std::fs::write(
            &path,
            r#"{
                "sys_header": {"RMIN": "0.5", "RMAX": "10.3"},
                "observations": ["1616681p22", "1616692p22"],
                "sources": [
                    {"readings": [
                        {"frame": "1616681p22", "x": 911.0, "y": 3989.6, "mjd": 56032.4},
                        {"frame": "1616692p22", "x": 914.2, "y": 3987.1}
                    ]},
                    {"readings": [{"frame": "1616681p22", "x": 12.0, "y": 40.5}]}
                ]
            }"#,
        )
        .unwrap();

        let parsed = JsonParser::new().parse(&path).await.unwrap();

        assert_eq!(parsed.sources.len(), 2);
        assert_eq!(parsed.reading_count(), 3);
        assert_eq!(parsed.sys_header.get("RMAX").unwrap(), "10.3");
        assert_eq!(parsed.observations.len(), 2);
        assert_eq!(parsed.sources[0].readings[0].mjd, Some(56032.4));
        assert_eq!(parsed.sources[0].readings[1].mjd, None);
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cands.astrom");
        std::fs::write(&path, "## MOP HEADER not json").unwrap();

        let err = JsonParser::new().parse(&path).await.unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonParser::new()
            .parse(&dir.path().join("absent.cands.astrom"))
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
