use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::schema::HEADERS;
use crate::storage::{Strictness, parse_history};
use crate::{HistoryError, HistoryResult, sha256_hex, write_json};

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub path: PathBuf,
    pub rows: usize,
    pub first_identifier: Option<u64>,
    pub last_identifier: Option<u64>,
    pub sha256: String,
}

/// Check a history file against the dataset format: the fixed header on the
/// first line, then rows that each satisfy the draw invariants with
/// identifiers stepping by exactly one.
pub fn verify(path: &Path) -> HistoryResult<VerifyReport> {
    let bytes = std::fs::read(path).map_err(|e| HistoryError::io(path, e))?;
    let text = std::str::from_utf8(&bytes).map_err(|e| HistoryError::Malformed {
        line: 0,
        reason: format!("not UTF-8: {e}"),
    })?;

    let first = text.lines().next().unwrap_or("");
    if first != HEADERS.join(",") {
        return Err(HistoryError::Malformed {
            line: 1,
            reason: format!("expected header {:?}, found {:?}", HEADERS.join(","), first),
        });
    }

    let loaded = parse_history(text, Strictness::Strict)?;
    // Strict parsing still skips non-numeric lines; only the header may be one.
    let data_lines = text.lines().skip(1).filter(|l| !l.trim().is_empty()).count();
    if data_lines != loaded.records.len() {
        return Err(HistoryError::Malformed {
            line: 0,
            reason: format!(
                "{} data lines but {} valid rows",
                data_lines,
                loaded.records.len()
            ),
        });
    }

    let report = VerifyReport {
        path: path.to_path_buf(),
        rows: loaded.records.len(),
        first_identifier: loaded.records.first().map(|r| r.identifier),
        last_identifier: loaded.records.last().map(|r| r.identifier),
        sha256: sha256_hex(&bytes),
    };
    info!(path = %path.display(), rows = report.rows, "history verified");
    Ok(report)
}

pub fn run(input: PathBuf, json_out: Option<PathBuf>) -> HistoryResult<()> {
    let report = verify(&input)?;
    if let Some(json_path) = json_out {
        write_json(&json_path, &report)?;
    }
    println!(
        "verify: ok path={} rows={} sha256={}",
        report.path.display(),
        report.rows,
        report.sha256
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("history.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_verify_accepts_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "期号,红1,红2,红3,红4,红5,红6,蓝\n2023001,1,2,3,4,5,6,7\n2023002,9,10,11,20,21,33,16\n",
        );
        let report = verify(&path).unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.first_identifier, Some(2023001));
        assert_eq!(report.last_identifier, Some(2023002));
    }

    #[test]
    fn test_verify_requires_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "2023001,1,2,3,4,5,6,7\n");
        assert!(matches!(verify(&path), Err(HistoryError::Malformed { line: 1, .. })));
    }

    #[test]
    fn test_verify_rejects_stray_text_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "期号,红1,红2,红3,红4,红5,红6,蓝\n2023001,1,2,3,4,5,6,7\nnote,1\n");
        assert!(verify(&path).is_err());
    }

    #[test]
    fn test_verify_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, HistoryError::Io { .. }));
    }
}
