pub mod config;
pub mod core;
pub mod generate_cmd;
pub mod stats_cmd;
pub mod storage;
pub mod verify_cmd;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed history at line {line}: {reason}")]
    Malformed { line: u64, reason: String },
    #[error("{0}")]
    Message(String),
}

impl HistoryError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        HistoryError::Io { path: path.to_path_buf(), source }
    }
}

pub type HistoryResult<T> = Result<T, HistoryError>;

// Shared helpers
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha256::digest;
    digest(bytes)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> HistoryResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
        }
    }
    let json = serde_json::to_vec_pretty(value).map_err(|e| HistoryError::Message(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| HistoryError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_is_lowercase_hex() {
        let h = sha256_hex(b"abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn test_io_error_display_names_path() {
        let err = HistoryError::io(
            Path::new("/nowhere/out.csv"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nowhere/out.csv"));
        assert!(msg.contains("denied"));
    }
}
