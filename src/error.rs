//! Errors for the file-backed parts of the crate (tuning and progress JSON)

use std::path::Path;

/// Failure to read, parse or write a JSON file.
#[derive(Debug)]
pub struct LoadError {
    pub file: String,
    pub message: String,
}

impl LoadError {
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self {
            file: path.display().to_string(),
            message: format!("IO error: {err}"),
        }
    }

    pub fn parse(path: &Path, err: &serde_json::Error) -> Self {
        Self {
            file: path.display().to_string(),
            message: format!("Parse error: {err}"),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for LoadError {}
