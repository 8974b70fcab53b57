use crate::domain::mark::Granularity;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Knobs for a document diff.
///
/// Deserializes from partial JSON; missing fields take their defaults, so
/// `{"granularity": "word"}` is a complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    /// Engine used inside text runs.
    pub granularity: Granularity,
    /// Deepest node nesting accepted before failing with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            granularity: Granularity::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DiffOptions {
    /// Reads options from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("invalid options file {}", path.display()))
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_char_granularity() {
        let options = DiffOptions::default();

        assert_eq!(options.granularity, Granularity::Char);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let options: DiffOptions = serde_json::from_str(r#"{"granularity": "word"}"#).unwrap();

        assert_eq!(
            options,
            DiffOptions::default().with_granularity(Granularity::Word)
        );
    }

    #[test]
    fn load_reads_json_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"max_depth": 8}"#).unwrap();

        let options = DiffOptions::load(&path).unwrap();

        assert_eq!(options, DiffOptions::default().with_max_depth(8));
    }

    #[test]
    fn load_reports_missing_file() {
        let error = DiffOptions::load(Path::new("/nonexistent/options.json")).unwrap_err();

        assert!(error.to_string().contains("failed to read options file"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let options = serde_json::from_str::<DiffOptions>(r#"{"level": "word"}"#);

        assert!(options.is_err());
    }
}
