//! Final report assembly and file output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One enriched saved word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    /// First shortdef of the word's primary entry.
    pub description: String,
    /// Example sentences, markup stripped, exact duplicates removed.
    pub examples: Vec<String>,
}

/// The merged export. `total_words` always mirrors `data.len()`; the
/// constructor is the only way to build one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub total_words: usize,
    pub data: Vec<DictionaryEntry>,
}

impl Report {
    pub fn new(data: Vec<DictionaryEntry>) -> Self {
        Self {
            total_words: data.len(),
            data,
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing report")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(word: &str) -> DictionaryEntry {
        DictionaryEntry {
            word: word.to_string(),
            description: format!("definition of {word}"),
            examples: vec![format!("using {word} in a sentence")],
        }
    }

    #[test]
    fn test_total_words_matches_data_len() {
        let report = Report::new(vec![sample_entry("apple"), sample_entry("brine")]);
        assert_eq!(report.total_words, 2);
        assert_eq!(report.total_words, report.data.len());

        let empty = Report::new(Vec::new());
        assert_eq!(empty.total_words, 0);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_words.json");

        let report = Report::new(vec![sample_entry("cairn")]);
        report.write_to(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Report = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.total_words, 1);
        assert_eq!(parsed.data[0], sample_entry("cairn"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let report = Report::new(Vec::new());
        let err = report
            .write_to(Path::new("/nonexistent-wordvault-dir/out.json"))
            .unwrap_err();
        assert!(err.to_string().contains("out.json"));
    }
}
