// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! `results.json` persistence.

use crate::error::{Error, Result};
use crate::models::probe::ProbeRecord;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use tracing::info;

pub const RESULTS_FILE: &str = "results.json";

/// Records of a run grouped by original URL, in the order the URLs were tested
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<(String, Vec<ProbeRecord>)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records for the same original URL replace earlier ones
    pub fn insert(&mut self, original: impl Into<String>, records: Vec<ProbeRecord>) {
        let original = original.into();
        match self.entries.iter_mut().find(|(url, _)| *url == original) {
            Some((_, existing)) => *existing = records,
            None => self.entries.push((original, records)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ProbeRecord])> {
        self.entries
            .iter()
            .map(|(url, records)| (url.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(url, records)| (url, records)))
    }
}

/// Write `results.json` into `dir` and return its path
pub fn save_results(dir: &Path, results: &ResultSet) -> Result<PathBuf> {
    let path = dir.join(RESULTS_FILE);
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json).map_err(|e| Error::io(&path, e))?;

    info!(path = %path.display(), urls = results.len(), "Saved results");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::probe::Outcome;
    use std::collections::BTreeMap;

    fn record(original: &str, variant: &str, outcome: Outcome) -> ProbeRecord {
        ProbeRecord {
            original_url: original.to_string(),
            url_variation: variant.to_string(),
            url_difference: String::new(),
            status_code: Some(200),
            robots_header: Some("noindex".to_string()),
            link_rel_canonical_header: None,
            html_canonical_tag: None,
            redirect_location: None,
            difference: String::new(),
            successful_fetch: true,
            fetch_duration: 3,
            outcome,
        }
    }

    #[test]
    fn test_serialized_map_keeps_test_order() {
        let mut results = ResultSet::new();
        results.insert("https://z.test/", vec![]);
        results.insert("https://a.test/", vec![]);

        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(json, r#"{"https://z.test/":[],"https://a.test/":[]}"#);
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let mut results = ResultSet::new();
        results.insert("https://a.test/", vec![]);
        results.insert(
            "https://a.test/",
            vec![record("https://a.test/", "https://a.test/", Outcome::Info)],
        );

        let entries: Vec<(&str, usize)> = results
            .iter()
            .map(|(url, records)| (url, records.len()))
            .collect();
        assert_eq!(entries, vec![("https://a.test/", 1)]);
    }

    #[test]
    fn test_saved_results_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let original = "https://example.com/page";
        let records = vec![
            record(original, original, Outcome::Info),
            record(original, "https://example.com/PAGE", Outcome::Warning),
        ];

        let mut results = ResultSet::new();
        results.insert(original, records.clone());

        let path = save_results(dir.path(), &results).unwrap();
        assert_eq!(path, dir.path().join("results.json"));

        let loaded: BTreeMap<String, Vec<ProbeRecord>> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.get(original), Some(&records));
    }

    #[test]
    fn test_saved_file_uses_report_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let original = "https://example.com/page";
        let mut results = ResultSet::new();
        results.insert(original, vec![record(original, original, Outcome::Info)]);

        let path = save_results(dir.path(), &results).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        let first = &value[original][0];
        assert_eq!(first["robotsHeader"], "noindex");
        assert_eq!(first["info"], true);
        assert_eq!(first["issue"], false);
        assert!(first["htmlCanonicalTag"].is_null());
    }
}
