// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Collecting the URLs to audit from the command line or a file.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Validated input URLs plus the entries that failed to parse
#[derive(Debug, Default)]
pub struct UrlList {
    pub urls: Vec<String>,
    pub rejected: Vec<Error>,
}

impl UrlList {
    /// Build the list from raw entries.
    ///
    /// Entries are trimmed, blank lines and `#` comments are skipped, duplicates keep
    /// their first position. Fails with [`Error::NoInput`] when nothing remains.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = UrlList::default();
        let mut seen = HashSet::new();

        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }

            match validate_url(entry) {
                Ok(()) => {
                    if seen.insert(entry.to_string()) {
                        list.urls.push(entry.to_string());
                    }
                }
                Err(e) => list.rejected.push(e),
            }
        }

        if list.urls.is_empty() && list.rejected.is_empty() {
            return Err(Error::NoInput);
        }
        Ok(list)
    }

    /// One URL per line
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_entries(content.lines())
    }
}

fn validate_url(entry: &str) -> Result<()> {
    let url = Url::parse(entry).map_err(|source| Error::InvalidUrl {
        url: entry.to_string(),
        source,
    })?;

    if url.host_str().is_none() {
        return Err(Error::UrlWithoutHost(entry.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_entries_are_trimmed_and_deduplicated() {
        let list = UrlList::from_entries([
            " https://example.com/page ",
            "",
            "# staging hosts",
            "https://example.com/page",
            "https://example.com/other",
        ])
        .unwrap();

        assert_eq!(
            list.urls,
            vec!["https://example.com/page", "https://example.com/other"]
        );
        assert!(list.rejected.is_empty());
    }

    #[test]
    fn test_invalid_entries_are_rejected() {
        let list = UrlList::from_entries(["https://example.com/", "example.com/page"]).unwrap();

        assert_eq!(list.urls, vec!["https://example.com/"]);
        assert_eq!(list.rejected.len(), 1);
        assert!(matches!(list.rejected[0], Error::InvalidUrl { .. }));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let entries: [&str; 2] = ["", "   "];
        assert!(matches!(
            UrlList::from_entries(entries),
            Err(Error::NoInput)
        ));
    }

    #[test]
    fn test_from_file_reads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://example.com/a").unwrap();
        writeln!(file, "https://example.com/b\r").unwrap();
        writeln!(file).unwrap();

        let list = UrlList::from_file(file.path()).unwrap();
        assert_eq!(
            list.urls,
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = UrlList::from_file(Path::new("/definitely/not/here.txt"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
