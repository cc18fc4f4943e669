// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Character-level diffs rendered as HTML for the reports.
//!
//! The output is purely cosmetic: classification never looks at it.

use similar::{ChangeTag, TextDiff};

const ADDED_STYLE: &str = "color: green;";
const REMOVED_STYLE: &str = "color: red;";

/// Render the differences between `original` and `other`.
///
/// Returns an empty string when `other` is absent, empty or equal to `original`.
/// With a label the result reads `"<label> Difference: <diff> "`.
pub fn highlight_diff(original: &str, other: Option<&str>, label: Option<&str>) -> String {
    let Some(other) = other.filter(|other| !other.is_empty() && *other != original) else {
        return String::new();
    };

    let highlighted = highlight_changes(original, other);
    match label {
        Some(label) => format!("{} Difference: {} ", label, highlighted),
        None => format!("{} ", highlighted),
    }
}

/// Concatenated diffs of the canonical signals found on a response
pub fn signal_differences(
    original: &str,
    html_canonical_tag: Option<&str>,
    link_header: Option<&str>,
    redirect_location: Option<&str>,
) -> String {
    let mut out = highlight_diff(original, html_canonical_tag, Some("HTML Canonical Tag"));
    out.push_str(&highlight_diff(
        original,
        link_header,
        Some("Link Canonical HTTP Header"),
    ));
    out.push_str(&highlight_diff(original, redirect_location, Some("Redirect")));
    out
}

fn highlight_changes(old: &str, new: &str) -> String {
    let diff = TextDiff::from_chars(old, new);

    // Merge consecutive changes of the same kind into one span
    let mut runs: Vec<(ChangeTag, String)> = Vec::new();
    for change in diff.iter_all_changes() {
        match runs.last_mut() {
            Some((tag, text)) if *tag == change.tag() => text.push_str(change.value()),
            _ => runs.push((change.tag(), change.value().to_string())),
        }
    }

    let mut out = String::new();
    for (tag, text) in runs {
        let text = html_escape::encode_text(&text);
        match tag {
            ChangeTag::Equal => out.push_str(&text),
            ChangeTag::Insert => {
                out.push_str(&format!(r#"<span style="{}">{}</span>"#, ADDED_STYLE, text))
            }
            ChangeTag::Delete => {
                out.push_str(&format!(r#"<span style="{}">{}</span>"#, REMOVED_STYLE, text))
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differing_tail_is_highlighted() {
        let out = highlight_diff("abc", Some("abd"), None);
        assert_eq!(
            out,
            r#"ab<span style="color: red;">c</span><span style="color: green;">d</span> "#
        );
    }

    #[test]
    fn test_labelled_diff() {
        let out = highlight_diff(
            "https://example.com/page",
            Some("https://example.com/page/"),
            Some("Redirect"),
        );
        assert_eq!(
            out,
            r#"Redirect Difference: https://example.com/page<span style="color: green;">/</span> "#
        );
    }

    #[test]
    fn test_absent_or_equal_value_yields_empty_diff() {
        assert_eq!(highlight_diff("abc", None, Some("Redirect")), "");
        assert_eq!(highlight_diff("abc", Some(""), None), "");
        assert_eq!(highlight_diff("abc", Some("abc"), None), "");
    }

    #[test]
    fn test_markup_in_urls_is_escaped() {
        let out = highlight_diff("https://a.test/", Some("https://a.test/<x>"), None);
        assert!(out.contains("&lt;x&gt;"));
        assert!(!out.contains("<x>"));
    }

    #[test]
    fn test_signal_differences_concatenates_in_order() {
        let original = "https://example.com/page";
        let out = signal_differences(
            original,
            Some("https://example.com/page/"),
            None,
            Some("https://www.example.com/page"),
        );

        let canonical = out.find("HTML Canonical Tag Difference").unwrap();
        let redirect = out.find("Redirect Difference").unwrap();
        assert!(canonical < redirect);
        assert!(!out.contains("Link Canonical HTTP Header"));
    }

    #[test]
    fn test_signal_differences_empty_when_signals_match() {
        let original = "https://example.com/page";
        assert_eq!(
            signal_differences(original, Some(original), Some(original), None),
            ""
        );
    }
}
