// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// Classification of a single probed variant.
///
/// Persisted as four mutually exclusive boolean flags (`issue`, `errorHandling`,
/// `warnings`, `info`) so report consumers can filter on them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "OutcomeFlags", try_from = "OutcomeFlags")]
pub enum Outcome {
    /// The variant exposes a canonicalization defect
    Issue,
    /// The server answered with 404 or 410
    ErrorHandling,
    /// Nothing matched a known pattern
    Warning,
    /// Healthy baseline, self-correcting redirect or transport failure
    Info,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::Issue,
        Outcome::Warning,
        Outcome::ErrorHandling,
        Outcome::Info,
    ];

    /// Section title used by the reports
    pub fn title(&self) -> &'static str {
        match self {
            Outcome::Issue => "Issues",
            Outcome::ErrorHandling => "Error Handling",
            Outcome::Warning => "Warnings",
            Outcome::Info => "Info",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Issue => write!(f, "issue"),
            Outcome::ErrorHandling => write!(f, "errorHandling"),
            Outcome::Warning => write!(f, "warnings"),
            Outcome::Info => write!(f, "info"),
        }
    }
}

/// Wire form of [`Outcome`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeFlags {
    issue: bool,
    error_handling: bool,
    warnings: bool,
    info: bool,
}

impl From<Outcome> for OutcomeFlags {
    fn from(outcome: Outcome) -> Self {
        OutcomeFlags {
            issue: outcome == Outcome::Issue,
            error_handling: outcome == Outcome::ErrorHandling,
            warnings: outcome == Outcome::Warning,
            info: outcome == Outcome::Info,
        }
    }
}

impl TryFrom<OutcomeFlags> for Outcome {
    type Error = String;

    fn try_from(flags: OutcomeFlags) -> Result<Self, Self::Error> {
        match (flags.issue, flags.error_handling, flags.warnings, flags.info) {
            (true, false, false, false) => Ok(Outcome::Issue),
            (false, true, false, false) => Ok(Outcome::ErrorHandling),
            (false, false, true, false) => Ok(Outcome::Warning),
            (false, false, false, true) => Ok(Outcome::Info),
            _ => Err(format!(
                "exactly one outcome flag must be set, got {:?}",
                flags
            )),
        }
    }
}

/// Result of probing one variant of an original URL.
///
/// Every field is always serialized; absent values become `null` so that report
/// renderers can discover columns from the records themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    /// The unmodified input URL
    pub original_url: String,
    /// The variant that was fetched
    pub url_variation: String,
    /// Highlighted diff between the original URL and the variant
    pub url_difference: String,
    /// HTTP status, `None` on transport failure without a response
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    /// X-Robots-Tag response header
    #[serde(rename = "robotsHeader")]
    pub robots_header: Option<String>,
    /// Link response header
    #[serde(rename = "linkRelCanonicalHeader")]
    pub link_rel_canonical_header: Option<String>,
    /// `href` of the first `<link rel="canonical">` in an HTML body
    #[serde(rename = "htmlCanonicalTag")]
    pub html_canonical_tag: Option<String>,
    /// Location response header
    #[serde(rename = "redirectLocation")]
    pub redirect_location: Option<String>,
    /// Highlighted diffs between the original URL and each canonical signal
    pub difference: String,
    /// Whether a response (of any status) was received
    #[serde(rename = "successfulFetch")]
    pub successful_fetch: bool,
    /// Wall-clock duration of the attempt in milliseconds
    #[serde(rename = "fetchDuration")]
    pub fetch_duration: u64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(outcome: Outcome) -> ProbeRecord {
        ProbeRecord {
            original_url: "https://example.com/page".to_string(),
            url_variation: "https://example.com/page/".to_string(),
            url_difference: String::new(),
            status_code: Some(301),
            robots_header: None,
            link_rel_canonical_header: None,
            html_canonical_tag: None,
            redirect_location: Some("https://example.com/page".to_string()),
            difference: String::new(),
            successful_fetch: true,
            fetch_duration: 12,
            outcome,
        }
    }

    #[test]
    fn test_record_serializes_every_field() {
        let value = serde_json::to_value(sample(Outcome::Info)).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "original_url",
            "url_variation",
            "url_difference",
            "statusCode",
            "robotsHeader",
            "linkRelCanonicalHeader",
            "htmlCanonicalTag",
            "redirectLocation",
            "difference",
            "successfulFetch",
            "fetchDuration",
            "issue",
            "errorHandling",
            "warnings",
            "info",
        ] {
            assert!(object.contains_key(key), "missing field {}", key);
        }
        assert_eq!(object.len(), 15);
        assert_eq!(value["robotsHeader"], json!(null));
        assert_eq!(value["statusCode"], json!(301));
    }

    #[test]
    fn test_outcome_sets_exactly_one_flag() {
        for outcome in Outcome::ALL {
            let value = serde_json::to_value(sample(outcome)).unwrap();
            let set = ["issue", "errorHandling", "warnings", "info"]
                .iter()
                .filter(|key| value[**key] == json!(true))
                .count();
            assert_eq!(set, 1, "{} must set a single flag", outcome);
            assert_eq!(value[outcome.to_string()], json!(true));
        }
    }

    #[test]
    fn test_record_deserializes_from_flags() {
        let record = sample(Outcome::ErrorHandling);
        let text = serde_json::to_string(&record).unwrap();
        let parsed: ProbeRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        let mut value = serde_json::to_value(sample(Outcome::Issue)).unwrap();
        value["info"] = json!(true);
        assert!(serde_json::from_value::<ProbeRecord>(value).is_err());
    }
}
