// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Plain-text and HTML reports over probe records.

use crate::error::{Error, Result};
use crate::models::probe::{Outcome, ProbeRecord};
use crate::models::version::VersionInfo;
use crate::services::results::ResultSet;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

pub const TEXT_REPORT_FILE: &str = "report.txt";
pub const SUMMARY_FILE: &str = "summary.txt";

/// Record fields in display order
const FIELD_ORDER: [&str; 15] = [
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
];

/// Fields holding pre-rendered, already escaped HTML
const HTML_FIELDS: [&str; 2] = ["url_difference", "difference"];

const HTML_STYLE: &str = "body { font-family: Arial, sans-serif; }
      h1, h2, h3 { color: #333; }
      .url-report { margin-bottom: 20px; }
      table { width: 100%; border-collapse: collapse; }
      th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
      th { background-color: #f2f2f2; }";

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Append one record as pretty JSON to `report.txt`
pub fn append_to_report(dir: &Path, record: &ProbeRecord) -> Result<()> {
    let content = serde_json::to_string_pretty(record)?;
    append(&dir.join(TEXT_REPORT_FILE), &content)
}

/// Append an entry for an original URL that could not be tested
pub fn append_failure(dir: &Path, url: &str, error: &Error) -> Result<()> {
    let content = serde_json::to_string_pretty(&json!({
        "url": url,
        "error": error.to_string(),
    }))?;
    append(&dir.join(TEXT_REPORT_FILE), &content)
}

fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    writeln!(file, "{}", content).map_err(|e| Error::io(path, e))
}

/// Header, one block per original URL and a footer
pub fn render_text_report(results: &ResultSet, generated_at: DateTime<Utc>) -> String {
    let tested: Vec<&str> = results.iter().map(|(url, _)| url).collect();
    let version = VersionInfo::current();

    let mut out = String::new();
    let _ = writeln!(out, "Date: {}", generated_at.to_rfc3339());
    let _ = writeln!(out, "Tool: {}", version.user_agent());
    let _ = writeln!(out, "Tested URLs: {}", tested.join(", "));

    for (url, records) in results.iter() {
        out.push('\n');
        out.push_str(&render_text_block(url, records));
    }

    out.push_str("\nSummary: All tests completed.\nAction Items: Review discrepancies.\n");
    out
}

fn render_text_block(url: &str, records: &[ProbeRecord]) -> String {
    let mut statuses: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let key = record
            .status_code
            .map_or_else(|| "none".to_string(), |status| status.to_string());
        *statuses.entry(key).or_default() += 1;
    }
    let statuses: Vec<String> = statuses
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Original URL: {}", url);
    let _ = writeln!(out, "Variations: {}", records.len());
    let _ = writeln!(out, "HTTP Status Codes: {}", statuses.join(", "));
    for outcome in Outcome::ALL {
        let count = records.iter().filter(|r| r.outcome == outcome).count();
        let _ = writeln!(out, "{}: {}", outcome.title(), count);
    }
    let failed = records.iter().filter(|r| !r.successful_fetch).count();
    let _ = writeln!(out, "Failed Fetches: {}", failed);
    out
}

/// Write the rendered text summary and return its path
pub fn write_text_report(
    dir: &Path,
    results: &ResultSet,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = dir.join(SUMMARY_FILE);
    std::fs::write(&path, render_text_report(results, generated_at))
        .map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

/// Full HTML document with one section per original URL
pub fn render_html_report(results: &ResultSet, generated_at: DateTime<Utc>) -> String {
    let timestamp = generated_at.to_rfc3339();
    let mut out = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>URL Test Report - {ts}</title>\n  <style>\n      {style}\n  </style>\n\
         </head>\n<body>\n  <h1>URL Test Report - {ts}</h1>\n",
        ts = timestamp,
        style = HTML_STYLE,
    );

    for (url, records) in results.iter() {
        out.push_str(&render_html_section(url, records));
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_html_section(url: &str, records: &[ProbeRecord]) -> String {
    let mut out = format!(
        "<section class=\"url-report\">\n<h2>Original URL: {}</h2>\n",
        html_escape::encode_text(url)
    );

    let rows: Vec<(&ProbeRecord, Value)> = records
        .iter()
        .map(|record| (record, serde_json::to_value(record).unwrap_or(Value::Null)))
        .collect();

    for outcome in Outcome::ALL {
        let group: Vec<&Value> = rows
            .iter()
            .filter(|(record, _)| record.outcome == outcome)
            .map(|(_, value)| value)
            .collect();
        out.push_str(&render_group(outcome.title(), &group));
    }

    let failed: Vec<&Value> = rows
        .iter()
        .filter(|(record, _)| !record.successful_fetch)
        .map(|(_, value)| value)
        .collect();
    out.push_str(&render_group("Failed Fetches", &failed));

    out.push_str("</section>\n");
    out
}

/// Empty groups render nothing
fn render_group(title: &str, rows: &[&Value]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let columns = relevant_columns(rows);
    let mut out = format!("<h3>{}</h3>\n<table><tr>", title);
    for column in &columns {
        let _ = write!(out, "<th>{}</th>", column);
    }
    out.push_str("</tr>\n");

    for row in rows {
        out.push_str("<tr>");
        for column in &columns {
            let _ = write!(out, "<td>{}</td>", render_cell(column, &row[*column]));
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</table>\n");
    out
}

/// Fields that are non-null and non-empty on at least one row
fn relevant_columns(rows: &[&Value]) -> Vec<&'static str> {
    FIELD_ORDER
        .iter()
        .copied()
        .filter(|field| rows.iter().any(|row| !is_blank(&row[*field])))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn render_cell(field: &str, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) if HTML_FIELDS.contains(&field) => s.clone(),
        Value::String(s) => html_escape::encode_text(s).into_owned(),
        other => other.to_string(),
    }
}

/// Write `report-<timestamp>.html` and return its path
pub fn write_html_report(
    dir: &Path,
    results: &ResultSet,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let name = format!("report-{}.html", generated_at.format("%Y-%m-%dT%H-%M-%SZ"));
    let path = dir.join(name);
    std::fs::write(&path, render_html_report(results, generated_at))
        .map_err(|e| Error::io(&path, e))?;
    Ok(path)
}
