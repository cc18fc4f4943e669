// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Fetching a single variant and classifying the response.

use crate::error::Result;
use crate::models::probe::{Outcome, ProbeRecord};
use crate::models::settings::ProbeSettings;
use crate::services::diff::{highlight_diff, signal_differences};
use crate::services::logging::redact_credentials;
use reqwest::header::{HeaderMap, CONTENT_TYPE, LINK, LOCATION};
use reqwest::{redirect, Client, Response};
use scraper::{Html, Selector};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const X_ROBOTS_TAG: &str = "x-robots-tag";

/// Canonical signals read from one HTTP response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSignals {
    /// A response (of any status) was received
    pub successful_fetch: bool,
    pub status_code: Option<u16>,
    pub robots_header: Option<String>,
    pub link_header: Option<String>,
    pub html_canonical_tag: Option<String>,
    pub redirect_location: Option<String>,
}

impl ResponseSignals {
    /// Transport failure, optionally carrying the status of a partial response
    pub fn failed(status_code: Option<u16>) -> Self {
        ResponseSignals {
            successful_fetch: false,
            status_code,
            ..Default::default()
        }
    }

    async fn from_response(response: Response) -> Self {
        let headers = response.headers();
        let mut signals = ResponseSignals {
            successful_fetch: true,
            status_code: Some(response.status().as_u16()),
            robots_header: header_values(headers, X_ROBOTS_TAG),
            link_header: header_values(headers, LINK.as_str()),
            html_canonical_tag: None,
            redirect_location: header_values(headers, LOCATION.as_str()),
        };

        if is_html(headers) {
            match response.text().await {
                Ok(body) => signals.html_canonical_tag = extract_canonical(&body),
                Err(e) => warn!("Failed to read HTML body: {}", e),
            }
        }

        signals
    }
}

/// Issues one GET per variant, never following redirects.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// Create a prober with a client configured from `settings`
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        Ok(Self {
            client: build_probe_client(settings)?,
        })
    }

    /// Use a caller-built client.
    ///
    /// The client should be built with `redirect::Policy::none()`, otherwise redirect
    /// responses are never observed.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `variant` once and classify the response against `original`.
    ///
    /// Transport failures are reported on the record, never as an error.
    #[instrument(skip_all, fields(variant = %redact_credentials(variant)))]
    pub async fn probe(&self, variant: &str, original: &str) -> ProbeRecord {
        debug!("Starting request");
        let started = Instant::now();
        let signals = self.fetch(variant).await;
        let fetch_duration = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let outcome = classify(variant, original, &signals);
        info!(
            status = ?signals.status_code,
            duration_ms = fetch_duration,
            %outcome,
            "Request finished"
        );

        build_record(variant, original, signals, fetch_duration, outcome)
    }

    async fn fetch(&self, variant: &str) -> ResponseSignals {
        match self.client.get(variant).send().await {
            Ok(response) => ResponseSignals::from_response(response).await,
            Err(e) => {
                let status = e.status().map(|status| status.as_u16());
                // The URL is already on the span, redacted
                warn!("Request failed: {}", e.without_url());
                ResponseSignals::failed(status)
            }
        }
    }
}

/// Build the HTTP client used for probing
pub fn build_probe_client(settings: &ProbeSettings) -> Result<Client> {
    let client = Client::builder()
        .timeout(settings.timeout)
        .user_agent(settings.user_agent.as_str())
        .redirect(redirect::Policy::none())
        .build()?;
    Ok(client)
}

/// Assign exactly one outcome, first match wins:
///
/// 1. transport failure → info
/// 2. 200 with an HTML canonical tag pointing elsewhere → issue
/// 3. a variant answering 302 to anything but the original → issue
/// 4. 404 or 410 → error handling
/// 5. a 301 pointing at the original → info
/// 6. the original itself answering 200 → info
/// 7. anything else → warning
pub fn classify(variant: &str, original: &str, signals: &ResponseSignals) -> Outcome {
    if !signals.successful_fetch {
        return Outcome::Info;
    }

    let is_original = variant == original;
    let canonical_elsewhere = signals
        .html_canonical_tag
        .as_deref()
        .is_some_and(|canonical| canonical != original);
    let redirects_to_original = signals.redirect_location.as_deref() == Some(original);

    match signals.status_code {
        // Holds for the original and for variants alike
        Some(200) if canonical_elsewhere => Outcome::Issue,
        Some(302) if !is_original && !redirects_to_original => Outcome::Issue,
        Some(404 | 410) => Outcome::ErrorHandling,
        Some(301) if redirects_to_original => Outcome::Info,
        Some(200) if is_original => Outcome::Info,
        _ => Outcome::Warning,
    }
}

/// `href` of the first `<link rel="canonical">` element
pub fn extract_canonical(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"link[rel="canonical"]"#) else {
        return None;
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

fn build_record(
    variant: &str,
    original: &str,
    signals: ResponseSignals,
    fetch_duration: u64,
    outcome: Outcome,
) -> ProbeRecord {
    let difference = signal_differences(
        original,
        signals.html_canonical_tag.as_deref(),
        signals.link_header.as_deref(),
        signals.redirect_location.as_deref(),
    );

    ProbeRecord {
        original_url: original.to_string(),
        url_variation: variant.to_string(),
        url_difference: highlight_diff(original, Some(variant), None),
        status_code: signals.status_code,
        robots_header: signals.robots_header,
        link_rel_canonical_header: signals.link_header,
        html_canonical_tag: signals.html_canonical_tag,
        redirect_location: signals.redirect_location,
        difference,
        successful_fetch: signals.successful_fetch,
        fetch_duration,
        outcome,
    }
}

/// All values of a header joined with `", "`, `None` when absent
fn header_values(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.to_ascii_lowercase().contains("text/html"))
}
