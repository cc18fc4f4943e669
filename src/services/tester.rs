// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{Error, Result};
use crate::models::probe::ProbeRecord;
use crate::services::prober::Prober;
use crate::services::variants::{generate_variants, ThreadRngTokens, TokenSource};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};
use url::Url;

/// Runs every variant of an original URL through a [`Prober`].
pub struct UrlTester {
    prober: Prober,
    concurrency: usize,
}

impl UrlTester {
    /// `concurrency` bounds the in-flight probes per original URL; zero means one
    pub fn new(prober: Prober, concurrency: usize) -> Self {
        Self {
            prober,
            concurrency: concurrency.max(1),
        }
    }

    /// Probe all variants of `original` with random negative-control tokens
    pub async fn test_url(&self, original: &str) -> Result<Vec<ProbeRecord>> {
        self.test_url_with_tokens(original, &mut ThreadRngTokens)
            .await
    }

    /// Probe all variants of `original`.
    ///
    /// Records come back in variant order, the original URL first.
    #[instrument(skip(self, tokens))]
    pub async fn test_url_with_tokens(
        &self,
        original: &str,
        tokens: &mut impl TokenSource,
    ) -> Result<Vec<ProbeRecord>> {
        let original = normalize_root(original)?;
        let variants = generate_variants(&original, tokens)?;
        info!(count = variants.len(), "Probing variants");

        let original = original.as_str();
        let records = stream::iter(variants)
            .map(|variant| async move { self.prober.probe(&variant, original).await })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(records)
    }
}

/// A bare-root URL keeps its trailing slash: `https://example.com` → `https://example.com/`
pub fn normalize_root(original: &str) -> Result<String> {
    let url = Url::parse(original).map_err(|source| Error::InvalidUrl {
        url: original.to_string(),
        source,
    })?;
    if url.host_str().is_none() {
        return Err(Error::UrlWithoutHost(original.to_string()));
    }

    let bare_root = url.path() == "/" && url.query().is_none() && url.fragment().is_none();
    if bare_root && !original.ends_with('/') {
        Ok(format!("{}/", original))
    } else {
        Ok(original.to_string())
    }
}
