// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::version::VersionInfo;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of variants probed at the same time for one original URL
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Runtime configuration for a probing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// User-Agent header sent with every probe
    pub user_agent: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Duration,
    /// Upper bound of in-flight probes per original URL (at least 1)
    pub concurrency: usize,
    /// Directory receiving `results.json` and the reports
    pub output_dir: PathBuf,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            user_agent: VersionInfo::current().user_agent(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ProbeSettings {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Zero is treated as sequential probing
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.concurrency, 4);
        assert!(settings.user_agent.starts_with("canonicheck/"));
        assert_eq!(settings.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_zero_concurrency_becomes_sequential() {
        let settings = ProbeSettings::default().with_concurrency(0);
        assert_eq!(settings.concurrency, 1);
    }

    #[test]
    fn test_builder_overrides() {
        let settings = ProbeSettings::default()
            .with_timeout_secs(3)
            .with_user_agent("AuditBot/1.0")
            .with_output_dir("/tmp/out");
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.user_agent, "AuditBot/1.0");
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
    }
}
