// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// Tool identification written into reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub tool: String,
    pub version: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        VersionInfo {
            tool: "canonicheck".to_string(),
            version: crate::VERSION.to_string(),
        }
    }

    /// Default User-Agent header value, e.g. `canonicheck/0.1.0`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.tool, self.version)
    }
}
