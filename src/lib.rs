// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! URL canonicalization auditing.
//!
//! For every input URL the crate synthesizes structural variants, fetches each one
//! without following redirects and classifies the response against the original URL.

pub mod error;
pub mod models;
pub mod services;

pub use error::{Error, Result};

/// Crate version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `CANONICHECK_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("CANONICHECK_VERSION");
