// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Structural URL variants used to probe canonicalization.
//!
//! Each variant class mirrors a real-world way of reaching the same content through
//! a different address: protocol and `www.` splits, trailing slashes, case-insensitive
//! file systems, tracking parameters, staging hosts leaking into production and so on.

use crate::error::{Error, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;
use url::{Position, Url};

/// Characters kept verbatim when percent-encoding a whole URL, besides ASCII alphanumerics
const URI_UNESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const TOKEN_MIN_LEN: usize = 8;
pub const TOKEN_MAX_LEN: usize = 13;

/// Port used for the non-standard port variant
pub const ALTERNATE_PORT: u16 = 8080;

/// Source of the random path segment used by the negative-control variant.
pub trait TokenSource {
    fn token(&mut self) -> String;
}

/// Draws tokens from any `rand` generator.
pub struct RngTokens<R>(pub R);

impl<R: Rng> TokenSource for RngTokens<R> {
    fn token(&mut self) -> String {
        random_token(&mut self.0)
    }
}

/// Draws tokens from the thread-local generator.
pub struct ThreadRngTokens;

impl TokenSource for ThreadRngTokens {
    fn token(&mut self) -> String {
        random_token(&mut rand::thread_rng())
    }
}

/// Always yields the same token
#[derive(Debug, Clone)]
pub struct FixedToken(pub String);

impl TokenSource for FixedToken {
    fn token(&mut self) -> String {
        self.0.clone()
    }
}

/// Lowercase alphanumeric token of 8 to 13 characters
pub fn random_token<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(TOKEN_MIN_LEN..=TOKEN_MAX_LEN);
    (0..len)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Insertion-ordered set of variant URLs
#[derive(Debug, Clone, Default)]
pub struct VariantSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the variant was already present
    pub fn insert(&mut self, variant: impl Into<String>) -> bool {
        let variant = variant.into();
        if self.seen.contains(&variant) {
            return false;
        }
        self.seen.insert(variant.clone());
        self.ordered.push(variant);
        true
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.seen.contains(variant)
    }

    pub(crate) fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

impl IntoIterator for VariantSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.into_iter()
    }
}

/// Parsed pieces of the original URL shared by the structural variants
struct UrlParts<'a> {
    url: &'a Url,
    scheme: &'a str,
    host: &'a str,
    /// `scheme://host[:port]`, without credentials
    origin: String,
    path: &'a str,
    /// Path, query and fragment as serialized
    tail: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
    segments: Vec<&'a str>,
}

impl<'a> UrlParts<'a> {
    fn new(url: &'a Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::UrlWithoutHost(url.to_string()))?;
        let origin = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };

        Ok(UrlParts {
            url,
            scheme: url.scheme(),
            host,
            origin,
            path: url.path(),
            tail: &url[Position::BeforePath..],
            query: url.query(),
            fragment: url.fragment(),
            segments: url.path().split('/').filter(|s| !s.is_empty()).collect(),
        })
    }
}

/// Build the variant set for `original`.
///
/// The original URL is always the first entry. Variants that coincide for simple URLs
/// (for example case transforms of an empty path) collapse into one entry.
pub fn generate_variants(original: &str, tokens: &mut impl TokenSource) -> Result<VariantSet> {
    let url = Url::parse(original).map_err(|source| Error::InvalidUrl {
        url: original.to_string(),
        source,
    })?;
    let parts = UrlParts::new(&url)?;

    let mut variants = VariantSet::new();
    variants.insert(original);
    add_slash_variants(&mut variants, original);
    add_case_variants(&mut variants, &parts);
    add_scheme_and_host_variants(&mut variants, original, &parts);
    add_query_and_fragment_variants(&mut variants, original, &parts);
    add_encoding_variants(&mut variants, original);
    add_negative_control(&mut variants, &parts, tokens);
    add_authority_variants(&mut variants, &parts);

    debug!(url = original, count = variants.len(), "Generated variants");
    Ok(variants)
}

fn add_slash_variants(variants: &mut VariantSet, original: &str) {
    variants.insert(original.strip_suffix('/').unwrap_or(original));
    variants.insert(format!("{}/", original));
    variants.insert(double_slashes(original));
}

fn add_case_variants(variants: &mut VariantSet, parts: &UrlParts<'_>) {
    variants.insert(format!("{}{}", parts.origin, parts.tail.to_lowercase()));
    variants.insert(format!("{}{}", parts.origin, parts.tail.to_uppercase()));

    let title_cased: Vec<String> = parts.segments.iter().map(|s| title_case(s)).collect();
    variants.insert(format!("{}/{}", parts.origin, title_cased.join("/")));

    for index in 0..parts.segments.len() {
        let mut segments: Vec<String> = parts.segments.iter().map(|s| s.to_string()).collect();

        segments[index] = parts.segments[index].to_uppercase();
        variants.insert(format!("{}/{}", parts.origin, segments.join("/")));

        segments[index] = parts.segments[index].to_lowercase();
        variants.insert(format!("{}/{}", parts.origin, segments.join("/")));
    }
}

fn add_scheme_and_host_variants(variants: &mut VariantSet, original: &str, parts: &UrlParts<'_>) {
    variants.insert(swap_scheme(original, "https:", "http:"));
    variants.insert(swap_scheme(original, "http:", "https:"));

    if !parts.host.starts_with("www.") {
        let mut www = parts.url.clone();
        if www.set_host(Some(&format!("www.{}", parts.host))).is_ok() {
            variants.insert(www.as_str());
        }
    }
    variants.insert(original.replacen("www.", "", 1));
}

/// Query and fragment are cut at their delimiters in the input as written, which may
/// differ from the parser's percent-encoded serialization.
fn add_query_and_fragment_variants(
    variants: &mut VariantSet,
    original: &str,
    parts: &UrlParts<'_>,
) {
    let fragment_start = original.find('#').unwrap_or(original.len());
    let query_start = original[..fragment_start].find('?');

    variants.insert(format!("{}?key=value", original));
    if let (Some(_), Some(start)) = (parts.query, query_start) {
        variants.insert(format!("{}{}", &original[..start], &original[fragment_start..]));
    }
    variants.insert(format!("{}?wrong=value", original));

    variants.insert(format!("{}#section", original));
    if parts.fragment.is_some() {
        variants.insert(&original[..fragment_start]);
    }
}

fn add_encoding_variants(variants: &mut VariantSet, original: &str) {
    variants.insert(encode_uri(original));
    variants.insert(decode_uri(original));
}

/// Replaces the last path segment with a random token; expected to 404.
fn add_negative_control(
    variants: &mut VariantSet,
    parts: &UrlParts<'_>,
    tokens: &mut impl TokenSource,
) {
    let token = tokens.token();
    let parent = &parts.segments[..parts.segments.len().saturating_sub(1)];
    if parent.is_empty() {
        variants.insert(format!("{}/{}", parts.origin, token));
    } else {
        variants.insert(format!("{}/{}/{}", parts.origin, parent.join("/"), token));
    }
}

fn add_authority_variants(variants: &mut VariantSet, parts: &UrlParts<'_>) {
    let (scheme, host, path) = (parts.scheme, parts.host, parts.path);
    variants.insert(format!("{scheme}://{host}:{ALTERNATE_PORT}{path}"));
    variants.insert(format!("{scheme}://user:password@{host}{path}"));
    variants.insert(format!("{scheme}://sub.sub2.{host}{path}"));
    variants.insert(format!("{scheme}://staging.{host}{path}"));
}

/// Replace every run of `/` with exactly `//`
fn double_slashes(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut in_run = false;
    for ch in value.chars() {
        if ch == '/' {
            if !in_run {
                out.push_str("//");
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

fn swap_scheme(url: &str, from: &str, to: &str) -> String {
    match url.strip_prefix(from) {
        Some(rest) => format!("{}{}", to, rest),
        None => url.to_string(),
    }
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn encode_uri(value: &str) -> String {
    utf8_percent_encode(value, URI_UNESCAPED).to_string()
}

/// Falls back to the input when the decoded bytes are not UTF-8
fn decode_uri(value: &str) -> String {
    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
