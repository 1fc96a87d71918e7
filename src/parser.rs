//! Parsing of PAC result strings like `"PROXY proxy1:3128; SOCKS s1:1080; DIRECT"`.

use std::collections::HashSet;

use crate::error::EvaluationError;
use crate::proxy::{ProxyDescriptor, DEFAULT_PROXY_PORT};

const PAC_DIRECT: &str = "DIRECT";
const PAC_SOCKS: &str = "SOCKS";

// Every PAC keyword occupies the first 6 characters of its entry, counting the
// separating space ("PROXY " and "SOCKS " include it, "DIRECT" does not).
const KEYWORD_LEN: usize = 6;

/// Turns a raw `FindProxyForURL` return value into typed proxy descriptors.
///
/// Entries are deduplicated by full descriptor equality, keeping the first
/// occurrence's position. The result is never empty: anything unparseable
/// maps to DIRECT, except a malformed port number, which is reported as an
/// [`EvaluationError`] so the selector can fail open for the whole call.
pub fn parse_proxy_list(result: &str) -> Result<Vec<ProxyDescriptor>, EvaluationError> {
    let mut seen = HashSet::new();
    let mut proxies = Vec::new();
    for entry in result.split(';') {
        let descriptor = parse_entry(entry)?;
        if seen.insert(descriptor.clone()) {
            proxies.push(descriptor);
        }
    }
    if proxies.is_empty() {
        proxies.push(ProxyDescriptor::direct());
    }
    Ok(proxies)
}

fn parse_entry(entry: &str) -> Result<ProxyDescriptor, EvaluationError> {
    let entry = entry.trim();
    // Shorter than the shortest keyword: treat as empty/garbage, go direct.
    if entry.len() < KEYWORD_LEN {
        return Ok(ProxyDescriptor::direct());
    }

    // Keyword match is prefix-based and case-insensitive, so "DIRECTX" still
    // counts as DIRECT. Long-standing PAC parser behavior, kept as is.
    let upper = entry.to_uppercase();
    if upper.starts_with(PAC_DIRECT) {
        return Ok(ProxyDescriptor::direct());
    }
    let socks = upper.starts_with(PAC_SOCKS);

    // Everything after the keyword is "host", "host:port" or "host port".
    let host_spec = entry.get(KEYWORD_LEN..).unwrap_or_default();
    let parts: Vec<&str> = host_spec
        .split([':', ' '])
        .filter(|p| !p.is_empty())
        .collect();

    let (host, port) = if parts.len() == 2 {
        let port = parts[1]
            .parse::<u16>()
            .map_err(|_| EvaluationError::InvalidPort(parts[1].to_string()))?;
        (parts[0], port)
    } else {
        (host_spec.trim(), DEFAULT_PROXY_PORT)
    };

    if socks {
        Ok(ProxyDescriptor::socks(host, port))
    } else {
        Ok(ProxyDescriptor::http(host, port))
    }
}
