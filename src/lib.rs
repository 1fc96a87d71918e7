// src/lib.rs
pub mod engine;
pub mod error;
pub mod log;
pub mod parser;
pub mod proxy;
pub mod selector;
pub mod source;

use std::sync::Arc;

pub use error::EvaluationError;
pub use proxy::{ProxyDescriptor, ProxyKind, DEFAULT_PROXY_PORT};
pub use selector::PacProxySelector;
pub use source::{FileScriptSource, PacScriptSource, StringScriptSource, UrlScriptSource};

/// Resolves the proxies to use for `url` per the PAC script at `pac_url`.
///
/// One-shot convenience around [`PacProxySelector`]; it downloads and binds
/// the script on every call. Hold a selector instead when resolving many
/// URLs against the same script.
///
/// Never fails: any download, script, or engine problem degrades to a
/// single-element DIRECT list.
///
/// # Examples
///
/// ```no_run
/// use pacselect::find_proxies_for_url;
///
/// let proxies = find_proxies_for_url(
///     "http://pac.example.com/proxy.pac",
///     "https://www.rust-lang.org/",
/// );
/// for proxy in proxies {
///     println!("{}", proxy); // e.g. "PROXY proxy.example.com:3128" or "DIRECT"
/// }
/// ```
pub fn find_proxies_for_url(pac_url: &str, url: &str) -> Vec<ProxyDescriptor> {
    let selector = PacProxySelector::new(Arc::new(UrlScriptSource::new(pac_url)));
    selector.select(url)
}
