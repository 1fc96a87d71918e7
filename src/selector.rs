//! Proxy selection driven by a PAC script.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::engine::{self, EvaluationRequest, ScriptEvaluator};
use crate::parser::parse_proxy_list;
use crate::proxy::ProxyDescriptor;
use crate::source::PacScriptSource;
use crate::{log_debug, log_error, log_warn};

/// Resolves which proxies to use for a URI by evaluating a PAC script.
///
/// The engine is bound once at construction and kept for the selector's
/// lifetime. Proxy resolution is an optimization layer, never a gatekeeper:
/// every failure (unreadable source, broken script, engine fault, malformed
/// result) is logged and answered with a DIRECT connection instead of an
/// error, so a bad PAC setup cannot take down networking.
pub struct PacProxySelector {
    source: Arc<dyn PacScriptSource>,
    evaluator: Option<Box<dyn ScriptEvaluator>>,
}

impl PacProxySelector {
    /// Binds a script engine to `source`.
    ///
    /// If no engine can be bound (the script cannot be fetched, does not
    /// parse, or lacks `FindProxyForURL`), the selector still constructs but
    /// answers every [`select`](Self::select) with DIRECT.
    pub fn new(source: Arc<dyn PacScriptSource>) -> Self {
        let evaluator = match engine::bind_evaluator(source.as_ref()) {
            Ok(evaluator) => Some(evaluator),
            Err(e) => {
                log_error!("PAC engine binding failed for {}: {}", source.identity(), e);
                None
            }
        };
        PacProxySelector { source, evaluator }
    }

    /// Returns the proxies to try for `uri`, in order. Never empty, never
    /// fails: at worst the list is `[DIRECT]`.
    pub fn select(&self, uri: &str) -> Vec<ProxyDescriptor> {
        if uri.trim().is_empty() {
            log_error!("select() called with an empty URI");
            return direct_list();
        }

        let request = match EvaluationRequest::from_uri(uri) {
            Ok(request) => request,
            Err(e) => {
                log_error!("{}", e);
                return direct_list();
            }
        };

        // Some HTTP stacks re-enter proxy resolution while fetching the PAC
        // script itself; resolving the script's own host must not recurse.
        // The substring match is deliberately permissive.
        if self.source.identity().contains(&request.host) {
            log_debug!(
                "Host {} matches the PAC script source, using DIRECT",
                request.host
            );
            return direct_list();
        }

        let evaluator = match &self.evaluator {
            Some(evaluator) => evaluator,
            None => {
                log_warn!("No usable PAC engine, using DIRECT");
                return direct_list();
            }
        };

        let outcome = evaluator
            .evaluate(&request)
            .and_then(|result| parse_proxy_list(&result));
        match outcome {
            Ok(proxies) => proxies,
            Err(e) => {
                log_error!("PAC resolving error for {}: {}", uri, e);
                direct_list()
            }
        }
    }

    /// Notification that a proxy returned by [`select`](Self::select) failed
    /// to connect. Currently only recorded; reserved for a failover policy.
    pub fn connection_failed(&self, uri: &str, address: SocketAddr, error: &io::Error) {
        log_debug!("Connection to {} for {} failed: {}", address, uri, error);
    }

    /// Name of the bound engine, if one was bound.
    pub fn engine_name(&self) -> Option<&'static str> {
        self.evaluator.as_ref().map(|e| e.name())
    }
}

fn direct_list() -> Vec<ProxyDescriptor> {
    vec![ProxyDescriptor::direct()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyKind;
    use crate::source::StringScriptSource;

    const PAC_IDENTITY: &str = "http://pac.example.com/proxy.pac";

    fn selector(script: &str) -> PacProxySelector {
        PacProxySelector::new(Arc::new(StringScriptSource::new(script, PAC_IDENTITY)))
    }

    #[test]
    fn select_returns_script_result() {
        let selector = selector(
            r#"function FindProxyForURL(url, host) { return "PROXY foo.bar:8080; DIRECT"; }"#,
        );
        let proxies = selector.select("http://www.example.com/index.html");
        assert_eq!(
            proxies,
            vec![
                ProxyDescriptor::http("foo.bar", 8080),
                ProxyDescriptor::direct(),
            ]
        );
    }

    #[test]
    fn host_dependent_script_sees_the_request() {
        let selector = selector(
            r#"
            function FindProxyForURL(url, host) {
                if (host == "internal.example.com") {
                    return "DIRECT";
                }
                return "SOCKS gateway.example.org:1080";
            }
            "#,
        );
        assert!(selector.select("http://internal.example.com/")[0].is_direct());
        let external = selector.select("http://www.rust-lang.org/");
        assert_eq!(external[0].kind(), ProxyKind::Socks);
        assert_eq!(external[0].host(), "gateway.example.org");
        assert_eq!(external[0].port(), 1080);
    }

    #[test]
    fn pac_host_short_circuits_to_direct() {
        // Would return a proxy if evaluated; the loop guard must win.
        let selector =
            selector(r#"function FindProxyForURL(url, host) { return "PROXY foo.bar:8080"; }"#);
        let proxies = selector.select("http://pac.example.com/proxy.pac");
        assert_eq!(proxies, vec![ProxyDescriptor::direct()]);
    }

    #[test]
    fn throwing_script_fails_open() {
        let selector = selector(r#"function FindProxyForURL(url, host) { throw "boom"; }"#);
        for _ in 0..3 {
            assert_eq!(
                selector.select("http://www.example.com/"),
                vec![ProxyDescriptor::direct()]
            );
        }
    }

    #[test]
    fn non_string_result_fails_open() {
        let selector = selector(r#"function FindProxyForURL(url, host) { return null; }"#);
        assert_eq!(
            selector.select("http://www.example.com/"),
            vec![ProxyDescriptor::direct()]
        );
    }

    #[test]
    fn malformed_port_fails_open() {
        let selector =
            selector(r#"function FindProxyForURL(url, host) { return "PROXY foo.bar:http"; }"#);
        assert_eq!(
            selector.select("http://www.example.com/"),
            vec![ProxyDescriptor::direct()]
        );
    }

    #[test]
    fn unparseable_script_degrades_to_direct() {
        let selector = selector("function FindProxyForURL(");
        assert!(selector.engine_name().is_none());
        assert_eq!(
            selector.select("http://www.example.com/"),
            vec![ProxyDescriptor::direct()]
        );
    }

    #[test]
    fn script_without_entry_point_degrades_to_direct() {
        let selector = selector("var answer = 42;");
        assert_eq!(
            selector.select("http://www.example.com/"),
            vec![ProxyDescriptor::direct()]
        );
    }

    #[test]
    fn empty_uri_is_direct_without_evaluation() {
        // A script that would fail loudly if it ever ran.
        let selector = selector(r#"function FindProxyForURL(url, host) { throw "called"; }"#);
        assert_eq!(selector.select(""), vec![ProxyDescriptor::direct()]);
        assert_eq!(selector.select("   "), vec![ProxyDescriptor::direct()]);
    }

    #[test]
    fn unparseable_uri_is_direct() {
        let selector =
            selector(r#"function FindProxyForURL(url, host) { return "PROXY foo.bar:8080"; }"#);
        assert_eq!(
            selector.select("not a uri"),
            vec![ProxyDescriptor::direct()]
        );
    }

    #[test]
    fn connection_failed_is_a_no_op() {
        let selector = selector(r#"function FindProxyForURL(url, host) { return "DIRECT"; }"#);
        let address: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let error = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        selector.connection_failed("http://www.example.com/", address, &error);
    }

    #[test]
    fn selector_is_shareable_across_threads() {
        let selector = Arc::new(selector(
            r#"function FindProxyForURL(url, host) { return "PROXY foo.bar:8080"; }"#,
        ));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let selector = Arc::clone(&selector);
                std::thread::spawn(move || {
                    selector.select(&format!("http://host{}.example.com/", i))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(
                handle.join().unwrap(),
                vec![ProxyDescriptor::http("foo.bar", 8080)]
            );
        }
    }
}
