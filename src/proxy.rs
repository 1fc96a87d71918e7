use std::fmt;

/// Default port used when a PAC result names a proxy without one.
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// Connection type described by one entry of a PAC result string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    Direct,
    Http,
    Socks,
}

/// One proxy endpoint (or the direct connection) a client should try.
///
/// Descriptors are plain values: equality and hashing cover kind, host and
/// port, so repeated entries in a PAC result collapse during deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyDescriptor {
    kind: ProxyKind,
    host: String,
    port: u16,
}

impl ProxyDescriptor {
    /// The "no proxy" descriptor.
    pub fn direct() -> Self {
        ProxyDescriptor {
            kind: ProxyKind::Direct,
            host: String::new(),
            port: 0,
        }
    }

    pub fn http(host: impl Into<String>, port: u16) -> Self {
        ProxyDescriptor {
            kind: ProxyKind::Http,
            host: host.into(),
            port,
        }
    }

    pub fn socks(host: impl Into<String>, port: u16) -> Self {
        ProxyDescriptor {
            kind: ProxyKind::Socks,
            host: host.into(),
            port,
        }
    }

    pub fn kind(&self) -> ProxyKind {
        self.kind
    }

    /// Proxy host name; empty for [`ProxyKind::Direct`].
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_direct(&self) -> bool {
        self.kind == ProxyKind::Direct
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProxyKind::Direct => write!(f, "DIRECT"),
            ProxyKind::Http => write!(f, "PROXY {}:{}", self.host, self.port),
            ProxyKind::Socks => write!(f, "SOCKS {}:{}", self.host, self.port),
        }
    }
}
