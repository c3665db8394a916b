//! WHOIS server references.

use std::fmt;
use std::net::Ipv6Addr;

/// IANA root WHOIS server, the starting point for server discovery.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// ARIN WHOIS server, which needs the `n + ` prefix for network lookups.
pub const ARIN_WHOIS_SERVER: &str = "whois.arin.net";

/// Standard WHOIS port.
pub const DEFAULT_WHOIS_PORT: u16 = 43;

/// A WHOIS server host and port.
///
/// Parsed from `host`, `host:port`, `[v6]:port` or a bare IPv6 literal.
/// The host is lowercased so comparisons are case-insensitive.
///
/// ```
/// use whois_resolver::ServerAddr;
///
/// let s = ServerAddr::parse("WHOIS.Example.NET", 43);
/// assert_eq!(s.host(), "whois.example.net");
/// assert_eq!(s.port(), 43);
///
/// let s = ServerAddr::parse("127.0.0.1:4343", 43);
/// assert_eq!(s.port(), 4343);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddr {
    host: String,
    port: u16,
}

impl ServerAddr {
    /// Parses a server reference, using `default_port` if none is given.
    #[must_use]
    pub fn parse(reference: &str, default_port: u16) -> Self {
        let reference = reference.trim();

        if reference.parse::<Ipv6Addr>().is_ok() {
            return Self::new(reference, default_port);
        }

        if let Some(rest) = reference.strip_prefix('[') {
            if let Some((host, tail)) = rest.split_once(']') {
                let port = tail
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(default_port);
                return Self::new(host, port);
            }
        }

        match reference.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => match port.parse() {
                Ok(port) => Self::new(host, port),
                Err(_) => Self::new(reference, default_port),
            },
            _ => Self::new(reference, default_port),
        }
    }

    /// Creates a server reference from an explicit host and port.
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_ascii_lowercase(),
            port,
        }
    }

    /// Lowercased host name or address literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns `true` for the ARIN registry server.
    #[must_use]
    pub fn is_arin(&self) -> bool {
        self.host == ARIN_WHOIS_SERVER
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
