//! Lookup configuration.

use crate::error::{Result, WhoisError};
use crate::server::{DEFAULT_WHOIS_PORT, IANA_WHOIS_SERVER};
use std::time::Duration;

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default total read time per hop.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`WhoisResolver`](crate::WhoisResolver).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use whois_resolver::WhoisConfig;
///
/// let config = WhoisConfig::new()
///     .with_read_timeout(Duration::from_secs(10))
///     .with_max_referral_hops(2);
///
/// assert_eq!(config.root_server, "whois.iana.org");
/// assert_eq!(config.port, 43);
/// assert_eq!(config.max_referral_hops, 2);
/// ```
#[derive(Debug, Clone)]
pub struct WhoisConfig {
    /// Server asked about bare TLDs, IP literals, and unknown extensions.
    pub root_server: String,

    /// Port used for servers that don't name one explicitly.
    pub port: u16,

    /// Timeout for each TCP connect attempt.
    pub connect_timeout: Duration,

    /// Total time allowed to read one response, counted from connect.
    pub read_timeout: Duration,

    /// How many referrals to follow after the first content hop.
    /// `0` disables referral following.
    pub max_referral_hops: usize,

    /// Read slice length; bounds how quickly cancellation is noticed.
    pub poll_interval: Duration,

    /// Honor `host:port` in server names taken from responses. Off by
    /// default, so referrals always connect on [`port`](Self::port).
    pub referral_ports: bool,
}

impl WhoisConfig {
    /// Creates a config with the standard IANA root and 30 s timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root_server: IANA_WHOIS_SERVER.to_string(),
            port: DEFAULT_WHOIS_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_referral_hops: 1,
            poll_interval: Duration::from_millis(250),
            referral_ports: false,
        }
    }

    /// Overrides the root server (useful for pointing at a test double).
    #[must_use]
    pub fn with_root_server(mut self, server: impl Into<String>) -> Self {
        self.root_server = server.into();
        self
    }

    /// Overrides the default port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Overrides the read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Overrides the referral hop limit.
    #[must_use]
    pub const fn with_max_referral_hops(mut self, hops: usize) -> Self {
        self.max_referral_hops = hops;
        self
    }

    /// Overrides the read poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Lets referrals name their own port (useful for chaining test doubles).
    #[must_use]
    pub const fn with_referral_ports(mut self, enabled: bool) -> Self {
        self.referral_ports = enabled;
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`WhoisError::InvalidConfig`] for an empty root server, a zero
    /// port, or a zero timeout or poll interval.
    pub fn validate(&self) -> Result<()> {
        if self.root_server.trim().is_empty() {
            return Err(WhoisError::InvalidConfig("root_server is empty".into()));
        }
        if self.port == 0 {
            return Err(WhoisError::InvalidConfig("port must be non-zero".into()));
        }
        for (name, value) in [
            ("connect_timeout", self.connect_timeout),
            ("read_timeout", self.read_timeout),
            ("poll_interval", self.poll_interval),
        ] {
            if value.is_zero() {
                return Err(WhoisError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_defaults() {
        let c = WhoisConfig::new();
        assert_eq!(c.root_server, IANA_WHOIS_SERVER);
        assert_eq!(c.port, 43);
        assert_eq!(c.connect_timeout, Duration::from_secs(30));
        assert_eq!(c.read_timeout, Duration::from_secs(30));
        assert_eq!(c.max_referral_hops, 1);
        assert!(!c.referral_ports);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builders_override() {
        let c = WhoisConfig::new()
            .with_root_server("127.0.0.1")
            .with_port(4343)
            .with_connect_timeout(Duration::from_secs(1))
            .with_poll_interval(Duration::from_millis(10))
            .with_max_referral_hops(0)
            .with_referral_ports(true);
        assert_eq!(c.root_server, "127.0.0.1");
        assert_eq!(c.port, 4343);
        assert_eq!(c.connect_timeout, Duration::from_secs(1));
        assert_eq!(c.poll_interval, Duration::from_millis(10));
        assert_eq!(c.max_referral_hops, 0);
        assert!(c.referral_ports);
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let bad = [
            WhoisConfig::new().with_root_server(" "),
            WhoisConfig::new().with_port(0),
            WhoisConfig::new().with_connect_timeout(Duration::ZERO),
            WhoisConfig::new().with_read_timeout(Duration::ZERO),
            WhoisConfig::new().with_poll_interval(Duration::ZERO),
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(WhoisError::InvalidConfig(_))
            ));
        }
    }
}
