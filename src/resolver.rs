//! Referral-following WHOIS resolution.
//!
//! A lookup walks a small stage machine:
//!
//! ```text
//! Start ──▶ ServerKnown ──▶ HopDone ──▶ Done
//!               ▲              │
//!               └── referral ──┘   (at most `max_referral_hops` times)
//! ```
//!
//! `Start` picks the first server: an explicit one, the root server for bare
//! TLDs and IP literals, or the server the root names for the subject's
//! extension. Each `ServerKnown` stage runs one TCP hop. `HopDone` decides
//! whether the response refers onward.

use crate::cancel::CancelToken;
use crate::config::WhoisConfig;
use crate::error::{Result, WhoisError};
use crate::query::query_server;
use crate::referral::find_referral;
use crate::server::ServerAddr;
use crate::util::{extract_extension, is_ip_literal, normalize_subject};

/// One content hop of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// Server that answered.
    pub server: ServerAddr,
    /// Raw response text.
    pub response: String,
}

/// The outcome of [`WhoisResolver::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    subject: String,
    hops: Vec<Hop>,
}

impl Lookup {
    /// The normalized subject that was queried.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Content hops in the order they were made.
    #[must_use]
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// All responses concatenated in hop order, without separators.
    #[must_use]
    pub fn text(&self) -> String {
        self.hops.iter().map(|h| h.response.as_str()).collect()
    }

    /// Consumes the lookup, returning [`text`](Self::text).
    #[must_use]
    pub fn into_text(self) -> String {
        self.hops.into_iter().map(|h| h.response).collect()
    }
}

/// Resolves WHOIS records by following server referrals.
///
/// The resolver holds only its configuration and can be shared across
/// threads. Each call opens its own connections, one at a time.
///
/// # Example
///
/// ```rust,no_run
/// use whois_resolver::WhoisResolver;
///
/// let resolver = WhoisResolver::new();
///
/// // Registry record followed by the registrar's record.
/// let text = resolver.resolve("example.com")?;
///
/// // Skip discovery and ask a known server.
/// let text = resolver.resolve_with("example.com", Some("whois.verisign-grs.com"))?;
/// # Ok::<(), whois_resolver::WhoisError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhoisResolver {
    config: WhoisConfig,
}

#[derive(Debug)]
enum Stage {
    Start,
    ServerKnown { server: ServerAddr, follow: bool },
    HopDone { follow: bool },
    Done,
}

/// What to do after a hop.
#[derive(Debug, PartialEq, Eq)]
enum Next {
    /// No referral in the last response.
    Done,
    /// Query the referred server.
    Follow(ServerAddr),
    /// Referral found, but the hop limit is reached.
    Limit(ServerAddr),
    /// Referral names a server already queried in this lookup.
    Loop(ServerAddr),
}

impl WhoisResolver {
    /// Creates a resolver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WhoisError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: WhoisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &WhoisConfig {
        &self.config
    }

    /// Looks up `subject`, discovering the authoritative server.
    ///
    /// # Errors
    ///
    /// See [`lookup`](Self::lookup).
    pub fn resolve(&self, subject: &str) -> Result<String> {
        self.resolve_with(subject, None)
    }

    /// Looks up `subject`, starting at `server` when one is given.
    ///
    /// An empty server string counts as none.
    ///
    /// # Errors
    ///
    /// See [`lookup`](Self::lookup).
    pub fn resolve_with(&self, subject: &str, server: Option<&str>) -> Result<String> {
        self.lookup(subject, server, &CancelToken::new())
            .map(Lookup::into_text)
    }

    /// Runs a full lookup and returns every content hop.
    ///
    /// With no explicit server, an IP literal or a subject without dots is
    /// sent to the root server alone. The answer is returned as is, even if it
    /// names another server.
    ///
    /// # Errors
    ///
    /// - [`WhoisError::EmptySubject`] if `subject` is blank after trimming.
    /// - [`WhoisError::ServerDiscoveryFailed`] if the root lookup for the
    ///   extension fails.
    /// - [`WhoisError::NoServerFound`] if the root names no server.
    /// - [`WhoisError::QueryFailed`] if any content hop fails. Text from
    ///   earlier hops is discarded.
    /// - [`WhoisError::Cancelled`] if `cancel` fires.
    pub fn lookup(
        &self,
        subject: &str,
        server: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<Lookup> {
        let subject = normalize_subject(subject)?;
        let explicit = server.filter(|s| !s.trim().is_empty());

        let mut lookup = Lookup {
            subject: subject.to_string(),
            hops: Vec::new(),
        };

        let mut stage = Stage::Start;
        loop {
            stage = match stage {
                Stage::Start => self.start(subject, explicit, cancel)?,
                Stage::ServerKnown { server, follow } => {
                    let response = self.hop(subject, &server, cancel)?;
                    lookup.hops.push(Hop { server, response });
                    Stage::HopDone { follow }
                }
                Stage::HopDone { follow: false } => Stage::Done,
                Stage::HopDone { follow: true } => {
                    match next_referral(&lookup.hops, &self.config) {
                        Next::Follow(server) => {
                            tracing::debug!(subject = %subject, server = %server, "Following referral");
                            Stage::ServerKnown {
                                server,
                                follow: true,
                            }
                        }
                        Next::Limit(server) => {
                            tracing::debug!(
                                subject = %subject,
                                server = %server,
                                "Referral hop limit reached, not following"
                            );
                            Stage::Done
                        }
                        Next::Loop(server) => {
                            tracing::debug!(
                                subject = %subject,
                                server = %server,
                                "Referral points back to a queried server, stopping"
                            );
                            Stage::Done
                        }
                        Next::Done => Stage::Done,
                    }
                }
                Stage::Done => break,
            };
        }

        tracing::info!(
            subject = %lookup.subject,
            hops = lookup.hops.len(),
            bytes = lookup.hops.iter().map(|h| h.response.len()).sum::<usize>(),
            "Whois lookup complete"
        );
        Ok(lookup)
    }

    /// Picks the first content server.
    fn start(&self, subject: &str, explicit: Option<&str>, cancel: &CancelToken) -> Result<Stage> {
        if let Some(server) = explicit {
            return Ok(Stage::ServerKnown {
                server: ServerAddr::parse(server, self.config.port),
                follow: true,
            });
        }

        if is_ip_literal(subject) || !subject.contains('.') {
            tracing::debug!(subject = %subject, "Bare registry query, asking root server only");
            return Ok(Stage::ServerKnown {
                server: self.root(),
                follow: false,
            });
        }

        Ok(Stage::ServerKnown {
            server: self.discover(subject, cancel)?,
            follow: true,
        })
    }

    /// Asks the root server which server is authoritative for the extension.
    fn discover(&self, subject: &str, cancel: &CancelToken) -> Result<ServerAddr> {
        let extension = extract_extension(subject);
        let response = self
            .hop(extension, &self.root(), cancel)
            .map_err(|e| match e {
                WhoisError::Cancelled => e,
                other => WhoisError::ServerDiscoveryFailed(Box::new(other)),
            })?;

        let server = find_referral(&response).ok_or_else(|| WhoisError::NoServerFound {
            extension: extension.to_string(),
        })?;
        tracing::debug!(extension = %extension, server = %server, "Discovered whois server");
        Ok(referred_server(server, &self.config))
    }

    /// Runs one TCP hop, wrapping failures as [`WhoisError::QueryFailed`].
    fn hop(&self, subject: &str, server: &ServerAddr, cancel: &CancelToken) -> Result<String> {
        query_server(subject, server, &self.config, cancel).map_err(|e| match e {
            WhoisError::Cancelled => e,
            other => WhoisError::query_failed(server.to_string(), other),
        })
    }

    fn root(&self) -> ServerAddr {
        ServerAddr::parse(&self.config.root_server, self.config.port)
    }
}

/// Builds the address for a server named inside a response.
///
/// The configured port is used unless `referral_ports` is set, so a
/// response can't steer the next connection to an arbitrary port.
fn referred_server(name: &str, config: &WhoisConfig) -> ServerAddr {
    if config.referral_ports {
        ServerAddr::parse(name, config.port)
    } else {
        ServerAddr::new(name.trim(), config.port)
    }
}

/// Decides where the last hop leads.
///
/// The first referral is always followed when the limit allows it, even if
/// it names the server that just answered. Later referrals stop at any
/// server already queried in this lookup.
fn next_referral(hops: &[Hop], config: &WhoisConfig) -> Next {
    let Some(last) = hops.last() else {
        return Next::Done;
    };
    let Some(referral) = find_referral(&last.response) else {
        return Next::Done;
    };

    let server = referred_server(referral, config);
    if hops.len() > config.max_referral_hops {
        Next::Limit(server)
    } else if hops.len() >= 2 && hops.iter().any(|h| h.server == server) {
        Next::Loop(server)
    } else {
        Next::Follow(server)
    }
}
