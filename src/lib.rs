//! # whois-resolver
//!
//! Recursive WHOIS lookups over the plain TCP/43 line protocol.
//!
//! A lookup starts at the IANA root server, which names the registry for the
//! subject's extension. The registry's answer often carries a
//! `Registrar WHOIS Server:` referral, and the registrar's record is fetched
//! and appended. The result is raw text; nothing is parsed out of it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! // Registry record followed by the registrar's record.
//! let text = whois_resolver::whois("example.com")?;
//!
//! // TLDs and IP literals are answered by the root server alone.
//! let record = whois_resolver::whois("192.0.2.1")?;
//! # Ok::<(), whois_resolver::WhoisError>(())
//! ```
//!
//! ## Configuration and cancellation
//!
//! Timeouts, the root server and the referral hop limit live in
//! [`WhoisConfig`]. A [`CancelToken`] aborts a lookup from another thread or
//! at a deadline:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use whois_resolver::{CancelToken, WhoisConfig, WhoisResolver};
//!
//! let resolver = WhoisResolver::with_config(
//!     WhoisConfig::new()
//!         .with_connect_timeout(Duration::from_secs(5))
//!         .with_read_timeout(Duration::from_secs(10)),
//! )?;
//!
//! let cancel = CancelToken::new().with_timeout(Duration::from_secs(15));
//! let lookup = resolver.lookup("example.com", None, &cancel)?;
//! for hop in lookup.hops() {
//!     println!("{}: {} bytes", hop.server, hop.response.len());
//! }
//! # Ok::<(), whois_resolver::WhoisError>(())
//! ```
//!
//! ## Logging
//!
//! Hops, referral decisions and completed lookups are reported through
//! [`tracing`]. Install a subscriber to see them.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod query;
pub mod referral;
pub mod resolver;
pub mod server;
pub mod util;

pub use cancel::CancelToken;
pub use config::WhoisConfig;
pub use error::{Result, WhoisError};
pub use query::query_server;
pub use resolver::{Hop, Lookup, WhoisResolver};
pub use server::{ARIN_WHOIS_SERVER, DEFAULT_WHOIS_PORT, IANA_WHOIS_SERVER, ServerAddr};

/// Looks up `subject` with the default configuration.
///
/// # Errors
///
/// See [`WhoisResolver::lookup`].
pub fn whois(subject: &str) -> Result<String> {
    WhoisResolver::new().resolve(subject)
}
