//! Error types.

use std::io;
use thiserror::Error;

/// Result alias for WHOIS operations.
pub type Result<T> = std::result::Result<T, WhoisError>;

/// Errors returned by WHOIS lookups.
///
/// Transport failures carry the underlying [`io::Error`] as their source, and
/// the resolver-level variants wrap the hop error that caused them, so the
/// whole chain is reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum WhoisError {
    /// The subject was empty after trimming whitespace and dots.
    #[error("subject is empty")]
    EmptySubject,

    /// The subject contains a line break and would span several query lines.
    #[error("subject contains a line break: {subject:?}")]
    InvalidSubject {
        /// The offending subject.
        subject: String,
    },

    /// Address resolution or the TCP connect failed.
    #[error("connect to whois server {server} failed: {source}")]
    ConnectFailed {
        /// The server being contacted.
        server: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the query line failed.
    #[error("send to whois server {server} failed: {source}")]
    SendFailed {
        /// The server being contacted.
        server: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading the response failed, including read deadline expiry.
    #[error("read from whois server {server} failed: {source}")]
    ReadFailed {
        /// The server being contacted.
        server: String,
        /// Underlying I/O error (`TimedOut` when the deadline elapsed).
        #[source]
        source: io::Error,
    },

    /// The root-server lookup used to find the authoritative server failed.
    #[error("query for whois server failed: {0}")]
    ServerDiscoveryFailed(#[source] Box<WhoisError>),

    /// The root server answered, but named no whois server.
    #[error("no whois server found for extension {extension:?}")]
    NoServerFound {
        /// The extension that was looked up.
        extension: String,
    },

    /// A content query against a selected server failed.
    #[error("query to whois server {server} failed: {source}")]
    QueryFailed {
        /// The server that was queried.
        server: String,
        /// The hop error.
        #[source]
        source: Box<WhoisError>,
    },

    /// The caller's [`CancelToken`](crate::CancelToken) fired.
    #[error("whois lookup cancelled")]
    Cancelled,

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl WhoisError {
    /// Returns `true` if a deadline or socket timeout caused this error.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if matches!(
                    io.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) {
                    return true;
                }
            }
            current = err.source();
        }
        false
    }

    /// Returns `true` if a connect, send or read failure caused this error.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::ConnectFailed { .. } | Self::SendFailed { .. } | Self::ReadFailed { .. } => true,
            Self::ServerDiscoveryFailed(inner) | Self::QueryFailed { source: inner, .. } => {
                inner.is_transport()
            }
            _ => false,
        }
    }

    /// Returns `true` if the lookup was cancelled by the caller.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the innermost [`WhoisError`] in the chain.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::ServerDiscoveryFailed(inner) | Self::QueryFailed { source: inner, .. } => {
                inner.root()
            }
            _ => self,
        }
    }

    pub(crate) fn query_failed(server: impl Into<String>, source: Self) -> Self {
        Self::QueryFailed {
            server: server.into(),
            source: Box::new(source),
        }
    }
}
