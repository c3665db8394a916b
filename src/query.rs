//! Single-hop WHOIS query over TCP.
//!
//! One call opens one connection, writes one CRLF-terminated line and reads
//! until the server closes. The stream is owned by the call and dropped on
//! every return path.

use crate::cancel::CancelToken;
use crate::config::WhoisConfig;
use crate::error::{Result, WhoisError};
use crate::server::ServerAddr;
use crate::util::ensure_single_line;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

const READ_CHUNK: usize = 4096;

/// Builds the line sent to `server` for `subject`, including CRLF.
///
/// ARIN answers bare subjects with handle lookups; `n + ` asks for the
/// network record instead.
#[must_use]
pub fn query_line(subject: &str, server: &ServerAddr) -> String {
    if server.is_arin() {
        format!("n + {subject}\r\n")
    } else {
        format!("{subject}\r\n")
    }
}

/// Queries `server` for `subject` and returns the raw response text.
///
/// The read deadline is `config.read_timeout` after the connection is
/// established and is not extended by incoming data. Non-UTF-8 bytes are
/// replaced rather than rejected.
///
/// # Errors
///
/// - [`WhoisError::ConnectFailed`] if the host doesn't resolve or no address
///   accepts within `config.connect_timeout`.
/// - [`WhoisError::SendFailed`] if the query line can't be written.
/// - [`WhoisError::ReadFailed`] on a read error or when the deadline elapses
///   (source kind `TimedOut`). Partial responses are discarded.
/// - [`WhoisError::Cancelled`] if `cancel` fires first.
/// - [`WhoisError::InvalidSubject`] if `subject` contains CR or LF. Nothing
///   is sent in that case.
pub fn query_server(
    subject: &str,
    server: &ServerAddr,
    config: &WhoisConfig,
    cancel: &CancelToken,
) -> Result<String> {
    ensure_single_line(subject)?;
    let started = Instant::now();
    let mut stream = connect(server, config.connect_timeout, cancel)?;
    let deadline = Instant::now() + config.read_timeout;

    let line = query_line(subject, server);
    tracing::debug!(server = %server, query = %line.trim_end(), "Sending whois query");

    let send_failed = |source| WhoisError::SendFailed {
        server: server.to_string(),
        source,
    };
    stream
        .set_write_timeout(Some(config.read_timeout))
        .map_err(send_failed)?;
    stream.write_all(line.as_bytes()).map_err(send_failed)?;

    let body = read_until_close(&mut stream, server, deadline, config.poll_interval, cancel)?;

    tracing::debug!(
        server = %server,
        bytes = body.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Received whois response"
    );
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Connects to the first resolved address that accepts.
fn connect(server: &ServerAddr, timeout: Duration, cancel: &CancelToken) -> Result<TcpStream> {
    let connect_failed = |source| WhoisError::ConnectFailed {
        server: server.to_string(),
        source,
    };

    if cancel.is_cancelled() {
        return Err(WhoisError::Cancelled);
    }

    let addrs: Vec<SocketAddr> = (server.host(), server.port())
        .to_socket_addrs()
        .map_err(connect_failed)?
        .collect();

    let mut last_err = None;
    for (i, addr) in addrs.iter().enumerate() {
        let timeout = attempt_timeout(timeout, cancel)?;

        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => {
                tracing::debug!(server = %server, addr = %addr, "Connected to whois server");
                return Ok(stream);
            }
            Err(e) => {
                if i + 1 < addrs.len() {
                    tracing::warn!(
                        server = %server,
                        addr = %addr,
                        error = %e,
                        "Connect attempt failed, trying next address"
                    );
                }
                last_err = Some(e);
            }
        }
    }

    Err(connect_failed(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

/// Timeout for one connect attempt, capped by the token's deadline.
///
/// `connect_timeout` rejects a zero duration, so a deadline that lapses
/// between checks is reported as cancellation.
fn attempt_timeout(timeout: Duration, cancel: &CancelToken) -> Result<Duration> {
    if cancel.is_cancelled() {
        return Err(WhoisError::Cancelled);
    }
    let timeout = cancel.remaining().map_or(timeout, |left| left.min(timeout));
    if timeout.is_zero() {
        return Err(WhoisError::Cancelled);
    }
    Ok(timeout)
}

/// Reads in `poll`-sized slices until EOF, the deadline, or cancellation.
fn read_until_close(
    stream: &mut TcpStream,
    server: &ServerAddr,
    deadline: Instant,
    poll: Duration,
    cancel: &CancelToken,
) -> Result<Vec<u8>> {
    let read_failed = |source| WhoisError::ReadFailed {
        server: server.to_string(),
        source,
    };

    let mut body = Vec::new();
    let mut buf = [0u8; READ_CHUNK];
    loop {
        if cancel.is_cancelled() {
            return Err(WhoisError::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(read_failed(io::Error::new(
                io::ErrorKind::TimedOut,
                "read deadline elapsed",
            )));
        }

        // set_read_timeout rejects a zero duration.
        let slice = (deadline - now).min(poll).max(Duration::from_millis(1));
        stream.set_read_timeout(Some(slice)).map_err(read_failed)?;

        match stream.read(&mut buf) {
            Ok(0) => return Ok(body),
            Ok(n) => body.extend_from_slice(&buf[..n]),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) => {}
            Err(e) => return Err(read_failed(e)),
        }
    }
}
