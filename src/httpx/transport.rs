//! The streaming transport contract.
//!
//! The engine hands the transport a [`TransportConfig`] and an event handler.
//! The transport performs the wire exchange and reports progress as a stream
//! of [`TransportEvent`]s; the handler may steer the exchange mid-flight
//! through [`TransportControl`] (header injection, one-hop redirect
//! confirmation). TLS negotiation and socket plumbing live entirely behind
//! this seam.

use super::request::Method;
use std::fmt;
use std::time::Duration;

/// Wall-clock budget for one whole exchange.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one exchange.
#[derive(Debug)]
pub struct TransportConfig<'a> {
    /// Target URL.
    pub url: &'a str,
    /// Request method.
    pub method: Method,
    /// Total wall-clock timeout for the exchange.
    pub timeout: Duration,
    /// Automatic redirect following. The engine always disables this and
    /// confirms redirects explicitly through [`TransportControl`].
    pub auto_redirect: bool,
    /// PEM trust anchor; its presence selects the TLS transport.
    pub trust_anchor: Option<&'a [u8]>,
    /// Headers to send, in order.
    pub headers: Vec<(&'static str, &'a str)>,
    /// Request body, if any.
    pub body: Option<&'a [u8]>,
}

/// Progress notifications delivered during an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent<'a> {
    /// The connection to the server is established.
    Connected,
    /// The request header went out.
    HeaderSent,
    /// A response header arrived.
    Header { name: &'a str, value: &'a str },
    /// A fragment of the response body arrived.
    Data(&'a [u8]),
    /// The exchange completed.
    Finished,
    /// The connection dropped mid-transfer.
    Disconnected,
    /// The server redirected despite auto-redirect being disabled; the
    /// handler decides whether to confirm the hop.
    Redirect,
    /// A transport-level error occurred (details follow in the perform
    /// result).
    Error,
}

/// Mid-exchange control surface offered to the event handler.
pub trait TransportControl {
    /// Set or replace a request header for the (re-)attempt.
    fn set_header(&mut self, name: &str, value: &str);

    /// Confirm following the pending redirect, one hop.
    fn follow_redirect(&mut self);
}

/// Receives transport events for one exchange.
///
/// Returning `Err(HandlerAbort)` tells the transport to abandon the exchange;
/// the transport then fails its `perform` call.
pub trait ExchangeHandler {
    fn on_event(
        &mut self,
        event: TransportEvent<'_>,
        control: &mut dyn TransportControl,
    ) -> Result<(), HandlerAbort>;
}

/// Marker returned by a handler to abort the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerAbort;

/// What the transport reports after a successful exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeSummary {
    /// HTTP status code of the final response.
    pub status_code: u16,
    /// Value of the `Content-Length` header, when the server sent one.
    pub content_length: Option<u64>,
}

/// A transport capable of performing one HTTP(S) exchange at a time.
pub trait Transport {
    /// Perform the exchange described by `config`, streaming progress into
    /// `handler`. All transport resources are released before returning, on
    /// every path.
    fn perform(
        &mut self,
        config: &TransportConfig<'_>,
        handler: &mut dyn ExchangeHandler,
    ) -> Result<ExchangeSummary, TransportError>;
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not reach or connect to the server.
    Connect(String),
    /// TLS negotiation or certificate validation failed.
    Tls(String),
    /// The exchange exceeded its wall-clock timeout.
    Timeout,
    /// The peer violated the protocol or the exchange is unservable.
    Protocol(String),
    /// The event handler aborted the exchange.
    Aborted,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(msg) => write!(f, "connect failed: {}", msg),
            Self::Tls(msg) => write!(f, "TLS failure: {}", msg),
            Self::Timeout => write!(f, "exchange timed out"),
            Self::Protocol(msg) => write!(f, "protocol failure: {}", msg),
            Self::Aborted => write!(f, "exchange aborted by handler"),
        }
    }
}

impl std::error::Error for TransportError {}
