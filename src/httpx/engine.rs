//! The request engine.
//!
//! Performs exactly one HTTP(S) exchange to completion: builds the transport
//! configuration from a [`RequestDescriptor`], streams response fragments into
//! a fresh [`PendingResponse`], confirms at most one redirect hop, and returns
//! the accumulated body or a stage-typed error. The engine never retries;
//! retry policy belongs to the caller.

use super::request::RequestDescriptor;
use super::response::{BufferExhausted, PendingResponse, Response};
use super::transport::{
    ExchangeHandler, HandlerAbort, Transport, TransportConfig, TransportControl, TransportError,
    TransportEvent, REQUEST_TIMEOUT,
};
use log::{debug, info};
use std::fmt;

/// `From` header value sent when confirming a redirect.
const REDIRECT_FROM: &str = "user@example.com";

/// `Accept` header value sent when confirming a redirect.
const REDIRECT_ACCEPT: &str = "text/html";

/// One-at-a-time HTTP(S) request engine over a [`Transport`].
///
/// A single engine owns a single in-flight exchange; callers needing
/// concurrent requests create independent engines.
pub struct RequestEngine<T: Transport> {
    transport: T,
    body_limit: Option<usize>,
}

impl<T: Transport> RequestEngine<T> {
    /// Wrap a transport. Response bodies may grow as large as the allocator
    /// allows; see [`with_body_limit`](Self::with_body_limit) to cap them.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            body_limit: None,
        }
    }

    /// Cap accumulated response bodies at `limit` bytes.
    ///
    /// A response exceeding the cap aborts the exchange with
    /// [`RequestError::BufferExhausted`], the same way an allocation failure
    /// does.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    /// Perform one request to completion.
    ///
    /// Suspends the calling context until the exchange finishes or the fixed
    /// wall-clock timeout elapses. On any failure the response buffer has
    /// been released; no partial body is ever returned.
    pub fn execute(&mut self, request: &RequestDescriptor) -> Result<Response, RequestError> {
        request.validate().map_err(RequestError::InvalidDescriptor)?;

        let mut config = TransportConfig {
            url: request.url(),
            method: request.method(),
            timeout: REQUEST_TIMEOUT,
            auto_redirect: false,
            trust_anchor: request.trust_anchor(),
            headers: Vec::new(),
            body: None,
        };

        // Headers are only set when a body is present.
        if let Some(body) = request.body() {
            let mime = request.content_type().mime();
            config.body = Some(body);
            config.headers.push(("Content-Type", mime));
            info!("Sending {} bytes as {}", body.len(), mime);
        }

        let mut collector = Collector::new(self.body_limit);
        // The transport releases its handle on every exit path of `perform`.
        match self.transport.perform(&config, &mut collector) {
            Ok(summary) => {
                if let Some(failure) = collector.failure.take() {
                    collector.pending.release();
                    return Err(failure);
                }
                let body = collector.pending.take();
                info!("Status: {} ({} bytes)", summary.status_code, body.len());
                Ok(Response::new(
                    summary.status_code,
                    summary.content_length,
                    body,
                ))
            }
            Err(err) => {
                collector.pending.release();
                match collector.failure.take() {
                    Some(failure) => Err(failure),
                    None => Err(RequestError::Transport(err)),
                }
            }
        }
    }
}

/// Streams one exchange's events into a pending response.
struct Collector {
    pending: PendingResponse,
    /// Engine-side failure recorded before aborting the transport.
    failure: Option<RequestError>,
    /// Set once the single permitted redirect hop has been confirmed.
    redirected: bool,
}

impl Collector {
    fn new(body_limit: Option<usize>) -> Self {
        Self {
            pending: match body_limit {
                Some(limit) => PendingResponse::with_limit(limit),
                None => PendingResponse::new(),
            },
            failure: None,
            redirected: false,
        }
    }
}

impl ExchangeHandler for Collector {
    fn on_event(
        &mut self,
        event: TransportEvent<'_>,
        control: &mut dyn TransportControl,
    ) -> Result<(), HandlerAbort> {
        match event {
            TransportEvent::Connected => debug!("connected"),
            TransportEvent::HeaderSent => debug!("request header sent"),
            TransportEvent::Header { name, value } => {
                info!("response header: {}={}", name, value);
            }
            TransportEvent::Data(fragment) => {
                if self.pending.append(fragment).is_err() {
                    self.failure = Some(RequestError::from(BufferExhausted));
                    return Err(HandlerAbort);
                }
            }
            TransportEvent::Finished => {
                debug!("exchange finished ({} bytes)", self.pending.len());
            }
            TransportEvent::Disconnected => {
                // Mid-transfer drop: no partial result survives.
                self.pending.release();
            }
            TransportEvent::Redirect => {
                if self.redirected {
                    // One confirmed hop only; a redirecting redirect fails.
                    self.failure = Some(RequestError::Transport(TransportError::Protocol(
                        "redirect target redirected again".into(),
                    )));
                    return Err(HandlerAbort);
                }
                info!("server redirected, confirming single hop");
                control.set_header("From", REDIRECT_FROM);
                control.set_header("Accept", REDIRECT_ACCEPT);
                control.follow_redirect();
                self.redirected = true;
            }
            TransportEvent::Error => debug!("transport reported an error event"),
        }
        Ok(())
    }
}

/// Errors from one `execute` call, identifying the failing stage.
#[derive(Debug)]
pub enum RequestError {
    /// The descriptor could not be turned into an exchange (bad URL).
    InvalidDescriptor(String),
    /// Allocation failed while accumulating the response; the partial buffer
    /// was released.
    BufferExhausted,
    /// The transport reported a connection, TLS, or timeout failure.
    Transport(TransportError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDescriptor(msg) => write!(f, "invalid request: {}", msg),
            Self::BufferExhausted => write!(f, "response buffer allocation failed"),
            Self::Transport(e) => write!(f, "transport failure: {}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BufferExhausted> for RequestError {
    fn from(_: BufferExhausted) -> Self {
        Self::BufferExhausted
    }
}

impl From<TransportError> for RequestError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
