//! Outbound HTTP(S) request engine.
//!
//! One request at a time, streamed into a single buffer:
//!
//! - [`engine`] - drives one exchange to completion over a [`Transport`]
//! - [`transport`] - the streaming transport contract (events + control)
//! - [`request`] - immutable per-request descriptors
//! - [`response`] - the accumulated result
//! - [`content`] - the bounded content-type set
//!
//! # Example
//!
//! ```ignore
//! use stationlink::httpx::{ContentType, Method, RequestDescriptor, RequestEngine};
//!
//! let mut engine = RequestEngine::new(transport);
//! let request = RequestDescriptor::new("https://api.example.com/send", Method::Post)
//!     .with_body(br#"{"text":"hello"}"#.to_vec(), ContentType::Json)
//!     .with_trust_anchor(server_cert_pem);
//! let response = engine.execute(&request)?;
//! println!("{}: {}", response.status_code(), response.text());
//! ```

mod content;
mod engine;
mod request;
mod response;
mod transport;

pub use content::ContentType;
pub use engine::{RequestEngine, RequestError};
pub use request::{Method, RequestDescriptor};
pub use response::Response;
pub use transport::{
    ExchangeHandler, ExchangeSummary, HandlerAbort, Transport, TransportConfig, TransportControl,
    TransportError, TransportEvent, REQUEST_TIMEOUT,
};
