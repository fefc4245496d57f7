//! Station connectivity and outbound HTTP(S) for constrained devices.
//!
//! Two cooperating, event-driven subsystems:
//!
//! - [`station`] - the wireless link state machine: consumes link/address
//!   events from an opaque network provider, applies a bounded retry policy,
//!   and lets callers block until the station is connected or has given up.
//! - [`httpx`] - the request engine: performs one HTTP(S) exchange at a time
//!   over a streaming transport, accumulating the response body into a single
//!   buffer.
//!
//! The [`server`] module is a thin passthrough for the inbound HTTP server
//! started once the station is up. Platform bindings for ESP32 live behind
//! the `esp32` feature; everything else is testable on the host.

pub mod httpx;
pub mod server;
pub mod station;

// Re-export commonly used items
pub use httpx::{ContentType, Method, RequestDescriptor, RequestEngine, RequestError, Response};
pub use station::{
    ApConfig, AuthMode, ConnectionState, LinkEvent, NetworkProvider, StationError, StationManager,
    StateMask,
};
