//! Network provider abstraction.
//!
//! The provider is the opaque radio/driver layer: it accepts commands and
//! reports link and address events back through the station manager's event
//! handlers. The manager never assumes anything about the driver beyond this
//! contract.

use super::config::ApConfig;
use std::fmt;

/// The radio/driver contract the station manager drives.
///
/// Commands are asynchronous at the link layer: `start` and `connect` return
/// as soon as the driver accepts the command, and the outcome arrives later as
/// a [`LinkEvent`](super::LinkEvent) or [`AddressEvent`](super::AddressEvent).
/// The driver's event delivery must be serialized and non-reentrant.
pub trait NetworkProvider: Send {
    /// Bring up the driver stack and register for link and address events.
    ///
    /// On failure, everything acquired before the failing step must be
    /// released before returning.
    fn initialize(&mut self) -> Result<(), ProviderError>;

    /// Apply the target network identity and auth policy.
    fn configure(&mut self, config: &ApConfig) -> Result<(), ProviderError>;

    /// Begin the start sequence (leads to a `Started` link event).
    fn start(&mut self) -> Result<(), ProviderError>;

    /// Attempt to associate with the configured access point.
    fn connect(&mut self) -> Result<(), ProviderError>;

    /// Drop the association with the access point.
    fn disconnect(&mut self) -> Result<(), ProviderError>;

    /// Stop station mode.
    fn stop(&mut self) -> Result<(), ProviderError>;

    /// Unregister event subscriptions and release driver resources.
    ///
    /// Best-effort: implementations release everything they can and surface
    /// the first error encountered.
    fn shutdown(&mut self) -> Result<(), ProviderError>;
}

/// Opaque error reported by a provider implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    /// Create a provider error with a driver-specific message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}
