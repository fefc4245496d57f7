//! Wireless station connection management.
//!
//! # Components
//!
//! - [`manager`] - the connection state machine and retry policy
//! - [`provider`] - the opaque radio/driver contract
//! - [`config`] - target network identity and credentials
//! - [`sim`] - in-memory provider for host development and tests
//! - `esp` - ESP-IDF bindings (`esp32` feature only)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use stationlink::station::{
//!     ApConfig, AuthMode, LinkEvent, SimulatedProvider, StationManager, StateMask,
//! };
//!
//! let provider = SimulatedProvider::new();
//! let station = Arc::new(StationManager::init(provider, 5)?);
//! let config = ApConfig::new("HomeNet", AuthMode::Wpa2Psk, "correct horse", 5)?;
//! station.configure(&config)?;
//! station.connect()?;
//!
//! // Event delivery is wired to the platform's event loop; here we inject
//! // the first event by hand.
//! station.handle_link_event(LinkEvent::Started);
//!
//! let outcome = station.wait_until(
//!     StateMask::CONNECTED | StateMask::DISCONNECTED,
//!     Duration::from_millis(10),
//! );
//! assert!(outcome.is_none()); // no address acquired yet
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod event;
mod manager;
mod provider;
mod sim;
mod state;

#[cfg(feature = "esp32")]
pub mod esp;

pub use config::{
    ApConfig, AuthMode, ConfigError, MAX_PASSPHRASE_LEN, MAX_SSID_LEN, MIN_PASSPHRASE_LEN,
};
pub use event::{AddressEvent, LinkEvent};
pub use manager::{RetryBudget, StationError, StationManager};
pub use provider::{NetworkProvider, ProviderError};
pub use sim::{CommandLog, ProviderCommand, SimulatedProvider};
pub use state::{ConnectionState, StateMask};
