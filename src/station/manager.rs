//! Station connection manager.
//!
//! Owns the wireless link state machine: consumes link and address events from
//! the provider, applies the bounded immediate-retry policy on unexpected
//! drops, and publishes state changes for [`StationManager::wait_until`]
//! callers.
//!
//! Shared-state discipline: the provider, retry budget, disconnect intent, and
//! assigned address live behind one mutex and are only written while holding
//! it; the provider's serialized event delivery is the single writer. The
//! waitable state sits in a separate condvar cell so waiters never contend
//! with the event context.

use super::config::{ApConfig, ConfigError};
use super::event::{AddressEvent, LinkEvent};
use super::provider::{NetworkProvider, ProviderError};
use super::state::{ConnectionState, StateCell, StateMask};
use log::{error, info, warn};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Bounded count of automatic reconnection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max_retries: u8,
    retry_count: u8,
}

impl RetryBudget {
    fn new(max_retries: u8) -> Self {
        Self {
            max_retries,
            retry_count: 0,
        }
    }

    /// True while another automatic reconnect attempt is permitted.
    fn has_remaining(&self) -> bool {
        self.retry_count < self.max_retries
    }

    fn record_attempt(&mut self) {
        self.retry_count += 1;
    }

    fn reset(&mut self) {
        self.retry_count = 0;
    }

    /// Attempts consumed in the current cycle.
    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// Configured attempt limit.
    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }
}

struct Core<P> {
    provider: P,
    retry: RetryBudget,
    /// Set by `disconnect()` so the next link-down is read as intentional.
    disconnecting: bool,
    ip: Option<Ipv4Addr>,
}

/// The station connection manager.
///
/// Create one with [`StationManager::init`], share it behind an `Arc`, and
/// wire the provider's event delivery to [`handle_link_event`] and
/// [`handle_address_event`]. All command methods take `&self`; internal
/// locking keeps the three mutable fields single-writer.
///
/// [`handle_link_event`]: StationManager::handle_link_event
/// [`handle_address_event`]: StationManager::handle_address_event
pub struct StationManager<P: NetworkProvider> {
    core: Mutex<Core<P>>,
    signals: StateCell,
}

impl<P: NetworkProvider> StationManager<P> {
    /// Initialize the provider stack and event subscriptions.
    ///
    /// The provider releases anything acquired before a failing step, so an
    /// `Err` here leaves no dangling resources.
    pub fn init(mut provider: P, max_retries: u8) -> Result<Self, StationError> {
        info!("Initializing station (max retries: {})", max_retries);
        provider.initialize().map_err(StationError::Init)?;

        Ok(Self {
            core: Mutex::new(Core {
                provider,
                retry: RetryBudget::new(max_retries),
                disconnecting: false,
                ip: None,
            }),
            signals: StateCell::new(),
        })
    }

    /// Store the target network identity and auth policy; resets the retry
    /// budget and adopts the configuration's attempt limit.
    pub fn configure(&self, config: &ApConfig) -> Result<(), StationError> {
        config.validate()?;

        let mut core = self.lock_core();
        core.provider
            .configure(config)
            .map_err(StationError::ConfigRejected)?;
        core.retry = RetryBudget::new(config.max_retries);
        info!(
            "Configured for SSID {} ({}, max retries: {})",
            config.ssid, config.auth_mode, config.max_retries
        );
        Ok(())
    }

    /// Command the provider to start; returns immediately.
    ///
    /// The association itself happens asynchronously: the provider's `Started`
    /// event triggers the connect command, and the outcome is observed via
    /// [`wait_until`](Self::wait_until). Starting a new cycle clears any
    /// leftover disconnect intent from a previous one.
    pub fn connect(&self) -> Result<(), StationError> {
        let mut core = self.lock_core();
        core.disconnecting = false;
        info!("Starting station");
        core.provider.start().map_err(StationError::StartFailed)
    }

    /// Tear down the association intentionally.
    ///
    /// The intent flag is set before the provider is commanded, so the
    /// resulting link-down event is read as a teardown, not a failure to
    /// retry.
    pub fn disconnect(&self) -> Result<(), StationError> {
        let mut core = self.lock_core();
        core.disconnecting = true;
        self.signals.set(ConnectionState::Disconnecting);
        info!("Disconnecting from access point");
        core.provider
            .disconnect()
            .map_err(StationError::DisconnectFailed)
    }

    /// Block until the state matches `mask` or `timeout` elapses.
    ///
    /// Level-triggered: a state already matching at call time returns
    /// immediately. Returns the observed state, or `None` on timeout. Pass
    /// `Duration::MAX` to wait with no deadline.
    pub fn wait_until(&self, mask: StateMask, timeout: Duration) -> Option<ConnectionState> {
        self.signals.wait(mask, timeout)
    }

    /// The current connection state.
    pub fn state(&self) -> ConnectionState {
        self.signals.get()
    }

    /// The assigned IPv4 address. Only meaningful when observed under a
    /// `Connected` state.
    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.lock_core().ip
    }

    /// Reconnect attempts consumed in the current cycle.
    pub fn retry_count(&self) -> u8 {
        self.lock_core().retry.retry_count()
    }

    /// Release event subscriptions and provider resources.
    ///
    /// Best-effort: remaining resources are released even when a step fails;
    /// the first error encountered is surfaced.
    pub fn shutdown(&self) -> Result<(), StationError> {
        info!("Shutting down station");
        let mut core = self.lock_core();
        let result = core.provider.shutdown();
        core.ip = None;
        core.retry.reset();
        core.disconnecting = false;
        self.signals.set(ConnectionState::Idle);
        result.map_err(StationError::Teardown)
    }

    /// Handle a link event from the provider.
    ///
    /// Called only from the provider's serialized event-delivery context; must
    /// not block beyond the core lock.
    pub fn handle_link_event(&self, event: LinkEvent) {
        match event {
            LinkEvent::Started => {
                info!("Station started, connecting to access point");
                let mut core = self.lock_core();
                self.signals.set(ConnectionState::Connecting);
                if let Err(e) = core.provider.connect() {
                    error!("Connect command rejected: {}", e);
                }
            }
            LinkEvent::Connected => {
                // Link is up; the address is still pending, so no state
                // change until the address event arrives.
                info!("Link up, waiting for address assignment");
            }
            LinkEvent::Disconnected => self.on_link_down(),
            other => {
                info!("Link event: {}", other);
            }
        }
    }

    /// Handle an address event from the provider.
    ///
    /// Same delivery-context rules as [`handle_link_event`](Self::handle_link_event).
    pub fn handle_address_event(&self, event: AddressEvent) {
        match event {
            AddressEvent::Acquired(ip) => {
                let mut core = self.lock_core();
                core.retry.reset();
                core.ip = Some(ip);
                self.signals.set(ConnectionState::Connected);
                info!("IPv4 address provided: {}", ip);
            }
            AddressEvent::Lost => {
                let mut core = self.lock_core();
                core.ip = None;
                info!("Lost address (link may still be up)");
            }
        }
    }

    fn on_link_down(&self) {
        let mut core = self.lock_core();
        core.ip = None;

        if core.disconnecting {
            self.signals.set(ConnectionState::Disconnected);
            info!("Disconnected from access point, stopping station");
            if let Err(e) = core.provider.stop() {
                error!("Stop command rejected: {}", e);
            }
            return;
        }

        if core.retry.has_remaining() {
            self.signals.set(ConnectionState::Connecting);
            info!(
                "Link down, retrying connection ({}/{})",
                core.retry.retry_count() + 1,
                core.retry.max_retries()
            );
            if let Err(e) = core.provider.connect() {
                error!("Reconnect command rejected: {}", e);
            }
            core.retry.record_attempt();
        } else {
            self.signals.set(ConnectionState::Disconnected);
            warn!("Failed to reconnect to access point, giving up");
            core.retry.reset();
            info!("Stopping station");
            if let Err(e) = core.provider.stop() {
                error!("Stop command rejected: {}", e);
            }
        }
    }

    fn lock_core(&self) -> MutexGuard<'_, Core<P>> {
        self.core.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Errors from station operations, identifying the failing stage.
#[derive(Debug)]
pub enum StationError {
    /// Provider stack or event registration could not be initialized.
    Init(ProviderError),
    /// The provider rejected the target network configuration.
    ConfigRejected(ProviderError),
    /// The configuration failed local validation.
    InvalidConfig(ConfigError),
    /// The provider could not begin the start sequence.
    StartFailed(ProviderError),
    /// The provider rejected the disconnect command.
    DisconnectFailed(ProviderError),
    /// A teardown step failed (remaining resources were still released).
    Teardown(ProviderError),
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "provider initialization failed: {}", e),
            Self::ConfigRejected(e) => write!(f, "configuration rejected: {}", e),
            Self::InvalidConfig(e) => write!(f, "invalid configuration: {}", e),
            Self::StartFailed(e) => write!(f, "start failed: {}", e),
            Self::DisconnectFailed(e) => write!(f, "disconnect failed: {}", e),
            Self::Teardown(e) => write!(f, "teardown failed: {}", e),
        }
    }
}

impl std::error::Error for StationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Init(e)
            | Self::ConfigRejected(e)
            | Self::StartFailed(e)
            | Self::DisconnectFailed(e)
            | Self::Teardown(e) => Some(e),
            Self::InvalidConfig(e) => Some(e),
        }
    }
}

impl From<ConfigError> for StationError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}
