//! Typed events delivered by the network provider.
//!
//! The provider reports two independent streams: link-layer events (radio
//! connectivity) and address events (IP assignment). The two are deliberately
//! separate, since a link can be up long before an address is acquired, and an
//! address can be lost while the link stays up.

use std::fmt;
use std::net::Ipv4Addr;

/// Radio-level connectivity events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The radio stack is ready.
    Ready,
    /// A network scan finished.
    ScanDone,
    /// Station mode started; the provider is ready to be told to connect.
    Started,
    /// Station mode stopped.
    Stopped,
    /// The link to the access point came up (address still pending).
    Connected,
    /// The link to the access point went down.
    Disconnected,
    /// The access point changed its authentication mode.
    AuthModeChanged,
    /// The access point moved to a different channel.
    ChannelChanged,
    /// Beacon frames from the access point timed out.
    BeaconTimeout,
}

impl LinkEvent {
    /// Returns true for events that carry no state-machine meaning and are
    /// only logged.
    pub fn is_informational(&self) -> bool {
        !matches!(self, Self::Started | Self::Connected | Self::Disconnected)
    }
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::ScanDone => "scan done",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::AuthModeChanged => "authmode changed",
            Self::ChannelChanged => "channel changed",
            Self::BeaconTimeout => "beacon timeout",
        };
        write!(f, "{}", name)
    }
}

/// IP address assignment events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressEvent {
    /// An IPv4 address was assigned by the access point.
    Acquired(Ipv4Addr),
    /// The previously assigned address was lost (link may still be up).
    Lost,
}

impl fmt::Display for AddressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquired(ip) => write!(f, "address acquired: {}", ip),
            Self::Lost => write!(f, "address lost"),
        }
    }
}
