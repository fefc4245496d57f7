//! Access point configuration.
//!
//! Target network identity, auth policy, credential, and the retry budget for
//! automatic reconnection. The passphrase is zeroed in memory when the
//! configuration is dropped.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum SSID length per IEEE 802.11 standard.
pub const MAX_SSID_LEN: usize = 32;

/// Maximum passphrase length for WPA2.
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Minimum passphrase length for WPA2.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Authentication requirement for the target network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Open network, no credential.
    Open,
    /// WPA personal.
    WpaPsk,
    /// WPA2 personal.
    Wpa2Psk,
    /// WPA3 personal.
    Wpa3Psk,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::WpaPsk => "wpa-psk",
            Self::Wpa2Psk => "wpa2-psk",
            Self::Wpa3Psk => "wpa3-psk",
        };
        write!(f, "{}", name)
    }
}

/// Target access point configuration.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApConfig {
    /// Network SSID (1-32 bytes).
    pub ssid: String,
    /// Authentication requirement.
    #[zeroize(skip)]
    pub auth_mode: AuthMode,
    /// Network passphrase (8-64 bytes for PSK modes, empty for open).
    pub passphrase: String,
    /// Bounded automatic reconnection attempts before giving up.
    #[zeroize(skip)]
    pub max_retries: u8,
}

impl ApConfig {
    /// Create a configuration for a PSK-protected network.
    ///
    /// Returns an error if the SSID or passphrase is out of range.
    pub fn new(
        ssid: impl Into<String>,
        auth_mode: AuthMode,
        passphrase: impl Into<String>,
        max_retries: u8,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            ssid: ssid.into(),
            auth_mode,
            passphrase: passphrase.into(),
            max_retries,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration for an open network (no passphrase).
    pub fn open(ssid: impl Into<String>, max_retries: u8) -> Result<Self, ConfigError> {
        Self::new(ssid, AuthMode::Open, String::new(), max_retries)
    }

    /// Validate identity and credential lengths against the auth policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::SsidEmpty);
        }
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong {
                len: self.ssid.len(),
                max: MAX_SSID_LEN,
            });
        }

        match self.auth_mode {
            AuthMode::Open => {
                if !self.passphrase.is_empty() {
                    return Err(ConfigError::PassphraseOnOpenNetwork);
                }
            }
            _ => {
                if self.passphrase.len() < MIN_PASSPHRASE_LEN {
                    return Err(ConfigError::PassphraseTooShort {
                        len: self.passphrase.len(),
                        min: MIN_PASSPHRASE_LEN,
                    });
                }
                if self.passphrase.len() > MAX_PASSPHRASE_LEN {
                    return Err(ConfigError::PassphraseTooLong {
                        len: self.passphrase.len(),
                        max: MAX_PASSPHRASE_LEN,
                    });
                }
            }
        }

        Ok(())
    }

    /// Check if this targets an open network.
    pub fn is_open(&self) -> bool {
        self.auth_mode == AuthMode::Open
    }
}

// Credentials stay out of logs and panic messages.
impl fmt::Debug for ApConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApConfig")
            .field("ssid", &self.ssid)
            .field("auth_mode", &self.auth_mode)
            .field("passphrase", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Errors that can occur validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// SSID is empty.
    SsidEmpty,
    /// SSID exceeds maximum length.
    SsidTooLong { len: usize, max: usize },
    /// Passphrase is too short for the selected auth mode.
    PassphraseTooShort { len: usize, min: usize },
    /// Passphrase exceeds maximum length.
    PassphraseTooLong { len: usize, max: usize },
    /// A passphrase was supplied for an open network.
    PassphraseOnOpenNetwork,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SsidEmpty => write!(f, "SSID cannot be empty"),
            Self::SsidTooLong { len, max } => {
                write!(f, "SSID too long: {} bytes (max {})", len, max)
            }
            Self::PassphraseTooShort { len, min } => {
                write!(f, "passphrase too short: {} bytes (min {})", len, min)
            }
            Self::PassphraseTooLong { len, max } => {
                write!(f, "passphrase too long: {} bytes (max {})", len, max)
            }
            Self::PassphraseOnOpenNetwork => {
                write!(f, "open networks take no passphrase")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
