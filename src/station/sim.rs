//! Simulated network provider for host development and tests.
//!
//! Records every command the station manager issues and optionally injects
//! failures at chosen command points. Event delivery is up to the caller:
//! drive [`StationManager::handle_link_event`] and
//! [`StationManager::handle_address_event`] directly to script a scenario.
//!
//! [`StationManager::handle_link_event`]: super::StationManager::handle_link_event
//! [`StationManager::handle_address_event`]: super::StationManager::handle_address_event

use super::config::ApConfig;
use super::provider::{NetworkProvider, ProviderError};
use std::fmt;
use std::sync::{Arc, Mutex};

/// A command the manager issued to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Initialize,
    Configure,
    Start,
    Connect,
    Disconnect,
    Stop,
    Shutdown,
}

impl fmt::Display for ProviderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::Configure => "configure",
            Self::Start => "start",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Stop => "stop",
            Self::Shutdown => "shutdown",
        };
        write!(f, "{}", name)
    }
}

/// Shared view of the commands a [`SimulatedProvider`] has received.
///
/// Obtain one with [`SimulatedProvider::command_log`] before handing the
/// provider to the manager.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Arc<Mutex<Vec<ProviderCommand>>>,
}

impl CommandLog {
    /// All commands received so far, oldest first.
    pub fn snapshot(&self) -> Vec<ProviderCommand> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Drain and return the commands received so far.
    pub fn take(&self) -> Vec<ProviderCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Count of a specific command.
    pub fn count(&self, command: ProviderCommand) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| **c == command)
            .count()
    }

    fn record(&self, command: ProviderCommand) {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command);
    }
}

/// In-memory provider that records commands instead of driving a radio.
#[derive(Debug, Default)]
pub struct SimulatedProvider {
    log: CommandLog,
    fail_on: Option<ProviderCommand>,
    configured_ssid: Option<String>,
}

impl SimulatedProvider {
    /// Create a provider that accepts every command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that rejects one specific command.
    pub fn failing_on(command: ProviderCommand) -> Self {
        Self {
            fail_on: Some(command),
            ..Self::default()
        }
    }

    /// Shared handle to the command log. Clone-cheap; survives the provider
    /// being moved into the manager.
    pub fn command_log(&self) -> CommandLog {
        self.log.clone()
    }

    /// The SSID last accepted by `configure`, if any.
    pub fn configured_ssid(&self) -> Option<&str> {
        self.configured_ssid.as_deref()
    }

    fn accept(&self, command: ProviderCommand) -> Result<(), ProviderError> {
        self.log.record(command);
        if self.fail_on == Some(command) {
            return Err(ProviderError::new(format!(
                "simulated failure on {}",
                command
            )));
        }
        Ok(())
    }
}

impl NetworkProvider for SimulatedProvider {
    fn initialize(&mut self) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Initialize)
    }

    fn configure(&mut self, config: &ApConfig) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Configure)?;
        self.configured_ssid = Some(config.ssid.clone());
        Ok(())
    }

    fn start(&mut self) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Start)
    }

    fn connect(&mut self) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Connect)
    }

    fn disconnect(&mut self) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Disconnect)
    }

    fn stop(&mut self) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Stop)
    }

    fn shutdown(&mut self) -> Result<(), ProviderError> {
        self.accept(ProviderCommand::Shutdown)
    }
}
