//! Error types for interface discovery and MAC mutation
//!
//! Provides structured error types with contextual information for:
//! - MAC address parsing and validation failures
//! - Interface lookup misses
//! - External command failures (carries the offending command)
//! - Per-stage mutation failures (carries device and stage)
//! - Privilege and platform preconditions

use std::fmt;
use thiserror::Error;

/// Main result type used throughout the application
pub type Result<T> = std::result::Result<T, SpoofError>;

/// Error enum covering every failure the core can surface
#[derive(Error, Debug)]
pub enum SpoofError {
    /// Input text is not a MAC address in any accepted notation
    #[error("{input} is not a valid MAC address")]
    InvalidMacFormat { input: String },

    /// No interface matched the given target
    #[error("could not find a device for {target}")]
    DeviceNotFound { target: String },

    /// Enumeration did not report a hardware address for the device,
    /// so there is nothing to reset to
    #[error("could not read the hardware MAC address for {device}")]
    HardwareAddressUnknown { device: String },

    /// An invoked OS command exited non-zero or could not be spawned
    #[error("command failed: {command} ({detail})")]
    CommandFailed { command: String, detail: String },

    /// Interface enumeration could not run at all
    #[error("interface enumeration failed: {message}")]
    EnumerationFailed { message: String },

    /// A stage of the mutation sequence failed; earlier stages are not
    /// rolled back
    #[error("{stage} failed for {device}: {source}")]
    MutationStep {
        device: String,
        stage: MutationStage,
        #[source]
        source: Box<SpoofError>,
    },

    /// The running OS is not one of the supported families
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// Caller lacks the privileges the operation needs
    #[error("permission denied: {operation} requires administrative rights")]
    PrivilegeRequired { operation: String },

    /// Configuration file problems
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// The stages of a MAC mutation sequence, used to report which step of
/// a platform's command sequence broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    /// Power the wireless device on (macOS)
    PowerOn,
    /// Deassociate from wireless networks (macOS Airport utility)
    Deassociate,
    /// Write the new address to the interface
    SetAddress,
    /// Bring the interface back up (Linux)
    BringUp,
    /// Power-cycle the wireless device so it re-associates (macOS)
    PowerCycle,
    /// Enumerate the adapter-class registry keys (Windows)
    LocateAdapter,
    /// Write the NetworkAddress registry value (Windows)
    WriteRegistry,
    /// Disable and re-enable the adapter (Windows)
    RestartAdapter,
}

impl fmt::Display for MutationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationStage::PowerOn => "powering on the wireless device",
            MutationStage::Deassociate => "deassociating from wireless networks",
            MutationStage::SetAddress => "setting the MAC address",
            MutationStage::BringUp => "bringing the interface up",
            MutationStage::PowerCycle => "restarting the wireless device",
            MutationStage::LocateAdapter => "locating the adapter registry key",
            MutationStage::WriteRegistry => "writing the registry value",
            MutationStage::RestartAdapter => "restarting the adapter",
        };
        f.write_str(name)
    }
}

impl SpoofError {
    /// Create an invalid-MAC error
    pub fn invalid_mac<S: Into<String>>(input: S) -> Self {
        Self::InvalidMacFormat {
            input: input.into(),
        }
    }

    /// Create a device-not-found error
    pub fn device_not_found<S: Into<String>>(target: S) -> Self {
        Self::DeviceNotFound {
            target: target.into(),
        }
    }

    /// Create a command-failed error
    pub fn command_failed<C: Into<String>, D: Into<String>>(command: C, detail: D) -> Self {
        Self::CommandFailed {
            command: command.into(),
            detail: detail.into(),
        }
    }

    /// Create an enumeration-failed error
    pub fn enumeration<S: Into<String>>(message: S) -> Self {
        Self::EnumerationFailed {
            message: message.into(),
        }
    }

    /// Wrap an underlying failure as a named mutation stage failure
    pub fn mutation_step<S: Into<String>>(
        device: S,
        stage: MutationStage,
        source: SpoofError,
    ) -> Self {
        Self::MutationStep {
            device: device.into(),
            stage,
            source: Box::new(source),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the caller can reasonably continue after this error.
    /// Lookup misses and malformed input are recoverable; a failed OS
    /// command generally is not, for that operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SpoofError::InvalidMacFormat { .. }
                | SpoofError::DeviceNotFound { .. }
                | SpoofError::HardwareAddressUnknown { .. }
        )
    }
}
