//! Runtime platform probe
//!
//! The supported OS families differ in how interfaces are enumerated
//! and mutated. The platform is probed once at startup and everything
//! downstream selects its strategy from the probe result instead of
//! branching per call.

use std::fmt;

use crate::error::{Result, SpoofError};

/// The OS families this tool knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
}

impl Platform {
    /// Probe the running operating system
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value to a supported family
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(SpoofError::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Darwin => "macOS",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platforms() {
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Darwin);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os("windows").unwrap(), Platform::Windows);
    }

    #[test]
    fn test_unsupported_platform() {
        let error = Platform::from_os("freebsd").unwrap_err();
        assert!(matches!(error, SpoofError::UnsupportedPlatform { .. }));
    }
}
