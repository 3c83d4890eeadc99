//! # macspoof - MAC address spoofing tool
//!
//! Enumerates the host's network interfaces and changes, randomizes,
//! resets, or normalizes their MAC addresses on macOS, Linux, and
//! Windows.
//!
//! Each platform only exposes interface information through the
//! free-text output of its native administrative commands
//! (`networksetup`, `ifconfig`, `ipconfig`), so the heart of this
//! crate is a text-parsing layer that turns that output into uniform
//! [`parser::InterfaceRecord`]s, plus the per-platform command
//! sequences that apply a new address. Nothing is cached; every
//! operation re-reads interface state from the OS.
//!
//! ## Architecture
//!
//! - [`mac`] - MAC address parsing, validation, and generation
//! - [`command`] - the process-execution boundary
//! - [`parser`] - per-platform enumeration parsers
//! - [`directory`] - target resolution over the parsers
//! - [`mutator`] - per-platform mutation sequences
//! - [`core`] - the [`core::Spoof`] facade wiring it all together
//!
//! The platform is probed once at startup; parsers and mutators are
//! trait implementations selected from that probe.

pub mod cli;
pub mod command;
pub mod config;
pub mod core;
pub mod directory;
pub mod error;
pub mod logging;
pub mod mac;
pub mod mutator;
pub mod parser;
pub mod platform;

// Re-exports for convenience
pub use crate::{
    config::AppConfig,
    core::Spoof,
    error::{Result, SpoofError},
    mac::{is_valid, normalize, random, WIRELESS_PORT_NAMES},
    parser::InterfaceRecord,
    platform::Platform,
};
