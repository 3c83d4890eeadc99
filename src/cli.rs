//! Command-line interface
//!
//! Thin glue over the core: argument parsing, privilege verification,
//! human-readable rendering of interface records, batch orchestration,
//! and exit-code selection. A failure on one device never stops the
//! remaining devices in the same invocation from being attempted.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use crate::{
    config::AppConfig,
    core::Spoof,
    error::{Result, SpoofError},
    mac,
    parser::InterfaceRecord,
};

#[derive(Parser, Debug)]
#[command(
    name = "macspoof",
    version,
    about = "Easily spoof your MAC address",
    long_about = "List network interfaces and set, randomize, or reset their MAC addresses"
)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available devices
    #[command(alias = "ls")]
    List {
        /// Try to only show wireless interfaces
        #[arg(long)]
        wifi: bool,
    },

    /// Set the MAC address of one or more devices
    Set {
        /// The address to apply, in any accepted notation
        mac: String,
        /// Devices to change, by device name or port label
        #[arg(required = true)]
        devices: Vec<String>,
    },

    /// Set the MAC address of one or more devices randomly
    Randomize {
        /// Set the locally administered flag on the generated address
        #[arg(long)]
        local: bool,
        /// Devices to change, by device name or port label
        #[arg(required = true)]
        devices: Vec<String>,
    },

    /// Reset one or more devices to their hardware MAC address
    Reset {
        /// Devices to reset, by device name or port label
        #[arg(required = true)]
        devices: Vec<String>,
    },

    /// Re-randomize every interface that currently has a spoofed address
    Rotate {
        /// Set the locally administered flag on the generated addresses
        #[arg(long)]
        local: bool,
    },

    /// Print a MAC address in canonical form
    Normalize {
        /// The address to normalize
        mac: String,
    },
}

impl Command {
    /// Whether this subcommand changes interface state
    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Set { .. }
                | Command::Randomize { .. }
                | Command::Reset { .. }
                | Command::Rotate { .. }
        )
    }
}

/// Verify the caller can change network settings before any mutation
/// is attempted. On Windows the registry write itself fails without
/// administrative rights, so the check is Unix-only.
fn ensure_privileged() -> Result<()> {
    #[cfg(unix)]
    {
        if !nix::unistd::geteuid().is_root() {
            return Err(SpoofError::PrivilegeRequired {
                operation: "changing network settings".to_string(),
            });
        }
    }
    Ok(())
}

/// Render one interface record as a listing line
pub fn render_record(record: &InterfaceRecord) -> String {
    let mut line = format!("- {} on device {}", record.port, record.device);
    if let Some(address) = &record.address {
        line.push_str(&format!(" with MAC address {}", address));
    }
    // Shown whenever the live address differs from the hardware one,
    // including when no hardware address is known at all.
    if let Some(current) = &record.current_address {
        if record.address.as_ref() != Some(current) {
            line.push_str(&format!(" currently set to {}", current));
        }
    }
    line
}

/// Execute the parsed command line and choose the process exit code
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<ExitCode> {
    // Normalization is pure text handling; it works on any platform
    // and without privileges.
    if let Command::Normalize { mac: text } = &cli.command {
        match mac::normalize(text) {
            Ok(canonical) => {
                println!("{}", canonical);
                return Ok(ExitCode::SUCCESS);
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    if cli.command.mutates() {
        if let Err(err) = ensure_privileged() {
            eprintln!("Error: {}", err);
            eprintln!("Run again as root (or using sudo) to change network settings.");
            return Ok(ExitCode::FAILURE);
        }
    }

    let spoof = Spoof::new(&config)?;
    let clean = dispatch(&spoof, &config, cli.command).await?;
    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run one subcommand against an assembled core. Returns whether every
/// device in the batch succeeded.
pub(crate) async fn dispatch(
    spoof: &Spoof,
    config: &AppConfig,
    command: Command,
) -> anyhow::Result<bool> {
    match command {
        Command::List { wifi } => {
            let records = spoof.find_all(&list_targets(wifi, config)).await?;
            for record in &records {
                println!("{}", render_record(record));
            }
            Ok(true)
        }

        Command::Set { mac, devices } => {
            let mut clean = true;
            for target in &devices {
                if let Err(err) = set_target(spoof, target, &mac).await {
                    eprintln!("Error: {}", err);
                    clean = false;
                }
            }
            Ok(clean)
        }

        Command::Randomize { local, devices } => {
            let mut clean = true;
            for target in &devices {
                let mac = spoof.random(local);
                if let Err(err) = set_target(spoof, target, &mac).await {
                    eprintln!("Error: {}", err);
                    clean = false;
                }
            }
            Ok(clean)
        }

        Command::Reset { devices } => {
            let mut clean = true;
            for target in &devices {
                if let Err(err) = reset_target(spoof, target).await {
                    eprintln!("Error: {}", err);
                    clean = false;
                }
            }
            Ok(clean)
        }

        Command::Rotate { local } => {
            let records = spoof.find_all(&[]).await?;
            let mut clean = true;
            for record in records.iter().filter(|r| r.is_spoofed()) {
                let mac = spoof.random(local);
                match spoof.apply(&record.device, &mac, &record.port).await {
                    Ok(()) => println!("Rotating MAC for {}", record.device),
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        clean = false;
                    }
                }
            }
            Ok(clean)
        }

        Command::Normalize { mac: text } => match mac::normalize(&text) {
            Ok(canonical) => {
                println!("{}", canonical);
                Ok(true)
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                Ok(false)
            }
        },
    }
}

/// Targets for the list command: the configured wireless port names
/// when only wireless interfaces are wanted, otherwise no filter.
fn list_targets(wifi: bool, config: &AppConfig) -> Vec<String> {
    if wifi {
        config.network.wireless_port_names.clone()
    } else {
        Vec::new()
    }
}

/// Resolve one target and apply the given address to it
async fn set_target(spoof: &Spoof, target: &str, mac: &str) -> Result<()> {
    let record = spoof
        .find_one(target)
        .await?
        .ok_or_else(|| SpoofError::device_not_found(target))?;
    spoof.apply(&record.device, mac, &record.port).await
}

/// Resolve one target and restore its hardware address
async fn reset_target(spoof: &Spoof, target: &str) -> Result<()> {
    let record = spoof
        .find_one(target)
        .await?
        .ok_or_else(|| SpoofError::device_not_found(target))?;
    let Some(address) = record.address.clone() else {
        warn!(device = %record.device, "enumeration reported no hardware address");
        return Err(SpoofError::HardwareAddressUnknown {
            device: record.device,
        });
    };
    spoof.apply(&record.device, &address, &record.port).await
}
