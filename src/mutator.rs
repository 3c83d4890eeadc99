//! Per-platform MAC mutation sequences
//!
//! Applying a new MAC is a short sequence of native commands whose
//! shape depends on the platform and, on macOS, on whether the port is
//! wireless. Every step failure is wrapped with the device and the
//! stage that broke so the operator can tell which part of the
//! sequence failed. Completed earlier stages are not rolled back; an
//! aborted sequence can leave the interface mid-change.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    command::CommandRunner,
    config::NetworkSettings,
    error::{MutationStage, Result, SpoofError},
    mac,
    platform::Platform,
};

/// Windows registry path holding the network-adapter class keys
const ADAPTER_CLASS_KEY: &str =
    r"HKLM\SYSTEM\CurrentControlSet\Control\Class\{4D36E972-E325-11CE-BFC1-08002BE10318}";

/// Applies a desired MAC address to an interface
#[async_trait]
pub trait MacMutator: Send + Sync {
    /// Apply `desired_mac` to `device`. `port` is the interface's
    /// hardware port label, which decides the wireless handling on
    /// macOS. The address must pass [`mac::is_valid`]; an invalid
    /// address fails before any OS command runs.
    async fn apply(
        &self,
        runner: &dyn CommandRunner,
        device: &str,
        desired_mac: &str,
        port: &str,
    ) -> Result<()>;
}

/// Select the mutation strategy for a probed platform
pub fn mac_mutator(platform: Platform, network: &NetworkSettings) -> Box<dyn MacMutator> {
    match platform {
        Platform::Darwin => Box::new(DarwinMutator {
            airport_path: network.airport_path.clone(),
            wireless_port_names: network.wireless_port_names.clone(),
        }),
        Platform::Linux => Box::new(LinuxMutator),
        Platform::Windows => Box::new(WindowsMutator),
    }
}

fn ensure_valid(desired_mac: &str) -> Result<()> {
    if mac::is_valid(desired_mac) {
        Ok(())
    } else {
        Err(SpoofError::invalid_mac(desired_mac))
    }
}

/// macOS: power the wireless device on, deassociate via the Airport
/// utility, set the address with `ifconfig`, then power-cycle the
/// wireless device so it re-associates with known networks under the
/// new address. Wired ports skip the power handling but the
/// deassociation call still runs once per mutation; observed behavior
/// of the platform tooling that callers depend on.
pub struct DarwinMutator {
    airport_path: String,
    wireless_port_names: Vec<String>,
}

impl DarwinMutator {
    fn is_wireless(&self, port: &str) -> bool {
        self.wireless_port_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(port))
    }
}

#[async_trait]
impl MacMutator for DarwinMutator {
    async fn apply(
        &self,
        runner: &dyn CommandRunner,
        device: &str,
        desired_mac: &str,
        port: &str,
    ) -> Result<()> {
        ensure_valid(desired_mac)?;
        let wireless = self.is_wireless(port);

        if wireless {
            runner
                .run("networksetup", &["-setairportpower", device, "on"])
                .await
                .map_err(|err| SpoofError::mutation_step(device, MutationStage::PowerOn, err))?;
        }

        runner
            .run(&self.airport_path, &["-z"])
            .await
            .map_err(|err| SpoofError::mutation_step(device, MutationStage::Deassociate, err))?;

        runner
            .run("ifconfig", &[device, "ether", desired_mac])
            .await
            .map_err(|err| SpoofError::mutation_step(device, MutationStage::SetAddress, err))?;

        if wireless {
            runner
                .run("networksetup", &["-setairportpower", device, "off"])
                .await
                .map_err(|err| SpoofError::mutation_step(device, MutationStage::PowerCycle, err))?;
            runner
                .run("networksetup", &["-setairportpower", device, "on"])
                .await
                .map_err(|err| SpoofError::mutation_step(device, MutationStage::PowerCycle, err))?;
        }

        info!(device, mac = desired_mac, "MAC address applied");
        Ok(())
    }
}

/// Linux: the interface is taken down and the address set in one
/// `ifconfig` invocation, then brought back up. The down/up bracketing
/// is required; most drivers reject a MAC change on a live interface.
pub struct LinuxMutator;

#[async_trait]
impl MacMutator for LinuxMutator {
    async fn apply(
        &self,
        runner: &dyn CommandRunner,
        device: &str,
        desired_mac: &str,
        _port: &str,
    ) -> Result<()> {
        ensure_valid(desired_mac)?;

        runner
            .run("ifconfig", &[device, "down", "hw", "ether", desired_mac])
            .await
            .map_err(|err| SpoofError::mutation_step(device, MutationStage::SetAddress, err))?;

        runner
            .run("ifconfig", &[device, "up"])
            .await
            .map_err(|err| SpoofError::mutation_step(device, MutationStage::BringUp, err))?;

        info!(device, mac = desired_mac, "MAC address applied");
        Ok(())
    }
}

/// Windows: find the adapter-class registry key whose values include
/// `AdapterModel`, write the colon-stripped address into its
/// `NetworkAddress` value, then disable and re-enable the adapter via
/// `netsh` so the value takes effect. Registry access goes through
/// `reg.exe` so it stays inside the process-execution boundary.
pub struct WindowsMutator;

impl WindowsMutator {
    /// Adapter subkeys from a `reg query` listing of the class key.
    /// Keys whose path contains `Properties` are skipped; reading them
    /// fails on permissions.
    fn adapter_keys(listing: &str) -> Vec<String> {
        listing
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("HKEY_"))
            .filter(|line| !line.contains("Properties"))
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl MacMutator for WindowsMutator {
    async fn apply(
        &self,
        runner: &dyn CommandRunner,
        device: &str,
        desired_mac: &str,
        _port: &str,
    ) -> Result<()> {
        ensure_valid(desired_mac)?;

        let listing = runner
            .run("reg", &["query", ADAPTER_CLASS_KEY])
            .await
            .map_err(|err| SpoofError::mutation_step(device, MutationStage::LocateAdapter, err))?;

        // The registry wants the address without separators
        let stripped = desired_mac.replace(':', "");

        for key in Self::adapter_keys(&listing) {
            let values = match runner.run("reg", &["query", &key]).await {
                Ok(values) => values,
                Err(err) => {
                    warn!(key = %key, error = %err, "skipping unreadable adapter key");
                    continue;
                }
            };

            if !values.contains("AdapterModel") {
                continue;
            }

            runner
                .run(
                    "reg",
                    &[
                        "add",
                        &key,
                        "/v",
                        "NetworkAddress",
                        "/t",
                        "REG_SZ",
                        "/d",
                        &stripped,
                        "/f",
                    ],
                )
                .await
                .map_err(|err| {
                    SpoofError::mutation_step(device, MutationStage::WriteRegistry, err)
                })?;

            runner
                .run("netsh", &["interface", "set", "interface", device, "disable"])
                .await
                .map_err(|err| {
                    SpoofError::mutation_step(device, MutationStage::RestartAdapter, err)
                })?;
            runner
                .run("netsh", &["interface", "set", "interface", device, "enable"])
                .await
                .map_err(|err| {
                    SpoofError::mutation_step(device, MutationStage::RestartAdapter, err)
                })?;

            info!(device, mac = desired_mac, "MAC address applied");
            return Ok(());
        }

        // No adapter key carried AdapterModel. Surfaced as a lookup
        // failure rather than silently succeeding.
        Err(SpoofError::device_not_found(device))
    }
}
