//! Application facade
//!
//! [`Spoof`] wires the platform probe, the command runner, the
//! interface directory, and the mutator together once at startup and
//! exposes the operations the CLI (or another embedder) drives:
//! interface lookup, MAC normalization/validation/generation, and
//! mutation.

use crate::{
    command::{CommandRunner, SystemRunner},
    config::AppConfig,
    directory::InterfaceDirectory,
    error::Result,
    mac,
    mutator::{mac_mutator, MacMutator},
    parser::{InterfaceRecord, TargetSet},
    platform::Platform,
};

/// The assembled core: one platform probe, one command boundary, and
/// the platform's discovery and mutation strategies.
pub struct Spoof {
    platform: Platform,
    runner: Box<dyn CommandRunner>,
    directory: InterfaceDirectory,
    mutator: Box<dyn MacMutator>,
}

impl Spoof {
    /// Probe the running platform and assemble the core
    pub fn new(config: &AppConfig) -> Result<Self> {
        let platform = Platform::detect()?;
        Ok(Self::with_runner(platform, config, Box::new(SystemRunner)))
    }

    /// Assemble the core for a known platform with a caller-supplied
    /// command runner. This is the seam tests and embedders use.
    pub fn with_runner(
        platform: Platform,
        config: &AppConfig,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            platform,
            runner,
            directory: InterfaceDirectory::new(platform),
            mutator: mac_mutator(platform, &config.network),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// All interfaces matching the given targets; no targets means all
    /// interfaces. State is re-read from the OS on every call.
    pub async fn find_all(&self, targets: &[String]) -> Result<Vec<InterfaceRecord>> {
        let targets = TargetSet::new(targets);
        self.directory.find_all(self.runner.as_ref(), &targets).await
    }

    /// The first interface matching `target`, or `None`
    pub async fn find_one(&self, target: &str) -> Result<Option<InterfaceRecord>> {
        self.directory.find_one(self.runner.as_ref(), target).await
    }

    /// Canonicalize a MAC address in any accepted notation
    pub fn normalize(&self, text: &str) -> Result<String> {
        mac::normalize(text)
    }

    /// Whether `text` contains a MAC address in the general notation
    pub fn is_valid(&self, text: &str) -> bool {
        mac::is_valid(text)
    }

    /// Generate a random MAC appropriate for this platform
    pub fn random(&self, local_admin: bool) -> String {
        mac::random_for(self.platform, local_admin)
    }

    /// Apply `desired_mac` to `device`
    pub async fn apply(&self, device: &str, desired_mac: &str, port: &str) -> Result<()> {
        self.mutator
            .apply(self.runner.as_ref(), device, desired_mac, port)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::MockRunner;
    use crate::error::SpoofError;

    const LISTING: &str = "\
Hardware Port: Wi-Fi
Device: en0
Ethernet Address: aa:bb:cc:dd:ee:ff
";

    fn spoof_with(runner: MockRunner) -> Spoof {
        Spoof::with_runner(Platform::Darwin, &AppConfig::default(), Box::new(runner))
    }

    #[tokio::test]
    async fn test_lookup_then_apply_round_trip() {
        let runner = MockRunner::new()
            .respond("networksetup -listallhardwareports", LISTING)
            .respond("ifconfig en0", "ether aa:bb:cc:dd:ee:ff");
        let spoof = spoof_with(runner);

        let record = spoof.find_one("en0").await.unwrap().unwrap();
        assert_eq!(record.port, "Wi-Fi");
        assert!(!record.is_spoofed());

        let mac = spoof.random(false);
        spoof.apply(&record.device, &mac, &record.port).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_all_without_targets() {
        let runner = MockRunner::new()
            .respond("networksetup -listallhardwareports", LISTING)
            .respond("ifconfig en0", "ether aa:bb:cc:dd:ee:ff");
        let spoof = spoof_with(runner);

        let records = spoof.find_all(&[]).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_rejects_invalid_mac() {
        let spoof = spoof_with(MockRunner::new());
        let error = spoof.apply("en0", "bogus", "Wi-Fi").await.unwrap_err();
        assert!(matches!(error, SpoofError::InvalidMacFormat { .. }));
    }

    #[test]
    fn test_codec_passthrough() {
        let spoof = spoof_with(MockRunner::new());
        assert_eq!(spoof.normalize("0000.0000.0000").unwrap(), "00:00:00:00:00:00");
        assert!(spoof.is_valid("00:11:22:33:44:55"));
        assert!(spoof.is_valid(&spoof.random(true)));
    }
}
