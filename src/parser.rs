//! Platform-specific interface enumeration parsers
//!
//! Each supported OS only exposes interface and MAC data through the
//! free-text output of a native administrative command:
//!
//! - macOS: `networksetup -listallhardwareports`
//! - Linux: `ifconfig`
//! - Windows: `ipconfig /all`
//!
//! The parsers here turn that loosely-structured text into uniform
//! [`InterfaceRecord`]s. The text-shaping logic is kept in pure
//! `parse_*` functions so the heuristics are testable without touching
//! a real system; the [`InterfaceParser`] implementations add the live
//! current-address re-read and target filtering on top.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    command::CommandRunner,
    error::{Result, SpoofError},
    mac::{self, MAC_ADDRESS_RE},
    platform::Platform,
};

/// A network interface as reported by platform enumeration.
///
/// `device` is always non-empty. `address` and `current_address`, when
/// present, are canonical colon-separated uppercase MAC strings. A
/// record whose `current_address` differs from `address` has been
/// spoofed since the last hardware reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    /// Human-readable hardware port label (e.g. "Wi-Fi", "Ethernet")
    pub port: String,
    /// OS device identifier used to address the interface in commands
    pub device: String,
    /// Permanent/hardware MAC address, if enumeration reported one
    pub address: Option<String>,
    /// MAC address currently active on the interface, if readable
    pub current_address: Option<String>,
    /// Free-text adapter description (Windows only)
    pub description: Option<String>,
}

impl InterfaceRecord {
    /// Whether a previously applied spoof is still in effect
    pub fn is_spoofed(&self) -> bool {
        match (&self.current_address, &self.address) {
            (Some(current), Some(address)) => current != address,
            _ => false,
        }
    }
}

/// User-supplied target filters, held lowercase. An empty set matches
/// every interface; otherwise a record matches iff its port or device
/// equals any target, case-insensitively. No substrings, no patterns.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    targets: Vec<String>,
}

impl TargetSet {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            targets: targets
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn matches(&self, record: &InterfaceRecord) -> bool {
        if self.targets.is_empty() {
            return true;
        }
        let port = record.port.to_lowercase();
        let device = record.device.to_lowercase();
        self.targets.iter().any(|t| *t == port || *t == device)
    }
}

/// Field extractor for the macOS listing: the output is a flat cyclic
/// sequence of these three labelled lines per port, interleaved with
/// metadata lines that are skipped.
static DARWIN_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Hardware Port|Device|Ethernet Address): (.+)")
        .expect("macOS field pattern is valid")
});

/// Linux: an interface's preamble and its MAC share the line carrying
/// the `HWaddr` token. Interfaces without the token (loopback) never
/// produce a record.
static LINUX_HWADDR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(.*?)HWaddr(.*)").expect("Linux HWaddr pattern is valid"));

static WIN_ADAPTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"adapter (.+?):").expect("adapter pattern is valid"));

static WIN_PHYSICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Physical Address.+?:(.*)").expect("physical-address pattern is valid"));

static WIN_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)description.+?:(.*)").expect("description pattern is valid"));

/// Pull the first MAC address out of free text and canonicalize it.
/// Anything that does not contain one (e.g. `N/A`) is simply absent.
fn extract_mac(text: &str) -> Option<String> {
    MAC_ADDRESS_RE
        .find(text)
        .and_then(|m| mac::normalize(m.as_str()).ok())
}

/// Turns platform enumeration output into interface records
#[async_trait]
pub trait InterfaceParser: Send + Sync {
    /// Enumerate interfaces, read their live addresses where the
    /// platform supports it, and keep the records matching `targets`.
    async fn discover(
        &self,
        runner: &dyn CommandRunner,
        targets: &TargetSet,
    ) -> Result<Vec<InterfaceRecord>>;
}

/// Select the enumeration strategy for a probed platform
pub fn interface_parser(platform: Platform) -> Box<dyn InterfaceParser> {
    match platform {
        Platform::Darwin => Box::new(DarwinParser),
        Platform::Linux => Box::new(LinuxParser),
        Platform::Windows => Box::new(WindowsParser),
    }
}

/// Read the currently-set MAC of a live interface via `ifconfig`.
/// Distinct from the hardware address reported by enumeration; this is
/// what detects an interface that is already spoofed. A read failure
/// means "unreadable", not an error.
async fn read_current_mac(runner: &dyn CommandRunner, device: &str) -> Option<String> {
    match runner.run("ifconfig", &[device]).await {
        Ok(output) => extract_mac(&output),
        Err(_) => None,
    }
}

fn enumeration_error(err: SpoofError) -> SpoofError {
    SpoofError::enumeration(err.to_string())
}

// ---------------------------------------------------------------------------
// macOS

pub struct DarwinParser;

/// Parse `networksetup -listallhardwareports` output into
/// (port, device, address) triples.
///
/// The listing repeats `Hardware Port:` / `Device:` / `Ethernet
/// Address:` lines in that cyclic order; matches are extracted
/// sequentially and consumed three at a time, stopping cleanly when no
/// complete triple remains. An address of `N/A` (or anything else that
/// is not a MAC) becomes absent.
pub fn parse_darwin_listing(output: &str) -> Vec<(String, String, Option<String>)> {
    let fields: Vec<&str> = DARWIN_FIELD_RE
        .captures_iter(output)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    fields
        .chunks_exact(3)
        .map(|chunk| {
            let port = chunk[0].to_string();
            let device = chunk[1].to_string();
            let address = extract_mac(&chunk[2].to_uppercase());
            (port, device, address)
        })
        .collect()
}

#[async_trait]
impl InterfaceParser for DarwinParser {
    async fn discover(
        &self,
        runner: &dyn CommandRunner,
        targets: &TargetSet,
    ) -> Result<Vec<InterfaceRecord>> {
        let output = runner
            .run("networksetup", &["-listallhardwareports"])
            .await
            .map_err(enumeration_error)?;

        let mut interfaces = Vec::new();
        for (port, device, address) in parse_darwin_listing(&output) {
            let record = InterfaceRecord {
                current_address: read_current_mac(runner, &device).await,
                port,
                device,
                address,
                description: None,
            };
            if targets.matches(&record) {
                interfaces.push(record);
            }
        }

        debug!(count = interfaces.len(), "enumerated macOS hardware ports");
        Ok(interfaces)
    }
}

// ---------------------------------------------------------------------------
// Linux

pub struct LinuxParser;

/// Parse `ifconfig` output into (device, port, address) triples.
///
/// The device name is the first token of the preamble before its first
/// colon; the port label is the text between the first and second
/// colons, trimmed. Lines without a parseable preamble are dropped so
/// a record never carries an empty device.
pub fn parse_linux_listing(output: &str) -> Vec<(String, String, Option<String>)> {
    let mut interfaces = Vec::new();

    for caps in LINUX_HWADDR_RE.captures_iter(output) {
        let preamble = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let parts: Vec<&str> = preamble.split(':').collect();
        if parts.len() < 2 {
            debug!(line = preamble, "skipping interface line without a port label");
            continue;
        }
        let device = match parts[0].split_whitespace().next() {
            Some(token) => token.to_string(),
            None => continue,
        };
        let port = parts[1].trim().to_string();
        let address = extract_mac(rest.trim());

        interfaces.push((device, port, address));
    }

    interfaces
}

#[async_trait]
impl InterfaceParser for LinuxParser {
    async fn discover(
        &self,
        runner: &dyn CommandRunner,
        targets: &TargetSet,
    ) -> Result<Vec<InterfaceRecord>> {
        let output = runner
            .run("ifconfig", &[])
            .await
            .map_err(enumeration_error)?;

        let mut interfaces = Vec::new();
        for (device, port, address) in parse_linux_listing(&output) {
            let record = InterfaceRecord {
                current_address: read_current_mac(runner, &device).await,
                port,
                device,
                address,
                description: None,
            };
            if targets.matches(&record) {
                interfaces.push(record);
            }
        }

        debug!(count = interfaces.len(), "enumerated Linux interfaces");
        Ok(interfaces)
    }
}

// ---------------------------------------------------------------------------
// Windows

pub struct WindowsParser;

/// Parse `ipconfig /all` output into interface records.
///
/// Adapter blocks are not formally delimited; a new block starts at any
/// line whose first character is an uppercase ASCII letter (documented
/// heuristic; real output varies by OS version and locale). The block's
/// device name comes from its `adapter <name>:` line. Within a block a
/// `Physical Address` line sets both the hardware and current address
/// (the platform cannot distinguish them), and a `Description` line
/// sets the description. The final partial block is flushed at end of
/// input. Blocks that never produced a device name (section headers)
/// are dropped.
pub fn parse_windows_listing(output: &str) -> Vec<InterfaceRecord> {
    fn flush(record: Option<InterfaceRecord>, into: &mut Vec<InterfaceRecord>) {
        if let Some(record) = record {
            if !record.device.is_empty() {
                into.push(record);
            }
        }
    }

    let mut interfaces = Vec::new();
    let mut current: Option<InterfaceRecord> = None;

    for line in output.lines() {
        let starts_block = line
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_uppercase());

        if starts_block {
            flush(current.take(), &mut interfaces);
            let device = WIN_ADAPTER_RE
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            current = Some(InterfaceRecord {
                port: String::new(),
                device,
                address: None,
                current_address: None,
                description: None,
            });
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = WIN_PHYSICAL_RE.captures(line) {
            let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            // Both fields come from the same query here, so a spoof
            // can never be detected on this platform.
            record.address = mac::normalize(value).ok();
            record.current_address = record.address.clone();
            continue;
        }

        if let Some(caps) = WIN_DESCRIPTION_RE.captures(line) {
            record.description = caps.get(1).map(|m| m.as_str().trim().to_string());
        }
    }
    flush(current.take(), &mut interfaces);

    interfaces
}

#[async_trait]
impl InterfaceParser for WindowsParser {
    async fn discover(
        &self,
        runner: &dyn CommandRunner,
        targets: &TargetSet,
    ) -> Result<Vec<InterfaceRecord>> {
        let output = runner
            .run("ipconfig", &["/all"])
            .await
            .map_err(enumeration_error)?;

        let interfaces: Vec<InterfaceRecord> = parse_windows_listing(&output)
            .into_iter()
            .filter(|record| targets.matches(record))
            .collect();

        debug!(count = interfaces.len(), "enumerated Windows adapters");
        Ok(interfaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::MockRunner;

    const DARWIN_LISTING: &str = "\
Hardware Port: Wi-Fi
Device: en0
Ethernet Address: aa:bb:cc:dd:ee:ff

Hardware Port: Bluetooth PAN
Device: en4
Ethernet Address: N/A

Hardware Port: Thunderbolt Ethernet
Device: en2
Ethernet Address: 11:22:33:44:55:66

VLAN Configurations
===================
";

    const LINUX_LISTING: &str = "\
eth0      Link encap:Ethernet  HWaddr 00:11:22:33:44:55
          inet addr:10.0.0.2  Bcast:10.0.0.255  Mask:255.255.255.0
          UP BROADCAST RUNNING MULTICAST  MTU:1500  Metric:1

lo        Link encap:Local Loopback
          inet addr:127.0.0.1  Mask:255.0.0.0

wlan0     Link encap:Ethernet  HWaddr aa:bb:cc:dd:ee:ff
          UP BROADCAST MULTICAST  MTU:1500  Metric:1
";

    const WINDOWS_LISTING: &str = "\
Windows IP Configuration

   Host Name . . . . . . . . . . . . : DESKTOP-TEST

Ethernet adapter Local Area Connection:

   Description . . . . . . . . . . . : Intel(R) PRO/1000 MT
   Physical Address. . . . . . . . . : 00-14-22-01-23-45
   DHCP Enabled. . . . . . . . . . . : Yes

Wireless LAN adapter Wi-Fi:

   Physical Address. . . . . . . . . : AA-BB-CC-DD-EE-FF
";

    #[test]
    fn test_darwin_listing_triples() {
        let triples = parse_darwin_listing(DARWIN_LISTING);
        assert_eq!(triples.len(), 3);
        assert_eq!(
            triples[0],
            (
                "Wi-Fi".to_string(),
                "en0".to_string(),
                Some("AA:BB:CC:DD:EE:FF".to_string())
            )
        );
        // N/A is absent, not an error
        assert_eq!(triples[1].2, None);
        assert_eq!(triples[2].1, "en2");
    }

    #[test]
    fn test_darwin_incomplete_trailing_fields_are_dropped() {
        let listing = "Hardware Port: Wi-Fi\nDevice: en0\n";
        assert!(parse_darwin_listing(listing).is_empty());
    }

    #[test]
    fn test_linux_listing_skips_loopback() {
        let triples = parse_linux_listing(LINUX_LISTING);
        assert_eq!(triples.len(), 2);
        assert_eq!(
            triples[0],
            (
                "eth0".to_string(),
                "Ethernet".to_string(),
                Some("00:11:22:33:44:55".to_string())
            )
        );
        assert_eq!(triples[1].0, "wlan0");
    }

    #[test]
    fn test_windows_listing_blocks() {
        let records = parse_windows_listing(WINDOWS_LISTING);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].device, "Local Area Connection");
        assert_eq!(records[0].address.as_deref(), Some("00:14:22:01:23:45"));
        assert_eq!(records[0].current_address, records[0].address);
        assert_eq!(records[0].description.as_deref(), Some("Intel(R) PRO/1000 MT"));

        // Last block flushes at end of input even without a trailing
        // boundary line.
        assert_eq!(records[1].device, "Wi-Fi");
        assert_eq!(records[1].address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
    }

    #[test]
    fn test_unrecognizable_text_yields_empty_lists() {
        let noise = "nothing to see here\njust some text\n";
        assert!(parse_darwin_listing(noise).is_empty());
        assert!(parse_linux_listing(noise).is_empty());
        assert!(parse_windows_listing(noise).is_empty());
    }

    #[test]
    fn test_target_set_matching() {
        let record = InterfaceRecord {
            port: "Wi-Fi".to_string(),
            device: "en0".to_string(),
            address: None,
            current_address: None,
            description: None,
        };

        assert!(TargetSet::new(Vec::<String>::new()).matches(&record));
        assert!(TargetSet::new(["EN0"]).matches(&record));
        assert!(TargetSet::new(["wi-fi"]).matches(&record));
        assert!(!TargetSet::new(["eth0"]).matches(&record));
        // Equality, not substring
        assert!(!TargetSet::new(["en"]).matches(&record));
    }

    #[tokio::test]
    async fn test_darwin_discover_detects_spoof() {
        let runner = MockRunner::new()
            .respond(
                "networksetup -listallhardwareports",
                "Hardware Port: Wi-Fi\nDevice: en0\nEthernet Address: AA:BB:CC:DD:EE:FF\n",
            )
            .respond("ifconfig en0", "en0: flags=8863\n\tether aa:bb:cc:dd:ee:00\n");

        let records = DarwinParser
            .discover(&runner, &TargetSet::default())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.port, "Wi-Fi");
        assert_eq!(record.device, "en0");
        assert_eq!(record.address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(record.current_address.as_deref(), Some("AA:BB:CC:DD:EE:00"));
        assert!(record.is_spoofed());
    }

    #[tokio::test]
    async fn test_linux_discover_unreadable_current_address() {
        let runner = MockRunner::new()
            .respond("ifconfig", LINUX_LISTING)
            .fail("ifconfig eth0")
            .respond("ifconfig wlan0", "wlan0: HWaddr aa:bb:cc:dd:ee:ff");

        let records = LinuxParser
            .discover(&runner, &TargetSet::default())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        // A failed live read is absence, not an error
        assert_eq!(records[0].current_address, None);
        assert_eq!(records[1].current_address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
    }

    #[tokio::test]
    async fn test_discover_propagates_enumeration_failure() {
        let runner = MockRunner::new().fail("ipconfig /all");
        let error = WindowsParser
            .discover(&runner, &TargetSet::default())
            .await
            .unwrap_err();
        assert!(matches!(error, SpoofError::EnumerationFailed { .. }));
    }

    #[tokio::test]
    async fn test_discover_applies_target_filter() {
        let runner = MockRunner::new().respond("ifconfig", LINUX_LISTING);
        let records = LinuxParser
            .discover(&runner, &TargetSet::new(["WLAN0"]))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].device, "wlan0");
    }
}
