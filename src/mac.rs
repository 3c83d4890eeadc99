//! MAC address parsing, validation, and generation
//!
//! Accepts three input notations (colon-separated, hyphen-separated,
//! Cisco dotted-quad-hex) and emits one canonical form: uppercase,
//! colon-separated. Every downstream comparison is plain string
//! equality on the canonical form.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::{
    error::{Result, SpoofError},
    platform::Platform,
};

/// Matches a MAC address anywhere in the input: six groups of 1-2 hex
/// digits, optionally separated by `:` or `-`.
/// Example: 00-00-00-00-00-00 or 00:00:00:00:00:00 or 000000000000
pub static MAC_ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)([0-9A-F]{1,2})[:-]?([0-9A-F]{1,2})[:-]?([0-9A-F]{1,2})[:-]?([0-9A-F]{1,2})[:-]?([0-9A-F]{1,2})[:-]?([0-9A-F]{1,2})",
    )
    .expect("MAC address pattern is valid")
});

/// Matches a Cisco-style MAC address: three dot-separated groups of
/// 1-4 hex digits. Example: 0123.4567.89ab
static CISCO_MAC_ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9A-F]{1,4})\.([0-9A-F]{1,4})\.([0-9A-F]{1,4})")
        .expect("Cisco MAC address pattern is valid")
});

/// OUI prefixes of well-known virtualization vendors. Randomized
/// addresses draw their first three bytes from this table, which keeps
/// them away from the address space of real hardware on the network.
const VENDOR_OUIS: &[[u8; 3]] = &[
    [0x00, 0x05, 0x69], // VMware
    [0x00, 0x50, 0x56], // VMware
    [0x00, 0x0C, 0x29], // VMware
    [0x00, 0x16, 0x3E], // Xen
    [0x00, 0x03, 0xFF], // Microsoft Hyper-V, Virtual Server, Virtual PC
    [0x00, 0x1C, 0x42], // Parallels
    [0x00, 0x0F, 0x4B], // Virtual Iron 4
    [0x08, 0x00, 0x27], // Sun Virtual Box
];

/// First-octet values Windows drivers are known to accept for a
/// spoofed address.
const WINDOWS_PREFIXES: &[u8] = &[0xD2, 0xD6, 0xDA, 0xDE];

/// Hardware port labels treated as wireless interfaces
pub const WIRELESS_PORT_NAMES: &[&str] = &["wi-fi", "airport"];

/// Normalize a MAC address into canonical `00:1A:2B:3C:4D:5E` form.
///
/// The Cisco dotted notation is tried first; each dotted group is
/// zero-padded to four digits before the twelve digits are re-split
/// into byte pairs. Otherwise the general six-group notation is tried
/// with each group zero-padded to two digits. Input matching neither
/// pattern yields `InvalidMacFormat`.
pub fn normalize(text: &str) -> Result<String> {
    if let Some(caps) = CISCO_MAC_ADDRESS_RE.captures(text) {
        let mut digits = String::with_capacity(12);
        for i in 1..=3 {
            let group = caps.get(i).map(|m| m.as_str()).unwrap_or("");
            digits.push_str(&format!("{:0>4}", group));
        }
        let bytes: Vec<&str> = digits
            .as_bytes()
            .chunks(2)
            .map(|pair| std::str::from_utf8(pair).expect("hex digits are ASCII"))
            .collect();
        return Ok(bytes.join(":").to_uppercase());
    }

    if let Some(caps) = MAC_ADDRESS_RE.captures(text) {
        let bytes: Vec<String> = (1..=6)
            .map(|i| format!("{:0>2}", caps.get(i).map(|m| m.as_str()).unwrap_or("")))
            .collect();
        return Ok(bytes.join(":").to_uppercase());
    }

    Err(SpoofError::invalid_mac(text))
}

/// True iff the general six-group pattern matches somewhere in `text`.
/// Used as a pre-flight gate before mutation.
pub fn is_valid(text: &str) -> bool {
    MAC_ADDRESS_RE.is_match(text)
}

/// Generate a random MAC address in canonical form.
///
/// Bytes 0-2 are a vendor OUI from [`VENDOR_OUIS`]; byte 3 stays in
/// 0x00-0x7F so the address can never look multicast/broadcast, bytes
/// 4-5 take the full range. With `local_admin` the locally-administered
/// bit (0x02 in the first octet) is set per IEEE 802.
pub fn random(local_admin: bool) -> String {
    random_bytes(local_admin, None)
}

/// Platform-aware variant of [`random`]: Windows drivers only accept
/// certain first octets, so on Windows the vendor prefix's first byte
/// is replaced by one of [`WINDOWS_PREFIXES`].
pub fn random_for(platform: Platform, local_admin: bool) -> String {
    let prefix = match platform {
        Platform::Windows => {
            let mut rng = rand::thread_rng();
            Some(WINDOWS_PREFIXES[rng.gen_range(0..WINDOWS_PREFIXES.len())])
        }
        Platform::Darwin | Platform::Linux => None,
    };
    random_bytes(local_admin, prefix)
}

fn random_bytes(local_admin: bool, first_octet: Option<u8>) -> String {
    let mut rng = rand::thread_rng();

    let vendor = VENDOR_OUIS[rng.gen_range(0..VENDOR_OUIS.len())];
    let mut mac = [
        first_octet.unwrap_or(vendor[0]),
        vendor[1],
        vendor[2],
        rng.gen_range(0x00..=0x7f),
        rng.gen_range(0x00..=0xff),
        rng.gen_range(0x00..=0xff),
    ];

    if local_admin {
        mac[0] |= 0x02;
    }

    let text = mac
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(":");

    // Canonicalization is cheap and guarantees generated addresses are
    // always valid input to normalize().
    normalize(&text).expect("generated address is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepted_notations() {
        assert_eq!(normalize("00:00:00:00:00:00").unwrap(), "00:00:00:00:00:00");
        assert_eq!(normalize("00-00-00-00-00-00").unwrap(), "00:00:00:00:00:00");
        assert_eq!(normalize("0000.0000.0000").unwrap(), "00:00:00:00:00:00");
        assert_eq!(normalize("001a.2b3c.4d5e").unwrap(), "00:1A:2B:3C:4D:5E");
        assert_eq!(normalize("00:1a:2b:3c:4d:5e").unwrap(), "00:1A:2B:3C:4D:5E");
    }

    #[test]
    fn test_normalize_pads_short_groups() {
        assert_eq!(normalize("0:1:2:3:4:5").unwrap(), "00:01:02:03:04:05");
        assert_eq!(normalize("1a.2b3c.4d5e").unwrap(), "00:1A:2B:3C:4D:5E");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["00:1a:2b:3c:4d:5e", "aa-bb-cc-dd-ee-ff", "0123.4567.89ab"] {
            let once = normalize(input).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let error = normalize("not a mac").unwrap_err();
        assert!(matches!(error, SpoofError::InvalidMacFormat { .. }));
        assert!(normalize("").is_err());
        assert!(normalize("zz:zz:zz:zz:zz:zz").is_err());
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("00:11:22:33:44:55"));
        assert!(is_valid("001122334455"));
        assert!(!is_valid("hello"));
    }

    fn first_octet(mac: &str) -> u8 {
        u8::from_str_radix(&mac[0..2], 16).unwrap()
    }

    #[test]
    fn test_random_is_normalized_and_valid() {
        for _ in 0..32 {
            let mac = random(false);
            assert!(is_valid(&mac));
            assert_eq!(mac, normalize(&mac).unwrap());
        }
    }

    #[test]
    fn test_random_uses_vendor_oui_and_clear_byte3() {
        for _ in 0..32 {
            let mac = random(false);
            let bytes: Vec<u8> = mac
                .split(':')
                .map(|b| u8::from_str_radix(b, 16).unwrap())
                .collect();
            let oui = [bytes[0], bytes[1], bytes[2]];
            assert!(VENDOR_OUIS.contains(&oui), "unexpected OUI in {}", mac);
            assert!(bytes[3] <= 0x7f);
        }
    }

    #[test]
    fn test_random_local_admin_bit() {
        for _ in 0..32 {
            let mac = random(true);
            assert_eq!(first_octet(&mac) & 0x02, 0x02);
        }
    }

    #[test]
    fn test_random_for_windows_prefixes() {
        for _ in 0..32 {
            let mac = random_for(Platform::Windows, false);
            assert!(WINDOWS_PREFIXES.contains(&first_octet(&mac)));
            assert!(is_valid(&mac));
        }
    }

    #[test]
    fn test_random_for_unix_matches_base_behavior() {
        for _ in 0..8 {
            let mac = random_for(Platform::Linux, false);
            let bytes: Vec<u8> = mac
                .split(':')
                .map(|b| u8::from_str_radix(b, 16).unwrap())
                .collect();
            assert!(VENDOR_OUIS.contains(&[bytes[0], bytes[1], bytes[2]]));
        }
    }
}
