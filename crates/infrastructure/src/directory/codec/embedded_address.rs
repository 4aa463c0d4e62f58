use ferrous_discovery_domain::DiscoveryError;
use std::net::Ipv4Addr;

const EMBEDDED_HEX_LEN: usize = 8;

/// Decode the IPv4 address a directory embeds in an SRV target.
///
/// The first 8 characters of the leftmost label are the address in hex,
/// so `7f000001.addr.dc1.consul.` decodes to `127.0.0.1`.
pub fn decode_embedded_address(target: &str) -> Result<Ipv4Addr, DiscoveryError> {
    let label = target.split('.').next().unwrap_or_default();

    let hex = label
        .get(..EMBEDDED_HEX_LEN)
        .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| DiscoveryError::InvalidEmbeddedAddress(target.to_string()))?;

    u32::from_str_radix(hex, 16)
        .map(Ipv4Addr::from)
        .map_err(|_| DiscoveryError::InvalidEmbeddedAddress(target.to_string()))
}
