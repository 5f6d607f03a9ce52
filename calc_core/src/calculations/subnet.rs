//! # IPv4 Subnet Calculator
//!
//! Network, broadcast and host range for an address and a mask given as
//! dotted-quad (`255.255.255.0`) or CIDR prefix (`/24` or `24`).

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Parse a dotted-quad with every octet an integer in `[0, 255]`.
pub fn parse_dotted_quad(field: &str, text: &str) -> CalcResult<Ipv4Addr> {
    let text = text.trim();
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(CalcError::invalid_input(
            field,
            text,
            "Expected four dot-separated octets",
        ));
    }
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        let digits_only = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        *slot = part
            .parse::<u8>()
            .ok()
            .filter(|_| digits_only)
            .ok_or_else(|| CalcError::invalid_input(field, text, "Each octet must be an integer between 0 and 255"))?;
    }
    Ok(Ipv4Addr::from(octets))
}

/// Prefix length to mask bits
pub fn prefix_to_mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p.min(32))),
    }
}

/// Parse `/24`, `24` or `255.255.255.0` into a prefix length.
///
/// Dotted masks must be contiguous (ones followed by zeros).
pub fn parse_mask(text: &str) -> CalcResult<u8> {
    let text = text.trim();
    if text.contains('.') {
        let bits = u32::from(parse_dotted_quad("mask", text)?);
        if bits.leading_ones() + bits.trailing_zeros() != 32 {
            return Err(CalcError::invalid_input(
                "mask",
                text,
                "Subnet mask must be contiguous ones followed by zeros",
            ));
        }
        // leading_ones is at most 32
        return Ok(bits.leading_ones() as u8);
    }

    let digits = text.strip_prefix('/').unwrap_or(text);
    match digits.parse::<u8>() {
        Ok(prefix) if prefix <= 32 && digits.bytes().all(|b| b.is_ascii_digit()) => Ok(prefix),
        _ => Err(CalcError::invalid_input(
            "mask",
            text,
            "CIDR prefix must be an integer between 0 and 32",
        )),
    }
}

/// Classful network class of an address
pub fn ip_class(ip: Ipv4Addr) -> &'static str {
    match ip.octets()[0] {
        0..=127 => "A",
        128..=191 => "B",
        192..=223 => "C",
        224..=239 => "D (multicast)",
        _ => "E (reserved)",
    }
}

/// Subnet input
///
/// ## JSON Example
///
/// ```json
/// { "ip_address": "192.168.1.10", "cidr": 24 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetInput {
    pub ip_address: Ipv4Addr,
    /// Prefix length, 0-32
    pub cidr: u8,
}

impl SubnetInput {
    /// Build from text fields: address plus dotted mask or CIDR.
    pub fn parse(ip_address: &str, mask: &str) -> CalcResult<Self> {
        Ok(SubnetInput {
            ip_address: parse_dotted_quad("ip_address", ip_address)?,
            cidr: parse_mask(mask)?,
        })
    }
}

/// Subnet result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetResult {
    pub ip_address: Ipv4Addr,
    pub cidr: u8,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    pub network_address: Ipv4Addr,
    pub broadcast_address: Ipv4Addr,
    /// `None` when there are no usable hosts (/31, /32)
    pub first_host: Option<Ipv4Addr>,
    pub last_host: Option<Ipv4Addr>,
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub ip_class: String,
    pub is_private: bool,
}

/// Compute the subnet an address belongs to.
pub fn calculate(input: &SubnetInput) -> CalcResult<SubnetResult> {
    if input.cidr > 32 {
        return Err(CalcError::invalid_input(
            "cidr",
            input.cidr.to_string(),
            "CIDR prefix must be an integer between 0 and 32",
        ));
    }
    let ip = u32::from(input.ip_address);
    let mask = prefix_to_mask(input.cidr);
    let network = ip & mask;
    let broadcast = network | !mask;

    let total_hosts = 1u64 << (32 - u32::from(input.cidr));
    let usable_hosts = total_hosts.saturating_sub(2);
    let (first_host, last_host) = if usable_hosts > 0 {
        (Some(Ipv4Addr::from(network + 1)), Some(Ipv4Addr::from(broadcast - 1)))
    } else {
        (None, None)
    };

    Ok(SubnetResult {
        ip_address: input.ip_address,
        cidr: input.cidr,
        subnet_mask: Ipv4Addr::from(mask),
        wildcard_mask: Ipv4Addr::from(!mask),
        network_address: Ipv4Addr::from(network),
        broadcast_address: Ipv4Addr::from(broadcast),
        first_host,
        last_host,
        total_hosts,
        usable_hosts,
        ip_class: ip_class(input.ip_address).to_string(),
        is_private: input.ip_address.is_private(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subnet(ip: &str, mask: &str) -> SubnetResult {
        calculate(&SubnetInput::parse(ip, mask).unwrap()).unwrap()
    }

    #[test]
    fn test_slash_24() {
        let result = subnet("192.168.1.10", "/24");
        assert_eq!(result.network_address, Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(result.broadcast_address, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(result.usable_hosts, 254);
        assert_eq!(result.total_hosts, 256);
        assert_eq!(result.first_host, Some(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(result.last_host, Some(Ipv4Addr::new(192, 168, 1, 254)));
        assert_eq!(result.subnet_mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(result.wildcard_mask, Ipv4Addr::new(0, 0, 0, 255));
        assert_eq!(result.ip_class, "C");
        assert!(result.is_private);
    }

    #[test]
    fn test_mask_forms_agree() {
        assert_eq!(subnet("10.1.2.3", "255.255.0.0"), subnet("10.1.2.3", "16"));
        assert_eq!(subnet("10.1.2.3", "/16"), subnet("10.1.2.3", "16"));
    }

    #[test]
    fn test_point_to_point_and_host_routes() {
        let p2p = subnet("10.0.0.1", "/31");
        assert_eq!(p2p.total_hosts, 2);
        assert_eq!(p2p.usable_hosts, 0);
        assert!(p2p.first_host.is_none());

        let host = subnet("8.8.8.8", "/32");
        assert_eq!(host.total_hosts, 1);
        assert_eq!(host.usable_hosts, 0);
        assert_eq!(host.network_address, Ipv4Addr::new(8, 8, 8, 8));
        assert!(!host.is_private);
    }

    #[test]
    fn test_slash_zero() {
        let all = subnet("172.16.5.4", "0");
        assert_eq!(all.network_address, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(all.broadcast_address, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(all.total_hosts, 1 << 32);
    }

    #[test]
    fn test_invalid_octets() {
        for ip in ["256.1.1.1", "1.2.3", "1.2.3.4.5", "a.b.c.d", "1.2.3.-4", "1.2..4"] {
            let err = SubnetInput::parse(ip, "/24").unwrap_err();
            assert_eq!(err.field(), Some("ip_address"), "{ip}");
        }
    }

    #[test]
    fn test_invalid_masks() {
        assert!(parse_mask("33").is_err());
        assert!(parse_mask("/-1").is_err());
        assert!(parse_mask("255.0.255.0").is_err());
        assert!(parse_mask("255.255.255.1").is_err());
        assert_eq!(parse_mask("255.255.255.255").unwrap(), 32);
        assert_eq!(parse_mask("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_mask("255.255.240.0").unwrap(), 20);
    }

    #[test]
    fn test_classes() {
        assert_eq!(ip_class(Ipv4Addr::new(10, 0, 0, 1)), "A");
        assert_eq!(ip_class(Ipv4Addr::new(172, 16, 0, 1)), "B");
        assert_eq!(ip_class(Ipv4Addr::new(224, 0, 0, 1)), "D (multicast)");
        assert_eq!(ip_class(Ipv4Addr::new(250, 0, 0, 1)), "E (reserved)");
    }

    #[test]
    fn test_result_serializes_addresses_as_text() {
        let json = serde_json::to_value(subnet("192.168.1.10", "/24")).unwrap();
        assert_eq!(json["network_address"], "192.168.1.0");
        assert_eq!(json["first_host"], "192.168.1.1");
    }
}
