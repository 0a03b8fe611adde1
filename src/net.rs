//! Network literal helpers: recognizing IPv4 shapes in bare words, padding
//! abbreviated prefixes and computing canonical networks.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

lazy_static! {
    static ref IPV4_PREFIX: Regex = Regex::new(r"^(\d{1,3}(?:\.\d{1,3}){0,3})/(\d{1,2})$").unwrap();
    static ref IPV4_ADDRESS: Regex = Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn max_length(&self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "4"),
            Family::V6 => write!(f, "6"),
        }
    }
}

/// IPv4 forms found in a bare word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ipv4Literal {
    /// `expanded` is the literal padded with `.0` to four octets, `strict`
    /// is the network it denotes.
    Prefix { expanded: String, strict: String },
    Address(String),
}

pub fn classify_ipv4(word: &str) -> Option<Ipv4Literal> {
    if let Some(caps) = IPV4_PREFIX.captures(word) {
        let mut octets = parse_octets(&caps[1])?;
        let length: u8 = caps[2].parse().ok()?;
        if length > 32 {
            return None;
        }
        octets.resize(4, 0);
        let address = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
        let expanded = format!("{}/{}", padded(&caps[1]), &caps[2]);
        let network = Ipv4Addr::from(u32::from(address) & v4_mask(length));
        return Some(Ipv4Literal::Prefix {
            expanded,
            strict: format!("{}/{}", network, length),
        });
    }
    if IPV4_ADDRESS.is_match(word) {
        let octets = parse_octets(word)?;
        let address = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
        return Some(Ipv4Literal::Address(address.to_string()));
    }
    None
}

fn parse_octets(dotted: &str) -> Option<Vec<u8>> {
    dotted.split('.').map(|o| o.parse::<u8>().ok()).collect()
}

fn padded(dotted: &str) -> String {
    let mut address = dotted.to_string();
    for _ in dotted.split('.').count()..4 {
        address.push_str(".0");
    }
    address
}

fn v4_mask(length: u8) -> u32 {
    if length == 0 { 0 } else { u32::MAX << (32 - length as u32) }
}

fn v6_mask(length: u8) -> u128 {
    if length == 0 { 0 } else { u128::MAX << (128 - length as u32) }
}

/// Canonical network of an IPv6 prefix literal, in compressed lower case.
pub fn canonical_ipv6_prefix(literal: &str) -> Option<String> {
    let network = parse_network(literal)?;
    match network.address {
        IpAddr::V6(_) => Some(network.to_string()),
        IpAddr::V4(_) => None,
    }
}

// ------------- Network -------------
/// An address block with host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Network {
    pub address: IpAddr,
    pub length: u8,
}

impl Network {
    pub fn family(&self) -> Family {
        match self.address {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.length)
    }
}

/// Parses `address/length`, or a bare address as a host network.
pub fn parse_network(text: &str) -> Option<Network> {
    let (address, length) = match text.split_once('/') {
        Some((address, length)) => (address, Some(length.parse::<u8>().ok()?)),
        None => (text, None),
    };
    let address: IpAddr = address.parse().ok()?;
    Some(match address {
        IpAddr::V4(v4) => {
            let length = length.unwrap_or(32);
            if length > 32 {
                return None;
            }
            Network {
                address: IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(length))),
                length,
            }
        }
        IpAddr::V6(v6) => {
            let length = length.unwrap_or(128);
            if length > 128 {
                return None;
            }
            Network {
                address: IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(length))),
                length,
            }
        }
    })
}

impl Serialize for Family {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Family::V4 => 4,
            Family::V6 => 6,
        })
    }
}

impl Serialize for Network {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
