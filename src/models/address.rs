//! Family-aware IP address value.
//!
//! [`Address`] keeps the 32-bit and 128-bit families apart with an explicit tag, and
//! distinguishes the two IPv6 forms that carry an IPv4 host (`::ffff:a.b.c.d` and
//! `::a.b.c.d`). Stepping an embedded form stays inside that form.

use crate::error::CidrError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Bit width of the IPv4 family.
pub const IPV4_BITS: u8 = 32;
/// Bit width of the IPv6 family.
pub const IPV6_BITS: u8 = 128;

/// Marker bits of `::ffff:0.0.0.0/96`.
const MAPPED_PREFIX: u128 = 0xffff << 32;

/// An IPv4 or IPv6 address with its family made explicit.
#[derive(Debug, Copy, Clone)]
pub enum Address {
    /// Plain 32-bit address.
    V4(Ipv4Addr),
    /// 128-bit address that embeds no IPv4 host.
    V6(Ipv6Addr),
    /// IPv4-mapped IPv6 address, `::ffff:a.b.c.d`.
    Ipv4Mapped(Ipv4Addr),
    /// IPv4-compatible IPv6 address, `::a.b.c.d`.
    Ipv4Compatible(Ipv4Addr),
}

impl Address {
    /// Family width in bits, 32 or 128.
    pub fn bits(&self) -> u8 {
        match self {
            Address::V4(_) => IPV4_BITS,
            _ => IPV6_BITS,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.bits() == IPV4_BITS
    }

    pub fn is_ipv6(&self) -> bool {
        self.bits() == IPV6_BITS
    }

    pub fn is_ipv4_mapped(&self) -> bool {
        matches!(self, Address::Ipv4Mapped(_))
    }

    pub fn is_ipv4_compatible(&self) -> bool {
        matches!(self, Address::Ipv4Compatible(_))
    }

    /// The IPv4 host carried by this address, if any.
    pub fn to_ipv4(&self) -> Option<Ipv4Addr> {
        match *self {
            Address::V4(a) | Address::Ipv4Mapped(a) | Address::Ipv4Compatible(a) => Some(a),
            Address::V6(_) => None,
        }
    }

    /// The address as a std [`IpAddr`]. Embedded forms become [`IpAddr::V6`].
    pub fn to_ip_addr(&self) -> IpAddr {
        match *self {
            Address::V4(a) => IpAddr::V4(a),
            Address::V6(a) => IpAddr::V6(a),
            Address::Ipv4Mapped(a) => IpAddr::V6(a.to_ipv6_mapped()),
            Address::Ipv4Compatible(a) => IpAddr::V6(a.to_ipv6_compatible()),
        }
    }

    /// The 16-byte form used for comparison. IPv4 normalizes to its IPv4-mapped form.
    pub fn to_ipv6_octets(&self) -> [u8; 16] {
        match *self {
            Address::V4(a) | Address::Ipv4Mapped(a) => a.to_ipv6_mapped().octets(),
            Address::V6(a) => a.octets(),
            Address::Ipv4Compatible(a) => a.to_ipv6_compatible().octets(),
        }
    }

    /// Numeric value within the family width (32 bits for `V4`, 128 otherwise).
    pub fn to_bits(&self) -> u128 {
        match *self {
            Address::V4(a) | Address::Ipv4Compatible(a) => u32::from(a) as u128,
            Address::V6(a) => u128::from(a),
            Address::Ipv4Mapped(a) => MAPPED_PREFIX | u32::from(a) as u128,
        }
    }

    /// Build an address of the same family from a value within the family width.
    ///
    /// An embedded form keeps its variant only while `value` still carries its marker bits.
    pub(crate) fn with_bits(&self, value: u128) -> Address {
        match self {
            Address::V4(_) => Address::V4(Ipv4Addr::from(value as u32)),
            Address::Ipv4Mapped(_) if value >> 32 == 0xffff => {
                Address::Ipv4Mapped(Ipv4Addr::from(value as u32))
            }
            Address::Ipv4Compatible(_) if value >> 32 == 0 => {
                Address::Ipv4Compatible(Ipv4Addr::from(value as u32))
            }
            _ => Address::V6(Ipv6Addr::from(value)),
        }
    }

    fn step(self, v4: fn(u32) -> u32, v6: fn(u128) -> u128) -> Address {
        let embedded = |a: Ipv4Addr| Ipv4Addr::from(v4(u32::from(a)));
        match self {
            Address::V4(a) => Address::V4(embedded(a)),
            Address::V6(a) => Address::V6(Ipv6Addr::from(v6(u128::from(a)))),
            Address::Ipv4Mapped(a) => Address::Ipv4Mapped(embedded(a)),
            Address::Ipv4Compatible(a) => Address::Ipv4Compatible(embedded(a)),
        }
    }

    /// The next address. All-ones wraps to all-zero within the family or embedded form.
    pub fn incremented(&self) -> Address {
        self.step(|n: u32| n.wrapping_add(1), |n: u128| n.wrapping_add(1))
    }

    /// The previous address. All-zero wraps to all-ones within the family or embedded form.
    pub fn decremented(&self) -> Address {
        self.step(|n: u32| n.wrapping_sub(1), |n: u128| n.wrapping_sub(1))
    }

    /// In-place [`Address::incremented`].
    pub fn increment(&mut self) {
        *self = self.incremented();
    }

    /// In-place [`Address::decremented`].
    pub fn decrement(&mut self) {
        *self = self.decremented();
    }

    /// Parse an address with no surrounding whitespace allowed.
    ///
    /// `::a.b.c.d` is IPv4-compatible only when written dotted.
    pub(crate) fn parse_exact(s: &str) -> Result<Address, CidrError> {
        match s.parse::<IpAddr>() {
            Ok(IpAddr::V4(a)) => Ok(Address::V4(a)),
            Ok(IpAddr::V6(a)) => Ok(Address::from_ipv6(a, s.contains('.'))),
            Err(_) => Err(CidrError::InvalidAddress(s.to_string())),
        }
    }

    fn from_ipv6(addr: Ipv6Addr, dotted: bool) -> Address {
        if let Some(v4) = addr.to_ipv4_mapped() {
            return Address::Ipv4Mapped(v4);
        }
        let value = u128::from(addr);
        if dotted && value >> 32 == 0 {
            Address::Ipv4Compatible(Ipv4Addr::from(value as u32))
        } else {
            Address::V6(addr)
        }
    }
}

impl FromStr for Address {
    type Err = CidrError;

    /// Parse a bare address, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse_exact(s.trim())
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::V4(addr)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::from_ipv6(addr, false)
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => a.into(),
            IpAddr::V6(a) => a.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_ip_addr())
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Address) -> bool {
        self.to_ipv6_octets() == other.to_ipv6_octets()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_ipv6_octets().hash(state);
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Address) -> Ordering {
        self.to_ipv6_octets().cmp(&other.to_ipv6_octets())
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Address) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(de::Error::custom)
    }
}

/// Convert a dotted-decimal IPv4 address (or its IPv4-mapped form) to an integer.
pub fn ipv4_to_int(s: &str) -> Result<u32, CidrError> {
    match Address::from_str(s)? {
        Address::V4(a) | Address::Ipv4Mapped(a) => Ok(u32::from(a)),
        _ => Err(CidrError::InvalidAddress(s.to_string())),
    }
}

/// Convert an integer to an IPv4 address.
pub fn ipv4_from_int(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}

/// Signed number of addresses from `src` to `dst`.
///
/// # Examples
/// ```
/// use cidr_calc::models::ipv4_distance;
/// assert_eq!(ipv4_distance("192.168.0.255", "192.168.1.255").unwrap(), 256);
/// ```
pub fn ipv4_distance(src: &str, dst: &str) -> Result<i64, CidrError> {
    let src = ipv4_to_int(src)?;
    let dst = ipv4_to_int(dst)?;
    Ok(dst as i64 - src as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_forms() {
        assert!(matches!(addr("192.168.1.1"), Address::V4(_)));
        assert!(matches!(addr("2001:db8::1"), Address::V6(_)));
        assert!(matches!(addr("::ffff:192.168.1.1"), Address::Ipv4Mapped(_)));
        assert!(matches!(addr("::ffff:c0a8:101"), Address::Ipv4Mapped(_)));
        assert!(matches!(addr("::192.168.1.1"), Address::Ipv4Compatible(_)));
        // Only the dotted spelling marks an IPv4-compatible address.
        assert!(matches!(addr("::c0a8:101"), Address::V6(_)));
        assert!(matches!(addr("::1"), Address::V6(_)));
        assert!(matches!(addr("64:ff9b::1.2.3.4"), Address::V6(_)));
        assert_eq!(
            Address::from_str("300.1.1.1").unwrap_err(),
            CidrError::InvalidAddress("300.1.1.1".to_string())
        );
        assert!(Address::from_str("").is_err());
        assert_eq!(addr(" 10.0.0.1 "), addr("10.0.0.1"));
        assert!(Address::parse_exact(" 10.0.0.1").is_err());
    }

    #[test]
    fn test_bits() {
        assert_eq!(addr("10.0.0.1").bits(), 32);
        assert_eq!(addr("::ffff:10.0.0.1").bits(), 128);
        assert_eq!(addr("::10.0.0.1").bits(), 128);
        assert!(addr("fe80::1").is_ipv6());
        assert!(addr("10.0.0.1").is_ipv4());
    }

    #[test]
    fn test_display() {
        assert_eq!(addr("192.168.1.1").to_string(), "192.168.1.1");
        assert_eq!(addr("::ffff:192.168.1.1").to_string(), "::ffff:192.168.1.1");
        assert_eq!(addr("::192.168.1.0").to_string(), "::c0a8:100");
        assert_eq!(addr("2001:DB8:0:0::1").to_string(), "2001:db8::1");
    }

    #[test]
    fn test_increment_wraps() {
        assert_eq!(addr("0.0.0.0").incremented(), addr("0.0.0.1"));
        assert_eq!(addr("192.168.1.255").incremented(), addr("192.168.2.0"));
        assert_eq!(addr("255.255.255.255").incremented(), addr("0.0.0.0"));
        assert_eq!(addr("::").incremented(), addr("::1"));
        assert_eq!(
            addr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff").incremented(),
            addr("::")
        );
        assert_eq!(addr("2001:db8::ffff").incremented(), addr("2001:db8::1:0"));
    }

    #[test]
    fn test_decrement_wraps() {
        assert_eq!(addr("192.168.2.0").decremented(), addr("192.168.1.255"));
        assert_eq!(addr("0.0.0.0").decremented(), addr("255.255.255.255"));
        assert_eq!(
            addr("::").decremented(),
            addr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff")
        );
    }

    #[test]
    fn test_embedded_forms_keep_their_marker() {
        let top = addr("::ffff:255.255.255.255");
        let wrapped = top.incremented();
        assert!(wrapped.is_ipv4_mapped());
        assert_eq!(wrapped.to_string(), "::ffff:0.0.0.0");

        let bottom = addr("::ffff:0.0.0.0");
        assert!(bottom.decremented().is_ipv4_mapped());
        assert_eq!(bottom.decremented(), top);

        let compat = addr("::255.255.255.255").incremented();
        assert!(compat.is_ipv4_compatible());
        assert_eq!(compat.to_ipv4(), Some(Ipv4Addr::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_in_place_step() {
        let mut a = addr("10.0.0.255");
        a.increment();
        assert_eq!(a, addr("10.0.1.0"));
        a.decrement();
        a.decrement();
        assert_eq!(a, addr("10.0.0.254"));
    }

    #[test]
    fn test_compare() {
        assert!(addr("192.168.1.2") < addr("192.168.1.20"));
        assert!(addr("192.168.1.2") < addr("192.168.1.10"));
        assert_eq!(addr("192.168.1.2").cmp(&addr("192.168.1.2")), Ordering::Equal);
        assert!(addr("192.168.1.2") > addr("192.168.1.1"));
        assert!(addr("2001:db8::") < addr("2001:db8::1"));
        assert!(addr("2001:db8::") > addr("192.168.1.1"));
    }

    #[test]
    fn test_equal_normalizes_ipv4() {
        assert_eq!(addr("192.168.1.1"), addr("::ffff:192.168.1.1"));
        assert_ne!(addr("192.168.1.1"), addr("::192.168.1.1"));
        assert_eq!(addr("::192.168.1.1"), addr("::c0a8:101"));
        assert_ne!(addr("fd00::"), addr("fd00::1"));
    }

    #[test]
    fn test_with_bits_leaves_embedded_range() {
        let mapped = addr("::ffff:10.0.0.1");
        assert!(mapped.with_bits(mapped.to_bits()).is_ipv4_mapped());
        assert!(matches!(mapped.with_bits(0), Address::V6(_)));
    }

    #[test]
    fn test_ipv4_int_conversions() {
        assert_eq!(ipv4_to_int("192.168.1.1").unwrap(), 3232235777);
        assert_eq!(ipv4_to_int("255.255.255.255").unwrap(), 4294967295);
        assert_eq!(ipv4_to_int("0.0.0.0").unwrap(), 0);
        assert!(ipv4_to_int("2001:db8::1").is_err());
        assert_eq!(ipv4_from_int(3232235777).to_string(), "192.168.1.1");
        assert_eq!(ipv4_from_int(0).to_string(), "0.0.0.0");
    }

    #[test]
    fn test_ipv4_distance() {
        assert_eq!(ipv4_distance("192.168.1.0", "192.168.1.1").unwrap(), 1);
        assert_eq!(ipv4_distance("192.168.1.1", "192.168.1.0").unwrap(), -1);
        assert_eq!(ipv4_distance("192.168.0.255", "192.168.1.255").unwrap(), 256);
        assert!(ipv4_distance("192.168.1.0", "nope").is_err());
    }
}
