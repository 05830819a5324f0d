//! CIDR block value and its derived ranges.
//!
//! Provides [`Cidr`] for representing an IPv4 or IPv6 address with a prefix length,
//! along with [`get_cidr_mask`] for turning a prefix length into a network mask.

use super::address::{Address, IPV4_BITS, IPV6_BITS};
use crate::error::CidrError;
use num_bigint::BigUint;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Offset between an IPv4-mapped prefix length and its plain IPv4 equivalent.
const MAPPED_PREFIX_LEN: u8 = IPV6_BITS - IPV4_BITS;

/// `n` low bits set.
fn low_ones(n: u8) -> u128 {
    if n >= IPV6_BITS {
        u128::MAX
    } else {
        (1u128 << n) - 1
    }
}

/// Convert a prefix length to a network mask within a `bits`-wide family.
///
/// # Examples
/// ```
/// use cidr_calc::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24, 32).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8, bits: u8) -> Result<u128, CidrError> {
    if len > bits {
        Err(CidrError::Range {
            prefix: len as i32,
            min: 0,
            max: bits,
        })
    } else {
        Ok(low_ones(bits) & !low_ones(bits - len))
    }
}

/// An address together with a prefix length.
///
/// The address is kept as given; [`Cidr::network`] reports it with host bits cleared.
#[derive(Debug, Copy, Clone)]
pub struct Cidr {
    addr: Address,
    mask: u8,
}

impl Cidr {
    /// Create a new [`Cidr`] from CIDR text (e.g., "10.0.0.0/24" or "2001:db8::/32").
    pub fn new(addr_cidr: &str) -> Result<Cidr, CidrError> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(CidrError::parse(addr_cidr, "expected address/prefix-length"));
        }
        let addr = Address::parse_exact(parts[0])
            .map_err(|_| CidrError::parse(addr_cidr, format!("invalid address {}", parts[0])))?;

        let len_str = parts[1];
        if len_str.is_empty() || !len_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CidrError::parse(
                addr_cidr,
                format!("invalid prefix length {len_str}"),
            ));
        }
        let mask = len_str
            .parse::<u8>()
            .ok()
            .filter(|m| *m <= addr.bits())
            .ok_or_else(|| {
                CidrError::parse(
                    addr_cidr,
                    format!("prefix length {len_str} exceeds {}", addr.bits()),
                )
            })?;

        Ok(Cidr { addr, mask })
    }

    /// Best-effort parse for input that was already validated; errors become `None`.
    pub fn parse_lossy(addr_cidr: &str) -> Option<Cidr> {
        match Cidr::new(addr_cidr) {
            Ok(cidr) => Some(cidr),
            Err(e) => {
                log::debug!("parse_lossy discarded: {e}");
                None
            }
        }
    }

    /// Build a block from an address and prefix length.
    pub fn from_address(addr: Address, mask: u8) -> Result<Cidr, CidrError> {
        if mask > addr.bits() {
            return Err(CidrError::Range {
                prefix: mask as i32,
                min: 0,
                max: addr.bits(),
            });
        }
        Ok(Cidr { addr, mask })
    }

    /// The address as originally given, host bits included.
    pub fn ip(&self) -> Address {
        self.addr
    }

    /// The prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.mask
    }

    /// Family width in bits, 32 or 128.
    pub fn bits(&self) -> u8 {
        self.addr.bits()
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    /// 128-bit, including the IPv4-mapped and IPv4-compatible forms.
    pub fn is_ipv6(&self) -> bool {
        self.addr.is_ipv6()
    }

    /// 128-bit and neither IPv4-mapped nor IPv4-compatible.
    pub fn is_pure_ipv6(&self) -> bool {
        matches!(self.addr, Address::V6(_))
    }

    fn host_bits(&self) -> u8 {
        self.bits() - self.mask
    }

    fn mask_bits(&self) -> u128 {
        low_ones(self.bits()) & !low_ones(self.host_bits())
    }

    /// The network mask as an address (e.g., `255.255.255.0`, `ffff:ffff:ffff:ffff::`).
    pub fn netmask(&self) -> Address {
        match self.addr {
            Address::V4(_) => Address::V4((self.mask_bits() as u32).into()),
            _ => Address::V6(self.mask_bits().into()),
        }
    }

    /// An address of this block's family for `value`.
    ///
    /// A block shorter than /96 spans more than one embedded IPv4 range, so its
    /// addresses are plain IPv6.
    pub(crate) fn block_address(&self, value: u128) -> Address {
        match self.addr {
            Address::Ipv4Mapped(_) | Address::Ipv4Compatible(_)
                if self.mask < MAPPED_PREFIX_LEN =>
            {
                Address::V6(value.into())
            }
            addr => addr.with_bits(value),
        }
    }

    /// Get the lowest (network) address in the block.
    pub fn network(&self) -> Address {
        self.block_address(self.addr.to_bits() & self.mask_bits())
    }

    /// Get the highest address in the block (all host bits set).
    pub fn end(&self) -> Address {
        self.block_address(self.addr.to_bits() | low_ones(self.host_bits()))
    }

    /// Alias of [`Cidr::network`].
    pub fn lo(&self) -> Address {
        self.network()
    }

    /// Alias of [`Cidr::end`].
    pub fn hi(&self) -> Address {
        self.end()
    }

    /// First and last address of the block.
    pub fn ip_range(&self) -> (Address, Address) {
        (self.network(), self.end())
    }

    /// Broadcast address; only IPv4 and IPv4-mapped blocks have one.
    pub fn broadcast(&self) -> Option<Address> {
        if self.is_ipv4() || self.network().is_ipv4_mapped() {
            Some(self.end())
        } else {
            None
        }
    }

    /// The address after the network address, for blocks holding at least two addresses.
    pub fn gateway(&self) -> Option<Address> {
        if self.host_bits() == 0 {
            None
        } else {
            Some(self.network().incremented())
        }
    }

    /// Number of addresses in the block, `2^(bits - prefix_len)`.
    pub fn ip_count(&self) -> BigUint {
        BigUint::from(1u8) << self.host_bits() as usize
    }

    fn ipv4_family(addr: &Address) -> bool {
        matches!(addr, Address::V4(_) | Address::Ipv4Mapped(_))
    }

    /// Whether `addr` falls inside this block. IPv4 and IPv4-mapped count as one family.
    pub fn contains(&self, addr: &Address) -> bool {
        let same_family = self.bits() == addr.bits()
            || (Cidr::ipv4_family(&self.addr) && Cidr::ipv4_family(addr));
        if !same_family {
            return false;
        }
        // Compare in the normalized 16-byte space.
        let len = match self.addr {
            Address::V4(_) => self.mask + MAPPED_PREFIX_LEN,
            _ => self.mask,
        };
        let mask = !low_ones(IPV6_BITS - len);
        let net = u128::from_be_bytes(self.network().to_ipv6_octets());
        let other = u128::from_be_bytes(addr.to_ipv6_octets());
        other & mask == net
    }

    /// Textual [`Cidr::contains`]; an unparsable address is never contained.
    pub fn contains_str(&self, addr: &str) -> bool {
        Address::from_str(addr)
            .map(|a| self.contains(&a))
            .unwrap_or(false)
    }

    /// Same network, prefix length and family width as `other`.
    ///
    /// `192.168.1.0/24` and `::ffff:192.168.1.0/120` are not equal here; see
    /// [`Cidr::equal_fold`].
    pub fn equal(&self, other: &str) -> bool {
        Cidr::new(other).map(|c| *self == c).unwrap_or(false)
    }

    /// Same canonical text as `other`, which folds IPv4-mapped blocks onto IPv4.
    pub fn equal_fold(&self, other: &str) -> bool {
        Cidr::new(other)
            .map(|c| self.to_string() == c.to_string())
            .unwrap_or(false)
    }

    /// The equal-sized block that follows this one, `None` past the end of the family.
    pub fn next_sibling(&self) -> Option<Cidr> {
        let next = self.end().to_bits().checked_add(1)?;
        if next > low_ones(self.bits()) {
            return None;
        }
        Some(Cidr {
            addr: self.addr.with_bits(next),
            mask: self.mask,
        })
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cidr::new(s)
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.network() {
            Address::Ipv4Mapped(v4) if self.mask >= MAPPED_PREFIX_LEN => {
                write!(f, "{}/{}", v4, self.mask - MAPPED_PREFIX_LEN)
            }
            network => write!(f, "{}/{}", network, self.mask),
        }
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(de::Error::custom)
    }
}

impl PartialEq for Cidr {
    fn eq(&self, other: &Cidr) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cidr {}

impl Hash for Cidr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.network().hash(state);
        self.mask.hash(state);
        self.bits().hash(state);
    }
}

impl Ord for Cidr {
    /// Network address, then prefix length (shorter first), then family width.
    fn cmp(&self, other: &Cidr) -> Ordering {
        self.network()
            .cmp(&other.network())
            .then(self.mask.cmp(&other.mask))
            .then(self.bits().cmp(&other.bits()))
    }
}

impl PartialOrd for Cidr {
    fn partial_cmp(&self, other: &Cidr) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
