//! Splitting a block into equal child blocks.

use crate::error::CidrError;
use crate::models::Cidr;
use serde::{Deserialize, Serialize};

/// Largest number of child blocks a single split may produce.
pub const MAX_SUBNET_COUNT: usize = 65536;

/// How the target prefix length of a split is chosen.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubnetMethod {
    /// Split into this many subnets (a power of two).
    SubnetCount(u128),
    /// Split into subnets holding this many addresses each (a power of two).
    HostCount(u128),
    /// Split into subnets of this prefix length.
    PrefixLen(u8),
}

/// `log2(n)` for a power of two, `Size` error otherwise.
fn power_of_two_log2(n: u128) -> Result<u32, CidrError> {
    if n.is_power_of_two() {
        Ok(n.trailing_zeros())
    } else {
        Err(CidrError::Size(n))
    }
}

/// Resolve `method` to a target prefix length, checked against `cidr`.
fn target_prefix_len(cidr: &Cidr, method: SubnetMethod) -> Result<u8, CidrError> {
    let current = cidr.prefix_len() as i32;
    let bits = cidr.bits() as i32;

    let target = match method {
        SubnetMethod::SubnetCount(n) => current + power_of_two_log2(n)? as i32,
        SubnetMethod::HostCount(n) => bits - power_of_two_log2(n)? as i32,
        SubnetMethod::PrefixLen(len) => len as i32,
    };

    if target < current || target > bits {
        return Err(CidrError::Range {
            prefix: target,
            min: cidr.prefix_len(),
            max: cidr.bits(),
        });
    }
    Ok(target as u8)
}

impl Cidr {
    /// Split this block into `2^(p2 - p1)` equal children in ascending order.
    ///
    /// # Examples
    /// ```
    /// use cidr_calc::{Cidr, SubnetMethod};
    /// let subnets = Cidr::new("192.168.1.0/24")
    ///     .unwrap()
    ///     .subnetting(SubnetMethod::SubnetCount(4))
    ///     .unwrap();
    /// assert_eq!(subnets[1].to_string(), "192.168.1.64/26");
    /// ```
    pub fn subnetting(&self, method: SubnetMethod) -> Result<Vec<Cidr>, CidrError> {
        let target = target_prefix_len(self, method)?;
        let split_bits = (target - self.prefix_len()) as u32;
        if split_bits > MAX_SUBNET_COUNT.trailing_zeros() {
            return Err(CidrError::LimitExceeded {
                from: self.prefix_len(),
                to: target,
                limit: MAX_SUBNET_COUNT,
            });
        }
        let count = 1usize << split_bits;
        log::debug!("subnetting {} into {count} x /{target} ({method:?})", self);

        let mut subnets = Vec::with_capacity(count);
        let mut network = self.network();
        for _ in 0..count {
            let subnet = Cidr::from_address(network, target)?;
            log::trace!("  subnet {subnet}");
            network = subnet.end().incremented();
            subnets.push(subnet);
        }
        Ok(subnets)
    }
}
