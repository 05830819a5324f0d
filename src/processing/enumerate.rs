//! Ordered walk over the addresses of a block.

use crate::error::CidrError;
use crate::models::{Address, Cidr};
use std::iter::FusedIterator;
use std::str::FromStr;

/// Iterator over the addresses of a [`Cidr`], from a start address up to its end address.
///
/// The end address is checked before stepping, so a block that reaches the top of the
/// address space never wraps around.
#[derive(Debug, Clone)]
pub struct Addresses {
    next: Option<Address>,
    end: Address,
}

impl Iterator for Addresses {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        let current = self.next?;
        if current == self.end {
            self.next = None;
        } else if let Some(next) = self.next.as_mut() {
            next.increment();
        }
        Some(current)
    }
}

impl FusedIterator for Addresses {}

impl Cidr {
    /// All addresses of the block in ascending order, starting at the network address.
    pub fn iter(&self) -> Addresses {
        Addresses {
            next: Some(self.network()),
            end: self.end(),
        }
    }

    /// Addresses from `begin` up to the end of the block; empty if `begin` is outside it.
    ///
    /// `begin` is restated in the block's own form, so stepping follows the block rather
    /// than the spelling of the start address.
    pub fn iter_from(&self, begin: Address) -> Addresses {
        let value = if self.is_ipv4() {
            begin.to_bits()
        } else {
            u128::from_be_bytes(begin.to_ipv6_octets())
        };
        Addresses {
            next: self
                .contains(&begin)
                .then(|| self.block_address(value)),
            end: self.end(),
        }
    }

    /// Call `iterator` with each address until it returns `false` or the block is exhausted.
    pub fn each<F>(&self, iterator: F)
    where
        F: FnMut(Address) -> bool,
    {
        walk(self.iter(), iterator);
    }

    /// Like [`Cidr::each`], starting from the textual address `begin`.
    pub fn each_from<F>(&self, begin: &str, iterator: F) -> Result<(), CidrError>
    where
        F: FnMut(Address) -> bool,
    {
        let begin = Address::from_str(begin)?;
        log::trace!("each_from({begin}) over {}", self);
        walk(self.iter_from(begin), iterator);
        Ok(())
    }
}

impl IntoIterator for &Cidr {
    type Item = Address;
    type IntoIter = Addresses;

    fn into_iter(self) -> Addresses {
        self.iter()
    }
}

fn walk<F>(addresses: Addresses, mut iterator: F)
where
    F: FnMut(Address) -> bool,
{
    for addr in addresses {
        if !iterator(addr) {
            break;
        }
    }
}
