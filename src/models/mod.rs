//! Address and CIDR block models.
//!
//! This module contains the core value types used throughout the crate:
//! - [`Address`] - family-aware IPv4/IPv6 address
//! - [`Cidr`] - address with a prefix length and its derived ranges

mod address;
mod cidr;

// Re-export public types
pub use address::{
    ipv4_distance, ipv4_from_int, ipv4_to_int, Address, IPV4_BITS, IPV6_BITS,
};
pub use cidr::{get_cidr_mask, Cidr};
