//! Block arithmetic over [`crate::models::Cidr`].
//!
//! This module contains the algorithms that operate on blocks:
//! - [`enumerate`] - walking the addresses of a block
//! - [`subnetting`] - splitting a block into equal children
//! - [`supernetting`](mod@supernetting) - merging contiguous siblings into their parent
//! - [`ordering`] - sorting block collections

pub mod enumerate;
pub mod ordering;
pub mod subnetting;
pub mod supernetting;

// Re-export public functions
pub use enumerate::Addresses;
pub use ordering::{sort_cidrs, sort_cidrs_asc, sort_cidrs_desc, SortOrder};
pub use subnetting::{SubnetMethod, MAX_SUBNET_COUNT};
pub use supernetting::{supernet_blocks, supernetting};
