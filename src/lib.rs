//! CIDR block arithmetic for IPv4 and IPv6.
//!
//! Parse `address/prefix` text into a [`Cidr`], derive its network, end address and
//! count, walk its addresses, split it into equal subnets, or merge contiguous siblings
//! back into their parent.
//!
//! ```
//! use cidr_calc::{supernetting, Cidr, SubnetMethod};
//!
//! let block: Cidr = "192.168.1.0/24".parse().unwrap();
//! let subnets = block.subnetting(SubnetMethod::SubnetCount(4)).unwrap();
//! let texts: Vec<String> = subnets.iter().map(|c| c.to_string()).collect();
//! assert_eq!(texts[3], "192.168.1.192/26");
//! assert_eq!(supernetting(&texts).unwrap(), block);
//! ```

pub mod error;
pub mod models;
pub mod processing;

pub use error::CidrError;
pub use models::{Address, Cidr};
pub use processing::{
    sort_cidrs, sort_cidrs_asc, sort_cidrs_desc, supernet_blocks, supernetting, Addresses,
    SortOrder, SubnetMethod, MAX_SUBNET_COUNT,
};
