//! Error types for CIDR parsing and block arithmetic.

use thiserror::Error;

/// Errors returned by address and CIDR block operations.
///
/// Every variant describes a defect in the caller's input; nothing here is transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    /// The CIDR text is malformed (missing slash, bad address, bad prefix length).
    #[error("invalid CIDR {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// A target prefix length falls outside `[min, max]`. A computed target may be negative.
    #[error("prefix length /{prefix} must be between /{min} and /{max}")]
    Range { prefix: i32, min: u8, max: u8 },

    /// Splitting would produce more subnets than [`crate::MAX_SUBNET_COUNT`].
    #[error("splitting /{from} into /{to} exceeds the limit of {limit} subnets")]
    LimitExceeded { from: u8, to: u8, limit: usize },

    /// A count that must be a power of two is not.
    #[error("count {0} must be a power of two")]
    Size(u128),

    /// Blocks to merge differ in prefix length or address family.
    #[error("cannot merge {first} with {other}: prefix length or family differs")]
    MixedMask { first: String, other: String },

    /// Blocks to merge leave a gap or overlap.
    #[error("{found} is not contiguous, expected a block starting at {expected}")]
    NonContiguous { expected: String, found: String },

    /// A bare address literal could not be parsed.
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
}

impl CidrError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        CidrError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
