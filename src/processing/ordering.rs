//! Sorting of CIDR block collections.

use crate::models::Cidr;
use serde::{Deserialize, Serialize};

/// Direction for [`sort_cidrs`].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sort by network address, then prefix length, in the given direction.
pub fn sort_cidrs(cidrs: &mut [Cidr], order: SortOrder) {
    match order {
        SortOrder::Asc => cidrs.sort(),
        SortOrder::Desc => cidrs.sort_by(|a, b| b.cmp(a)),
    }
}

/// Ascending: lower network first, shorter prefix first for equal networks.
pub fn sort_cidrs_asc(cidrs: &mut [Cidr]) {
    sort_cidrs(cidrs, SortOrder::Asc);
}

/// Descending: higher network first, longer prefix first for equal networks.
pub fn sort_cidrs_desc(cidrs: &mut [Cidr]) {
    sort_cidrs(cidrs, SortOrder::Desc);
}
