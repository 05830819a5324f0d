//! Merging contiguous sibling blocks into their parent.

use super::ordering::sort_cidrs_asc;
use crate::error::CidrError;
use crate::models::Cidr;
use itertools::Itertools;

/// Merge textual CIDR blocks into their common parent.
///
/// The inputs must be a power-of-two number of blocks with the same prefix length and
/// family that tile one contiguous range. Input order does not matter.
///
/// # Examples
/// ```
/// use cidr_calc::supernetting;
/// let parent = supernetting(&["10.0.0.128/25", "10.0.0.0/25"]).unwrap();
/// assert_eq!(parent.to_string(), "10.0.0.0/24");
/// ```
pub fn supernetting<S: AsRef<str>>(ns: &[S]) -> Result<Cidr, CidrError> {
    if !ns.len().is_power_of_two() {
        return Err(CidrError::Size(ns.len() as u128));
    }
    let cidrs = ns
        .iter()
        .map(|n| Cidr::new(n.as_ref()))
        .collect::<Result<Vec<Cidr>, CidrError>>()?;
    supernet_blocks(cidrs)
}

/// [`supernetting`] over blocks that are already parsed.
pub fn supernet_blocks(mut cidrs: Vec<Cidr>) -> Result<Cidr, CidrError> {
    let count = cidrs.len();
    if !count.is_power_of_two() {
        return Err(CidrError::Size(count as u128));
    }

    let first = cidrs[0];
    if let Some(other) = cidrs
        .iter()
        .find(|c| c.prefix_len() != first.prefix_len() || c.bits() != first.bits())
    {
        log::debug!("supernetting rejected {other}: differs from {first}");
        return Err(CidrError::MixedMask {
            first: first.to_string(),
            other: other.to_string(),
        });
    }

    let merge_bits = count.trailing_zeros();
    let mask = first.prefix_len() as i32 - merge_bits as i32;
    if mask < 0 {
        return Err(CidrError::Range {
            prefix: mask,
            min: 0,
            max: first.bits(),
        });
    }
    let mask = mask as u8;

    sort_cidrs_asc(&mut cidrs);

    for (prev, next) in cidrs.iter().tuple_windows() {
        let expected = prev.next_sibling().map(|sibling| sibling.network());
        if expected != Some(next.network()) {
            log::debug!("supernetting gap or overlap: {prev} then {next}");
            let expected = expected.unwrap_or_else(|| prev.end().incremented());
            return Err(CidrError::NonContiguous {
                expected: expected.to_string(),
                found: next.to_string(),
            });
        }
    }

    let lowest = cidrs[0];
    let widened = Cidr::from_address(lowest.network(), mask)?;
    // Clear the bits that became host bits under the shorter mask.
    let parent = Cidr::from_address(widened.network(), mask)?;
    log::debug!("supernetting {count} x /{} -> {parent}", lowest.prefix_len());
    Ok(parent)
}
