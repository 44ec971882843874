//! Duplicate detection across collections of configs or instances.

use crate::error::SweepError;
use crate::hashable::AsHashable;
use log::debug;
use std::collections::HashSet;

/// Check that no item occurs twice across all `collections`.
///
/// The collections are checked jointly. On the first duplicate this returns
/// `Err(DuplicateConfig)` when `raise_exception` is set and `Ok(false)`
/// otherwise.
pub fn check_unique<'a, T, C>(
    collections: impl IntoIterator<Item = C>,
    raise_exception: bool,
) -> Result<bool, SweepError>
where
    T: AsHashable + 'a,
    C: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    for collection in collections {
        for item in collection {
            if !seen.insert(item.as_hashable()?) {
                if raise_exception {
                    return Err(SweepError::DuplicateConfig {
                        item: item.describe(),
                    });
                }
                debug!("duplicate config found (item={})", item.describe());
                return Ok(false);
            }
        }
    }
    Ok(true)
}
