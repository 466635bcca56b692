//! Display ordering for the catalog.
//!
//! New uploads are appended after the current record count, one slot per
//! accepted file in submission order. Explicit reorders assign each listed id
//! its index in the request; ids left out keep whatever `order` they had, so a
//! partial reorder can leave duplicate values behind. Listings always break
//! ties by id ascending, which keeps them deterministic regardless.

use std::collections::HashSet;

use crate::{
    domain::image::ImageId,
    error::{GalleryError, Result},
};

/// Target `order` for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAssignment {
    pub id: ImageId,
    pub order: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderingPolicy;

impl OrderingPolicy {
    /// Order for the `index`-th accepted file of a batch whose first slot is
    /// `base` (the catalog count observed before the batch).
    ///
    /// Concurrent batches may observe the same base; the id tie-break keeps
    /// the listing stable when that happens.
    pub fn append_order(base: i64, index: usize) -> i64 {
        base.saturating_add(i64::try_from(index).unwrap_or(i64::MAX))
    }

    /// Turn a requested id sequence into per-record assignments.
    ///
    /// Fails with `Validation` on duplicate ids and with `NotFound` on ids the
    /// catalog does not know, before anything is written.
    pub fn plan_reorder(
        requested: &[ImageId],
        known: &HashSet<ImageId>,
    ) -> Result<Vec<OrderAssignment>> {
        let mut seen = HashSet::with_capacity(requested.len());
        for id in requested {
            if !seen.insert(*id) {
                return Err(GalleryError::Validation(format!(
                    "image {id} appears more than once in the reorder request"
                )));
            }
        }

        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !known.contains(id))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(GalleryError::NotFound(format!(
                "images {}",
                missing.join(", ")
            )));
        }

        Ok(requested
            .iter()
            .enumerate()
            .map(|(position, id)| OrderAssignment {
                id: *id,
                order: Self::append_order(0, position),
            })
            .collect())
    }
}
