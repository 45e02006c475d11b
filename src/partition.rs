// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits the rows of the image among the workers.
//!
//! Every worker gets `height / workers` contiguous rows, in rank
//! order; the last worker also picks up the remainder.  The split is a
//! pure function of rank and size, so nobody has to talk to anybody to
//! agree on it.

use errors::RenderError;
use std::ops::Range;

/// A half-open range of rows, `start..end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    /// First row owned.
    pub start: usize,
    /// One past the last row owned.
    pub end: usize,
}

impl Partition {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the partition owns no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The rows, as a range.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Confirms that `workers` can share `height` rows with every worker
/// getting at least one.
pub fn validate(height: usize, workers: usize) -> Result<(), RenderError> {
    if workers == 0 {
        return Err(RenderError::configuration(
            "The worker count must be at least 1.",
        ));
    }
    if workers > height {
        return Err(RenderError::configuration(format!(
            "The worker count ({}) must not exceed the image height ({}).",
            workers, height
        )));
    }
    Ok(())
}

/// The rows owned by `rank` when `height` rows are split among
/// `workers`.
pub fn partition(height: usize, workers: usize, rank: usize) -> Result<Partition, RenderError> {
    validate(height, workers)?;
    if rank >= workers {
        return Err(RenderError::configuration(format!(
            "Rank {} is outside a group of {} workers.",
            rank, workers
        )));
    }

    let rows = height / workers;
    let start = rank * rows;
    let end = if rank == workers - 1 {
        height
    } else {
        (rank + 1) * rows
    };
    Ok(Partition { start, end })
}

/// All of the partitions, in rank order.
pub fn partitions(height: usize, workers: usize) -> Result<Vec<Partition>, RenderError> {
    validate(height, workers)?;
    (0..workers)
        .map(|rank| partition(height, workers, rank))
        .collect()
}
