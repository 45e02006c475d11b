// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a run can fail.  None of them are recoverable within a
//! run: a bad configuration stops us before any row is rendered, and
//! a broken exchange means no image at all.

use partition::Partition;

/// Everything that can go wrong between reading the configuration and
/// handing the finished image to the caller.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum RenderError {
    /// The configuration cannot describe a valid run: no workers, more
    /// workers than rows, an empty image, or a view window whose
    /// minimum is not below its maximum.
    #[fail(display = "Configuration error: {}", reason)]
    Configuration {
        /// What was wrong with it.
        reason: String,
    },

    /// A contribution to the exchange was not the size the collector
    /// expected for that rank.  Sizes are in pixels.
    #[fail(
        display = "Partition mismatch: rank {} contributed {} pixels, exchange expected {}",
        rank, actual, expected
    )]
    PartitionMismatch {
        /// The rank whose contribution was rejected.
        rank: usize,
        /// The size the exchange expected.
        expected: usize,
        /// The size actually contributed.
        actual: usize,
    },

    /// A contribution was the right size but rendered for rows other
    /// than the ones its rank owns.
    #[fail(
        display = "Partition mismatch: rank {} rendered rows {:?}, exchange expected {:?}",
        rank, actual, expected
    )]
    RowMismatch {
        /// The rank whose contribution was rejected.
        rank: usize,
        /// The rows the rank owns.
        expected: Partition,
        /// The rows the contribution was rendered for.
        actual: Partition,
    },

    /// One or more participants never reached the exchange, so the
    /// group cannot complete.
    #[fail(
        display = "Synchronization stall: ranks {:?} never completed the exchange",
        missing
    )]
    SynchronizationStall {
        /// The ranks that went missing.
        missing: Vec<usize>,
    },
}

impl RenderError {
    pub(crate) fn configuration<S: Into<String>>(reason: S) -> Self {
        RenderError::Configuration {
            reason: reason.into(),
        }
    }

    /// Stalls are the symptom; a mismatch or bad configuration is
    /// usually the cause.  Used to pick which error to report when
    /// several participants fail at once.
    pub fn is_stall(&self) -> bool {
        match *self {
            RenderError::SynchronizationStall { .. } => true,
            _ => false,
        }
    }
}
