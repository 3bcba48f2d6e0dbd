// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The orbit density histogram.  One per channel; it only ever grows.

use std::ops::Index;

use crate::planes::Pixel;

/// A size x size grid of visit counters, stored row-major.  The
/// default histogram has no cells at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelHistogram {
    size: usize,
    counts: Vec<u64>,
}

impl PixelHistogram {
    /// An empty histogram.
    pub fn new(size: usize) -> Self {
        PixelHistogram {
            size,
            counts: vec![0 as u64; size * size],
        }
    }

    /// Edge length, in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The raw counters.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts a single visit at a row-major offset.
    #[inline]
    pub fn increment(&mut self, offset: usize) {
        self.counts[offset] += 1;
    }

    /// Resets every counter to zero.
    pub fn clear(&mut self) {
        for count in self.counts.iter_mut() {
            *count = 0;
        }
    }

    /// The largest counter, or zero for an empty histogram.
    pub fn max(&self) -> u64 {
        self.counts.iter().cloned().max().unwrap_or(0)
    }

    /// Total number of recorded visits.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds another histogram into this one, cell by cell.  The order
    /// in which partial histograms are merged never matters.
    pub fn merge(&mut self, other: &PixelHistogram) {
        assert_eq!(self.size, other.size, "cannot merge histograms of different sizes");
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += *theirs;
        }
    }
}

impl Index<Pixel> for PixelHistogram {
    type Output = u64;

    fn index(&self, pixel: Pixel) -> &u64 {
        &self.counts[pixel.0 * self.size + pixel.1]
    }
}
