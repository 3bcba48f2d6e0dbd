// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Linear scaling of a channel histogram onto the 16-bit sample range.

use crate::config::Channel;
use crate::error::{NebulaError, Result};
use crate::histogram::PixelHistogram;

/// The brightest possible 16-bit sample.
pub const SAMPLE_MAX: u16 = 65535;

/// Scales every counter so the busiest pixel becomes `SAMPLE_MAX`.
/// An all-zero histogram has nothing to scale against and is refused.
pub fn normalize(histogram: &PixelHistogram, channel: Channel) -> Result<Vec<u16>> {
    let maxi = histogram.max();
    if maxi == 0 {
        return Err(NebulaError::DegenerateHistogram { channel });
    }
    let maxi = maxi as f64;
    Ok(histogram
        .counts()
        .iter()
        .map(|count| (*count as f64 / maxi * f64::from(SAMPLE_MAX)).floor() as u16)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_busiest_pixel_is_full_scale() {
        let mut histogram = PixelHistogram::new(2);
        for offset in &[0, 0, 0, 1, 3, 3] {
            histogram.increment(*offset);
        }
        let scaled = normalize(&histogram, Channel::Red).unwrap();
        assert_eq!(scaled, vec![65535, 21845, 0, 43690]);
        assert_eq!(*scaled.iter().max().unwrap(), SAMPLE_MAX);
    }

    #[test]
    fn values_are_floored() {
        let mut histogram = PixelHistogram::new(2);
        for offset in &[0, 0, 0, 0, 0, 0, 0, 1] {
            histogram.increment(*offset);
        }
        // 65535 / 7 = 9362.14...
        let scaled = normalize(&histogram, Channel::Green).unwrap();
        assert_eq!(scaled[1], 9362);
    }

    #[test]
    fn an_empty_histogram_is_degenerate() {
        match normalize(&PixelHistogram::new(3), Channel::Blue) {
            Err(NebulaError::DegenerateHistogram { channel }) => assert_eq!(channel, Channel::Blue),
            other => panic!("unexpected {:?}", other),
        }
    }
}
