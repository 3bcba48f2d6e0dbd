// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Since the Buddhabrot actually tracks the progress of a complex
//! number as it orbits its way out of the Mandelbrot set, we replay
//! the orbit of every escaping point, map each iterate back to the
//! pixel plane, and increment the pixel the orbit passes through.

use num::Complex;

use crate::histogram::PixelHistogram;
use crate::planes::PlaneMapper;

/// Replays orbits into a histogram.
#[derive(Copy, Clone, Debug)]
pub struct OrbitAccumulator {
    plane: PlaneMapper,
    cap: usize,
}

impl OrbitAccumulator {
    /// An accumulator for a size x size histogram that gives up on any
    /// orbit still bounded after `cap` iterations.
    pub fn new(size: usize, cap: usize) -> Self {
        OrbitAccumulator {
            plane: PlaneMapper::new(size),
            cap,
        }
    }

    /// The replay cap.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Plots the orbit of every point into the histogram and returns
    /// the points that had to be dropped because they never escaped.
    /// A dropped point leaves the histogram untouched.
    pub fn accumulate(
        &self,
        points: &[Complex<f64>],
        histogram: &mut PixelHistogram,
    ) -> Vec<Complex<f64>> {
        assert_eq!(histogram.size(), self.plane.size);
        let mut dropped = vec![];
        let mut visits: Vec<usize> = Vec::with_capacity(self.cap + 1);
        for c in points {
            if self.replay(*c, &mut visits) {
                for offset in &visits {
                    histogram.increment(*offset);
                }
            } else {
                dropped.push(*c);
            }
        }
        dropped
    }

    // Collects the offsets an orbit visits.  Out-of-plane iterates are
    // silently skipped.
    fn replay(&self, c: Complex<f64>, visits: &mut Vec<usize>) -> bool {
        visits.clear();
        let mut z = c;
        if let Some(offset) = self.plane.point_to_offset(&z) {
            visits.push(offset);
        }
        for _ in 0..self.cap {
            z = z * z + c;
            if z.norm_sqr() >= 4.0 {
                return true;
            }
            if let Some(offset) = self.plane.point_to_offset(&z) {
                visits.push(offset);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::EscapeFilter;
    use crate::planes::Pixel;
    use crate::sampler::Sampler;

    impl OrbitAccumulator {
        // The iterates the replay walks through, starting with z = c,
        // or None if the orbit is still bounded at the cap.
        fn orbit(&self, c: Complex<f64>) -> Option<Vec<Complex<f64>>> {
            let mut orbit = vec![c];
            let mut z = c;
            for _ in 0..self.cap {
                z = z * z + c;
                if z.norm_sqr() >= 4.0 {
                    return Some(orbit);
                }
                orbit.push(z);
            }
            None
        }
    }

    #[test]
    fn three_is_a_single_step_orbit() {
        let acc = OrbitAccumulator::new(4, 10);
        assert_eq!(acc.orbit(Complex::new(3.0, 0.0)), Some(vec![Complex::new(3.0, 0.0)]));

        // z = 3 lies off the plane, so nothing is counted.
        let mut histogram = PixelHistogram::new(4);
        let dropped = acc.accumulate(&[Complex::new(3.0, 0.0)], &mut histogram);
        assert!(dropped.is_empty());
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn a_single_step_orbit_hits_its_own_pixel() {
        // 1.5 squared plus 1.5 is 3.75, so only z = c is plotted.
        let acc = OrbitAccumulator::new(4, 10);
        let mut histogram = PixelHistogram::new(4);
        acc.accumulate(&[Complex::new(1.5, 0.0)], &mut histogram);
        assert_eq!(histogram.total(), 1);
        assert_eq!(histogram[Pixel(3, 2)], 1);
    }

    #[test]
    fn orbits_plot_every_bounded_iterate() {
        // 0.5 -> 0.75 -> 1.0625 -> 1.62890625 -> escape
        let acc = OrbitAccumulator::new(8, 50);
        let mut histogram = PixelHistogram::new(8);
        acc.accumulate(&[Complex::new(0.5, 0.0)], &mut histogram);
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram[Pixel(5, 4)], 2);
        assert_eq!(histogram[Pixel(6, 4)], 1);
        assert_eq!(histogram[Pixel(7, 4)], 1);
    }

    #[test]
    fn bounded_points_are_dropped_not_counted() {
        let acc = OrbitAccumulator::new(4, 100);
        let mut histogram = PixelHistogram::new(4);
        let dropped = acc.accumulate(
            &[Complex::new(0.0, 0.0), Complex::new(1.5, 0.0)],
            &mut histogram,
        );
        assert_eq!(dropped, vec![Complex::new(0.0, 0.0)]);
        assert_eq!(histogram.total(), 1);
        assert_eq!(acc.orbit(Complex::new(0.0, 0.0)), None);
    }

    #[test]
    fn replays_are_deterministic() {
        let points = EscapeFilter::new(100).filter(&Sampler::seeded(11).sample(2000));
        let acc = OrbitAccumulator::new(16, 100);
        let mut first = PixelHistogram::new(16);
        let mut second = PixelHistogram::new(16);
        acc.accumulate(&points, &mut first);
        acc.accumulate(&points, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn partial_histograms_merge_to_the_whole() {
        let points = EscapeFilter::new(200).filter(&Sampler::seeded(5).sample(3000));
        let acc = OrbitAccumulator::new(16, 200);

        let mut whole = PixelHistogram::new(16);
        assert!(acc.accumulate(&points, &mut whole).is_empty());

        let mut merged = PixelHistogram::new(16);
        for chunk in points.chunks(7).rev() {
            let mut part = PixelHistogram::new(16);
            acc.accumulate(chunk, &mut part);
            merged.merge(&part);
        }
        assert_eq!(whole, merged);
        assert!(whole.total() > 0);
    }
}
