// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Random candidate points for the escape filter.
//!
//! Most of the area of the Mandelbrot set is covered by its two
//! largest shapes, the main cardioid and the period-2 bulb.  Points
//! inside either never escape, so there is no reason to iterate them;
//! both shapes have closed-form membership tests and the sampler
//! throws those points away before anybody spends time on them.

use log::debug;
use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::planes::{LEFTLOWER, RIGHTUPPER};

const D16: f64 = 1.0 / 16.0;

/// True if the point lies outside the main cardioid: its magnitude
/// exceeds the magnitude of the cardioid boundary at the same angle.
pub fn outside_cardioid(c: Complex<f64>) -> bool {
    let phi = c.arg();
    let edge = Complex::new(phi.cos(), phi.sin());
    let boundary = edge / 2.0 - edge * edge / 4.0;
    c.norm() > boundary.norm()
}

/// True if the point lies outside the period-2 bulb, the disk of
/// radius 1/4 around -1.
pub fn outside_bulb(c: Complex<f64>) -> bool {
    (c.re + 1.0) * (c.re + 1.0) + c.im * c.im > D16
}

/// False when the point is guaranteed to be inside the Mandelbrot
/// set.  True does not guarantee the point is outside; points near
/// the border still have to be iterated.
pub fn maybe_outside(c: Complex<f64>) -> bool {
    outside_cardioid(c) && outside_bulb(c)
}

/// Draws uniformly distributed candidates from the [-2, 2) x [-2, 2)
/// square of the complex plane.
pub struct Sampler {
    rng: StdRng,
    re: Uniform<f64>,
    im: Uniform<f64>,
}

impl Sampler {
    /// A sampler seeded from the operating system.
    pub fn new() -> Self {
        Sampler::from_rng(StdRng::from_entropy())
    }

    /// A reproducible sampler.
    pub fn seeded(seed: u64) -> Self {
        Sampler::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Sampler {
            rng,
            re: Uniform::new(LEFTLOWER.re, RIGHTUPPER.re),
            im: Uniform::new(LEFTLOWER.im, RIGHTUPPER.im),
        }
    }

    /// One unfiltered candidate.
    pub fn candidate(&mut self) -> Complex<f64> {
        let re = self.re.sample(&mut self.rng);
        let im = self.im.sample(&mut self.rng);
        Complex::new(re, im)
    }

    /// Draws `count` candidates and keeps the ones that may lie outside
    /// the set.  The result never holds more than `count` points.
    pub fn sample(&mut self, count: usize) -> Vec<Complex<f64>> {
        let candidates: Vec<Complex<f64>> = (0..count).map(|_| self.candidate()).collect();

        let candidates: Vec<Complex<f64>> = candidates
            .into_iter()
            .filter(|c| outside_cardioid(*c))
            .collect();
        debug!("{} points remain after filtering the cardioid", candidates.len());

        let candidates: Vec<Complex<f64>> = candidates
            .into_iter()
            .filter(|c| outside_bulb(*c))
            .collect();
        debug!(
            "{} points remain after filtering the period-2 bulb",
            candidates.len()
        );
        candidates
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler::new()
    }
}
