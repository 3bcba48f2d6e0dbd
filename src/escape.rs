// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time classifier.  Only points whose orbits leave the
//! radius-2 disk contribute to a Buddhabrot; everything else is
//! assumed to be in the Mandelbrot set and thrown away.

use log::trace;
use num::Complex;

/// Iterates a whole batch of points in lockstep and keeps the ones
/// that escape within the budget.
#[derive(Copy, Clone, Debug)]
pub struct EscapeFilter {
    budget: usize,
}

impl EscapeFilter {
    /// A filter allowing `budget` applications of z <- z^2 + c.
    pub fn new(budget: usize) -> Self {
        EscapeFilter { budget }
    }

    /// Returns the parameters of every point that escaped within the
    /// budget, each exactly once.  Iteration starts at z = c rather
    /// than the origin, which saves one step per point.
    pub fn filter(&self, points: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let mut escaped: Vec<Complex<f64>> = vec![];
        let mut active: Vec<(Complex<f64>, Complex<f64>)> =
            points.iter().map(|c| (*c, *c)).collect();

        for i in 0..self.budget {
            if active.is_empty() {
                break;
            }
            let before = escaped.len();
            let mut bounded = Vec::with_capacity(active.len());
            for (c, z) in active.into_iter() {
                let z = z * z + c;
                if z.norm_sqr() >= 4.0 {
                    escaped.push(c);
                } else {
                    bounded.push((c, z));
                }
            }
            active = bounded;
            if i % 100 == 0 || i == self.budget - 1 {
                trace!(
                    "Iteration {}: {} points have escaped!",
                    i,
                    escaped.len() - before
                );
            }
        }
        escaped
    }
}

/// The iteration at which a single point escapes, counting from 1 and
/// starting at z = c, or None if it is still bounded after `budget`
/// iterations.
#[cfg(test)]
pub(crate) fn escape_time(c: Complex<f64>, budget: usize) -> Option<usize> {
    let mut z = c;
    for i in 1..=budget {
        z = z * z + c;
        if z.norm_sqr() >= 4.0 {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Sampler;

    #[test]
    fn three_escapes_on_the_first_iteration() {
        assert_eq!(escape_time(Complex::new(3.0, 0.0), 1), Some(1));
        let filter = EscapeFilter::new(1);
        assert_eq!(filter.filter(&[Complex::new(3.0, 0.0)]), vec![Complex::new(3.0, 0.0)]);
    }

    #[test]
    fn bounded_points_are_discarded() {
        let filter = EscapeFilter::new(500);
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(-1.0, 0.0),
            Complex::new(-0.1, 0.1),
        ];
        assert!(filter.filter(&points).is_empty());
    }

    #[test]
    fn escapers_are_returned_once_each() {
        let filter = EscapeFilter::new(50);
        let points = [
            Complex::new(1.0, 1.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.5, 0.0),
            Complex::new(-2.0, 1.5),
        ];
        let mut escaped = filter.filter(&points);
        escaped.sort_by(|a, b| a.re.partial_cmp(&b.re).unwrap());
        assert_eq!(
            escaped,
            vec![
                Complex::new(-2.0, 1.5),
                Complex::new(0.5, 0.0),
                Complex::new(1.0, 1.0)
            ]
        );
    }

    #[test]
    fn every_survivor_escapes_within_the_budget() {
        let budget = 40;
        let points = Sampler::seeded(3).sample(5000);
        let escaped = EscapeFilter::new(budget).filter(&points);
        assert!(!escaped.is_empty());
        for c in &escaped {
            let steps = escape_time(*c, budget);
            assert!(steps.is_some(), "{} did not escape", c);
        }
        let expected = points
            .iter()
            .filter(|c| escape_time(**c, budget).is_some())
            .count();
        assert_eq!(escaped.len(), expected);
    }

    #[test]
    fn an_empty_set_stays_empty() {
        assert!(EscapeFilter::new(10).filter(&[]).is_empty());
    }
}
