#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Nebulabrot renderer
//!
//! The Buddhabrot is a variant of the Mandelbrot set that explores
//! what happens to the points *outside* the black heart.  Rather than
//! coloring each point by how quickly it escapes, we pick random
//! points, keep the ones that escape, and replay their orbits: every
//! iterate is itself a coordinate on the complex plane, and by mapping
//! it to the nearest pixel and incrementing that pixel by one we build
//! a density map of all the escaping orbits.
//!
//! The Nebulabrot does this three times with three different
//! iteration budgets and uses the three density maps as the color
//! channels of one image.  Long budgets pick out the fine filaments;
//! short ones give the soft glow.
//!
//! The pipeline, per channel and per pass:
//!
//! * `Sampler` draws candidates and discards the ones trivially inside
//!   the set,
//! * `EscapeFilter` keeps the candidates that escape within the budget,
//! * `OrbitAccumulator` replays those orbits into a `PixelHistogram`,
//!
//! and the `Compositor` runs all of it on a worker pool, after which
//! the histograms are normalized and interleaved into a `FinalImage`.

pub mod assemble;
pub mod compositor;
pub mod config;
pub mod error;
pub mod escape;
pub mod histogram;
pub mod normalize;
pub mod orbit;
pub mod planes;
pub mod sampler;

pub use crate::assemble::{assemble, FinalImage};
pub use crate::compositor::{ChannelReport, Compositor, Nebula};
pub use crate::config::{Channel, ChannelConfig, ChannelOrder, NebulaConfig};
pub use crate::error::{NebulaError, Result};
pub use crate::escape::EscapeFilter;
pub use crate::histogram::PixelHistogram;
pub use crate::orbit::OrbitAccumulator;
pub use crate::sampler::Sampler;
