// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of the renderer.

use failure::Fail;
use num::Complex;

use crate::config::Channel;

/// Everything that can stop a render, or a channel of a render.
#[derive(Debug, Fail)]
pub enum NebulaError {
    /// The configuration cannot describe a render.  Raised before any
    /// sampling starts.
    #[fail(display = "Invalid configuration: {}", _0)]
    InvalidConfiguration(String),

    /// No orbit of the channel ever landed on the image, so there is
    /// no maximum to scale against.
    #[fail(display = "The {} channel histogram is empty; nothing to normalize", channel)]
    DegenerateHistogram {
        /// The channel whose histogram was all zeros.
        channel: Channel,
    },

    /// A point the escape filter passed along did not escape within the
    /// replay cap.  The point is dropped from the histogram.
    #[fail(
        display = "Orbit of {} did not escape within {} iterations ({} channel, pass {})",
        point, cap, channel, pass
    )]
    NonEscapingOrbit {
        /// The channel being accumulated.
        channel: Channel,
        /// The pass, counted from 1.
        pass: usize,
        /// The offending parameter.
        point: Complex<f64>,
        /// The replay cap that was exceeded.
        cap: usize,
    },

    /// The sample buffer and the declared image shape disagree.
    #[fail(display = "Expected {} samples for the image, found {}", expected, found)]
    ImageShape {
        /// Samples required by width, height and channel count.
        expected: usize,
        /// Samples actually supplied.
        found: usize,
    },

    /// The image encoder or decoder failed.
    #[fail(display = "Image error: {}", _0)]
    Image(#[cause] image::ImageError),

    /// A PNG could not be decoded.
    #[fail(display = "PNG error: {}", _0)]
    Png(#[cause] png::DecodingError),

    /// The output file could not be written.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] std::io::Error),
}

impl From<image::ImageError> for NebulaError {
    fn from(err: image::ImageError) -> Self {
        NebulaError::Image(err)
    }
}

impl From<png::DecodingError> for NebulaError {
    fn from(err: png::DecodingError) -> Self {
        NebulaError::Png(err)
    }
}

impl From<std::io::Error> for NebulaError {
    fn from(err: std::io::Error) -> Self {
        NebulaError::Io(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, NebulaError>;
