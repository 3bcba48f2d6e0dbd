// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render configuration.  Every knob the renderer has lives in a
//! `NebulaConfig`, which is checked once with `validate()` before any
//! work starts.

use std::fmt;
use std::str::FromStr;

use crate::error::{NebulaError, Result};

/// The three logical color channels of a Nebulabrot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Conventionally the deepest iteration budget.
    Red,
    /// The middle budget.
    Green,
    /// Conventionally the shallowest budget.
    Blue,
}

impl Channel {
    /// All channels, in the order they are configured and rendered.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of the channel in `ALL`.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Which logical channel lands in each of the three physical sample
/// slots of an output pixel.
///
/// The renderer has always written blue, green, red (`Bgr`); the
/// channel swapping tool writes blue, red, green (`Brg`).  Both are
/// kept exactly as they were.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    /// red, green, blue
    Rgb,
    /// red, blue, green
    Rbg,
    /// green, red, blue
    Grb,
    /// green, blue, red
    Gbr,
    /// blue, red, green
    Brg,
    /// blue, green, red
    Bgr,
}

impl ChannelOrder {
    /// The logical channel feeding physical slots 0, 1 and 2.
    pub fn slots(self) -> [Channel; 3] {
        use self::Channel::*;
        match self {
            ChannelOrder::Rgb => [Red, Green, Blue],
            ChannelOrder::Rbg => [Red, Blue, Green],
            ChannelOrder::Grb => [Green, Red, Blue],
            ChannelOrder::Gbr => [Green, Blue, Red],
            ChannelOrder::Brg => [Blue, Red, Green],
            ChannelOrder::Bgr => [Blue, Green, Red],
        }
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        ChannelOrder::Bgr
    }
}

impl FromStr for ChannelOrder {
    type Err = NebulaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "rbg" => Ok(ChannelOrder::Rbg),
            "grb" => Ok(ChannelOrder::Grb),
            "gbr" => Ok(ChannelOrder::Gbr),
            "brg" => Ok(ChannelOrder::Brg),
            "bgr" => Ok(ChannelOrder::Bgr),
            _ => Err(NebulaError::InvalidConfiguration(format!(
                "'{}' is not a channel order; use a permutation of r, g and b",
                s
            ))),
        }
    }
}

/// Per-channel settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChannelConfig {
    /// Which channel this is.
    pub channel: Channel,
    /// The escape-time cutoff.  Higher budgets reveal finer structure.
    pub iterations: usize,
}

/// Everything needed to render one image.
#[derive(Clone, Debug, PartialEq)]
pub struct NebulaConfig {
    /// Width and height of the square image, in pixels.
    pub size: usize,
    /// Number of random candidates drawn per channel per pass.
    pub samples: usize,
    /// Number of passes per channel.
    pub passes: usize,
    /// Iteration budgets, in `Channel::ALL` order.
    pub channels: [ChannelConfig; 3],
    /// Largest number of candidates held in memory at once.
    pub batch_size: usize,
    /// Size of the worker pool.
    pub threads: usize,
    /// Seed for reproducible renders; entropy when absent.
    pub seed: Option<u64>,
    /// Physical slot order of the output samples.
    pub order: ChannelOrder,
    /// Longest orbit replay before a point is dropped.  Defaults to each
    /// channel's own iteration budget.
    pub replay_cap: Option<usize>,
}

impl Default for NebulaConfig {
    fn default() -> Self {
        NebulaConfig {
            size: 1600,
            samples: 50_000_000,
            passes: 50,
            channels: NebulaConfig::budgets(2500, 250, 25),
            batch_size: 1 << 20,
            threads: num_cpus::get(),
            seed: None,
            order: ChannelOrder::default(),
            replay_cap: None,
        }
    }
}

impl NebulaConfig {
    /// Builds the channel table from red, green and blue budgets.
    pub fn budgets(red: usize, green: usize, blue: usize) -> [ChannelConfig; 3] {
        [
            ChannelConfig {
                channel: Channel::Red,
                iterations: red,
            },
            ChannelConfig {
                channel: Channel::Green,
                iterations: green,
            },
            ChannelConfig {
                channel: Channel::Blue,
                iterations: blue,
            },
        ]
    }

    /// The replay cap in force for a channel.
    pub fn replay_cap_for(&self, channel: &ChannelConfig) -> usize {
        self.replay_cap.unwrap_or(channel.iterations)
    }

    /// Rejects configurations that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("image size", self.size),
            ("sample count", self.samples),
            ("pass count", self.passes),
            ("batch size", self.batch_size),
            ("thread count", self.threads),
        ];
        for (name, value) in positive.iter() {
            if *value == 0 {
                return Err(NebulaError::InvalidConfiguration(format!(
                    "{} must be positive",
                    name
                )));
            }
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if channel.channel != Channel::ALL[i] {
                return Err(NebulaError::InvalidConfiguration(format!(
                    "channel slot {} holds {}, expected {}",
                    i,
                    channel.channel,
                    Channel::ALL[i]
                )));
            }
            if channel.iterations == 0 {
                return Err(NebulaError::InvalidConfiguration(format!(
                    "{} iteration budget must be positive",
                    channel.channel
                )));
            }
            if self.replay_cap_for(channel) < channel.iterations {
                return Err(NebulaError::InvalidConfiguration(format!(
                    "replay cap {} is below the {} iteration budget {}",
                    self.replay_cap_for(channel),
                    channel.channel,
                    channel.iterations
                )));
            }
        }
        Ok(())
    }
}
