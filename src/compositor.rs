// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drives sampling, escape filtering and orbit accumulation for every
//! channel and every pass.
//!
//! Each (channel, pass) pair is an independent job.  A pool of worker
//! threads pulls jobs off a shared queue.  A worker renders each job
//! into its own scratch histogram and then adds that into the
//! channel's running total; addition doesn't care what order it
//! happens in, so the result is the same no matter how the jobs were
//! scheduled.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::{debug, info, warn};
use num::Complex;

use crate::assemble::{assemble_ordered, FinalImage};
use crate::config::{ChannelConfig, ChannelOrder, NebulaConfig};
use crate::error::{NebulaError, Result};
use crate::escape::EscapeFilter;
use crate::histogram::PixelHistogram;
use crate::normalize::normalize;
use crate::orbit::OrbitAccumulator;
use crate::sampler::Sampler;

type JobQueue = Arc<Mutex<std::vec::IntoIter<(usize, usize)>>>;

/// Point counts for one channel, summed over all its passes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelReport {
    /// Random candidates drawn.
    pub sampled: u64,
    /// Candidates left after the cardioid and bulb tests.
    pub candidates: u64,
    /// Candidates that escaped within the iteration budget.
    pub escaped: u64,
    /// Escapers whose replay hit the cap and were left out.
    pub dropped: u64,
}

impl ChannelReport {
    fn merge(&mut self, other: &ChannelReport) {
        self.sampled += other.sampled;
        self.candidates += other.candidates;
        self.escaped += other.escaped;
        self.dropped += other.dropped;
    }
}

/// The three accumulated channel histograms of a finished render.
#[derive(Clone, Debug)]
pub struct Nebula {
    /// Histograms in `Channel::ALL` order.
    pub histograms: [PixelHistogram; 3],
    /// Point counts in `Channel::ALL` order.
    pub reports: [ChannelReport; 3],
    channels: [ChannelConfig; 3],
}

impl Nebula {
    /// Scales each channel onto 0..=65535, in `Channel::ALL` order.
    pub fn normalize(&self) -> Result<[Vec<u16>; 3]> {
        Ok([
            normalize(&self.histograms[0], self.channels[0].channel)?,
            normalize(&self.histograms[1], self.channels[1].channel)?,
            normalize(&self.histograms[2], self.channels[2].channel)?,
        ])
    }

    /// Normalizes the channels and interleaves them in the given order.
    pub fn image(&self, order: ChannelOrder) -> Result<FinalImage> {
        let planes = self.normalize()?;
        assemble_ordered(&planes, order, self.histograms[0].size())
    }
}

/// Runs the sample, filter and accumulate cycle for a configuration.
pub struct Compositor {
    config: NebulaConfig,
}

impl Compositor {
    /// Checks the configuration; nothing is computed until a render is
    /// requested.
    pub fn new(config: NebulaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Compositor { config })
    }

    /// The configuration in force.
    pub fn config(&self) -> &NebulaConfig {
        &self.config
    }

    /// Renders all three channels.
    pub fn render(&self) -> Result<Nebula> {
        let started = Instant::now();
        let mut results = self.run(&self.config.channels);
        let mut take = |slot: usize| std::mem::take(&mut results[slot]);
        let (red, green, blue) = (take(0), take(1), take(2));
        let nebula = Nebula {
            histograms: [red.0, green.0, blue.0],
            reports: [red.1, green.1, blue.1],
            channels: self.config.channels,
        };
        for (channel, report) in self.config.channels.iter().zip(nebula.reports.iter()) {
            info!(
                "{} channel: {} sampled, {} candidates, {} escaped, {} dropped",
                channel.channel, report.sampled, report.candidates, report.escaped, report.dropped
            );
        }
        info!("Rendering complete in {:.1?}", started.elapsed());
        Ok(nebula)
    }

    /// Renders a single channel on its own.
    pub fn render_channel(&self, channel: &ChannelConfig) -> (PixelHistogram, ChannelReport) {
        self.run(&[*channel]).remove(0)
    }

    // Spreads every (channel, pass) job over the worker pool.  Each
    // worker renders a job into its one scratch histogram and adds it to
    // the channel's running total.
    fn run(&self, channels: &[ChannelConfig]) -> Vec<(PixelHistogram, ChannelReport)> {
        let size = self.config.size;
        let jobs: Vec<(usize, usize)> = (0..self.config.passes)
            .flat_map(|pass| (0..channels.len()).map(move |slot| (slot, pass)))
            .collect();
        let workers = self.config.threads.min(jobs.len()).max(1);
        let queue: JobQueue = Arc::new(Mutex::new(jobs.into_iter()));

        let totals: Vec<Mutex<(PixelHistogram, ChannelReport)>> = channels
            .iter()
            .map(|_| Mutex::new((PixelHistogram::new(size), ChannelReport::default())))
            .collect();

        crossbeam::scope(|spawner| {
            for _ in 0..workers {
                let queue = queue.clone();
                let totals = &totals;
                spawner.spawn(move |_| {
                    let mut scratch = PixelHistogram::new(size);
                    loop {
                        let job = { queue.lock().unwrap().next() };
                        match job {
                            Some((slot, pass)) => {
                                scratch.clear();
                                let done = self.pass(&channels[slot], pass, &mut scratch);
                                let mut total = totals[slot].lock().unwrap();
                                total.0.merge(&scratch);
                                total.1.merge(&done);
                            }
                            None => {
                                break;
                            }
                        }
                    }
                });
            }
        })
        .unwrap_or_else(|e| std::panic::resume_unwind(e));

        totals
            .into_iter()
            .map(|total| total.into_inner().unwrap())
            .collect()
    }

    /// One sample -> filter -> accumulate cycle for one channel.
    /// Passes are numbered from 0 here and from 1 in messages.
    pub fn pass(
        &self,
        channel: &ChannelConfig,
        pass: usize,
        histogram: &mut PixelHistogram,
    ) -> ChannelReport {
        let started = Instant::now();
        let filter = EscapeFilter::new(channel.iterations);
        let cap = self.config.replay_cap_for(channel);
        let accumulator = OrbitAccumulator::new(self.config.size, cap);
        let mut sampler = match self.config.seed {
            Some(seed) => Sampler::seeded(job_seed(seed, channel, pass)),
            None => Sampler::new(),
        };

        let mut report = ChannelReport::default();
        let mut remaining = self.config.samples;
        while remaining > 0 {
            let batch = remaining.min(self.config.batch_size);
            remaining -= batch;

            let candidates = sampler.sample(batch);
            let escaped = filter.filter(&candidates);
            debug!(
                "{} channel, pass {}: {} of {} candidates escaped",
                channel.channel,
                pass + 1,
                escaped.len(),
                candidates.len()
            );
            let dropped = plot(&accumulator, channel, pass, &escaped, histogram);

            report.sampled += batch as u64;
            report.candidates += candidates.len() as u64;
            report.escaped += escaped.len() as u64;
            report.dropped += dropped.len() as u64;
        }

        info!(
            "Loop {} - {} channel: {} orbits plotted in {:.1?}",
            pass + 1,
            channel.channel,
            report.escaped - report.dropped,
            started.elapsed()
        );
        report
    }
}

// Replays the escapers of one batch.  Orbits that outlast the replay
// cap are reported, one warning each, and left out of the histogram.
fn plot(
    accumulator: &OrbitAccumulator,
    channel: &ChannelConfig,
    pass: usize,
    escaped: &[Complex<f64>],
    histogram: &mut PixelHistogram,
) -> Vec<NebulaError> {
    accumulator
        .accumulate(escaped, histogram)
        .into_iter()
        .map(|point| {
            let err = NebulaError::NonEscapingOrbit {
                channel: channel.channel,
                pass: pass + 1,
                point,
                cap: accumulator.cap(),
            };
            warn!("{}", err);
            err
        })
        .collect()
}

// Every job gets its own generator, so a seeded render does not depend
// on how jobs were spread over threads.
fn job_seed(seed: u64, channel: &ChannelConfig, pass: usize) -> u64 {
    let job = (pass as u64) * 3 + channel.channel.index() as u64 + 1;
    seed ^ job.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
