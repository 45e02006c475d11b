// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs a whole group: one scoped thread per rank, each of which
//! renders its own rows and then joins the exchange.  The coordinator's
//! thread comes back with the image; everyone else comes back empty.

use crossbeam;
use crossbeam::thread::ScopedJoinHandle;
use errors::RenderError;
use gather::{Endpoint, Exchange, Group, COORDINATOR};
use num_cpus;
use partition;
use planes::{ImageSpec, PlaneMapper, ViewWindow};
use render::render_rows;
use std::time::{Duration, Instant};

/// Everything a run needs.  Built once, read by every worker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Grid size and iteration limit.
    pub image: ImageSpec,
    /// The part of the complex plane to draw.
    pub window: ViewWindow,
    /// Number of participants, coordinator included.
    pub workers: usize,
    /// How strips are placed into the final image.
    pub exchange: Exchange,
}

impl Default for Config {
    fn default() -> Self {
        let image = ImageSpec::default();
        Config {
            image,
            window: ViewWindow::default(),
            workers: num_cpus::get().min(image.height).max(1),
            exchange: Exchange::default(),
        }
    }
}

impl Config {
    /// Rejects anything that could not produce a valid run.  Called
    /// before any rendering starts.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.image.validate()?;
        self.window.validate()?;
        partition::validate(self.image.height, self.workers)
    }
}

/// The finished image and how long it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Packed ARGB pixels, row-major.
    pub pixels: Vec<u32>,
    /// Wall time from the start of rendering to the end of the
    /// exchange.
    pub elapsed: Duration,
}

fn participate(endpoint: Endpoint, mapper: &PlaneMapper) -> Result<Option<Vec<u32>>, RenderError> {
    let rank = endpoint.rank();
    let part = endpoint.partition();
    debug!("rank {} rendering rows {}..{}", rank, part.start, part.end);
    let local = render_rows(mapper, part);
    match endpoint {
        Endpoint::Coordinator(coordinator) => coordinator.gather(local).map(Some),
        Endpoint::Worker(worker) => worker.contribute(local).map(|_| None),
    }
}

/// Renders the image described by `config` across `config.workers`
/// threads and gathers it at rank 0.
///
/// If several participants fail, the underlying cause (a mismatch,
/// say) is reported in preference to the stalls it causes elsewhere.
pub fn run(config: &Config) -> Result<Frame, RenderError> {
    config.validate()?;
    let mapper = PlaneMapper::new(config.image, config.window)?;
    let group = Group::new(
        config.image.width,
        config.image.height,
        config.workers,
        config.exchange,
    )?;
    info!(
        "rendering {}x{} with {} workers ({} exchange)",
        config.image.width, config.image.height, config.workers, config.exchange
    );

    let mapper = &mapper;
    let start = Instant::now();
    let outcomes = crossbeam::scope(|spawner| {
        let handles: Vec<(usize, ScopedJoinHandle<Result<Option<Vec<u32>>, RenderError>>)> =
            group
                .into_endpoints()
                .into_iter()
                .map(|endpoint| {
                    (endpoint.rank(), spawner.spawn(move |_| participate(endpoint, mapper)))
                })
                .collect();

        handles
            .into_iter()
            .map(|(rank, handle)| match handle.join() {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("rank {} panicked before finishing the exchange", rank);
                    Err(RenderError::SynchronizationStall { missing: vec![rank] })
                }
            })
            .collect::<Vec<_>>()
    })
    .map_err(|_| RenderError::SynchronizationStall { missing: vec![] })?;
    let elapsed = start.elapsed();

    let mut image = None;
    let mut stall = None;
    for outcome in outcomes {
        match outcome {
            Ok(Some(pixels)) => image = Some(pixels),
            Ok(None) => (),
            Err(e) => {
                if !e.is_stall() {
                    return Err(e);
                }
                stall = stall.or(Some(e));
            }
        }
    }
    if let Some(e) = stall {
        return Err(e);
    }

    match image {
        Some(pixels) => {
            info!("render complete in {:?}", elapsed);
            Ok(Frame {
                width: config.image.width,
                height: config.image.height,
                pixels,
                elapsed,
            })
        }
        None => Err(RenderError::SynchronizationStall {
            missing: vec![COORDINATOR],
        }),
    }
}
