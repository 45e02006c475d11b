// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The collective exchange that turns every worker's strip into one
//! image.
//!
//! A `Group` hands out one `Endpoint` per rank.  Rank 0 gets the
//! `Coordinator` end, which owns the full image; everyone else gets a
//! `Worker` end, which can only contribute.  Workers send their strip
//! tagged with their rank and then wait to be released; the
//! coordinator waits until it has heard from every rank, places each
//! strip at its partition's rows, and only then releases the workers.
//!
//! Nothing times out.  A participant that disappears drops its end of
//! the channel, and the others see the disconnect and fail the whole
//! run.

use crossbeam::channel::{unbounded, Receiver, Sender};
use errors::RenderError;
use partition::{self, Partition};
use render::LocalBuffer;
use std::fmt;
use std::str::FromStr;

/// The rank that assembles the image.
pub const COORDINATOR: usize = 0;

/// How the coordinator decides where each contribution goes and how
/// large it must be.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exchange {
    /// Every rank contributes exactly its own partition, whatever its
    /// size.  Works for any split.
    Variable,
    /// Every rank contributes `height / workers` rows.  Only valid when
    /// the workers divide the height evenly; anything else is reported
    /// as a partition mismatch.
    FixedStride,
}

impl Default for Exchange {
    fn default() -> Self {
        Exchange::Variable
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variable" => Ok(Exchange::Variable),
            "fixed" => Ok(Exchange::FixedStride),
            _ => Err(format!("Unknown exchange '{}' (expected variable or fixed)", s)),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Exchange::Variable => write!(f, "variable"),
            Exchange::FixedStride => write!(f, "fixed"),
        }
    }
}

type Contribution = (usize, LocalBuffer);

/// A fixed set of participants, one per rank.
pub struct Group {
    endpoints: Vec<Endpoint>,
}

impl Group {
    /// Wires up `workers` participants for a `width` x `height` image.
    pub fn new(
        width: usize,
        height: usize,
        workers: usize,
        exchange: Exchange,
    ) -> Result<Group, RenderError> {
        let partitions = partition::partitions(height, workers)?;
        let (outbox, inbox) = unbounded::<Contribution>();
        let (release, released) = unbounded::<()>();

        let mut endpoints = Vec::with_capacity(workers);
        for (rank, part) in partitions.iter().enumerate().skip(1) {
            endpoints.push(Endpoint::Worker(Worker {
                rank,
                partition: *part,
                outbox: outbox.clone(),
                released: released.clone(),
            }));
        }
        endpoints.insert(
            COORDINATOR,
            Endpoint::Coordinator(Coordinator {
                width,
                height,
                exchange,
                partitions,
                inbox,
                release,
            }),
        );
        Ok(Group { endpoints })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Never true for a group built by `new`.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Takes the endpoints, in rank order.
    pub fn into_endpoints(self) -> Vec<Endpoint> {
        self.endpoints
    }
}

/// One participant's end of the exchange.
pub enum Endpoint {
    /// Rank 0: contributes, then assembles.
    Coordinator(Coordinator),
    /// Every other rank: contributes, then waits.
    Worker(Worker),
}

impl Endpoint {
    /// This participant's rank.
    pub fn rank(&self) -> usize {
        match *self {
            Endpoint::Coordinator(_) => COORDINATOR,
            Endpoint::Worker(ref w) => w.rank,
        }
    }

    /// The rows this participant must render.
    pub fn partition(&self) -> Partition {
        match *self {
            Endpoint::Coordinator(ref c) => c.partitions[COORDINATOR],
            Endpoint::Worker(ref w) => w.partition,
        }
    }
}

/// The end of the exchange that owns the full image.
pub struct Coordinator {
    width: usize,
    height: usize,
    exchange: Exchange,
    partitions: Vec<Partition>,
    inbox: Receiver<Contribution>,
    release: Sender<()>,
}

impl Coordinator {
    /// How many pixels `rank` must contribute, and where they go.
    fn placement(&self, rank: usize) -> (usize, usize) {
        let offset = self.partitions[rank].start * self.width;
        let expected = match self.exchange {
            Exchange::Variable => self.partitions[rank].len() * self.width,
            Exchange::FixedStride => (self.height / self.partitions.len()) * self.width,
        };
        (offset, expected)
    }

    fn place(&self, full: &mut [u32], rank: usize, buffer: &LocalBuffer) -> Result<(), RenderError> {
        let (offset, expected) = self.placement(rank);
        if buffer.pixels.len() != expected {
            error!(
                "rank {} contributed {} pixels to the {} exchange, expected {}",
                rank,
                buffer.pixels.len(),
                self.exchange,
                expected
            );
            return Err(RenderError::PartitionMismatch {
                rank,
                expected,
                actual: buffer.pixels.len(),
            });
        }
        let owned = self.partitions[rank];
        if buffer.partition != owned {
            error!(
                "rank {} rendered rows {}..{}, but owns rows {}..{}",
                rank, buffer.partition.start, buffer.partition.end, owned.start, owned.end
            );
            return Err(RenderError::RowMismatch {
                rank,
                expected: owned,
                actual: buffer.partition,
            });
        }
        full[offset..offset + expected].copy_from_slice(&buffer.pixels);
        Ok(())
    }

    /// Contributes the coordinator's own strip, blocks until every
    /// other rank has contributed, and returns the assembled image.
    /// On any failure the workers are not released and no image is
    /// produced.
    pub fn gather(self, local: LocalBuffer) -> Result<Vec<u32>, RenderError> {
        let workers = self.partitions.len();
        let mut full = vec![0u32; self.width * self.height];
        let mut arrived = vec![false; workers];

        self.place(&mut full, COORDINATOR, &local)?;
        arrived[COORDINATOR] = true;
        let mut outstanding = workers - 1;

        while outstanding > 0 {
            match self.inbox.recv() {
                Ok((rank, buffer)) => {
                    debug!("coordinator received {} pixels from rank {}", buffer.len(), rank);
                    self.place(&mut full, rank, &buffer)?;
                    if !arrived[rank] {
                        arrived[rank] = true;
                        outstanding -= 1;
                    }
                }
                Err(_) => {
                    let missing: Vec<usize> = arrived
                        .iter()
                        .enumerate()
                        .filter(|&(_, seen)| !*seen)
                        .map(|(rank, _)| rank)
                        .collect();
                    error!("exchange stalled waiting on ranks {:?}", missing);
                    return Err(RenderError::SynchronizationStall { missing });
                }
            }
        }

        for _ in 1..workers {
            // A worker that already contributed and then went away
            // doesn't need releasing.
            let _ = self.release.send(());
        }
        info!("gathered {} strips into a {}x{} image", workers, self.width, self.height);
        Ok(full)
    }
}

/// The end of the exchange that only contributes.
pub struct Worker {
    rank: usize,
    partition: Partition,
    outbox: Sender<Contribution>,
    released: Receiver<()>,
}

impl Worker {
    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Hands the strip to the coordinator and blocks until the
    /// coordinator has heard from everyone.
    pub fn contribute(self, local: LocalBuffer) -> Result<(), RenderError> {
        let Worker {
            rank,
            outbox,
            released,
            ..
        } = self;

        if outbox.send((rank, local)).is_err() {
            warn!("rank {}: the coordinator left before we contributed", rank);
            return Err(RenderError::SynchronizationStall {
                missing: vec![COORDINATOR],
            });
        }
        drop(outbox);

        match released.recv() {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!("rank {}: the coordinator abandoned the exchange", rank);
                Err(RenderError::SynchronizationStall {
                    missing: vec![COORDINATOR],
                })
            }
        }
    }
}
