#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer for a fixed group of cooperating workers.
//!
//! The Mandelbrot set is drawn by taking each point on the complex
//! plane and repeatedly squaring it and adding the point back,
//! counting how quickly the result runs off to infinity.  That count
//! is the number used to colour the pixel.
//!
//! Every pixel is independent of every other, so the rows of the
//! image are split into contiguous strips, one per worker.  Each
//! worker renders its strip without talking to anyone, and then all
//! of them meet at a single exchange where rank 0, the coordinator,
//! collects the strips in rank order into the finished image.  The
//! split is a pure function of rank and group size, so the only
//! moment of synchronization is that final exchange.
//!
//! ```no_run
//! use mandelgather::{run, Config};
//!
//! let frame = run(&Config::default()).unwrap();
//! println!("{} pixels in {:?}", frame.pixels.len(), frame.elapsed);
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod errors;
pub mod escape;
pub mod gather;
pub mod group;
pub mod palette;
pub mod partition;
pub mod planes;
pub mod render;

pub use errors::RenderError;
pub use gather::Exchange;
pub use group::{run, Config, Frame};
pub use partition::Partition;
pub use planes::{ImageSpec, PlaneMapper, ViewWindow};
pub use render::LocalBuffer;
