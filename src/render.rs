// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders a worker's rows.  Nothing in here talks to any other
//! worker: each call owns the buffer it fills and reads only the
//! (immutable) mapper.

use escape::escape_time;
use itertools::iproduct;
use palette;
use partition::Partition;
use planes::{Pixel, PlaneMapper};

/// The rows one worker rendered, row-major, `width` pixels to a row.
/// Pixel `(x, y)` of the image lives at `(y - partition.start) * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBuffer {
    /// The rows this buffer holds.
    pub partition: Partition,
    /// Pixels per row.
    pub width: usize,
    /// Packed ARGB pixels.
    pub pixels: Vec<u32>,
}

impl LocalBuffer {
    /// Number of pixels held.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True when no pixels are held.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// The colour of a single pixel of the image.
#[inline]
pub fn render_pixel(mapper: &PlaneMapper, pixel: &Pixel) -> u32 {
    let point = mapper.pixel_to_point(pixel);
    palette::encode(escape_time(point, mapper.image.max_iterations))
}

/// Renders every pixel of every row in `partition`.
pub fn render_rows(mapper: &PlaneMapper, partition: Partition) -> LocalBuffer {
    let width = mapper.image.width;
    let mut pixels = Vec::with_capacity(width * partition.len());
    for (row, column) in iproduct!(partition.rows(), 0..width) {
        pixels.push(render_pixel(mapper, &Pixel(column, row)));
    }
    LocalBuffer {
        partition,
        width,
        pixels,
    }
}

/// Renders the whole image on the calling thread.
pub fn render_full(mapper: &PlaneMapper) -> Vec<u32> {
    let everything = Partition {
        start: 0,
        end: mapper.image.height,
    };
    render_rows(mapper, everything).pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use planes::{ImageSpec, ViewWindow};

    fn mapper(width: usize, height: usize) -> PlaneMapper {
        let image = ImageSpec {
            width,
            height,
            max_iterations: 200,
        };
        PlaneMapper::new(image, ViewWindow::default()).unwrap()
    }

    #[test]
    fn buffer_is_width_by_partition_rows() {
        let pm = mapper(16, 12);
        let buffer = render_rows(&pm, Partition { start: 3, end: 8 });
        assert_eq!(buffer.len(), 16 * 5);
        assert_eq!(buffer.width, 16);
    }

    #[test]
    fn local_offsets_match_image_pixels() {
        let pm = mapper(16, 12);
        let buffer = render_rows(&pm, Partition { start: 4, end: 9 });
        for y in 4..9 {
            for x in 0..16 {
                assert_eq!(
                    buffer.pixels[(y - 4) * 16 + x],
                    render_pixel(&pm, &Pixel(x, y))
                );
            }
        }
    }

    #[test]
    fn strips_concatenate_to_the_full_image() {
        let pm = mapper(10, 9);
        let mut stitched = render_rows(&pm, Partition { start: 0, end: 4 }).pixels;
        stitched.extend(render_rows(&pm, Partition { start: 4, end: 9 }).pixels);
        assert_eq!(stitched, render_full(&pm));
    }

    #[test]
    fn empty_partition_renders_nothing() {
        let pm = mapper(10, 9);
        assert!(render_rows(&pm, Partition { start: 5, end: 5 }).is_empty());
    }

    #[test]
    fn centre_of_default_image_is_bounded() {
        let image = ImageSpec::default();
        let pm = PlaneMapper::new(image, ViewWindow::default()).unwrap();
        assert_eq!(
            render_pixel(&pm, &Pixel(400, 300)),
            palette::encode(image.max_iterations)
        );
    }
}
