// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a window onto the complex plane.  Unlike a corner-anchored
//! mapping, the centre of the pixel grid lands on the centre of the
//! window, so the grid's midpoint is exactly the window's midpoint.
use errors::RenderError;
use num::Complex;

/// The window onto the complex plane that we render.  Set once, read
/// by every worker, never mutated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewWindow {
    /// Left edge, on the real axis.
    pub min_real: f64,
    /// Right edge, on the real axis.
    pub max_real: f64,
    /// Bottom edge, on the imaginary axis.
    pub min_imag: f64,
    /// Top edge, on the imaginary axis.
    pub max_imag: f64,
}

impl ViewWindow {
    /// Builds a window from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Self {
        ViewWindow {
            min_real: leftlower.re,
            max_real: rightupper.re,
            min_imag: leftlower.im,
            max_imag: rightupper.im,
        }
    }

    /// A window is usable when both axes are finite and strictly
    /// ordered.
    pub fn validate(&self) -> Result<(), RenderError> {
        let bounds = [self.min_real, self.max_real, self.min_imag, self.max_imag];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(RenderError::configuration(
                "The view window bounds must be finite numbers.",
            ));
        }
        if self.min_real >= self.max_real {
            return Err(RenderError::configuration(
                "The left lower corner is not to the left of the right upper corner.",
            ));
        }
        if self.min_imag >= self.max_imag {
            return Err(RenderError::configuration(
                "The left lower corner is not lower than the right upper corner.",
            ));
        }
        Ok(())
    }
}

impl Default for ViewWindow {
    fn default() -> Self {
        ViewWindow {
            min_real: -2.5,
            max_real: 1.0,
            min_imag: -1.5,
            max_imag: 1.5,
        }
    }
}

/// The pixel grid and the escape-time cutoff.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageSpec {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Iteration count at which a point is declared bounded.
    pub max_iterations: usize,
}

impl ImageSpec {
    /// Every dimension must be positive.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::configuration(format!(
                "Image dimensions must be positive (got {}x{}).",
                self.width, self.height
            )));
        }
        if self.max_iterations == 0 {
            return Err(RenderError::configuration(
                "The iteration limit must be positive.",
            ));
        }
        Ok(())
    }
}

impl Default for ImageSpec {
    fn default() -> Self {
        ImageSpec {
            width: 800,
            height: 600,
            max_iterations: 1000,
        }
    }
}

/// Describes the x, y of a point in a region.  Column first, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels on the image grid to points in the view window.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The grid being rendered.
    pub image: ImageSpec,
    /// The window onto the complex plane.
    pub window: ViewWindow,
    // Width and height of the window, and its centre.
    span: (f64, f64),
    centre: Complex<f64>,
}

impl PlaneMapper {
    /// Constructor.  Refuses an empty grid or a window whose corners
    /// are out of order.
    pub fn new(image: ImageSpec, window: ViewWindow) -> Result<PlaneMapper, RenderError> {
        image.validate()?;
        window.validate()?;

        Ok(PlaneMapper {
            image,
            window,
            span: (
                window.max_real - window.min_real,
                window.max_imag - window.min_imag,
            ),
            centre: Complex::new(
                (window.max_real + window.min_real) / 2.0,
                (window.max_imag + window.min_imag) / 2.0,
            ),
        })
    }

    /// Given a pixel on the integral cartesian plane, map it to a
    /// point in the view window.  Total over all pixels, including
    /// those outside the grid.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let width = self.image.width as f64;
        let height = self.image.height as f64;
        Complex::new(
            ((pixel.0 as f64) - width / 2.0) * self.span.0 / width + self.centre.re,
            ((pixel.1 as f64) - height / 2.0) * self.span.1 / height + self.centre.im,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: usize, height: usize) -> ImageSpec {
        ImageSpec {
            width,
            height,
            max_iterations: 100,
        }
    }

    fn window(min_real: f64, max_real: f64, min_imag: f64, max_imag: f64) -> ViewWindow {
        ViewWindow {
            min_real,
            max_real,
            min_imag,
            max_imag,
        }
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(image(4, 4), window(1.0, -1.0, -1.0, 1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(image(4, 4), window(-1.0, 1.0, 1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_empty_grid() {
        assert!(PlaneMapper::new(image(0, 4), ViewWindow::default()).is_err());
        assert!(PlaneMapper::new(image(4, 0), ViewWindow::default()).is_err());
    }

    #[test]
    fn planemapper_fails_on_nan_window() {
        let pm = PlaneMapper::new(image(4, 4), window(::std::f64::NAN, 1.0, -1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(image(4, 4), window(-1.0, 1.0, -1.0, 1.0));
        assert!(pm.is_ok());
    }

    #[test]
    fn corners_become_bounds() {
        let w = ViewWindow::from_corners(Complex::new(-2.5, -1.5), Complex::new(1.0, 1.5));
        assert_eq!(w, ViewWindow::default());
    }

    #[test]
    fn pixel_to_point_on_mixed_planes() {
        let pm = PlaneMapper::new(image(4, 4), window(-2.0, 2.0, -2.0, 2.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn centre_of_default_grid_is_centre_of_default_window() {
        let pm = PlaneMapper::new(ImageSpec::default(), ViewWindow::default()).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(400, 300)), Complex::new(-0.75, 0.0));
    }

    #[test]
    fn pixel_to_point_is_total_past_the_grid() {
        let pm = PlaneMapper::new(image(8, 8), window(-4.0, 4.0, -4.0, 4.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(6, 4)), Complex::new(2.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(12, 4)), Complex::new(8.0, 0.0));
    }
}
