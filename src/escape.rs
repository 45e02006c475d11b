// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Takes a point on the complex plane and
//! repeatedly squares it and adds the point back, counting how many
//! steps it takes for the orbit to leave the circle of radius 2.
//! That count, the "velocity" of the point, is what the image shows.
//!
//! The kernel touches nothing but its arguments, so every worker
//! computes the same count for the same point regardless of which
//! worker gets there first.

use num::Complex;

/// Squared escape radius.  An orbit sitting exactly on the radius has
/// not escaped yet.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// Returns the number of times z ← z² + c was applied, starting from
/// z = 0, before |z|² rose above 4.0; or `limit` if the orbit never
/// left.  The result is always in `0..=limit`.
///
/// The test is made before each step, so a point that lands exactly on
/// the radius takes one more step: c = 2 reaches |z|² = 4 after the
/// first step and is only counted as escaped after the second.
#[inline]
pub fn escape_time(c: Complex<f64>, limit: usize) -> usize {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut iteration = 0;
    while iteration < limit && z.norm_sqr() <= ESCAPE_RADIUS_SQR {
        z = z * z + c;
        iteration += 1;
    }
    iteration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 1000), 1000);
    }

    #[test]
    fn neck_of_the_cardioid_is_bounded() {
        assert_eq!(escape_time(Complex::new(-0.75, 0.0), 1000), 1000);
    }

    #[test]
    fn two_sits_on_the_radius_before_escaping() {
        // 0 -> 2 (|z|^2 = 4, still inside) -> 6 (escaped)
        assert_eq!(escape_time(Complex::new(2.0, 0.0), 1000), 2);
    }

    #[test]
    fn far_points_escape_after_one_step() {
        assert_eq!(escape_time(Complex::new(3.0, 0.0), 1000), 1);
        assert_eq!(escape_time(Complex::new(0.0, -2.5), 1000), 1);
    }

    #[test]
    fn count_never_exceeds_the_limit() {
        assert_eq!(escape_time(Complex::new(-1.0, 0.0), 7), 7);
        assert_eq!(escape_time(Complex::new(3.0, 0.0), 0), 0);
    }

    #[test]
    fn repeated_calls_agree() {
        let c = Complex::new(-0.743_643_887, 0.131_825_904);
        let first = escape_time(c, 5000);
        for _ in 0..10 {
            assert_eq!(escape_time(c, 5000), first);
        }
    }
}
