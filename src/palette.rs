// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an escape count into a packed ARGB pixel.
//!
//! Each channel is the count scaled by 1, 2 and 4 and taken mod 256,
//! so the colours cycle: counts 256 apart share a red channel, and
//! images with limits above 255 show bands.  That banding is the look
//! we want, not an overflow.

/// Alpha channel of every pixel we produce.
pub const OPAQUE: u32 = 0xff00_0000;

/// Packs the colour for an escape count as 0xAARRGGBB.
#[inline]
pub fn encode(iterations: usize) -> u32 {
    let r = (iterations % 256) as u32;
    let g = ((iterations * 2) % 256) as u32;
    let b = ((iterations * 4) % 256) as u32;
    OPAQUE | (r << 16) | (g << 8) | b
}

/// Unpacks the colour channels of a packed pixel, dropping alpha.
#[inline]
pub fn rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// Flattens a buffer of packed pixels into RGB bytes, ready for an
/// image encoder.
pub fn to_rgb_bytes(pixels: &[u32]) -> Vec<u8> {
    pixels.iter().flat_map(|p| rgb(*p).to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_opaque_black() {
        assert_eq!(encode(0), 0xff00_0000);
    }

    #[test]
    fn channels_scale_by_one_two_four() {
        assert_eq!(rgb(encode(1)), [1, 2, 4]);
        assert_eq!(rgb(encode(50)), [50, 100, 200]);
        assert_eq!(rgb(encode(100)), [100, 200, 144]);
    }

    #[test]
    fn red_bands_every_256_counts() {
        for i in 0..300 {
            assert_eq!(rgb(encode(i))[0], rgb(encode(i + 256))[0]);
            assert_eq!(encode(i), encode(i + 256));
        }
    }

    #[test]
    fn every_pixel_is_opaque() {
        for i in &[0, 1, 255, 256, 1000, 123_456] {
            assert_eq!(encode(*i) & OPAQUE, OPAQUE);
        }
    }

    #[test]
    fn rgb_bytes_follow_pixel_order() {
        let bytes = to_rgb_bytes(&[encode(1), encode(2)]);
        assert_eq!(bytes, vec![1, 2, 4, 2, 4, 8]);
    }
}
