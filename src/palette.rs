//! Maps escape times to colours.  Each channel walks a triangle wave
//! at its own rate, which gives the bands around the set their
//! banded, psychedelic look.  Points that never escape are black.

use image::Rgb;

/// The colour of a point inside the set.
pub const INSIDE: Rgb<u8> = Rgb([0, 0, 0]);

// Folds x into a triangle wave with period 512 and peak 256.
fn wrap(x: usize) -> u8 {
    let folded = ((x as i64 + 256) & 0x1ff) - 256;
    let folded = folded.abs();
    if folded > 255 {
        255
    } else {
        folded as u8
    }
}

/// The colour for a point that escaped after `iterations` steps, or
/// black for `None`.
pub fn color(escape: Option<usize>) -> Rgb<u8> {
    match escape {
        None => INSIDE,
        Some(n) => Rgb([wrap(7 * n), wrap(5 * n), wrap(11 * n)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_is_a_triangle_wave() {
        assert_eq!(wrap(0), 0);
        assert_eq!(wrap(100), 100);
        assert_eq!(wrap(255), 255);
        assert_eq!(wrap(256), 255);
        assert_eq!(wrap(257), 255);
        assert_eq!(wrap(300), 212);
        assert_eq!(wrap(512), 0);
        assert_eq!(wrap(612), 100);
    }

    #[test]
    fn inside_points_are_black() {
        assert_eq!(color(None), INSIDE);
    }

    #[test]
    fn channels_advance_at_different_rates() {
        assert_eq!(color(Some(0)), Rgb([0, 0, 0]));
        assert_eq!(color(Some(1)), Rgb([7, 5, 11]));
        assert_eq!(color(Some(10)), Rgb([70, 50, 110]));
    }
}
