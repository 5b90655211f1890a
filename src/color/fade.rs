//! Per-channel interpolation between two colors
//!
//! Every effect composes its frames from these functions, so they stay pure:
//! no state, no rounding drift at the boundaries. `step == 0` always returns
//! the source color and `step >= total` always returns the target.

use super::{Color, zip_channels};
use crate::math8::{blend8, ease_in_out_quad, ratio8};

/// Linear fade between two colors, quantized to `total_steps`
///
/// Each channel is computed as `from + (to - from) * step / total_steps`,
/// rounded to the nearest integer.
pub fn fade_linear(from: Color, to: Color, total_steps: u32, step: u32) -> Color {
    if step == 0 {
        return from;
    }
    if step >= total_steps {
        return to;
    }

    zip_channels(from, to, |a, b| lerp_channel(a, b, total_steps, step))
}

/// Eased fade between two colors over `total_frames`
///
/// Progress follows a quadratic ease-in-out curve, so palette transitions
/// start and end softly.
pub fn fade(from: Color, to: Color, total_frames: u32, frame: u32) -> Color {
    if frame == 0 {
        return from;
    }
    if frame >= total_frames {
        return to;
    }

    let progress = ease_in_out_quad(ratio8(frame, total_frames));
    blend_colors(from, to, progress)
}

/// Blend two colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Color, b: Color, amount_of_b: u8) -> Color {
    zip_channels(a, b, |x, y| blend8(x, y, amount_of_b))
}

/// Requires `0 < step < total`, which keeps the result between both ends.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(from: u8, to: u8, total: u32, step: u32) -> u8 {
    let scaled = (i64::from(to) - i64::from(from)) * i64::from(step);
    let total = i64::from(total);
    let half = total / 2;
    let offset = if scaled >= 0 {
        (scaled + half) / total
    } else {
        (scaled - half) / total
    };

    (i64::from(from) + offset) as u8
}
