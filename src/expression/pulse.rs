//! Pulse expression
//!
//! A soft wave of palette color that travels once along the strip. The run
//! ends when the trailing edge of the wave has left the last pixel.

use embassy_time::Instant;
use libm::fabsf;
use rand::RngCore;

use super::{Context, Expression, PlayMode, Playback, random_color};
use crate::color::{Color, fade_linear};
use crate::config::{ExpressionConfig, Palette};

const PARAM_PULSE_SPEED: &str = "pulseSpeed";

/// Default time for the wave to cross the strip, in seconds
const DEFAULT_PULSE_SPEED: u32 = 3;

/// Slowest allowed travel speed, in milliseconds per pixel
const MIN_MS_PER_PIXEL: u32 = 100;

/// Spatial half-extent of the wave, in pixels
const PULSE_WIDTH: u32 = 15;

/// Wave position decides when the run ends, not the frame count
const PULSE_MAX_FRAMES: u32 = 10_000;

/// Blend weight (0-100) of a pixel `distance` pixels away from the wave center
///
/// Full strength within half a pixel of the center, quadratic falloff
/// beyond, zero past `width`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn pulse_weight(distance: f32, width: u32) -> u32 {
    let width = width as f32;
    if distance > width {
        return 0;
    }
    if distance < 0.5 {
        return 100;
    }

    let normalized = distance / width;
    let factor = (1.0 - normalized * normalized).max(0.0);
    (factor * 100.0) as u32
}

/// Traveling pulse effect, non-exclusive
#[derive(Debug, Clone)]
pub struct PulseExpression {
    palette: Palette,
    color: Color,
    ms_per_pixel: u32,
    width: u32,
    position: f32,
    last_update: Option<Instant>,
}

impl PulseExpression {
    pub fn from_config(config: &ExpressionConfig<'_>, pixel_count: usize) -> Self {
        let seconds = config.parameter(PARAM_PULSE_SPEED, DEFAULT_PULSE_SPEED);
        let ms_per_pixel = u32::try_from(pixel_count)
            .ok()
            .filter(|count| *count > 0)
            .map_or(MIN_MS_PER_PIXEL, |count| {
                (seconds.saturating_mul(1000) / count).max(MIN_MS_PER_PIXEL)
            });
        let palette = config.palette_or_white();
        let color = palette[0];

        Self {
            palette,
            color,
            ms_per_pixel,
            width: PULSE_WIDTH,
            position: 0.0,
            last_update: None,
        }
    }

    /// Current wave center, in pixels
    pub const fn position(&self) -> f32 {
        self.position
    }

    pub const fn ms_per_pixel(&self) -> u32 {
        self.ms_per_pixel
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    #[allow(clippy::cast_precision_loss)]
    fn update_position(&mut self, now: Instant) {
        let Some(last) = self.last_update.replace(now) else {
            return;
        };

        let elapsed = now.saturating_duration_since(last).as_millis() as f32;
        self.position += elapsed / self.ms_per_pixel as f32;
    }
}

impl<const N: usize> Expression<N> for PulseExpression {
    #[allow(clippy::cast_precision_loss)]
    fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> PlayMode {
        self.position = -(self.width as f32);
        self.last_update = None;
        if self.palette.len() > 1 {
            self.color = random_color(cx.rng(), &self.palette);
        }

        playback.restart(PULSE_MAX_FRAMES);
        PlayMode::Once
    }

    fn on_update<R: RngCore>(&mut self, _playback: &mut Playback<N>, cx: &mut Context<'_, R>) {
        self.update_position(cx.now());
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw(&mut self, _playback: &Playback<N>, pixels: &mut [Color]) {
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let distance = fabsf(i as f32 - self.position);
            let weight = pulse_weight(distance, self.width);
            if weight > 0 {
                *pixel = fade_linear(*pixel, self.color, 100, weight);
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn is_finished(&self, pixel_count: usize) -> bool {
        self.position > (pixel_count as f32) + (2 * self.width) as f32
    }
}
