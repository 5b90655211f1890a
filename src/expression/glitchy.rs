//! Glitchy expression
//!
//! A short exclusive burst that tints the whole strip toward a random
//! palette color, then snaps back to exactly what was shown before.

use rand::RngCore;

use super::{Context, Expression, PlayMode, Playback, random_between, random_color};
use crate::color::{Color, WHITE, fade_linear};
use crate::config::{ExpressionConfig, Palette};

const PARAM_DURATION_MIN: &str = "durationMin";
const PARAM_DURATION_MAX: &str = "durationMax";

const DEFAULT_DURATION_MIN: u32 = 1;
const DEFAULT_DURATION_MAX: u32 = 3;
const MAX_DURATION: u32 = 60;

/// Share of the glitch color mixed into every pixel per tick (out of 100)
const GLITCH_STRENGTH: u32 = 95;

/// Accept a duration in `1..=MAX_DURATION`, fall back to `default` otherwise
const fn valid_duration(value: u32, default: u32) -> u32 {
    if value > 0 && value <= MAX_DURATION {
        value
    } else {
        default
    }
}

/// Glitch effect, exclusive while active
#[derive(Debug, Clone)]
pub struct GlitchyExpression {
    palette: Palette,
    color: Color,
    duration_min: u32,
    duration_max: u32,
}

impl GlitchyExpression {
    pub fn from_config(config: &ExpressionConfig<'_>) -> Self {
        let duration_min = valid_duration(
            config.parameter(PARAM_DURATION_MIN, DEFAULT_DURATION_MIN),
            DEFAULT_DURATION_MIN,
        );
        let duration_max = valid_duration(
            config.parameter(PARAM_DURATION_MAX, DEFAULT_DURATION_MAX),
            DEFAULT_DURATION_MAX,
        )
        .max(duration_min);

        Self {
            palette: config.palette(),
            color: WHITE,
            duration_min,
            duration_max,
        }
    }

    /// Duration range in ticks
    pub const fn duration_range(&self) -> (u32, u32) {
        (self.duration_min, self.duration_max)
    }

    /// Color picked for the current burst
    pub const fn color(&self) -> Color {
        self.color
    }
}

impl<const N: usize> Expression<N> for GlitchyExpression {
    const EXCLUSIVE: bool = true;

    fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> PlayMode {
        self.color = random_color(cx.rng(), &self.palette);
        let frames = random_between(cx.rng(), self.duration_min, self.duration_max);

        playback.restart(frames);
        PlayMode::Once
    }

    fn draw(&mut self, playback: &Playback<N>, pixels: &mut [Color]) {
        if playback.is_last_frame() {
            for (pixel, saved) in pixels.iter_mut().zip(playback.saved()) {
                *pixel = *saved;
            }
            return;
        }

        for pixel in pixels.iter_mut() {
            *pixel = fade_linear(*pixel, self.color, 100, GLITCH_STRENGTH);
        }
    }
}
