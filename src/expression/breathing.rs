//! Breathing expression
//!
//! Continuously breathes from the colors captured at trigger time toward a
//! palette color and back. Every completed breath moves to the next palette
//! color, walking the palette forward and then backward.

use core::f32::consts::TAU;

use embassy_time::{Duration, Instant};
use libm::{cosf, floorf};
use rand::RngCore;

use super::{Context, Expression, PlayMode, Playback};
use crate::color::{Color, fade_linear};
use crate::config::{ExpressionConfig, Palette};

const PARAM_BREATH_SPEED: &str = "breathSpeed";

/// Default breath cycle, in seconds
const DEFAULT_BREATH_SPEED: u32 = 10;

/// Large frame count to keep the loop running continuously
const BREATHING_MAX_FRAMES: u32 = 100_000;

/// Breath intensity (0-100) at `phase` within one cycle (0.0-1.0)
///
/// Follows `0.5 - 0.5 * cos(2 * pi * phase)`, truncated: 0 at the start of
/// a cycle and 100 at its midpoint.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn breath_intensity(phase: f32) -> u32 {
    let value = 0.5 - 0.5 * cosf(phase * TAU);
    (value * 100.0).clamp(0.0, 100.0) as u32
}

/// Next palette index when walking a palette back and forth
///
/// Returns the new index and direction. Never leaves `0..len`, an
/// out-of-range `index` is treated as the last entry.
pub const fn next_palette_index(index: usize, forward: bool, len: usize) -> (usize, bool) {
    if len < 2 {
        return (0, true);
    }

    let index = if index >= len { len - 1 } else { index };
    let forward = if forward { index + 1 < len } else { index == 0 };
    let next = if forward { index + 1 } else { index - 1 };
    (next, forward)
}

/// Breathing effect, always running and non-exclusive
#[derive(Debug, Clone)]
pub struct BreathingExpression {
    palette: Palette,
    cycle: Duration,
    phase: f32,
    last_update: Option<Instant>,
    index: usize,
    forward: bool,
    target: Color,
}

impl BreathingExpression {
    pub fn from_config(config: &ExpressionConfig<'_>) -> Self {
        let seconds = config.parameter(PARAM_BREATH_SPEED, DEFAULT_BREATH_SPEED).max(1);
        let palette = config.palette_or_white();
        let target = palette[0];

        Self {
            palette,
            cycle: Duration::from_secs(u64::from(seconds)),
            phase: 0.0,
            last_update: None,
            index: 0,
            forward: true,
            target,
        }
    }

    /// Current position within the breath cycle (0.0-1.0)
    pub const fn phase(&self) -> f32 {
        self.phase
    }

    /// Color currently breathed toward
    pub const fn target(&self) -> Color {
        self.target
    }

    #[allow(clippy::cast_precision_loss)]
    fn update_phase(&mut self, now: Instant) {
        let Some(last) = self.last_update.replace(now) else {
            return;
        };

        let elapsed = now.saturating_duration_since(last).as_millis() as f32;
        self.phase += elapsed / self.cycle.as_millis() as f32;

        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
            let (index, forward) =
                next_palette_index(self.index, self.forward, self.palette.len());
            self.index = index;
            self.forward = forward;
            self.target = self.palette[index];
        }
    }
}

impl<const N: usize> Expression<N> for BreathingExpression {
    const ALLOWED_IN_HOME_MODE: bool = true;

    fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        _cx: &mut Context<'_, R>,
    ) -> PlayMode {
        self.phase = 0.0;
        self.last_update = None;
        self.index = 0;
        self.forward = true;
        self.target = self.palette[0];

        playback.restart(BREATHING_MAX_FRAMES);
        PlayMode::Loop
    }

    fn on_update<R: RngCore>(&mut self, _playback: &mut Playback<N>, cx: &mut Context<'_, R>) {
        self.update_phase(cx.now());
    }

    /// Breathing never waits for an external trigger
    fn wants_trigger<R: RngCore>(
        &mut self,
        playback: &Playback<N>,
        _cx: &mut Context<'_, R>,
    ) -> bool {
        playback.is_stopped()
    }

    fn draw(&mut self, playback: &Playback<N>, pixels: &mut [Color]) {
        let intensity = breath_intensity(self.phase);

        for (pixel, base) in pixels.iter_mut().zip(playback.saved()) {
            *pixel = fade_linear(*base, self.target, 100, intensity);
        }
    }
}
