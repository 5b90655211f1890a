//! Shifty expression
//!
//! Slowly fades the whole strip to a single random palette color, holds it
//! for a random while, then fades back to what was shown before. Once the
//! strip is back to its original colors a chained expression (glitchy by
//! default) is triggered through the manager.

use embassy_time::{Duration, Instant};
use rand::RngCore;

use super::{Context, Expression, PlayMode, Playback, random_color, random_duration};
use crate::color::{Color, WHITE, fade_linear};
use crate::config::{ExpressionConfig, Palette};
use crate::frame_buffer::Pixels;

const PARAM_SHIFT_DURATION_MIN: &str = "shiftDurationMin";
const PARAM_SHIFT_DURATION_MAX: &str = "shiftDurationMax";
const PARAM_FADE_DURATION: &str = "fadeDuration";

/// Default hold range, in seconds
const DEFAULT_SHIFT_DURATION_MIN: u32 = 300;
const DEFAULT_SHIFT_DURATION_MAX: u32 = 600;

/// Default fade length, in seconds
const DEFAULT_FADE_DURATION: u32 = 60;

/// Frame rate assumed when converting durations to frames
pub const FADE_FRAME_RATE: u32 = 30;

/// Expression triggered after a full shift cycle
const DEFAULT_CHAINED_EXPRESSION: &str = "glitchy";

/// Shift cycle sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftyState {
    Idle,
    FadingToPalette,
    Shifted,
    FadingBack,
}

/// Shift-and-return effect, non-exclusive
#[derive(Debug, Clone)]
pub struct ShiftyExpression<const N: usize> {
    palette: Palette,
    state: ShiftyState,
    color: Color,
    fade_start: Pixels<N>,
    fade_target: Pixels<N>,
    fade_frames: u32,
    hold_min: Duration,
    hold_max: Duration,
    hold: Duration,
    shifted_at: Instant,
    chained: &'static str,
}

impl<const N: usize> ShiftyExpression<N> {
    pub fn from_config(config: &ExpressionConfig<'_>) -> Self {
        let hold_min = config.parameter(PARAM_SHIFT_DURATION_MIN, DEFAULT_SHIFT_DURATION_MIN);
        let hold_max = config.parameter(PARAM_SHIFT_DURATION_MAX, DEFAULT_SHIFT_DURATION_MAX);
        let fade_seconds = config.parameter(PARAM_FADE_DURATION, DEFAULT_FADE_DURATION);

        Self {
            palette: config.palette(),
            state: ShiftyState::Idle,
            color: WHITE,
            fade_start: Pixels::new(),
            fade_target: Pixels::new(),
            fade_frames: fade_seconds.saturating_mul(FADE_FRAME_RATE).max(1),
            hold_min: Duration::from_secs(u64::from(hold_min)),
            hold_max: Duration::from_secs(u64::from(hold_max.max(hold_min))),
            hold: Duration::from_secs(0),
            shifted_at: Instant::from_millis(0),
            chained: DEFAULT_CHAINED_EXPRESSION,
        }
    }

    /// Trigger a different expression once the cycle completes
    #[must_use]
    pub fn with_chained(mut self, name: &'static str) -> Self {
        self.chained = name;
        self
    }

    pub const fn state(&self) -> ShiftyState {
        self.state
    }

    /// Color of the current shift
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Hold duration drawn for the current shift
    pub const fn hold(&self) -> Duration {
        self.hold
    }

    pub const fn chained(&self) -> &'static str {
        self.chained
    }

    fn fill_flat(pixels: &mut Pixels<N>, color: Color, count: usize) {
        pixels.clear();
        let _ = pixels.resize(count, color);
    }

    fn start_unshift(&mut self, playback: &mut Playback<N>) {
        let count = playback.saved().len();
        Self::fill_flat(&mut self.fade_start, self.color, count);
        self.fade_target.clear();
        let _ = self.fade_target.extend_from_slice(playback.saved());

        playback.restart(self.fade_frames);
        self.state = ShiftyState::FadingBack;
    }

    fn hold_frames(&self) -> u32 {
        let frames = self.hold.as_millis() * u64::from(FADE_FRAME_RATE) / 1000;
        u32::try_from(frames).unwrap_or(u32::MAX)
    }
}

impl<const N: usize> Expression<N> for ShiftyExpression<N> {
    fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> PlayMode {
        self.color = if self.palette.is_empty() {
            playback.saved().first().copied().unwrap_or(WHITE)
        } else {
            random_color(cx.rng(), &self.palette)
        };

        let count = playback.saved().len();
        self.fade_start.clear();
        let _ = self.fade_start.extend_from_slice(playback.saved());
        Self::fill_flat(&mut self.fade_target, self.color, count);

        self.hold = random_duration(cx.rng(), self.hold_min, self.hold_max);
        self.shifted_at = cx.now();
        self.state = ShiftyState::FadingToPalette;

        playback.restart(self.fade_frames);
        PlayMode::Once
    }

    /// Transitions cascade within a tick so short fades never skip a state
    fn on_update<R: RngCore>(&mut self, playback: &mut Playback<N>, cx: &mut Context<'_, R>) {
        let now = cx.now();

        if self.state == ShiftyState::FadingToPalette && playback.is_last_frame() {
            self.state = ShiftyState::Shifted;
            self.shifted_at = now;
            playback.extend(self.hold_frames());
            return;
        }

        if self.state == ShiftyState::Shifted
            && (now.saturating_duration_since(self.shifted_at) > self.hold
                || playback.is_last_frame())
        {
            self.start_unshift(playback);
        }

        if self.state == ShiftyState::FadingBack && playback.is_last_frame() {
            self.state = ShiftyState::Idle;
        }
    }

    fn draw(&mut self, playback: &Playback<N>, pixels: &mut [Color]) {
        match self.state {
            ShiftyState::FadingToPalette | ShiftyState::FadingBack => {
                let sources = self.fade_start.iter().zip(self.fade_target.iter());
                for (pixel, (start, target)) in pixels.iter_mut().zip(sources) {
                    *pixel = fade_linear(*start, *target, playback.frames(), playback.frame());
                }
            }
            ShiftyState::Shifted => {
                for pixel in pixels.iter_mut() {
                    *pixel = self.color;
                }
            }
            // Terminal frame of the cycle
            ShiftyState::Idle => {
                for (pixel, saved) in pixels.iter_mut().zip(playback.saved()) {
                    *pixel = *saved;
                }
            }
        }
    }

    fn on_complete<R: RngCore>(&mut self, cx: &mut Context<'_, R>) {
        if self.state == ShiftyState::Idle {
            cx.trigger(self.chained);
        }
    }
}
