//! Expression system with compile-time known expression variants
//!
//! Every expression is a small state machine driven once per tick through
//! the same lifecycle: trigger, control (update), draw, complete. The shared
//! bookkeeping lives in [`Playback`] and the per-tick driver in
//! [`ExpressionCell`]; variants only implement the [`Expression`] hooks.
//!
//! All variants are stored in an enum to avoid heap allocations.

mod breathing;
mod cell;
mod glitchy;
mod pulse;
mod shifty;

use embassy_time::{Duration, Instant};
use heapless::Deque;
use rand::{Rng, RngCore, seq::SliceRandom};

pub use breathing::{BreathingExpression, breath_intensity, next_palette_index};
pub use cell::ExpressionCell;
pub use glitchy::GlitchyExpression;
pub use pulse::{PulseExpression, pulse_weight};
pub use shifty::{FADE_FRAME_RATE, ShiftyExpression, ShiftyState};

use crate::color::{Color, WHITE};
use crate::config::ExpressionConfig;
use crate::frame_buffer::Pixels;
use crate::peers::LampRecord;
use crate::social::SocialBehavior;

const EXPRESSION_NAME_BREATHING: &str = "breathing";
const EXPRESSION_NAME_GLITCHY: &str = "glitchy";
const EXPRESSION_NAME_PULSE: &str = "pulse";
const EXPRESSION_NAME_SHIFTY: &str = "shifty";
const EXPRESSION_NAME_SOCIAL: &str = "social";

/// Maximum number of chained triggers queued during a single draw
pub const MAX_PENDING_TRIGGERS: usize = 4;

pub(crate) type TriggerQueue = Deque<&'static str, MAX_PENDING_TRIGGERS>;

/// Playback state of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Stopped,
    /// Loops until stopped from outside
    Playing,
    /// Runs `frames` ticks, then stops on its own
    PlayingOnce,
}

/// Playback mode selected by a variant when it is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Loop,
    Once,
}

/// Frame bookkeeping and trigger-time snapshot of one expression
///
/// Invariant: `frame <= frames`, and `frame` is 0 whenever the state is
/// [`AnimationState::Stopped`].
#[derive(Debug, Clone)]
pub struct Playback<const N: usize> {
    state: AnimationState,
    frame: u32,
    frames: u32,
    saved: Pixels<N>,
}

impl<const N: usize> Default for Playback<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Playback<N> {
    pub const fn new() -> Self {
        Self {
            state: AnimationState::Stopped,
            frame: 0,
            frames: 0,
            saved: Pixels::new(),
        }
    }

    pub const fn state(&self) -> AnimationState {
        self.state
    }

    pub const fn frame(&self) -> u32 {
        self.frame
    }

    pub const fn frames(&self) -> u32 {
        self.frames
    }

    pub const fn is_stopped(&self) -> bool {
        matches!(self.state, AnimationState::Stopped)
    }

    pub const fn is_playing(&self) -> bool {
        !self.is_stopped()
    }

    /// Whether the current frame is the final one of this run
    pub const fn is_last_frame(&self) -> bool {
        self.frames > 0 && self.frame.saturating_add(1) >= self.frames
    }

    /// Buffer snapshot taken when the expression was triggered
    pub fn saved(&self) -> &[Color] {
        &self.saved
    }

    /// Reset the frame counter and set a new run length
    pub fn restart(&mut self, frames: u32) {
        self.frame = 0;
        self.frames = frames.max(1);
    }

    /// Keep the run going for `extra` frames after the current one
    pub fn extend(&mut self, extra: u32) {
        self.frames = self.frame.saturating_add(1).saturating_add(extra.max(1));
    }

    pub(crate) fn save(&mut self, pixels: &[Color]) {
        let count = pixels.len().min(N);
        self.saved.clear();
        let _ = self.saved.extend_from_slice(&pixels[..count]);
    }

    pub(crate) fn start(&mut self, mode: PlayMode) {
        self.state = match mode {
            PlayMode::Loop => AnimationState::Playing,
            PlayMode::Once => AnimationState::PlayingOnce,
        };
    }

    pub(crate) fn stop(&mut self) {
        self.state = AnimationState::Stopped;
        self.frame = 0;
    }

    /// Advance one frame
    ///
    /// Returns `true` when a one-shot run has just ended.
    pub(crate) fn next_frame(&mut self) -> bool {
        if self.is_stopped() {
            return false;
        }

        self.frame = self.frame.saturating_add(1);
        if self.frame < self.frames {
            return false;
        }

        match self.state {
            AnimationState::PlayingOnce => {
                self.stop();
                true
            }
            AnimationState::Playing => {
                self.frame = 0;
                false
            }
            AnimationState::Stopped => false,
        }
    }
}

/// Per-tick inputs shared by every expression
pub(crate) struct Tick<'a> {
    pub(crate) now: Instant,
    pub(crate) peers: &'a mut [LampRecord],
    pub(crate) triggers: &'a mut TriggerQueue,
}

/// What an expression hook can see and do during a tick
pub struct Context<'a, R> {
    now: Instant,
    rng: &'a mut R,
    peers: &'a mut [LampRecord],
    triggers: &'a mut TriggerQueue,
}

impl<'a, R: RngCore> Context<'a, R> {
    pub(crate) fn new(tick: &'a mut Tick<'_>, rng: &'a mut R) -> Self {
        Self {
            now: tick.now,
            rng,
            peers: &mut *tick.peers,
            triggers: &mut *tick.triggers,
        }
    }

    pub const fn now(&self) -> Instant {
        self.now
    }

    /// Random stream owned by the current expression
    pub fn rng(&mut self) -> &mut R {
        self.rng
    }

    /// Discovered peer lamps, oldest first
    pub fn peers_mut(&mut self) -> &mut [LampRecord] {
        self.peers
    }

    /// Ask the manager to trigger another expression by name
    ///
    /// The trigger is applied as soon as the current expression finishes its
    /// draw call. Unknown names are ignored by the manager.
    pub fn trigger(&mut self, name: &'static str) {
        if self.triggers.push_back(name).is_err() {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("[Context.trigger] queue full, dropping {}", name);
        }
    }
}

/// Periodic self-trigger with a random interval
#[derive(Debug, Clone, Copy)]
pub struct AutoTrigger {
    min: Duration,
    max: Duration,
    next: Option<Instant>,
}

impl AutoTrigger {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            next: None,
        }
    }

    /// Returns `true` once the drawn interval has elapsed
    ///
    /// The first poll after a run only arms the next deadline.
    pub(crate) fn poll<R: RngCore>(&mut self, now: Instant, rng: &mut R) -> bool {
        match self.next {
            None => {
                self.next = Some(now + random_duration(rng, self.min, self.max));
                false
            }
            Some(deadline) if now >= deadline => {
                self.next = None;
                true
            }
            Some(_) => false,
        }
    }
}

/// Uniform value in `min..=max`; `min` when the range is degenerate
pub fn random_between<R: RngCore>(rng: &mut R, min: u32, max: u32) -> u32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniform duration in `min..=max` with millisecond resolution
pub fn random_duration<R: RngCore>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    let (min, max) = (min.as_millis(), max.as_millis());
    if min >= max {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rng.gen_range(min..=max))
}

/// Random palette entry, white for an empty palette
pub fn random_color<R: RngCore>(rng: &mut R, palette: &[Color]) -> Color {
    palette.choose(rng).copied().unwrap_or(WHITE)
}

/// Hooks implemented by every expression variant
///
/// The driver ([`ExpressionCell`]) owns the lifecycle: it snapshots the
/// buffer before `on_trigger`, skips ticks while paused, advances frames
/// after `draw` and calls `on_complete` once a one-shot run ends.
pub trait Expression<const N: usize> {
    /// Pauses co-running non-exclusive expressions while active
    const EXCLUSIVE: bool = false;

    /// Keeps writing to the buffer while the lamp is in home mode
    const ALLOWED_IN_HOME_MODE: bool = false;

    /// Variant setup: run length, random choices, initial physics
    fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> PlayMode;

    /// Advance timers and physics, called once per tick while playing
    fn on_update<R: RngCore>(&mut self, _playback: &mut Playback<N>, _cx: &mut Context<'_, R>) {}

    /// Ask the driver to trigger this expression on the current tick
    fn wants_trigger<R: RngCore>(
        &mut self,
        _playback: &Playback<N>,
        _cx: &mut Context<'_, R>,
    ) -> bool {
        false
    }

    /// Write the current frame
    fn draw(&mut self, playback: &Playback<N>, pixels: &mut [Color]);

    /// Ends the run early, checked after every drawn frame
    fn is_finished(&self, _pixel_count: usize) -> bool {
        false
    }

    /// Called once when a run ends on its own
    fn on_complete<R: RngCore>(&mut self, _cx: &mut Context<'_, R>) {}
}

/// Expression slot - enum containing all possible expressions
#[derive(Debug, Clone)]
pub enum ExpressionSlot<const N: usize> {
    /// Continuous breathing between the trigger snapshot and the palette
    Breathing(BreathingExpression),
    /// Short exclusive tint burst
    Glitchy(GlitchyExpression),
    /// Wave traveling along the strip
    Pulse(PulseExpression),
    /// Slow shift to a palette color and back
    Shifty(ShiftyExpression<N>),
    /// Peer acknowledgment flash
    Social(SocialBehavior),
}

/// Known expression ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpressionId {
    Breathing,
    Glitchy,
    Pulse,
    Shifty,
    Social,
}

impl ExpressionId {
    /// Build a configured slot for a strip of `pixel_count` pixels
    pub fn to_slot<const N: usize>(
        self,
        config: &ExpressionConfig<'_>,
        pixel_count: usize,
    ) -> ExpressionSlot<N> {
        match self {
            Self::Breathing => ExpressionSlot::Breathing(BreathingExpression::from_config(config)),
            Self::Glitchy => ExpressionSlot::Glitchy(GlitchyExpression::from_config(config)),
            Self::Pulse => {
                ExpressionSlot::Pulse(PulseExpression::from_config(config, pixel_count))
            }
            Self::Shifty => ExpressionSlot::Shifty(ShiftyExpression::from_config(config)),
            Self::Social => ExpressionSlot::Social(SocialBehavior::from_config(config)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breathing => EXPRESSION_NAME_BREATHING,
            Self::Glitchy => EXPRESSION_NAME_GLITCHY,
            Self::Pulse => EXPRESSION_NAME_PULSE,
            Self::Shifty => EXPRESSION_NAME_SHIFTY,
            Self::Social => EXPRESSION_NAME_SOCIAL,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EXPRESSION_NAME_BREATHING => Some(Self::Breathing),
            EXPRESSION_NAME_GLITCHY => Some(Self::Glitchy),
            EXPRESSION_NAME_PULSE => Some(Self::Pulse),
            EXPRESSION_NAME_SHIFTY => Some(Self::Shifty),
            EXPRESSION_NAME_SOCIAL => Some(Self::Social),
            _ => None,
        }
    }
}

/// Forward a hook call to the variant stored in the slot
macro_rules! dispatch {
    ($slot:expr, $expression:ident => $call:expr) => {
        match $slot {
            ExpressionSlot::Breathing($expression) => $call,
            ExpressionSlot::Glitchy($expression) => $call,
            ExpressionSlot::Pulse($expression) => $call,
            ExpressionSlot::Shifty($expression) => $call,
            ExpressionSlot::Social($expression) => $call,
        }
    };
}

impl<const N: usize> ExpressionSlot<N> {
    /// Get the expression ID for external observation
    pub fn id(&self) -> ExpressionId {
        match self {
            Self::Breathing(_) => ExpressionId::Breathing,
            Self::Glitchy(_) => ExpressionId::Glitchy,
            Self::Pulse(_) => ExpressionId::Pulse,
            Self::Shifty(_) => ExpressionId::Shifty,
            Self::Social(_) => ExpressionId::Social,
        }
    }

    /// Derived from each variant's `Expression::EXCLUSIVE` constant
    pub fn is_exclusive(&self) -> bool {
        match self {
            Self::Breathing(_) => <BreathingExpression as Expression<N>>::EXCLUSIVE,
            Self::Glitchy(_) => <GlitchyExpression as Expression<N>>::EXCLUSIVE,
            Self::Pulse(_) => <PulseExpression as Expression<N>>::EXCLUSIVE,
            Self::Shifty(_) => <ShiftyExpression<N> as Expression<N>>::EXCLUSIVE,
            Self::Social(_) => <SocialBehavior as Expression<N>>::EXCLUSIVE,
        }
    }

    /// Derived from each variant's `Expression::ALLOWED_IN_HOME_MODE` constant
    pub fn allowed_in_home_mode(&self) -> bool {
        match self {
            Self::Breathing(_) => <BreathingExpression as Expression<N>>::ALLOWED_IN_HOME_MODE,
            Self::Glitchy(_) => <GlitchyExpression as Expression<N>>::ALLOWED_IN_HOME_MODE,
            Self::Pulse(_) => <PulseExpression as Expression<N>>::ALLOWED_IN_HOME_MODE,
            Self::Shifty(_) => <ShiftyExpression<N> as Expression<N>>::ALLOWED_IN_HOME_MODE,
            Self::Social(_) => <SocialBehavior as Expression<N>>::ALLOWED_IN_HOME_MODE,
        }
    }

    pub(crate) fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> PlayMode {
        dispatch!(self, expression => expression.on_trigger(playback, cx))
    }

    pub(crate) fn on_update<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        cx: &mut Context<'_, R>,
    ) {
        dispatch!(self, expression => expression.on_update(playback, cx));
    }

    pub(crate) fn wants_trigger<R: RngCore>(
        &mut self,
        playback: &Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> bool {
        dispatch!(self, expression => expression.wants_trigger(playback, cx))
    }

    pub(crate) fn draw(&mut self, playback: &Playback<N>, pixels: &mut [Color]) {
        dispatch!(self, expression => expression.draw(playback, pixels));
    }

    pub(crate) fn is_finished(&self, pixel_count: usize) -> bool {
        dispatch!(self, expression => Expression::<N>::is_finished(expression, pixel_count))
    }

    pub(crate) fn on_complete<R: RngCore>(&mut self, cx: &mut Context<'_, R>) {
        dispatch!(self, expression => Expression::<N>::on_complete(expression, cx));
    }
}
