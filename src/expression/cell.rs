//! Single state-machine driver shared by every expression variant

use rand::RngCore;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{AnimationState, AutoTrigger, Context, ExpressionSlot, Playback, Tick};
use crate::color::Color;

/// A registered expression: variant, bookkeeping and random stream
#[derive(Debug, Clone)]
pub struct ExpressionCell<const N: usize, R> {
    name: &'static str,
    slot: ExpressionSlot<N>,
    playback: Playback<N>,
    rng: R,
    auto_trigger: Option<AutoTrigger>,
}

impl<const N: usize, R: RngCore> ExpressionCell<N, R> {
    pub fn new(name: &'static str, slot: ExpressionSlot<N>, rng: R) -> Self {
        Self {
            name,
            slot,
            playback: Playback::new(),
            rng,
            auto_trigger: None,
        }
    }

    /// Trigger the expression on its own at random intervals
    #[must_use]
    pub fn with_auto_trigger(mut self, auto_trigger: Option<AutoTrigger>) -> Self {
        self.auto_trigger = auto_trigger;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn slot(&self) -> &ExpressionSlot<N> {
        &self.slot
    }

    pub const fn playback(&self) -> &Playback<N> {
        &self.playback
    }

    pub const fn state(&self) -> AnimationState {
        self.playback.state()
    }

    /// Playing, either looped or once
    pub const fn is_active(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn is_exclusive(&self) -> bool {
        self.slot.is_exclusive()
    }

    pub fn allowed_in_home_mode(&self) -> bool {
        self.slot.allowed_in_home_mode()
    }

    /// Start a run from the current buffer contents
    ///
    /// Does nothing unless the expression is stopped. Returns whether a run
    /// was started.
    pub(crate) fn trigger(&mut self, buffer: &[Color], tick: &mut Tick<'_>) -> bool {
        if !self.playback.is_stopped() {
            return false;
        }

        self.playback.save(buffer);
        let mut cx = Context::new(tick, &mut self.rng);
        let mode = self.slot.on_trigger(&mut self.playback, &mut cx);
        self.playback.start(mode);

        #[cfg(feature = "esp32-log")]
        println!(
            "[ExpressionCell.trigger] {} started ({:?}, {} frames)",
            self.name,
            mode,
            self.playback.frames()
        );
        true
    }

    /// Force the expression to stop, leaving the buffer as it is
    pub(crate) fn stop(&mut self) {
        self.playback.stop();
    }

    /// Per-tick update, called before `draw`
    ///
    /// `trigger_blocked` is set while a different exclusive expression is
    /// active; self-triggers wait until it ends.
    pub(crate) fn control(
        &mut self,
        buffer: &[Color],
        tick: &mut Tick<'_>,
        paused: bool,
        trigger_blocked: bool,
    ) {
        if paused {
            return;
        }

        if !trigger_blocked {
            let wants_trigger = {
                let mut cx = Context::new(tick, &mut self.rng);
                self.slot.wants_trigger(&self.playback, &mut cx)
            };
            let scheduled = self.playback.is_stopped()
                && self
                    .auto_trigger
                    .as_mut()
                    .is_some_and(|auto| auto.poll(tick.now, &mut self.rng));

            if wants_trigger || scheduled {
                self.trigger(buffer, tick);
            }
        }

        if self.playback.is_playing() {
            let mut cx = Context::new(tick, &mut self.rng);
            self.slot.on_update(&mut self.playback, &mut cx);
        }
    }

    /// Per-tick render, called after `control`
    ///
    /// A paused expression neither writes nor advances. A hidden one keeps
    /// its frame bookkeeping going without touching the pixels.
    pub(crate) fn draw(
        &mut self,
        pixels: &mut [Color],
        tick: &mut Tick<'_>,
        paused: bool,
        hidden: bool,
    ) {
        if paused || self.playback.is_stopped() {
            return;
        }

        if !hidden {
            self.slot.draw(&self.playback, pixels);
        }

        let mut completed = self.playback.next_frame();
        if self.playback.is_playing() && self.slot.is_finished(pixels.len()) {
            self.playback.stop();
            completed = true;
        }

        if completed {
            #[cfg(feature = "esp32-log")]
            println!("[ExpressionCell.draw] {} completed", self.name);

            let mut cx = Context::new(tick, &mut self.rng);
            self.slot.on_complete(&mut cx);
        }
    }
}
