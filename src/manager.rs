//! Expression manager - the compositor
//!
//! Owns the frame buffer and the ordered registry of expressions, runs
//! `control` then `draw` for each of them once per tick and arbitrates which
//! of them may write to the buffer.

use embassy_time::Instant;
use heapless::Vec;
use rand::RngCore;
use rand::rngs::SmallRng;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Color;
use crate::config::ExpressionConfig;
use crate::expression::{
    AnimationState, ExpressionCell, ExpressionId, ExpressionSlot, Tick, TriggerQueue,
};
use crate::frame_buffer::FrameBuffer;
use crate::peers::LampRecord;

/// Error returned when an expression cannot be registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// All `M` registry slots are taken
    Full,
    /// Another expression already uses this name
    DuplicateName,
}

/// Owns the frame buffer and every registered expression
///
/// `N` is the pixel capacity, `M` the registry capacity. Each expression
/// owns its own random stream of type `R`.
pub struct ExpressionManager<const N: usize, const M: usize, R = SmallRng> {
    buffer: FrameBuffer<N>,
    expressions: Vec<ExpressionCell<N, R>, M>,
    triggers: TriggerQueue,
    home_mode: bool,
    now: Instant,
}

impl<const N: usize, const M: usize, R: RngCore> ExpressionManager<N, M, R> {
    pub fn new(buffer: FrameBuffer<N>) -> Self {
        Self {
            buffer,
            expressions: Vec::new(),
            triggers: TriggerQueue::new(),
            home_mode: false,
            now: Instant::from_millis(0),
        }
    }

    /// Register a prepared expression
    ///
    /// Registration order is the per-tick iteration order.
    pub fn register_cell(&mut self, cell: ExpressionCell<N, R>) -> Result<(), RegistryError> {
        if self.position(cell.name()).is_some() {
            return Err(RegistryError::DuplicateName);
        }
        self.expressions
            .push(cell)
            .map_err(|_| RegistryError::Full)
    }

    /// Register a slot under `name`
    pub fn register(
        &mut self,
        name: &'static str,
        slot: ExpressionSlot<N>,
        rng: R,
    ) -> Result<(), RegistryError> {
        self.register_cell(ExpressionCell::new(name, slot, rng))
    }

    /// Build an expression from configuration and register it under its id name
    pub fn register_config(
        &mut self,
        id: ExpressionId,
        config: &ExpressionConfig<'_>,
        rng: R,
    ) -> Result<(), RegistryError> {
        let slot = id.to_slot(config, self.buffer.pixel_count());
        let cell = ExpressionCell::new(id.as_str(), slot, rng)
            .with_auto_trigger(config.auto_trigger());
        self.register_cell(cell)
    }

    /// Trigger an expression by name
    ///
    /// Unknown names are ignored: callers probe for optional expressions.
    /// An exclusive expression is not started while a different exclusive
    /// one is active.
    pub fn trigger_expression(&mut self, name: &str) {
        self.trigger_named(name, &mut []);
    }

    /// Stop an expression by name, leaving the buffer untouched
    pub fn stop_expression(&mut self, name: &str) {
        if let Some(index) = self.position(name) {
            self.expressions[index].stop();
        }
    }

    /// Set the global home-mode flag
    pub fn set_home_mode(&mut self, home_mode: bool) {
        self.home_mode = home_mode;
    }

    pub const fn home_mode(&self) -> bool {
        self.home_mode
    }

    pub const fn frame_buffer(&self) -> &FrameBuffer<N> {
        &self.buffer
    }

    /// Current pixel colors
    pub fn pixels(&self) -> &[Color] {
        self.buffer.as_slice()
    }

    /// Look up a registered expression
    pub fn expression(&self, name: &str) -> Option<&ExpressionCell<N, R>> {
        self.expressions.iter().find(|cell| cell.name() == name)
    }

    /// Playback state of a registered expression
    pub fn state_of(&self, name: &str) -> Option<AnimationState> {
        self.expression(name).map(ExpressionCell::state)
    }

    /// Registered expressions in iteration order
    pub fn expressions(&self) -> impl Iterator<Item = &ExpressionCell<N, R>> {
        self.expressions.iter()
    }

    /// Process one frame
    ///
    /// Runs `control` and `draw` for every expression in registration order.
    /// Self-triggers of an exclusive expression follow the same conflict rule
    /// as [`Self::trigger_expression`].
    /// Triggers queued by an expression (chaining) are applied right after
    /// its draw call. `peers` is the discovery collaborator's current list.
    pub fn tick(&mut self, now: Instant, peers: &mut [LampRecord]) -> &[Color] {
        self.now = now;

        for index in 0..self.expressions.len() {
            let paused = self.should_pause(index);
            let hidden = !self.should_affect_buffer(index);
            let trigger_blocked =
                self.expressions[index].is_exclusive() && self.exclusive_conflict(index);

            let mut tick = Tick {
                now,
                peers: &mut *peers,
                triggers: &mut self.triggers,
            };
            let cell = &mut self.expressions[index];
            cell.control(self.buffer.as_slice(), &mut tick, paused, trigger_blocked);
            cell.draw(self.buffer.as_mut_slice(), &mut tick, paused, hidden);

            self.apply_triggers(peers);
        }

        self.buffer.as_slice()
    }

    /// Non-exclusive expressions skip ticks while a different exclusive
    /// expression is playing
    fn should_pause(&self, index: usize) -> bool {
        if self.expressions[index].is_exclusive() {
            return false;
        }

        self.expressions
            .iter()
            .enumerate()
            .any(|(other, cell)| other != index && cell.is_exclusive() && cell.is_active())
    }

    fn should_affect_buffer(&self, index: usize) -> bool {
        !self.home_mode || self.expressions[index].allowed_in_home_mode()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.expressions.iter().position(|cell| cell.name() == name)
    }

    fn apply_triggers(&mut self, peers: &mut [LampRecord]) {
        while let Some(name) = self.triggers.pop_front() {
            self.trigger_named(name, peers);
        }
    }

    fn trigger_named(&mut self, name: &str, peers: &mut [LampRecord]) {
        let Some(index) = self.position(name) else {
            #[cfg(feature = "esp32-log")]
            println!("[ExpressionManager.trigger] unknown expression {}", name);
            return;
        };

        if self.expressions[index].is_exclusive() && self.exclusive_conflict(index) {
            #[cfg(feature = "esp32-log")]
            println!("[ExpressionManager.trigger] {} rejected, exclusive busy", name);
            return;
        }

        let mut tick = Tick {
            now: self.now,
            peers,
            triggers: &mut self.triggers,
        };
        self.expressions[index].trigger(self.buffer.as_slice(), &mut tick);
    }

    fn exclusive_conflict(&self, index: usize) -> bool {
        self.expressions
            .iter()
            .enumerate()
            .any(|(other, cell)| other != index && cell.is_exclusive() && cell.is_active())
    }
}
