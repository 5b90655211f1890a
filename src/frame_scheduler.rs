//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
use rand::RngCore;

use crate::OutputDriver;
use crate::intent::IntentReceiver;
use crate::manager::ExpressionManager;
use crate::peers::LampRecord;

/// Default target frame rate, matching the rate fades are authored for.
pub const DEFAULT_FPS: u32 = 30;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives the expression manager at a steady frame rate.
///
/// Each tick drains pending intents, runs one manager tick and hands the
/// resulting buffer to the output driver.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(manager, driver).with_intents(receiver);
///
/// loop {
///     let now = Instant::from_millis(get_current_time_ms());
///     let result = scheduler.tick(now, discovery.lamps_mut());
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, O, const N: usize, const M: usize, const SIZE: usize, R>
where
    O: OutputDriver,
    R: RngCore,
{
    output: O,
    manager: ExpressionManager<N, M, R>,
    intents: Option<IntentReceiver<'a, SIZE>>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O, const N: usize, const M: usize, const SIZE: usize, R>
    FrameScheduler<'a, O, N, M, SIZE, R>
where
    O: OutputDriver,
    R: RngCore,
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (30 FPS) for frame timing.
    pub fn new(manager: ExpressionManager<N, M, R>, driver: O) -> Self {
        Self::with_frame_duration(manager, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        manager: ExpressionManager<N, M, R>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            manager,
            intents: None,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Drain intents from `receiver` at the start of every frame.
    #[must_use]
    pub fn with_intents(mut self, receiver: IntentReceiver<'a, SIZE>) -> Self {
        self.intents = Some(receiver);
        self
    }

    /// Process one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant, peers: &mut [LampRecord]) -> FrameResult {
        // Skip the backlog instead of bursting after a long stall
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        if let Some(intents) = self.intents {
            intents.apply_pending(&mut self.manager);
        }

        let frame = self.manager.tick(now, peers);
        self.output.write(frame);

        self.next_frame += self.frame_duration;

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        }
    }

    /// Get a reference to the manager.
    pub fn manager(&self) -> &ExpressionManager<N, M, R> {
        &self.manager
    }

    /// Get a mutable reference to the manager.
    pub fn manager_mut(&mut self) -> &mut ExpressionManager<N, M, R> {
        &mut self.manager
    }
}
