//! Social behavior
//!
//! Greets newly discovered peer lamps. When an unacknowledged peer shows up,
//! the lamp eases into the peer's signature color, holds it, and eases back
//! to whatever it was showing. Greetings are rate limited so a crowd of
//! peers is acknowledged one at a time.

use embassy_time::{Duration, Instant};
use rand::RngCore;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Color, WHITE, fade};
use crate::config::ExpressionConfig;
use crate::expression::{Context, Expression, PlayMode, Playback};

const PARAM_ACKNOWLEDGE_FRAMES: &str = "acknowledgeFrames";
const PARAM_EASE_FRAMES: &str = "easeFrames";
const PARAM_ACKNOWLEDGE_INTERVAL: &str = "acknowledgeInterval";

const DEFAULT_ACKNOWLEDGE_FRAMES: u32 = 240;
const DEFAULT_EASE_FRAMES: u32 = 60;

/// Minimum time between two greetings, in seconds
const DEFAULT_ACKNOWLEDGE_INTERVAL: u32 = 30;

/// Peer acknowledgment flash
#[derive(Debug, Clone)]
pub struct SocialBehavior {
    color: Color,
    frames: u32,
    ease_frames: u32,
    interval: Duration,
    next_acknowledge: Instant,
}

impl SocialBehavior {
    pub fn from_config(config: &ExpressionConfig<'_>) -> Self {
        let frames = config
            .parameter(PARAM_ACKNOWLEDGE_FRAMES, DEFAULT_ACKNOWLEDGE_FRAMES)
            .max(1);
        let ease_frames = config
            .parameter(PARAM_EASE_FRAMES, DEFAULT_EASE_FRAMES)
            .min(frames / 2);
        let interval =
            config.parameter(PARAM_ACKNOWLEDGE_INTERVAL, DEFAULT_ACKNOWLEDGE_INTERVAL);

        Self {
            color: WHITE,
            frames,
            ease_frames,
            interval: Duration::from_secs(u64::from(interval)),
            next_acknowledge: Instant::from_millis(0),
        }
    }

    /// Color of the peer being greeted
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Earliest time of the next greeting
    pub const fn next_acknowledge(&self) -> Instant {
        self.next_acknowledge
    }

    /// One-shot length and ease length, in frames
    pub const fn timing(&self) -> (u32, u32) {
        (self.frames, self.ease_frames)
    }

    fn render_pixel(&self, playback_frame: u32, is_last: bool, saved: Color) -> Color {
        let ease_out_start = self.frames - self.ease_frames;

        if is_last {
            saved
        } else if playback_frame < self.ease_frames {
            fade(saved, self.color, self.ease_frames, playback_frame)
        } else if playback_frame > ease_out_start {
            fade(self.color, saved, self.ease_frames, playback_frame - ease_out_start)
        } else {
            self.color
        }
    }
}

impl<const N: usize> Expression<N> for SocialBehavior {
    fn on_trigger<R: RngCore>(
        &mut self,
        playback: &mut Playback<N>,
        _cx: &mut Context<'_, R>,
    ) -> PlayMode {
        playback.restart(self.frames);
        PlayMode::Once
    }

    /// Acknowledge the most recently discovered peer not yet greeted
    fn wants_trigger<R: RngCore>(
        &mut self,
        playback: &Playback<N>,
        cx: &mut Context<'_, R>,
    ) -> bool {
        let now = cx.now();
        if !playback.is_stopped() || now < self.next_acknowledge {
            return false;
        }

        let Some(peer) = cx.peers_mut().iter_mut().rev().find(|peer| !peer.acknowledged) else {
            return false;
        };

        #[cfg(feature = "esp32-log")]
        println!("[SocialBehavior] acknowledging {}", peer.name.as_str());

        peer.acknowledged = true;
        self.color = peer.color;
        self.next_acknowledge = now + self.interval;
        true
    }

    fn draw(&mut self, playback: &Playback<N>, pixels: &mut [Color]) {
        let frame = playback.frame();
        let is_last = playback.is_last_frame();

        for (pixel, saved) in pixels.iter_mut().zip(playback.saved()) {
            *pixel = self.render_pixel(frame, is_last, *saved);
        }
    }
}
