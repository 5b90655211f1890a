#![no_std]

pub mod color;
pub mod config;
pub mod expression;
pub mod frame_buffer;
pub mod frame_scheduler;
pub mod intent;
pub mod manager;
pub mod math8;
pub mod peers;
pub mod relay;
pub mod social;

pub use config::{ExpressionConfig, Parameters};
pub use expression::{AnimationState, ExpressionCell, ExpressionId, ExpressionSlot, ShiftyState};
pub use frame_buffer::FrameBuffer;
pub use frame_scheduler::FrameScheduler;
pub use intent::{IntentChannel, IntentReceiver, IntentSender, LampIntent};
pub use manager::{ExpressionManager, RegistryError};
pub use peers::LampRecord;
pub use relay::{ArtnetRelay, RelayConfig};
pub use social::SocialBehavior;

pub use color::{BLACK, Color, WHITE, fade, fade_linear, rgbw};
pub use math8::ease_in_out_quad;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Color]);
}
