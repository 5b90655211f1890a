//! Intents from other subsystems
//!
//! Network handlers, manual commands and mode switches may run in other
//! tasks or interrupts. They never touch the manager directly; instead they
//! queue a [`LampIntent`] in a bounded channel built on `critical-section`
//! and `heapless::Deque`, and the frame loop drains it at the start of each
//! frame.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, String};
use rand::RngCore;

use crate::manager::ExpressionManager;

/// Maximum length of an expression name carried by an intent
pub const MAX_INTENT_NAME_LEN: usize = 24;

/// Expression name carried by an intent
pub type IntentName = String<MAX_INTENT_NAME_LEN>;

/// A request to change what the lamp shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LampIntent {
    /// Trigger an expression by name
    Trigger(IntentName),
    /// Stop an expression by name
    Stop(IntentName),
    /// Enter or leave home mode
    HomeMode(bool),
}

/// Error returned when a name does not fit into an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTooLong;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError(pub LampIntent);

fn intent_name(name: &str) -> Result<IntentName, NameTooLong> {
    let mut stored = IntentName::new();
    stored.push_str(name).map_err(|()| NameTooLong)?;
    Ok(stored)
}

impl LampIntent {
    pub fn trigger(name: &str) -> Result<Self, NameTooLong> {
        intent_name(name).map(Self::Trigger)
    }

    pub fn stop(name: &str) -> Result<Self, NameTooLong> {
        intent_name(name).map(Self::Stop)
    }

    /// Apply the intent to the manager
    pub fn apply<const N: usize, const M: usize, R: RngCore>(
        &self,
        manager: &mut ExpressionManager<N, M, R>,
    ) {
        match self {
            Self::Trigger(name) => manager.trigger_expression(name),
            Self::Stop(name) => manager.stop_expression(name),
            Self::HomeMode(home_mode) => manager.set_home_mode(*home_mode),
        }
    }
}

/// A bounded, interrupt-safe intent queue.
pub struct IntentChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<LampIntent, SIZE>>>,
}

impl<const SIZE: usize> Default for IntentChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> IntentChannel<SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this channel.
    pub const fn sender(&self) -> IntentSender<'_, SIZE> {
        IntentSender { channel: self }
    }

    /// Get a receiver handle for this channel.
    pub const fn receiver(&self) -> IntentReceiver<'_, SIZE> {
        IntentReceiver { channel: self }
    }

    /// Queue an intent, handing it back if the channel is full
    pub fn try_send(&self, intent: LampIntent) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(intent).map_err(TrySendError)
        })
    }

    /// Take the oldest queued intent
    pub fn try_receive(&self) -> Option<LampIntent> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

/// Sending side of an [`IntentChannel`], cheap to copy into other tasks.
#[derive(Clone, Copy)]
pub struct IntentSender<'a, const SIZE: usize> {
    channel: &'a IntentChannel<SIZE>,
}

impl<const SIZE: usize> IntentSender<'_, SIZE> {
    pub fn try_send(&self, intent: LampIntent) -> Result<(), TrySendError> {
        self.channel.try_send(intent)
    }
}

/// Receiving side of an [`IntentChannel`].
#[derive(Clone, Copy)]
pub struct IntentReceiver<'a, const SIZE: usize> {
    channel: &'a IntentChannel<SIZE>,
}

impl<const SIZE: usize> IntentReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<LampIntent> {
        self.channel.try_receive()
    }

    /// Apply every pending intent to the manager (non-blocking)
    ///
    /// Returns the number of intents applied.
    pub fn apply_pending<const N: usize, const M: usize, R: RngCore>(
        &self,
        manager: &mut ExpressionManager<N, M, R>,
    ) -> usize {
        let mut applied = 0;
        while let Some(intent) = self.try_receive() {
            intent.apply(manager);
            applied += 1;
        }
        applied
    }
}
