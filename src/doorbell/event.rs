//! Event handoff between interrupt context and the control loop
//!
//! Each asynchronous event gets a single-slot atomic mailbox. Interrupt or
//! callback context only ever raises a flag; the control loop alone clears
//! it, exactly once per handling pass. Release/Acquire ordering makes the
//! raise visible to the loop's next check.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-slot event mailbox.
///
/// Monotonic consumption: raised once per physical event edge, cleared once
/// per handling pass. A raise that lands during a handling pass is observed
/// on a later loop iteration because the loop re-checks every flag before
/// sleeping.
#[derive(Default)]
pub struct EventFlag(AtomicBool);

impl EventFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Signal the event. Safe to call from interrupt/callback context.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check without consuming
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear after a completed handling pass
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl fmt::Debug for EventFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventFlag").field(&self.is_raised()).finish()
    }
}

/// The two external event sources the doorbell reacts to
#[derive(Debug, Clone, Default)]
pub struct Events {
    /// Button pressed (switch interrupt edge)
    pub button: Arc<EventFlag>,
    /// Radio signalled PayloadReady on DIO0
    pub message: Arc<EventFlag>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when either flag is pending
    pub fn any_raised(&self) -> bool {
        self.button.is_raised() || self.message.is_raised()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_check_clear_cycle() {
        let flag = EventFlag::new();
        assert!(!flag.is_raised());
        flag.raise();
        flag.raise(); // second edge before handling coalesces
        assert!(flag.is_raised());
        flag.clear();
        assert!(!flag.is_raised());
    }

    #[test]
    fn events_any_raised() {
        let events = Events::new();
        assert!(!events.any_raised());
        events.message.raise();
        assert!(events.any_raised());
        events.message.clear();
        events.button.raise();
        assert!(events.any_raised());
    }
}
