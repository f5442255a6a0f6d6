//! One-shot celebration latch
//!
//! While launched, further triggers are ignored. The auto-close timer exists exactly
//! when the latch is set; closing early cancels it along with any follow-up burst.

use crate::constants::*;
use crate::schedule::{Deferred, Scheduler, TimerHandle};

/// Signals for the UI layer (modal open/close).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CelebrationSignal {
    Started { name: String, message: String },
    Ended,
}

#[derive(Clone, Debug, Default)]
pub struct Celebration {
    launched: bool,
    auto_close: Option<TimerHandle>,
    follow_up: Option<TimerHandle>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    pub fn auto_close(&self) -> Option<TimerHandle> {
        self.auto_close
    }

    /// Sets the latch and queues the follow-up burst and auto-close around `center`.
    /// Returns `false` without side effects if already launched.
    pub fn trigger(&mut self, scheduler: &mut Scheduler, center: (f64, f64)) -> bool {
        if self.launched {
            return false;
        }
        self.launched = true;
        self.follow_up = Some(scheduler.schedule(
            CELEBRATION_FOLLOW_UP_DELAY_MS,
            Deferred::ConfettiBurst {
                amount: CELEBRATION_FOLLOW_UP,
                x: center.0,
                y: center.1 - CELEBRATION_FOLLOW_UP_LIFT,
            },
        ));
        self.auto_close = Some(scheduler.schedule(
            CELEBRATION_AUTO_CLOSE_MS,
            Deferred::CloseCelebration,
        ));
        true
    }

    /// Forgets a timer that has just fired.
    pub fn timer_fired(&mut self, handle: TimerHandle) {
        if self.follow_up == Some(handle) {
            self.follow_up = None;
        }
    }

    /// Clears the latch and cancels whatever is still queued. Returns `false` if the
    /// latch was not set.
    pub fn close(&mut self, scheduler: &mut Scheduler) -> bool {
        if !self.launched {
            return false;
        }
        for handle in [self.auto_close.take(), self.follow_up.take()].into_iter().flatten() {
            scheduler.cancel(handle);
        }
        self.launched = false;
        true
    }
}
