//! Deferred actions on the frame clock
//!
//! Follow-up bursts and the celebration auto-close are queued here instead of on
//! platform timers, so cancelling one is an explicit call on its handle.
//!
//! Requests can arrive between frames (the countdown runs on its own interval), so
//! a new action only records its delay. The next frame stamps it with its own
//! timestamp and the delay counts from there.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Deferred {
    ConfettiBurst { amount: usize, x: f64, y: f64 },
    CloseCelebration,
}

#[derive(Clone, Debug)]
struct Pending {
    handle: TimerHandle,
    delay_ms: f64,
    /// `None` until the first frame after scheduling.
    due_ms: Option<f64>,
    action: Deferred,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to run `delay_ms` after the next frame stamp.
    pub fn schedule(&mut self, delay_ms: f64, action: Deferred) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            delay_ms: delay_ms.max(0.0),
            due_ms: None,
            action,
        });
        handle
    }

    /// Starts the delay of every action queued since the previous frame.
    pub fn stamp(&mut self, now_ms: f64) {
        for p in &mut self.pending {
            p.due_ms.get_or_insert(now_ms + p.delay_ms);
        }
    }

    /// Returns whether the action was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every stamped action due at `now_ms`, earliest first.
    /// Unstamped actions are never due.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TimerHandle, Deferred)> {
        let mut due: Vec<(f64, Pending)> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            match self.pending[i].due_ms {
                Some(at) if at <= now_ms => due.push((at, self.pending.swap_remove(i))),
                _ => i += 1,
            }
        }
        due.sort_by(|(a, pa), (b, pb)| a.total_cmp(b).then(pa.handle.0.cmp(&pb.handle.0)));
        due.into_iter().map(|(_, p)| (p.handle, p.action)).collect()
    }
}
