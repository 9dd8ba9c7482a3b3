//! Frame scheduler
//!
//! Holds at most one pending tick. The owner drains elapsed time through
//! `poll`, which reports when the pending tick is due. `cancel` drops the
//! pending tick in the same call that bumps the generation, so nothing armed
//! before a cancel can come due after it.

#[derive(Debug, Clone, Copy)]
struct PendingTick {
    remaining: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Option<PendingTick>,
    generation: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request one tick after `delay` seconds. No-op (returns false) while a
    /// tick is already pending.
    pub fn arm(&mut self, delay: f32) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingTick {
            remaining: delay.max(0.0),
        });
        true
    }

    /// Drop the pending tick; nothing armed before this call can fire
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("Cancelled pending tick (generation {})", self.generation);
        }
        self.generation += 1;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Spend time from `budget` on the pending tick. Returns true once it is
    /// due; the time it needed is deducted from the budget.
    pub fn poll(&mut self, budget: &mut f32) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        if pending.remaining <= *budget {
            *budget -= pending.remaining;
            self.pending = None;
            true
        } else {
            pending.remaining -= *budget;
            *budget = 0.0;
            false
        }
    }
}
