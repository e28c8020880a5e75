//! Tick-based scheduler for deferred and repeating game actions.
//!
//! Timers are plain data: nothing runs on its own. The owner advances the
//! clock with [`Scheduler::advance`] and then drains fired events with
//! [`Scheduler::pop_due`], dispatching each one before asking for the next.
//! Draining one event at a time lets a handler cancel timers that are due in
//! the same tick (e.g. ending a session cancels every pending expiry).

/// Opaque handle returned when a timer is armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Timer<E> {
    id: u64,
    due: u64,
    /// `Some(period)` for repeating timers.
    period: Option<u64>,
    event: E,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    now: u64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Current scheduler time in ticks.
    #[cfg(test)]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of armed timers.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Fire `event` once, `delay` ticks from now (minimum 1).
    pub fn once(&mut self, delay: u64, event: E) -> TimerHandle {
        self.arm(delay.max(1), None, event)
    }

    /// Fire `event` every `period` ticks (minimum 1), first after one period.
    pub fn repeating(&mut self, period: u64, event: E) -> TimerHandle {
        let period = period.max(1);
        self.arm(period, Some(period), event)
    }

    fn arm(&mut self, delay: u64, period: Option<u64>, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            event,
        });
        TimerHandle(id)
    }

    /// Cancel a timer. Cancelling an already fired or cancelled timer is a
    /// no-op; returns whether anything was removed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != handle.0);
        self.timers.len() != before
    }

    /// Cancel everything at once.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.id == handle.0)
    }

    /// Move the clock forward by `ticks`.
    pub fn advance(&mut self, ticks: u64) {
        self.now += ticks;
    }

    /// Remove and return the earliest due event, if any.
    ///
    /// Ties are broken by arming order. Repeating timers are re-armed one
    /// period after their due time, so a large `advance` replays every
    /// missed period in order.
    pub fn pop_due(&mut self) -> Option<E> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        match self.timers[idx].period {
            Some(period) => {
                let timer = &mut self.timers[idx];
                timer.due += period;
                Some(timer.event.clone())
            }
            None => Some(self.timers.swap_remove(idx).event),
        }
    }
}
