/// Cancelable one-shot timers driven by an explicit clock
use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Duration,
    token: TimerToken,
}

/// Pending one-shot timers, fired by [`Timers::expire`]
///
/// Time is whatever monotonic `Duration` the caller measures from; nothing
/// here reads a real clock.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    next: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once `delay` after `now`
    pub fn schedule(&mut self, now: Duration, delay: Duration) -> TimerToken {
        let token = TimerToken(self.next);
        self.next += 1;
        self.pending.push(Pending {
            deadline: now + delay,
            token,
        });
        token
    }

    /// Returns false when the timer already fired or was cancelled
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    pub fn deadline(&self, token: TimerToken) -> Option<Duration> {
        self.pending
            .iter()
            .find(|p| p.token == token)
            .map(|p| p.deadline)
    }

    /// Remove and return every timer due at `now`, earliest deadline first
    pub fn expire(&mut self, now: Duration) -> Vec<TimerToken> {
        let (mut due, waiting): (Vec<Pending>, Vec<Pending>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| p.deadline <= now);
        self.pending = waiting;
        due.sort_by_key(|p| (p.deadline, p.token));
        due.into_iter().map(|p| p.token).collect()
    }
}
