// src/quiz/timer.rs

use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Elapsed-time display only; never expires.
    CountUp,
    /// Cuts the session off after `limit_secs`.
    Countdown { limit_secs: u64 },
}

impl TimerMode {
    pub fn from_limit(limit_secs: Option<u64>) -> Self {
        match limit_secs {
            Some(limit_secs) => TimerMode::Countdown { limit_secs },
            None => TimerMode::CountUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { elapsed: u64 },
    /// Emitted exactly once, on the tick that reaches the limit.
    Expired,
    /// Every tick after expiry.
    Stopped,
}

/// One-second session clock.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    mode: TimerMode,
    elapsed: u64,
    expired: bool,
}

impl SessionTimer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            elapsed: 0,
            expired: false,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Stopped;
        }

        self.elapsed += 1;
        match self.mode {
            TimerMode::Countdown { limit_secs } if self.elapsed >= limit_secs => {
                self.expired = true;
                Tick::Expired
            }
            _ => Tick::Running {
                elapsed: self.elapsed,
            },
        }
    }

    /// Advances by `secs` ticks at once. Returns true if this call crossed the limit.
    pub fn advance(&mut self, secs: u64) -> bool {
        if self.expired || secs == 0 {
            return false;
        }

        match self.mode {
            TimerMode::Countdown { limit_secs } if self.elapsed + secs >= limit_secs => {
                self.elapsed = limit_secs;
                self.expired = true;
                true
            }
            _ => {
                self.elapsed += secs;
                false
            }
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn remaining(&self) -> Option<u64> {
        match self.mode {
            TimerMode::CountUp => None,
            TimerMode::Countdown { limit_secs } => Some(limit_secs.saturating_sub(self.elapsed)),
        }
    }
}

/// Aborts the ticking task when dropped.
#[derive(Debug)]
pub struct TimerHandle(JoinHandle<()>);

impl TimerHandle {
    pub fn cancel(self) {}

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs a countdown on the tokio runtime and calls `on_expire` exactly once.
pub fn spawn_countdown<F>(limit_secs: u64, on_expire: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    spawn_countdown_every(Duration::from_secs(1), limit_secs, on_expire)
}

pub(crate) fn spawn_countdown_every<F>(period: Duration, limit_ticks: u64, on_expire: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    TimerHandle(tokio::spawn(async move {
        let mut timer = SessionTimer::new(TimerMode::Countdown {
            limit_secs: limit_ticks,
        });
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            if timer.tick() == Tick::Expired {
                on_expire();
                return;
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn countdown_expires_exactly_once() {
        let mut timer = SessionTimer::new(TimerMode::Countdown { limit_secs: 3 });
        assert_eq!(timer.tick(), Tick::Running { elapsed: 1 });
        assert_eq!(timer.tick(), Tick::Running { elapsed: 2 });
        assert_eq!(timer.remaining(), Some(1));
        assert_eq!(timer.tick(), Tick::Expired);
        assert_eq!(timer.tick(), Tick::Stopped);
        assert_eq!(timer.tick(), Tick::Stopped);
        assert_eq!(timer.elapsed(), 3);
        assert_eq!(timer.remaining(), Some(0));
    }

    #[test]
    fn count_up_never_expires() {
        let mut timer = SessionTimer::new(TimerMode::CountUp);
        for _ in 0..10_000 {
            assert!(matches!(timer.tick(), Tick::Running { .. }));
        }
        assert!(!timer.advance(u32::MAX as u64));
        assert!(!timer.is_expired());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn advance_clamps_to_the_limit() {
        let mut timer = SessionTimer::new(TimerMode::from_limit(Some(60)));
        assert!(!timer.advance(30));
        assert_eq!(timer.elapsed(), 30);
        assert!(timer.advance(500));
        assert_eq!(timer.elapsed(), 60);
        assert!(!timer.advance(1));
        assert_eq!(timer.tick(), Tick::Stopped);
    }

    #[tokio::test]
    async fn spawned_countdown_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handle = spawn_countdown_every(Duration::from_millis(5), 3, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn one_second_countdown() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let _handle = spawn_countdown(1, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels_the_countdown() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handle = spawn_countdown_every(Duration::from_millis(50), 10, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
