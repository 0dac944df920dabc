//! Presentational countdown shown while a valuation runs.
//!
//! Purely cosmetic: reaching zero never cancels or fails anything.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::event::{EventSender, WorkspaceEvent};

pub const DEFAULT_COUNTDOWN_SECS: u32 = 30;

pub struct Countdown {
    seed: u32,
    remaining: u32,
    period: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new(seed: u32, period: Duration) -> Self {
        Self {
            seed,
            remaining: seed,
            period,
            ticker: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Reset to the seed and start ticking on behalf of `request_id`
    pub fn start(&mut self, request_id: Uuid, events: EventSender) {
        self.stop();
        self.remaining = self.seed;
        if self.seed == 0 {
            return;
        }

        let period = self.period;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(WorkspaceEvent::CountdownTick { request_id }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Consume one tick. Stops the ticker once zero is reached.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
        }
    }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn rewind(&mut self) {
        self.stop();
        self.remaining = self.seed;
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (tx, mut rx) = event::channel();
        let mut countdown = Countdown::new(3, Duration::from_secs(1));
        let id = Uuid::new_v4();
        countdown.start(id, tx);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let mut ticks = 0;
        while let Ok(WorkspaceEvent::CountdownTick { request_id }) = rx.try_recv() {
            assert_eq!(request_id, id);
            countdown.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert_eq!(countdown.remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_silences_ticker() {
        let (tx, mut rx) = event::channel();
        let mut countdown = Countdown::new(30, Duration::from_secs(1));
        countdown.start(Uuid::new_v4(), tx);
        countdown.stop();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert!(!countdown.is_running());
    }

    #[tokio::test]
    async fn test_saturates_at_zero() {
        let (tx, _rx) = event::channel();
        let mut countdown = Countdown::new(1, Duration::from_secs(1));
        countdown.start(Uuid::new_v4(), tx);
        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.remaining(), 0);
        assert!(!countdown.is_running());

        countdown.rewind();
        assert_eq!(countdown.remaining(), 1);
    }
}
