use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

/// One elapsed countdown period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Scheduled task that emits a [`Tick`] every period until cancelled.
///
/// The task never touches session state; it only sends ticks to the
/// receiver returned by [`Countdown::start`]. Cancelling, or dropping the
/// handle, aborts the task so no tick can arrive for a discarded session.
/// Requires a running tokio runtime.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a countdown that ticks once per second.
    #[must_use]
    pub fn every_second() -> (Self, mpsc::Receiver<Tick>) {
        Self::start(Duration::from_secs(1))
    }

    /// Spawn a countdown with a custom period.
    #[must_use]
    pub fn start(period: Duration) -> (Self, mpsc::Receiver<Tick>) {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            // A suspended process resumes counting; it does not replay missed ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!("countdown tick");
                if tx.send(Tick).await.is_err() {
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }

    /// Stop the countdown. Safe to call more than once.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_one_tick_per_period() {
        let (countdown, mut ticks) = Countdown::every_second();
        let started = Instant::now();

        for _ in 0..3 {
            assert_eq!(ticks.recv().await, Some(Tick));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        drop(countdown);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_closes_the_channel() {
        let (countdown, mut ticks) = Countdown::every_second();
        assert_eq!(ticks.recv().await, Some(Tick));

        countdown.cancel();
        countdown.cancel();
        assert_eq!(ticks.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_ticks() {
        let (countdown, mut ticks) = Countdown::start(Duration::from_millis(250));
        drop(countdown);
        assert_eq!(ticks.recv().await, None);
    }
}
