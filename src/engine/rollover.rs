use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::utils::clock::Clock;

use super::store::DayKey;

/// How often the current day key is re-derived. The check is cheap and
/// idempotent, so a coarse interval is enough.
pub const DAY_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically re-derives the current day key from the wall clock and emits
/// the new key once it changes at the midnight boundary. Clock adjustments
/// (DST, manual changes) are taken at face value.
pub struct DayRolloverWatcher {
    next: mpsc::Sender<DayKey>,
    shutdown: CancellationToken,
    check_interval: Duration,
    clock: Box<dyn Clock>,
    last_key: DayKey,
}

impl DayRolloverWatcher {
    pub fn new(
        next: mpsc::Sender<DayKey>,
        shutdown: CancellationToken,
        check_interval: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        let last_key = DayKey::new(clock.time().date_naive());
        Self {
            next,
            shutdown,
            check_interval,
            clock,
            last_key,
        }
    }

    /// Executes the watcher event loop until cancelled.
    pub async fn run(mut self) -> Result<()> {
        let mut check_point = self.clock.instant();
        loop {
            check_point += self.check_interval;

            tokio::select! {
                // Cancelation stops the loop so a torn down session can't
                // receive rollovers anymore.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(check_point) => ()
            }

            let key = DayKey::new(self.clock.time().date_naive());
            if key != self.last_key {
                info!("Day rolled over from {} to {key}", self.last_key);
                self.last_key = key;
                self.next
                    .send(key)
                    .await
                    .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use tokio::{sync::mpsc, time::Instant};
    use tokio_util::sync::CancellationToken;

    use crate::utils::{clock::Clock, logging::TEST_LOGGING};

    use super::*;

    struct TestClock {
        start_time: DateTime<Local>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Local> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, min, s)
                    .unwrap(),
            )
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn emits_the_new_key_after_midnight() -> Result<()> {
        *TEST_LOGGING;
        let (sender, mut receiver) = mpsc::channel(4);
        let shutdown = CancellationToken::new();
        let clock = TestClock {
            // 30 seconds before midnight, so the first check lands on the
            // other side of the boundary.
            start_time: local(2018, 7, 4, 23, 59, 30),
            reference: Instant::now(),
        };
        let watcher = DayRolloverWatcher::new(
            sender,
            shutdown.clone(),
            Duration::from_secs(60),
            Box::new(clock),
        );
        let handle = tokio::spawn(watcher.run());

        let key = receiver.recv().await.expect("watcher should emit a key");
        assert_eq!(key.to_string(), "2018-07-05");

        shutdown.cancel();
        handle.await??;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn stays_quiet_within_the_same_day() -> Result<()> {
        let (sender, mut receiver) = mpsc::channel(4);
        let shutdown = CancellationToken::new();
        let clock = TestClock {
            start_time: local(2018, 7, 4, 10, 0, 0),
            reference: Instant::now(),
        };
        let watcher = DayRolloverWatcher::new(
            sender,
            shutdown.clone(),
            Duration::from_secs(60),
            Box::new(clock),
        );
        let handle = tokio::spawn(watcher.run());

        let waited =
            tokio::time::timeout(Duration::from_secs(60 * 10), receiver.recv()).await;
        assert!(waited.is_err(), "no rollover expected within the same day");

        shutdown.cancel();
        handle.await??;
        Ok(())
    }
}
