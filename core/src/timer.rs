// Refresh timer
//
// Publishes `update` on a fixed period for the lifetime of the console.

use crate::event::{Event, EventBus};
use crate::{ConsoleError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Refresh interval for auto-update
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

pub struct RefreshTimer {
    period: Duration,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    /// Start ticking. The first tick fires one full period from now.
    pub fn start(bus: Arc<EventBus>, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(ConsoleError::Config(
                "refresh period must be greater than zero".into(),
            ));
        }
        let runtime = crate::runtime_handle()?;

        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let handlers = bus.publish(Event::Update);
                debug!(target: "timer", handlers, "Refresh tick");
            }
        });

        info!(target: "timer", period_ms = period.as_millis() as u64, "Refresh timer started");
        Ok(Self { period, handle })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn shutdown(&self) {
        self.handle.abort();
        info!(target: "timer", "Refresh timer stopped");
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting_bus() -> (Arc<EventBus>, Arc<AtomicUsize>) {
        let bus = Arc::new(EventBus::new());
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        bus.subscribe(EventKind::Update, move |_: &Event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (bus, ticks)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let (bus, ticks) = counting_bus();
        let _timer = RefreshTimer::start(bus, REFRESH_INTERVAL).unwrap();

        sleep(Duration::from_millis(4_999)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(10_000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_without_subscribers() {
        let bus = Arc::new(EventBus::new());
        let _timer = RefreshTimer::start(Arc::clone(&bus), REFRESH_INTERVAL).unwrap();

        sleep(Duration::from_millis(10_001)).await;
        let stats = bus.get_stats(EventKind::Update).unwrap();
        assert_eq!(stats.total_published, 2);
        assert_eq!(stats.total_delivered, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let (bus, ticks) = counting_bus();
        let timer = RefreshTimer::start(bus, Duration::from_millis(100)).unwrap();

        sleep(Duration::from_millis(250)).await;
        timer.shutdown();
        let seen = ticks.load(Ordering::SeqCst);
        assert_eq!(seen, 2);

        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_ticks_are_delayed_not_bursted() {
        let (bus, ticks) = counting_bus();
        let _timer = RefreshTimer::start(bus, Duration::from_millis(100)).unwrap();
        // Let the timer task arm its first deadline
        tokio::task::yield_now().await;

        // Stall across three and a half periods
        tokio::time::advance(Duration::from_millis(350)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        // The schedule restarts from the late tick
        sleep(Duration::from_millis(99)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_period_rejected() {
        let result = RefreshTimer::start(Arc::new(EventBus::new()), Duration::ZERO);
        assert!(matches!(result, Err(ConsoleError::Config(_))));
    }

    #[test]
    fn test_start_outside_runtime_is_an_error() {
        let result = RefreshTimer::start(Arc::new(EventBus::new()), REFRESH_INTERVAL);
        assert!(matches!(result, Err(ConsoleError::Config(_))));
    }
}
