//! Gate a intervallo minimo tra chiamate successive a un servizio esterno.
//! Il clock è iniettabile per poter testare l'attesa senza dormire davvero.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Garantisce almeno `min_interval` tra due `acquire` consecutivi, in tutto il processo.
/// Il lock resta preso durante l'attesa: i chiamanti vengono serializzati.
pub struct RateGate<C: Clock = TokioClock> {
    clock: C,
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateGate<TokioClock> {
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, TokioClock)
    }
}

impl<C: Clock> RateGate<C> {
    pub fn with_clock(min_interval: Duration, clock: C) -> Self {
        Self {
            clock,
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Attende il proprio turno; restituisce quanto si è atteso
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last.lock().await;
        let mut waited = Duration::ZERO;
        if let Some(previous) = *last {
            let elapsed = self.clock.now().saturating_duration_since(previous);
            if elapsed < self.min_interval {
                waited = self.min_interval - elapsed;
                debug!("Rate gate waiting {}ms", waited.as_millis());
                self.clock.sleep(waited).await;
            }
        }
        *last = Some(self.clock.now());
        waited
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    /// Clock finto: `sleep` registra l'attesa e fa solo avanzare il tempo
    #[derive(Clone)]
    pub(crate) struct FakeClock {
        base: Instant,
        offset: Arc<StdMutex<Duration>>,
        sleeps: Arc<StdMutex<Vec<Duration>>>,
    }

    impl FakeClock {
        pub(crate) fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Arc::new(StdMutex::new(Duration::ZERO)),
                sleeps: Arc::new(StdMutex::new(Vec::new())),
            }
        }

        pub(crate) fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }

        pub(crate) fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }

        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            self.sleeps.lock().unwrap().push(duration);
            self.advance(duration);
            std::future::ready(())
        }
    }

    #[tokio::test]
    async fn first_call_passes_immediately() {
        let gate = RateGate::with_clock(Duration::from_millis(1100), FakeClock::new());
        assert_eq!(gate.acquire().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn back_to_back_calls_wait_the_remaining_interval() {
        let clock = FakeClock::new();
        let gate = RateGate::with_clock(Duration::from_millis(1100), clock.clone());
        gate.acquire().await;
        clock.advance(Duration::from_millis(300));
        assert_eq!(gate.acquire().await, Duration::from_millis(800));
        // la seconda chiamata ha fatto ripartire l'intervallo
        assert_eq!(gate.acquire().await, Duration::from_millis(1100));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(800), Duration::from_millis(1100)]
        );
    }

    #[tokio::test]
    async fn no_wait_once_interval_has_elapsed() {
        let clock = FakeClock::new();
        let gate = RateGate::with_clock(Duration::from_millis(1100), clock.clone());
        gate.acquire().await;
        clock.advance(Duration::from_secs(2));
        assert_eq!(gate.acquire().await, Duration::ZERO);
        assert!(clock.sleeps().is_empty());
    }
}
