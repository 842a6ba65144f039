//! Alert Poller Implementation

use alert_classifier::AlertRecord;
use chrono::Utc;
use metrics::{counter, gauge};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{AlertSource, FetchError, HttpAlertSource, PollState, PollerConfig, PollerError};

/// Activation bookkeeping, guarded together with every state write
#[derive(Debug, Default)]
struct Lifecycle {
    /// Whether the poller is currently started
    active: bool,
    /// Incremented on every start; fetches tagged with an older epoch are discarded
    epoch: u64,
    /// Repeating timer task
    ticker: Option<JoinHandle<()>>,
}

struct Inner<S> {
    source: S,
    config: PollerConfig,
    lifecycle: Mutex<Lifecycle>,
    state_tx: watch::Sender<PollState>,
}

impl<S: AlertSource> Inner<S> {
    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn poll_once(&self, epoch: u64) {
        let outcome = self.source.fetch_alerts().await;
        self.apply(epoch, outcome);
    }

    /// Write a fetch outcome into the poll state if its activation is still current
    fn apply(&self, epoch: u64, outcome: Result<Vec<AlertRecord>, FetchError>) -> bool {
        let lifecycle = self.lifecycle();
        if !lifecycle.active || lifecycle.epoch != epoch {
            debug!("Discarding poll result from inactive activation {}", epoch);
            return false;
        }

        match &outcome {
            Ok(alerts) => {
                counter!("alert_poll_success_total").increment(1);
                gauge!("alert_poll_alerts").set(alerts.len() as f64);
                debug!("Poll succeeded with {} alerts", alerts.len());
            }
            Err(e) => {
                counter!("alert_poll_failure_total", "kind" => e.kind()).increment(1);
                warn!("Poll failed ({}): {}", e.kind(), e);
            }
        }

        self.state_tx
            .send_modify(|state| state.apply(outcome, Utc::now()));
        true
    }

    /// Disarm the timer and reject every later write. Returns `false` if already inactive.
    fn deactivate(&self) -> bool {
        let mut lifecycle = self.lifecycle();
        if !lifecycle.active {
            return false;
        }

        lifecycle.active = false;
        if let Some(ticker) = lifecycle.ticker.take() {
            ticker.abort();
        }
        true
    }
}

/// Shared by all clones of a poller; deactivates it when the last one goes away.
///
/// Background tasks only hold `Inner`, so they never keep this alive.
struct HandleGuard<S: AlertSource> {
    inner: Arc<Inner<S>>,
}

impl<S: AlertSource> Drop for HandleGuard<S> {
    fn drop(&mut self) {
        if self.inner.deactivate() {
            info!("Alert poller dropped while running, stopped");
        }
    }
}

/// Polls an alert source on a fixed interval and owns the resulting state.
///
/// Attempts are started every interval regardless of whether the previous
/// one finished; outcomes are applied in completion order.
///
/// Dropping the last clone has the same effect as [`stop`](Self::stop).
pub struct AlertPoller<S: AlertSource> {
    guard: Arc<HandleGuard<S>>,
}

impl<S: AlertSource> Clone for AlertPoller<S> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
        }
    }
}

impl AlertPoller<HttpAlertSource> {
    /// Create a poller against the configured HTTP backend
    pub fn http(config: PollerConfig) -> Result<Self, PollerError> {
        let source = HttpAlertSource::new(&config)?;
        Self::new(source, config)
    }
}

impl<S: AlertSource> AlertPoller<S> {
    /// Create a stopped poller
    pub fn new(source: S, config: PollerConfig) -> Result<Self, PollerError> {
        config.validate()?;
        info!("Creating alert poller with interval {}ms", config.interval_ms);

        let (state_tx, _) = watch::channel(PollState::default());
        let inner = Arc::new(Inner {
            source,
            config,
            lifecycle: Mutex::new(Lifecycle::default()),
            state_tx,
        });
        Ok(Self {
            guard: Arc::new(HandleGuard { inner }),
        })
    }

    fn inner(&self) -> &Arc<Inner<S>> {
        &self.guard.inner
    }

    /// Fetch immediately, then every interval until [`stop`](Self::stop).
    ///
    /// Fails with [`PollerError::NoRuntime`] outside a tokio runtime, leaving
    /// the poller stopped. Returns `Ok(false)` without arming a second timer
    /// if the poller is already running.
    pub fn start(&self) -> Result<bool, PollerError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| PollerError::NoRuntime)?;

        let mut lifecycle = self.inner().lifecycle();
        if lifecycle.active {
            debug!("Alert poller already running");
            return Ok(false);
        }

        lifecycle.active = true;
        lifecycle.epoch += 1;
        let epoch = lifecycle.epoch;

        let inner = Arc::clone(self.inner());
        lifecycle.ticker = Some(runtime.spawn(run_ticker(inner, epoch)));

        info!("Alert poller started (activation {})", epoch);
        Ok(true)
    }

    /// Cancel the timer. In-flight fetches finish but their results are dropped.
    pub fn stop(&self) {
        if self.inner().deactivate() {
            info!("Alert poller stopped");
        }
    }

    /// Check if the poller is running
    pub fn is_active(&self) -> bool {
        self.inner().lifecycle().active
    }

    /// Snapshot of the current poll state
    pub fn state(&self) -> PollState {
        self.inner().state_tx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.inner().state_tx.subscribe()
    }

    /// Configuration this poller was built with
    pub fn config(&self) -> &PollerConfig {
        &self.inner().config
    }
}

async fn run_ticker<S: AlertSource>(inner: Arc<Inner<S>>, epoch: u64) {
    let mut ticker = tokio::time::interval(inner.config.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately
        ticker.tick().await;

        let inner = Arc::clone(&inner);
        tokio::spawn(async move {
            inner.poll_once(epoch).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::DisplayState;

    /// One scripted fetch: resolves after `delay` with `outcome`
    struct Step {
        delay: Duration,
        outcome: Result<Vec<AlertRecord>, FetchError>,
    }

    fn ok(delay_ms: u64, alerts: Vec<AlertRecord>) -> Step {
        Step {
            delay: Duration::from_millis(delay_ms),
            outcome: Ok(alerts),
        }
    }

    fn err(delay_ms: u64, error: FetchError) -> Step {
        Step {
            delay: Duration::from_millis(delay_ms),
            outcome: Err(error),
        }
    }

    /// Source that replays a script and never resolves once it runs out
    struct ScriptedSource {
        script: Mutex<VecDeque<Step>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                script: Mutex::new(steps.into()),
                calls: Arc::clone(&calls),
            };
            (source, calls)
        }
    }

    impl AlertSource for ScriptedSource {
        fn fetch_alerts(
            &self,
        ) -> impl Future<Output = Result<Vec<AlertRecord>, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script.lock().unwrap().pop_front();
            async move {
                match step {
                    Some(step) => {
                        sleep(step.delay).await;
                        step.outcome
                    }
                    None => std::future::pending().await,
                }
            }
        }
    }

    fn poller(steps: Vec<Step>) -> (AlertPoller<ScriptedSource>, Arc<AtomicUsize>) {
        let (source, calls) = ScriptedSource::new(steps);
        let poller = AlertPoller::new(source, PollerConfig::default()).unwrap();
        (poller, calls)
    }

    fn alerts(scores: &[f64]) -> Vec<AlertRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| AlertRecord::new(format!("alert-{}", i), s))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_fetch_then_fixed_interval() {
        let (poller, calls) = poller(vec![
            ok(0, alerts(&[1.0])),
            ok(0, alerts(&[2.0])),
            ok(0, alerts(&[3.0])),
        ]);
        assert!(poller.start().unwrap());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(poller.state().alerts, alerts(&[1.0]));

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(poller.state().alerts, alerts(&[3.0]));

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_fetch_updates_stats() {
        let (poller, _) = poller(vec![ok(
            0,
            vec![AlertRecord::new("A", 9.0), AlertRecord::new("B", 2.0)],
        )]);
        assert_eq!(poller.state().display_state(), DisplayState::InitialLoading);

        poller.start().unwrap();
        sleep(Duration::from_millis(10)).await;

        let state = poller.state();
        let stats = state.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.high, 0);
        assert_eq!(stats.medium, 0);
        assert_eq!(stats.low, 1);
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert!(state.last_update.is_some());
        assert_eq!(state.display_state(), DisplayState::DisplayingData);

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_error_keeps_stale_alerts() {
        let (poller, _) = poller(vec![
            ok(0, alerts(&[1.0, 5.0, 9.0])),
            err(0, FetchError::Status(500)),
        ]);
        poller.start().unwrap();

        sleep(Duration::from_millis(10)).await;
        let before = poller.state();
        assert_eq!(before.alerts.len(), 3);

        sleep(Duration::from_millis(3000)).await;
        let state = poller.state();
        assert_eq!(state.alerts.len(), 3);
        assert!(state.error.as_deref().unwrap().contains("500"));
        assert_eq!(state.last_update, before.last_update);
        assert!(!state.loading);
        assert_eq!(
            state.display_state(),
            DisplayState::DisplayingErrorWithStaleData
        );

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_on_first_attempt() {
        let (poller, _) = poller(vec![err(
            0,
            FetchError::Transport("connection refused".to_string()),
        )]);
        poller.start().unwrap();
        sleep(Duration::from_millis(10)).await;

        let state = poller.state();
        assert!(state.alerts.is_empty());
        assert!(!state.loading);
        assert!(state.last_update.is_none());
        assert!(state.error.as_deref().unwrap().contains("connection refused"));

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_continues_after_failures() {
        let (poller, calls) = poller(vec![
            err(0, FetchError::Status(502)),
            err(0, FetchError::Decode("expected value".to_string())),
            ok(0, Vec::new()),
        ]);
        poller.start().unwrap();

        sleep(Duration::from_millis(6010)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let state = poller.state();
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert_eq!(state.display_state(), DisplayState::DisplayingEmpty);

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight_result() {
        let (poller, calls) = poller(vec![ok(1000, alerts(&[9.0]))]);
        poller.start().unwrap();

        sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let at_stop = poller.state();
        poller.stop();
        assert!(!poller.is_active());

        sleep(Duration::from_millis(10_000)).await;
        assert_eq!(poller.state(), at_stop);
        assert!(poller.state().loading);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_does_not_duplicate_timer() {
        let (poller, calls) = poller(vec![ok(0, alerts(&[1.0])), ok(0, alerts(&[2.0]))]);
        assert!(poller.start().unwrap());
        assert!(!poller.start().unwrap());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_ignores_previous_activation() {
        let (poller, _) = poller(vec![ok(1000, alerts(&[9.0])), ok(0, alerts(&[2.0]))]);
        poller.start().unwrap();
        sleep(Duration::from_millis(10)).await;

        poller.stop();
        assert!(poller.start().unwrap());

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(poller.state().alerts, alerts(&[2.0]));

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_attempts_apply_in_completion_order() {
        let (poller, _) = poller(vec![ok(5000, alerts(&[9.0])), ok(100, alerts(&[2.0]))]);
        poller.start().unwrap();

        // Second attempt starts at 3000ms and finishes first
        sleep(Duration::from_millis(3200)).await;
        assert_eq!(poller.state().alerts, alerts(&[2.0]));

        // Slower first attempt lands last and wins
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(poller.state().alerts, alerts(&[9.0]));

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let (poller, _) = poller(vec![ok(0, alerts(&[6.5]))]);
        let mut rx = poller.subscribe();
        poller.start().unwrap();

        rx.changed().await.unwrap();
        let state = rx.borrow().clone();
        assert_eq!(state.stats().high, 1);

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_last_handle_stops_polling() {
        let (poller, calls) = poller(vec![ok(1000, alerts(&[9.0]))]);
        let mut rx = poller.subscribe();
        poller.start().unwrap();

        // Dropping a clone keeps the poller running
        drop(poller.clone());
        assert!(poller.is_active());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        drop(poller);

        sleep(Duration::from_millis(30_000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().loading);
    }

    #[test]
    fn test_start_outside_runtime_leaves_poller_stopped() {
        let (poller, calls) = poller(vec![ok(0, alerts(&[2.0]))]);

        assert!(matches!(poller.start(), Err(PollerError::NoRuntime)));
        assert!(!poller.is_active());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        runtime.block_on(async {
            assert!(poller.start().unwrap());
            sleep(Duration::from_millis(10)).await;
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert_eq!(poller.state().alerts, alerts(&[2.0]));
            poller.stop();
        });
    }

    #[test]
    fn test_zero_interval_rejected() {
        let (source, _) = ScriptedSource::new(Vec::new());
        let config = PollerConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            AlertPoller::new(source, config),
            Err(PollerError::ZeroInterval)
        ));
    }
}
