//! Backend health polling.
//!
//! One background task checks `/api/v1/health` on a fixed period and keeps
//! only the latest snapshot. A failed check degrades the snapshot instead of
//! propagating an error anywhere else; the next tick simply tries again.

use crate::api::RagApi;
use crate::types::{BackendState, HealthStatus, ServiceState, parse_timestamp};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Status shown next to the indicator dot. `Checking` only appears at
/// startup, before the first poll resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorStatus {
    Checking,
    Healthy,
    Degraded,
    Unhealthy,
}

impl From<BackendState> for IndicatorStatus {
    fn from(state: BackendState) -> Self {
        match state {
            BackendState::Healthy => Self::Healthy,
            BackendState::Degraded => Self::Degraded,
            BackendState::Unhealthy => Self::Unhealthy,
        }
    }
}

/// Latest known backend health. No history is kept.
#[derive(Clone, Debug)]
pub struct HealthSnapshot {
    pub status: IndicatorStatus,
    pub services: HashMap<String, ServiceState>,
    pub timestamp: OffsetDateTime,
}

impl HealthSnapshot {
    fn checking() -> Self {
        Self {
            status: IndicatorStatus::Checking,
            services: HashMap::new(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    fn unreachable() -> Self {
        Self {
            status: IndicatorStatus::Unhealthy,
            services: HashMap::new(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    fn from_report(report: HealthStatus) -> Self {
        let timestamp =
            parse_timestamp(&report.timestamp).unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self {
            status: report.status.into(),
            services: report.services,
            timestamp,
        }
    }
}

pub struct HealthMonitor {
    api: Arc<dyn RagApi>,
    interval: Duration,
    snapshot: Arc<Mutex<HealthSnapshot>>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl HealthMonitor {
    pub fn new(api: Arc<dyn RagApi>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            snapshot: Arc::new(Mutex::new(HealthSnapshot::checking())),
            poller: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.snapshot.lock().expect("health snapshot poisoned").clone()
    }

    /// Run one check and replace the snapshot with the outcome.
    pub async fn check_now(&self) {
        let next = Self::probe(self.api.as_ref()).await;
        *self.snapshot.lock().expect("health snapshot poisoned") = next;
    }

    async fn probe(api: &dyn RagApi) -> HealthSnapshot {
        match api.health().await {
            Ok(report) => HealthSnapshot::from_report(report),
            Err(err) => {
                tracing::warn!("health check failed: {err}");
                HealthSnapshot::unreachable()
            }
        }
    }

    /// Start the poll loop. Idempotent: the loop is started at most once per
    /// monitor. Ticks run strictly sequentially inside one task, so a check
    /// slower than the period never overlaps the next one.
    pub fn start(&self) {
        let mut poller = self.poller.lock().expect("health poller poisoned");
        if poller.is_some() {
            return;
        }

        let api = Arc::clone(&self.api);
        let snapshot = Arc::clone(&self.snapshot);
        let period = self.interval;
        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let next = Self::probe(api.as_ref()).await;
                *snapshot.lock().expect("health snapshot poisoned") = next;
            }
        }));
    }

    /// Stop the poll loop. Idempotent; called on application shutdown so the
    /// poll never acts on torn-down state.
    pub fn shutdown(&self) {
        if let Some(handle) = self.poller.lock().expect("health poller poisoned").take() {
            handle.abort();
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
