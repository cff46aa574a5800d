//! OnboardingManager — registry of live onboarding flows.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::flow::OnboardingFlow;
use crate::config::OnboardingConfig;

/// How often idle flows are swept.
pub const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Holds the flows of users currently in the wizard. Nothing is persisted;
/// a flow lives until it is discarded or sits idle past the configured timeout.
pub struct OnboardingManager {
    config: OnboardingConfig,
    flows: RwLock<HashMap<Uuid, Arc<OnboardingFlow>>>,
}

impl OnboardingManager {
    pub fn new(config: OnboardingConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            flows: RwLock::new(HashMap::new()),
        })
    }

    /// Start a new flow on the Name step.
    pub async fn create(&self) -> Arc<OnboardingFlow> {
        let flow = Arc::new(OnboardingFlow::new(
            self.config.practice_seconds,
            self.config.tick_period,
        ));
        self.flows.write().await.insert(flow.id(), Arc::clone(&flow));
        info!(session_id = %flow.id(), "Onboarding session started");
        flow
    }

    /// Look up a flow. A successful lookup counts as client activity.
    pub async fn get(&self, id: Uuid) -> Option<Arc<OnboardingFlow>> {
        let flow = self.flows.read().await.get(&id).cloned()?;
        flow.touch();
        Some(flow)
    }

    /// Drop a flow, cancelling its countdown. Returns `false` if unknown.
    pub async fn discard(&self, id: Uuid) -> bool {
        let removed = self.flows.write().await.remove(&id);
        match removed {
            Some(flow) => {
                flow.cancel_timer();
                info!(session_id = %id, "Onboarding session discarded");
                true
            }
            None => false,
        }
    }

    /// Discard every flow idle for at least the configured timeout.
    /// Returns the number of flows dropped.
    pub async fn expire_idle(&self) -> usize {
        let idle: Vec<Uuid> = self
            .flows
            .read()
            .await
            .values()
            .filter(|flow| flow.idle_for() >= self.config.idle_timeout)
            .map(|flow| flow.id())
            .collect();

        let mut expired = 0;
        for id in idle {
            debug!(session_id = %id, "Onboarding session idle");
            if self.discard(id).await {
                expired += 1;
            }
        }
        if expired > 0 {
            info!(count = expired, "Expired idle onboarding sessions");
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.flows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flows.read().await.is_empty()
    }
}

/// Spawn a background task that periodically drops idle flows.
pub fn spawn_expiry_task(manager: Arc<OnboardingManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_PERIOD);
        loop {
            interval.tick().await;
            manager.expire_idle().await;
        }
    })
}
