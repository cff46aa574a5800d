//! OnboardingFlow — one live session plus the countdown task it owns.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::catalog::{GoalKind, PAYWALL_OFFERS, PaywallOffer};
use super::details::GoalDetails;
use super::session::{Session, format_countdown};
use super::state::Step;
use super::timer::PracticeTimer;

/// A user action against a flow, as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowAction {
    SetName { name: String },
    SelectGoal { goal_id: String },
    SetDetail { key: String, value: String },
    SelectAvatar { avatar_id: String },
    Advance,
    EndSession,
}

/// Serializable view of a flow.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub step: Step,
    pub user_name: String,
    pub goal: Option<GoalKind>,
    pub avatar: Option<&'static str>,
    pub details: Option<GoalDetails>,
    pub remaining_seconds: u32,
    /// Countdown rendered as `m:ss`.
    pub countdown: String,
    pub timer_active: bool,
    pub can_advance: bool,
    /// Upgrade options, present once the paywall is reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<&'static [PaywallOffer]>,
}

/// A live onboarding flow.
///
/// User actions and countdown ticks are serialized on the session lock.
/// Every path out of Practice cancels the countdown task.
pub struct OnboardingFlow {
    id: Uuid,
    session: Arc<Mutex<Session>>,
    timer: std::sync::Mutex<Option<PracticeTimer>>,
    tick_period: Duration,
    last_activity: std::sync::Mutex<Instant>,
}

impl OnboardingFlow {
    /// A new flow on the Name step. A zero `practice_seconds` is raised to one.
    pub fn new(practice_seconds: u32, tick_period: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            session: Arc::new(Mutex::new(Session::new(practice_seconds))),
            timer: std::sync::Mutex::new(None),
            tick_period,
            last_activity: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn set_name(&self, name: &str) -> bool {
        self.session.lock().await.set_name(name)
    }

    pub async fn select_goal(&self, goal_id: &str) -> bool {
        let applied = self.session.lock().await.select_goal(goal_id);
        if applied {
            debug!(session_id = %self.id, goal = goal_id, "Goal selected");
        }
        applied
    }

    pub async fn set_detail_field(&self, key: &str, value: &str) -> bool {
        self.session.lock().await.set_detail_field(key, value)
    }

    pub async fn select_avatar(&self, avatar_id: &str) -> bool {
        let applied = self.session.lock().await.select_avatar(avatar_id);
        if applied {
            debug!(session_id = %self.id, avatar = avatar_id, "Avatar selected");
        }
        applied
    }

    /// Advance past the current step if it is complete. Entering Practice
    /// spawns the countdown.
    pub async fn advance(&self) -> Option<Step> {
        let mut session = self.session.lock().await;
        let next = session.advance()?;
        info!(session_id = %self.id, step = %next, "Onboarding step advanced");

        if next == Step::Practice && session.timer_active() {
            let timer = PracticeTimer::start(self.id, Arc::clone(&self.session), self.tick_period);
            // Replaces nothing: Practice is entered at most once.
            if let Some(stale) = self.timer_slot().replace(timer) {
                stale.cancel();
            }
        }
        Some(next)
    }

    /// Leave Practice for the paywall and cancel the countdown.
    pub async fn end_session_early(&self) -> bool {
        let ended = self.session.lock().await.end_session_early();
        if ended {
            self.cancel_timer();
            info!(session_id = %self.id, "Practice ended early, moving to paywall");
        }
        ended
    }

    /// Record client activity, postponing idle expiry.
    pub fn touch(&self) {
        *self.activity_slot() = Instant::now();
    }

    /// Time since the last client activity.
    pub fn idle_for(&self) -> Duration {
        self.activity_slot().elapsed()
    }

    /// Apply a client action. Returns whether it changed the session.
    pub async fn apply(&self, action: &FlowAction) -> bool {
        self.touch();
        match action {
            FlowAction::SetName { name } => self.set_name(name).await,
            FlowAction::SelectGoal { goal_id } => self.select_goal(goal_id).await,
            FlowAction::SetDetail { key, value } => self.set_detail_field(key, value).await,
            FlowAction::SelectAvatar { avatar_id } => self.select_avatar(avatar_id).await,
            FlowAction::Advance => self.advance().await.is_some(),
            FlowAction::EndSession => self.end_session_early().await,
        }
    }

    /// Whether a countdown task is still running.
    pub fn timer_running(&self) -> bool {
        self.timer_slot()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Cancel the countdown, if any. Called when the flow is discarded.
    pub fn cancel_timer(&self) {
        if let Some(timer) = self.timer_slot().take() {
            timer.cancel();
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        let step = session.step();
        SessionSnapshot {
            id: self.id,
            step,
            user_name: session.user_name().to_string(),
            goal: session.selected_goal(),
            avatar: session.selected_avatar(),
            details: session.details().cloned(),
            remaining_seconds: session.remaining_seconds(),
            countdown: format_countdown(session.remaining_seconds()),
            timer_active: session.timer_active(),
            can_advance: session.can_advance(),
            offers: step.is_terminal().then_some(&PAYWALL_OFFERS[..]),
        }
    }

    fn timer_slot(&self) -> std::sync::MutexGuard<'_, Option<PracticeTimer>> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn activity_slot(&self) -> std::sync::MutexGuard<'_, Instant> {
        self.last_activity.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
