//! Onboarding session — the in-memory state of one pass through the wizard.
//!
//! All operations are synchronous and report whether they changed anything.
//! Scheduling of countdown ticks lives in [`super::timer`].

use super::catalog::{self, GoalKind};
use super::details::GoalDetails;
use super::state::Step;

/// Outcome of a countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed.
    Idle,
    /// One second elapsed, the given number remains.
    Running(u32),
    /// The countdown reached zero and the session moved to the paywall.
    Expired,
}

/// State of one onboarding pass. Discarded when the user navigates away.
#[derive(Debug, Clone)]
pub struct Session {
    step: Step,
    user_name: String,
    selected_goal: Option<GoalKind>,
    selected_avatar: Option<&'static str>,
    details: Option<GoalDetails>,
    remaining_seconds: u32,
    timer_active: bool,
}

impl Session {
    /// A fresh session on the Name step with a countdown of `practice_seconds`.
    ///
    /// A zero length is raised to one second so Practice always expires.
    pub fn new(practice_seconds: u32) -> Self {
        Self {
            step: Step::Name,
            user_name: String::new(),
            selected_goal: None,
            selected_avatar: None,
            details: None,
            remaining_seconds: practice_seconds.max(1),
            timer_active: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn selected_goal(&self) -> Option<GoalKind> {
        self.selected_goal
    }

    pub fn selected_avatar(&self) -> Option<&'static str> {
        self.selected_avatar
    }

    pub fn details(&self) -> Option<&GoalDetails> {
        self.details.as_ref()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn timer_active(&self) -> bool {
        self.timer_active
    }

    /// Set the user's name. Only applies on the Name step.
    pub fn set_name(&mut self, name: &str) -> bool {
        if self.step != Step::Name {
            return false;
        }
        self.user_name = name.to_string();
        true
    }

    /// Select a goal by catalog id. Only applies on the Goal step.
    ///
    /// Picking a different goal resets the details form to that goal's schema.
    pub fn select_goal(&mut self, id: &str) -> bool {
        if self.step != Step::Goal {
            return false;
        }
        let Some(goal) = catalog::find_goal(id) else {
            return false;
        };
        if self.selected_goal != Some(goal.kind) {
            self.selected_goal = Some(goal.kind);
            self.details = Some(GoalDetails::empty(goal.kind));
        }
        true
    }

    /// Set a field of the selected goal's details form. Only applies on the
    /// Details step.
    pub fn set_detail_field(&mut self, key: &str, value: &str) -> bool {
        if self.step != Step::Details {
            return false;
        }
        match self.details.as_mut() {
            Some(details) => details.set_field(key, value),
            None => false,
        }
    }

    /// Select a practice partner by catalog id. Only applies on the Avatar step.
    pub fn select_avatar(&mut self, id: &str) -> bool {
        if self.step != Step::Avatar {
            return false;
        }
        match catalog::find_avatar(id) {
            Some(avatar) => {
                self.selected_avatar = Some(avatar.id);
                true
            }
            None => false,
        }
    }

    /// Whether the current step's completion requirement holds.
    pub fn can_advance(&self) -> bool {
        match self.step {
            Step::Name => !self.user_name.trim().is_empty(),
            Step::Goal => self.selected_goal.is_some(),
            Step::Details => self.details.as_ref().is_some_and(GoalDetails::is_complete),
            Step::Avatar => self.selected_avatar.is_some(),
            Step::Practice | Step::Paywall => false,
        }
    }

    /// Move to the next step if the current one is complete.
    ///
    /// Entering Practice starts the countdown. Returns the new step, or
    /// `None` when nothing changed.
    pub fn advance(&mut self) -> Option<Step> {
        if !self.step.advances_manually() || !self.can_advance() {
            return None;
        }
        let next = self.step.next()?;
        debug_assert!(self.step.can_transition_to(next));
        self.step = next;
        if next == Step::Practice {
            self.timer_active = true;
        }
        Some(next)
    }

    /// Count down one second while the timer is active.
    ///
    /// Reaching zero stops the timer and forces the Paywall step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.timer_active || self.step != Step::Practice {
            return TickOutcome::Idle;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.timer_active = false;
            self.step = Step::Paywall;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    /// Leave Practice for the Paywall immediately, stopping the countdown.
    pub fn end_session_early(&mut self) -> bool {
        if self.step != Step::Practice {
            return false;
        }
        self.timer_active = false;
        self.step = Step::Paywall;
        true
    }
}

/// Render a countdown as `m:ss`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
