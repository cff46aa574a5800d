//! Onboarding step machine — which stage of the wizard the user is on.

use serde::{Deserialize, Serialize};

/// The stages of the onboarding wizard.
///
/// Progresses linearly: Name → Goal → Details → Avatar → Practice → Paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Name,
    Goal,
    Details,
    Avatar,
    Practice,
    Paywall,
}

impl Step {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Step) -> bool {
        use Step::*;
        matches!(
            (self, target),
            (Name, Goal)
                | (Goal, Details)
                | (Details, Avatar)
                | (Avatar, Practice)
                | (Practice, Paywall)
        )
    }

    /// Whether this step is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paywall)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<Step> {
        use Step::*;
        match self {
            Name => Some(Goal),
            Goal => Some(Details),
            Details => Some(Avatar),
            Avatar => Some(Practice),
            Practice => Some(Paywall),
            Paywall => None,
        }
    }

    /// Whether `advance()` may move past this step.
    ///
    /// Practice is left only by timer expiry or an explicit end of session.
    pub fn advances_manually(&self) -> bool {
        !matches!(self, Self::Practice | Self::Paywall)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Name
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Goal => "goal",
            Self::Details => "details",
            Self::Avatar => "avatar",
            Self::Practice => "practice",
            Self::Paywall => "paywall",
        };
        write!(f, "{s}")
    }
}
