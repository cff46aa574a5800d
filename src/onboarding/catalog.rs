//! Static catalogs shown by the onboarding wizard: goals, avatars and the
//! paywall offers. Read-only; nothing here changes at runtime.

use serde::{Deserialize, Serialize};

/// Practice scenario category a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Interview,
    Exam,
    Presentation,
    Conversation,
}

impl GoalKind {
    /// Catalog id of the goal.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Exam => "exam",
            Self::Presentation => "presentation",
            Self::Conversation => "conversation",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "interview" => Some(Self::Interview),
            "exam" => Some(Self::Exam),
            "presentation" => Some(Self::Presentation),
            "conversation" => Some(Self::Conversation),
            _ => None,
        }
    }
}

impl std::fmt::Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A goal entry of the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    pub id: &'static str,
    pub kind: GoalKind,
    pub title: &'static str,
    pub description: &'static str,
}

pub static GOALS: [Goal; 4] = [
    Goal {
        id: "interview",
        kind: GoalKind::Interview,
        title: "Job Interview",
        description: "Ace your next interview",
    },
    Goal {
        id: "exam",
        kind: GoalKind::Exam,
        title: "Oral Exam",
        description: "Prepare for academic vivas",
    },
    Goal {
        id: "presentation",
        kind: GoalKind::Presentation,
        title: "Presentation",
        description: "Rehearse your pitch",
    },
    Goal {
        id: "conversation",
        kind: GoalKind::Conversation,
        title: "General Conversation",
        description: "Improve social fluency",
    },
];

/// Look up a goal by catalog id.
pub fn find_goal(id: &str) -> Option<&'static Goal> {
    GOALS.iter().find(|g| g.id == id)
}

/// Personality of a practice partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarStyle {
    Friendly,
    Strict,
    Professional,
    Casual,
}

/// A selectable practice partner.
#[derive(Debug, Clone, Serialize)]
pub struct Avatar {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub image: &'static str,
    pub style: AvatarStyle,
}

pub static AVATARS: [Avatar; 5] = [
    Avatar {
        id: "mentor",
        name: "Coach Aura",
        role: "Friendly Mentor",
        image: "/images/avatar-coach.png",
        style: AvatarStyle::Friendly,
    },
    Avatar {
        id: "examiner",
        name: "Dr. Reed",
        role: "Strict Examiner",
        image: "/images/avatar-teacher.png",
        style: AvatarStyle::Strict,
    },
    Avatar {
        id: "hr",
        name: "Sarah Chen",
        role: "HR Interviewer",
        image: "/images/avatar-job-interview.png",
        style: AvatarStyle::Professional,
    },
    Avatar {
        id: "hospitality",
        name: "Marcus",
        role: "Hospitality Recruiter",
        image: "/images/avatar-presentation.png",
        style: AvatarStyle::Professional,
    },
    Avatar {
        id: "tutor",
        name: "Elena",
        role: "Language Tutor",
        image: "/images/avatar-conversation.png",
        style: AvatarStyle::Casual,
    },
];

/// Look up an avatar by catalog id.
pub fn find_avatar(id: &str) -> Option<&'static Avatar> {
    AVATARS.iter().find(|a| a.id == id)
}

/// An upgrade option presented on the paywall.
#[derive(Debug, Clone, Serialize)]
pub struct PaywallOffer {
    pub id: &'static str,
    pub title: &'static str,
    /// Price in euro cents.
    pub price_cents: u32,
    /// Billing period, `None` for one-off purchases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<&'static str>,
    pub features: &'static [&'static str],
}

pub static PAYWALL_OFFERS: [PaywallOffer; 2] = [
    PaywallOffer {
        id: "session_report",
        title: "One-off Session Report",
        price_cents: 299,
        period: None,
        features: &["Get AI summary, analytics & recording"],
    },
    PaywallOffer {
        id: "pro",
        title: "Pro",
        price_cents: 999,
        period: Some("month"),
        features: &[
            "20 practice sessions per month",
            "Advanced AI feedback & analytics",
            "All avatar personalities unlocked",
            "Save and review recordings",
        ],
    },
];
