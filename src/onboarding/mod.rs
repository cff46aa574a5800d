//! Onboarding wizard — guided steps ending in a timed practice session.
//!
//! A user gives a name, picks a goal, fills in goal-specific details and
//! chooses a practice partner. Practice then runs a countdown that ends in
//! the paywall, either on expiry or when the user ends the session early.
//! Everything lives in memory and is dropped when the flow is discarded or
//! left idle too long.

pub mod catalog;
pub mod details;
pub mod flow;
pub mod manager;
pub mod routes;
pub mod session;
pub mod state;
pub mod timer;

pub use catalog::{Avatar, Goal, GoalKind, PaywallOffer};
pub use details::{CategoryAnswer, DetailsSchema, GoalDetails};
pub use flow::{FlowAction, OnboardingFlow, SessionSnapshot};
pub use manager::{OnboardingManager, spawn_expiry_task};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use session::{Session, TickOutcome, format_countdown};
pub use state::Step;
pub use timer::PracticeTimer;
