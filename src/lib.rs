//! Mascotte — backend of the Mascotte.AI site.

pub mod config;
pub mod contact;
pub mod error;
pub mod onboarding;
pub mod server;
pub mod storage;
