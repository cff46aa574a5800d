//! Contact relay — the site's request forms, delivered by email.
//!
//! The hardware page submits Holobox enquiries and the workshop page
//! submits bookings. Both arrive at one endpoint, are rendered into an HTML
//! email (with the company logo when it can be signed) and are sent to a
//! fixed recipient.

pub mod mailer;
pub mod request;
pub mod routes;
pub mod template;

pub use mailer::{Mailer, OutgoingEmail, SmtpMailer};
pub use request::{ContactRequest, HoloboxRequest, WorkshopBooking};
pub use routes::{ContactRouteState, contact_routes};
