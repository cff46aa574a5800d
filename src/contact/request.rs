//! Contact request payloads, keyed by the `subject` field.

use serde::Deserialize;
use serde_json::Value;

use crate::error::RequestError;

pub const HOLOBOX_SUBJECT: &str = "Holobox Request";
pub const WORKSHOP_SUBJECT: &str = "Workshop Booking Request";

/// Hardware enquiry from the Holobox catalog page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HoloboxRequest {
    pub name: String,
    pub company: String,
    pub email: String,
    pub telephone: String,
    pub size: String,
    pub color: String,
    /// Free-text additional requirements.
    pub request: Option<String>,
}

/// Workshop booking from the workshop page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkshopBooking {
    pub company: String,
    pub email: String,
}

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRequest {
    Holobox(HoloboxRequest),
    Workshop(WorkshopBooking),
}

impl ContactRequest {
    /// Parse a submission, dispatching on its `subject`.
    ///
    /// Unknown or missing subjects are [`RequestError::InvalidSubject`];
    /// fields of the wrong type are [`RequestError::InvalidBody`].
    pub fn from_json(body: Value) -> Result<Self, RequestError> {
        let subject = body
            .get("subject")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let parsed = match subject.as_str() {
            HOLOBOX_SUBJECT => serde_json::from_value(body).map(Self::Holobox),
            WORKSHOP_SUBJECT => serde_json::from_value(body).map(Self::Workshop),
            _ => return Err(RequestError::InvalidSubject(subject)),
        };
        parsed.map_err(|e| RequestError::InvalidBody(e.to_string()))
    }

    /// Subject line of the outgoing email.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Holobox(_) => HOLOBOX_SUBJECT,
            Self::Workshop(_) => WORKSHOP_SUBJECT,
        }
    }
}
