// RSVP submission model, validation and relay outcome.
//
// Nothing here touches the network; the web layer posts the JSON produced by
// these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "server";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Yes,
    No,
}

impl Attendance {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

/// What a guest sends from the RSVP form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    pub name: String,
    pub additional_guests: u32,
    pub bringing_driver: bool,
    pub attendance: Attendance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Body forwarded to the spreadsheet endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub name: String,
    pub additional_guests: u32,
    pub bringing_driver: bool,
    pub attendance: Attendance,
    pub user_agent: String,
    pub received_at: String,
}

impl RelayPayload {
    pub fn new(submission: RsvpSubmission, received_at: impl Into<String>) -> Self {
        let user_agent = submission
            .user_agent
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        Self {
            name: submission.name,
            additional_guests: submission.additional_guests,
            bringing_driver: submission.bringing_driver,
            attendance: submission.attendance,
            user_agent,
            received_at: received_at.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsvpError {
    #[error("Missing RSVP_ENDPOINT env var")]
    MissingEndpoint,
    #[error("Name is required")]
    MissingName,
    #[error("Attendance must be 'yes' or 'no'")]
    InvalidAttendance,
    #[error("Additional guests must be a non-negative integer")]
    InvalidGuestCount,
    #[error("Unexpected server error")]
    Unexpected,
}

impl RsvpError {
    /// HTTP status reported for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingName | Self::InvalidAttendance | Self::InvalidGuestCount => 400,
            Self::MissingEndpoint | Self::Unexpected => 500,
        }
    }
}

/// `{ "ok": true }` or `{ "ok": false, "error": "..." }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn success() -> Self {
        Self { ok: true, error: None }
    }

    pub fn failure(err: &RsvpError) -> Self {
        Self {
            ok: false,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayOutcome {
    pub status: u16,
    pub response: RelayResponse,
}

impl RelayOutcome {
    pub fn from_result(result: Result<(), RsvpError>) -> Self {
        match result {
            Ok(()) => Self {
                status: 200,
                response: RelayResponse::success(),
            },
            Err(e) => Self {
                status: e.status(),
                response: RelayResponse::failure(&e),
            },
        }
    }

    pub fn body(&self) -> String {
        serde_json::to_string(&self.response).unwrap_or_else(|_| r#"{"ok":false}"#.to_string())
    }
}

/// Parse and validate a raw request body.
pub fn parse_body(body: &str) -> Result<RsvpSubmission, RsvpError> {
    let raw: Value = serde_json::from_str(body).map_err(|e| {
        log::warn!("[rsvp] unreadable body: {e}");
        RsvpError::Unexpected
    })?;
    validate(&raw)
}

/// Check shape and coerce loosely-typed fields.
pub fn validate(raw: &Value) -> Result<RsvpSubmission, RsvpError> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or(RsvpError::MissingName)?;
    let attendance = raw
        .get("attendance")
        .and_then(Value::as_str)
        .and_then(Attendance::parse)
        .ok_or(RsvpError::InvalidAttendance)?;
    let additional_guests = coerce_guest_count(raw.get("additionalGuests"))?;
    let user_agent = raw
        .get("userAgent")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(RsvpSubmission {
        name: name.to_string(),
        additional_guests,
        bringing_driver: truthy(raw.get("bringingDriver")),
        attendance,
        user_agent,
    })
}

fn coerce_guest_count(v: Option<&Value>) -> Result<u32, RsvpError> {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(RsvpError::InvalidGuestCount);
    }
    Ok(n as u32)
}

/// JavaScript truthiness of a JSON value.
fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
