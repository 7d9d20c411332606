//! Session Record and Gate State
//!
//! The record is what sign-in writes and sign-out removes. The gate only
//! reads it back; there is no expiry and no refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{email::Email, role::Role};

/// Stored session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub email: Email,
    pub role: Role,
    pub is_authenticated: bool,
    pub login_time: DateTime<Utc>,
}

impl SessionRecord {
    /// Record written at a successful sign-in
    pub fn signed_in(email: Email, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            email,
            role,
            is_authenticated: true,
            login_time: now,
        }
    }
}

/// Where a request stands with respect to the session gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    /// Not checked yet
    #[default]
    Unknown,
    Authenticated(SessionRecord),
    Unauthenticated,
}

impl GateState {
    /// Settle the gate from whatever the store returned
    pub fn from_record(record: Option<SessionRecord>) -> Self {
        match record {
            Some(record) if record.is_authenticated => GateState::Authenticated(record),
            _ => GateState::Unauthenticated,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GateState::Unknown => "unknown",
            GateState::Authenticated(_) => "authenticated",
            GateState::Unauthenticated => "unauthenticated",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&SessionRecord> {
        match self {
            GateState::Authenticated(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_session(self) -> Option<SessionRecord> {
        match self {
            GateState::Authenticated(record) => Some(record),
            _ => None,
        }
    }
}
