//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    bridge::{TrayMenu, View},
    state::{ReminderSnapshot, UpdateState},
};

/// Response for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
}

impl ApiResponse {
    pub fn new(status: &str, message: String, view: Option<View>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            view,
        }
    }

    /// The command was handed to the dispatch loop
    pub fn accepted(message: String, view: View) -> Self {
        Self::new("accepted", message, Some(view))
    }

    /// Nothing was sent; `message` is meant for the user
    pub fn rejected(message: String) -> Self {
        Self::new("rejected", message, None)
    }

    pub fn error(message: String) -> Self {
        Self::new("error", message, None)
    }
}

/// Body of `POST /interval`: the raw contents of the interval input
#[derive(Debug, Clone, Deserialize)]
pub struct IntervalRequest {
    pub value: IntervalInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntervalInput {
    Number(serde_json::Number),
    Text(String),
}

impl IntervalInput {
    pub fn into_text(self) -> String {
        match self {
            IntervalInput::Number(n) => n.to_string(),
            IntervalInput::Text(s) => s,
        }
    }
}

/// Full status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub reminder: ReminderSnapshot,
    pub update: UpdateState,
    pub view: View,
    pub tray: Option<TrayMenu>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
