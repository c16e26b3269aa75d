//! Push-relay payload

use serde::{Deserialize, Serialize};

/// One outbound push message, POSTed per target token to the third-party
/// relay. Fire-and-forget: no delivery confirmation is handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub sound: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PushMessage {
    pub fn new(to: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            title: title.into(),
            body: body.into(),
            sound: "default".to_string(),
            data: None,
        }
    }
}
