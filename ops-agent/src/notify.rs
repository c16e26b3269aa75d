//! Push notification dispatch through the relay endpoint
//!
//! Dispatch is fire-and-forget: a failed push is logged and dropped,
//! never surfaced to the action that triggered it. The disabled
//! dispatcher (no endpoint configured) swallows everything, which is
//! also what tests use.

use shared::models::{Division, PushMessage, Role, StaffProfile};
use shared::AppResult;
use std::sync::Arc;
use std::time::Duration;

use crate::approval::ROUTING_TABLE;
use crate::core::config::Config;
use crate::remote::RemoteStore;

/// Leader roles whose desks requests from `division` land on, straight
/// from the routing table. Kabag TU is always on the list as the backup
/// recipient, whether or not the routing reaches the division directly.
pub fn leader_roles_for(division: Division) -> Vec<Role> {
    let mut roles: Vec<Role> = ROUTING_TABLE
        .iter()
        .filter(|rule| rule.divisions.contains(&division))
        .map(|rule| rule.approver)
        .collect();
    if !roles.contains(&Role::KabagTu) {
        roles.push(Role::KabagTu);
    }
    roles
}

#[derive(Clone)]
pub struct PushDispatcher {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl PushDispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: Some(config.push_endpoint.clone()),
        }
    }

    /// Dispatcher that drops every message.
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
        }
    }

    /// Deliver one message to the relay. Failures are logged, not returned.
    pub async fn send(&self, message: PushMessage) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        let result = self
            .client
            .post(endpoint)
            .timeout(Duration::from_secs(10))
            .json(&message)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(title = %message.title, "push delivered");
            }
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), title = %message.title, "push relay rejected message");
            }
            Err(err) => {
                tracing::warn!(error = %err, title = %message.title, "push delivery failed");
            }
        }
    }

    pub async fn send_many(&self, tokens: &[String], title: &str, body: &str) {
        for token in tokens {
            self.send(PushMessage::new(token.clone(), title, body)).await;
        }
    }

    /// Tell the responsible leaders a new request is waiting for them.
    pub async fn notify_request_raised(
        &self,
        store: &dyn RemoteStore,
        requester: &StaffProfile,
    ) -> AppResult<()> {
        let roles = leader_roles_for(requester.division);
        if roles.is_empty() {
            return Ok(());
        }
        let tokens = store.push_tokens_for_roles(&roles).await?;
        self.send_many(
            &tokens,
            "Permintaan Baru",
            &format!("{} mengajukan permintaan baru", requester.name),
        )
        .await;
        Ok(())
    }

    /// Alarm every unit except the raiser's own device.
    pub async fn notify_sos(&self, store: &dyn RemoteStore, raiser: &StaffProfile) -> AppResult<()> {
        let tokens = store.push_tokens_except(&raiser.id).await?;
        self.send_many(
            &tokens,
            "SOS DARURAT",
            &format!("Sinyal bahaya dari {}", raiser.name),
        )
        .await;
        Ok(())
    }
}
