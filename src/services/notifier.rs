//! Notification outbox and webhook delivery.
//!
//! Subscribes to the event bus, records every event in the notifications
//! table, then attempts delivery to the configured webhook. Delivery is
//! best-effort; a failed POST marks the row `failed` and moves on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::config::NotificationsConfig;
use crate::db::Store;
use crate::domain::NotificationEvent;

pub struct NotifierService {
    store: Store,
    config: NotificationsConfig,
    event_bus: broadcast::Sender<NotificationEvent>,
    client: reqwest::Client,
}

impl NotifierService {
    pub fn new(
        store: Store,
        config: NotificationsConfig,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            store,
            config,
            event_bus,
            client,
        })
    }

    pub fn start_listener(self: Arc<Self>) {
        let mut rx = self.event_bus.subscribe();
        let service = self;

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = service.handle_event(event).await {
                            error!(error = %e, "Failed to process notification");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        error!(count, "Notification listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("Notification listener event bus closed");
                        break;
                    }
                }
            }
        });
    }

    async fn handle_event(&self, event: NotificationEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        let id = self.store.record_notification(event.kind(), &payload).await?;

        if !self.config.enabled || self.config.webhook_url.is_empty() {
            self.store.mark_notification_skipped(id).await?;
            return Ok(());
        }

        match self
            .client
            .post(&self.config.webhook_url)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!(id, kind = event.kind(), "Notification delivered");
                self.store.mark_notification_delivered(id).await?;
            }
            Ok(response) => {
                let status = response.status();
                self.store
                    .mark_notification_failed(id, &format!("HTTP {status}"))
                    .await?;
            }
            Err(e) => {
                self.store
                    .mark_notification_failed(id, &e.to_string())
                    .await?;
            }
        }

        Ok(())
    }
}
