use crate::{
    error::NotificationError,
    settings::SettingsRepository,
    types::{BookingNotification, WebhookTestNotification},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn notify(&self, notification: &BookingNotification) -> Result<(), NotificationError>;
    async fn send_test(
        &self,
        notification: &WebhookTestNotification,
    ) -> Result<(), NotificationError>;
}

/// Posts notifications as JSON to the webhook URL currently held in the settings.
pub struct WebhookNotifier {
    client: Client,
    settings: Arc<dyn SettingsRepository>,
}

impl WebhookNotifier {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    async fn post<T: Serialize + Sync>(&self, body: &T) -> Result<(), NotificationError> {
        let url = self
            .settings
            .webhook_url()
            .ok_or(NotificationError::NotConfigured)?;

        let response = self.client.post(&url).json(body).send().await.map_err(|err| {
            error!(?err, "Failed to reach webhook");
            NotificationError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Webhook rejected notification");
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BookingNotifier for WebhookNotifier {
    async fn notify(&self, notification: &BookingNotification) -> Result<(), NotificationError> {
        self.post(notification).await?;
        info!(date = %notification.date, time = %notification.time, "Booking notification sent");
        Ok(())
    }

    async fn send_test(
        &self,
        notification: &WebhookTestNotification,
    ) -> Result<(), NotificationError> {
        self.post(notification).await?;
        info!("Test notification sent");
        Ok(())
    }
}
