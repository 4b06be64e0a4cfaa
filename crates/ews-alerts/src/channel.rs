//! C8 delivery-channel adapters: one [`DeliveryChannel`] implementation per
//! [`ChannelKind`], wired in by the alert-service binary.

use async_trait::async_trait;
use ews_types::ChannelKind;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::warn;

/// One outbound transport for notification content.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Which [`ChannelKind`] this adapter implements.
    fn kind(&self) -> ChannelKind;

    /// Attempt delivery; `Err` content becomes the notification's `errorMessage`.
    async fn send(&self, recipient: &str, content: &str) -> Result<(), String>;
}

/// SMTP email delivery via `lettre`.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl EmailChannel {
    /// Build a channel from SMTP connection settings.
    pub fn new(
        relay: &str,
        username: &str,
        password: &str,
        from: impl Into<String>,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self {
            transport,
            from: from.into(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, recipient: &str, content: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(self.from.parse().map_err(|e| format!("invalid from address: {e}"))?)
            .to(recipient.parse().map_err(|e| format!("invalid recipient: {e}"))?)
            .subject("EWS Alert")
            .body(content.to_string())
            .map_err(|e| format!("failed to build message: {e}"))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| format!("smtp send failed: {e}"))
    }
}

/// HTTP webhook delivery via `reqwest`. Posts `{"recipient", "content"}` as JSON.
pub struct WebhookChannel {
    client: reqwest::Client,
}

impl Default for WebhookChannel {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DeliveryChannel for WebhookChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    async fn send(&self, recipient: &str, content: &str) -> Result<(), String> {
        let response = self
            .client
            .post(recipient)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|e| format!("webhook request failed: {e}"))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("webhook returned status {}", response.status()))
        }
    }
}

/// SMS delivery. No SMS gateway crate is in the platform's stack; this logs the
/// attempt rather than silently pretending to deliver, so a real provider
/// integration has a single seam to replace.
#[derive(Default)]
pub struct SmsChannel;

#[async_trait]
impl DeliveryChannel for SmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    async fn send(&self, recipient: &str, _content: &str) -> Result<(), String> {
        warn!(recipient, "SMS channel has no configured gateway; dropping send");
        Err("no SMS gateway configured".to_string())
    }
}
