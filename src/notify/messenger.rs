//! SMS transport abstraction.
//!
//! The [`Messenger`] trait decouples the notification sweep and alert
//! senders from the delivery mechanism (Twilio in production, a logging
//! mock in development and tests).

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Transport-level outcome of one send attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Accepted by the SMS gateway.
    Sent,
    /// The gateway rejected the message or was unreachable.
    Failed,
    /// Logged locally by the mock transport; nothing was delivered.
    MockSent,
}

impl DeliveryStatus {
    /// Storage representation for the notification log.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::MockSent => "mock_sent",
        }
    }
}

/// What the transport reports back for one message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DeliveryReceipt {
    /// Transport-level outcome.
    pub status: DeliveryStatus,
    /// Gateway message identifier, when available.
    pub message_id: Option<String>,
    /// Failure detail, when the send failed.
    pub error: Option<String>,
}

impl DeliveryReceipt {
    /// Both real and mock sends count as success for logging purposes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, DeliveryStatus::Sent | DeliveryStatus::MockSent)
    }

    fn sent(message_id: String) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            message_id: Some(message_id),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            status: DeliveryStatus::Failed,
            message_id: None,
            error: Some(error),
        }
    }

    fn mock(message_id: String) -> Self {
        Self {
            status: DeliveryStatus::MockSent,
            message_id: Some(message_id),
            error: None,
        }
    }
}

/// SMS delivery seam.
///
/// Send failures are reported in the receipt, never as an `Err` — the
/// callers treat delivery as fire-and-forget and only log the outcome.
pub trait Messenger: Send + Sync {
    /// Send one text message to a phone number.
    fn send(
        &self,
        to_phone: &str,
        body: &str,
    ) -> Pin<Box<dyn Future<Output = DeliveryReceipt> + Send + '_>>;
}

/// A message captured by the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Destination phone number.
    pub to_phone: String,
    /// Message text.
    pub body: String,
}

/// Development/test transport: logs every message and records it for
/// later inspection instead of delivering anything.
#[derive(Debug, Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<SentMessage>>,
    fail_next: AtomicBool,
}

impl MockMessenger {
    /// Create an empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send report `Failed` instead of `MockSent`.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Messages captured so far, in send order.
    ///
    /// # Panics
    ///
    /// Panics if the interior mutex is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Messenger for MockMessenger {
    fn send(
        &self,
        to_phone: &str,
        body: &str,
    ) -> Pin<Box<dyn Future<Output = DeliveryReceipt> + Send + '_>> {
        let to_phone = to_phone.to_owned();
        let body = body.to_owned();
        Box::pin(async move {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return DeliveryReceipt::failed("mock transport failure".into());
            }
            info!(to = %to_phone, %body, "mock sms");
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(SentMessage {
                    to_phone,
                    body,
                });
            }
            DeliveryReceipt::mock(format!("mock_{}", Utc::now().timestamp_micros()))
        })
    }
}

/// Production transport backed by the Twilio Messages REST endpoint.
pub struct TwilioMessenger {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

#[derive(Deserialize)]
struct TwilioResponse {
    sid: Option<String>,
}

impl TwilioMessenger {
    /// Build a Twilio transport from account credentials.
    #[must_use]
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid,
            auth_token,
            from_number,
        }
    }

    async fn post_message(&self, to_phone: &str, body: &str) -> DeliveryReceipt {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );
        let params = [
            ("To", to_phone),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let sid = resp
                    .json::<TwilioResponse>()
                    .await
                    .ok()
                    .and_then(|r| r.sid)
                    .unwrap_or_default();
                DeliveryReceipt::sent(sid)
            }
            Ok(resp) => {
                let status = resp.status();
                let detail = resp.text().await.unwrap_or_default();
                warn!(%status, %detail, "twilio rejected message");
                DeliveryReceipt::failed(format!("twilio returned {status}"))
            }
            Err(err) => {
                warn!(?err, "twilio request failed");
                DeliveryReceipt::failed(err.to_string())
            }
        }
    }
}

impl Messenger for TwilioMessenger {
    fn send(
        &self,
        to_phone: &str,
        body: &str,
    ) -> Pin<Box<dyn Future<Output = DeliveryReceipt> + Send + '_>> {
        let to_phone = to_phone.to_owned();
        let body = body.to_owned();
        Box::pin(async move { self.post_message(&to_phone, &body).await })
    }
}
