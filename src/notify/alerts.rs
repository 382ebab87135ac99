//! Check-in confirmations and reception-triggered templated alerts.

use tracing::warn;

use crate::estimator;
use crate::models::entry::CheckInReceipt;
use crate::models::notification::NotificationKind;
use crate::models::patient::Patient;
use crate::persistence::settings_repo::DEFAULT_WAIT_TIME_KEY;
use crate::{AppError, Result};

use super::messenger::DeliveryReceipt;
use super::{messages, Notifier};

/// Fill a template's `{patient_name}`, `{position}`, and `{wait_time}`
/// placeholders.
#[must_use]
pub fn render_template(
    template: &str,
    patient_name: &str,
    position: i64,
    wait_time: &str,
) -> String {
    template
        .replace("{patient_name}", patient_name)
        .replace("{position}", &position.to_string())
        .replace("{wait_time}", wait_time)
}

impl Notifier {
    /// Send the post-check-in confirmation with the tracking link and
    /// log it. Delivery failure is reported in the receipt, not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the notification log write fails.
    pub async fn send_checkin_confirmation(
        &self,
        receipt: &CheckInReceipt,
        patient: &Patient,
    ) -> Result<DeliveryReceipt> {
        let text = messages::checkin_confirmation(
            &patient.full_name(),
            &self.office_name,
            receipt.position,
            &self.base_url,
            &receipt.token,
        );

        let delivery = self.messenger.send(&patient.phone, &text).await;
        if !delivery.is_success() {
            warn!(
                entry_id = receipt.id,
                error = delivery.error.as_deref().unwrap_or("unknown"),
                "check-in confirmation send failed"
            );
        }

        self.notifications
            .record(
                receipt.id,
                NotificationKind::Checkin,
                &patient.phone,
                &text,
                delivery.status.as_str(),
            )
            .await?;

        Ok(delivery)
    }

    /// Render a stored template against a queue entry and send it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry or template does not
    /// exist, `AppError::Sms` if the transport rejects the message.
    pub async fn send_custom_alert(
        &self,
        entry_id: i64,
        template_id: i64,
    ) -> Result<DeliveryReceipt> {
        let entry = self
            .queue
            .get_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("entry {entry_id} not found")))?;
        let patient = self.patients.get_by_id(entry.patient_id).await?;
        let template = self.templates.get_by_id(template_id).await?;

        let rate = self
            .settings
            .int_or(DEFAULT_WAIT_TIME_KEY, estimator::DEFAULT_MINUTES_PER_PATIENT)
            .await?;
        let wait_minutes =
            estimator::estimate_wait_at_rate(entry.position, entry.quoted_wait_minutes, rate);
        let wait_time = estimator::format_wait(wait_minutes);

        let text = render_template(
            &template.message_template,
            &patient.full_name(),
            entry.position,
            &wait_time,
        );

        let delivery = self.messenger.send(&patient.phone, &text).await;
        if delivery.is_success() {
            self.notifications
                .record(
                    entry_id,
                    NotificationKind::CustomAlert,
                    &patient.phone,
                    &text,
                    delivery.status.as_str(),
                )
                .await?;
            Ok(delivery)
        } else {
            Err(AppError::Sms(
                delivery
                    .error
                    .unwrap_or_else(|| "failed to send SMS".into()),
            ))
        }
    }
}
