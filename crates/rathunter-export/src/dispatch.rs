//! Decides whether a search result is emailed, and sends it.

use rathunter_core::{AugmentedRecord, RunMetadata};

use crate::email::{compose_no_results_email, compose_results_email};
use crate::error::ExportError;
use crate::mailer::Mailer;

/// Who receives a search's email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients {
    pub to: Vec<String>,
    pub cc: Vec<String>,
}

impl Recipients {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    /// Empty table and no-results emails are disabled.
    SkippedEmpty,
    NoRecipients,
}

/// Composes and sends the email for `table`.
///
/// An empty table only produces a "no results" email when
/// `empty_notification` is set.
///
/// # Errors
///
/// Returns [`ExportError`] if the message cannot be built or sent.
pub async fn dispatch<M: Mailer>(
    mailer: &M,
    table: &[AugmentedRecord],
    metadata: &RunMetadata,
    recipients: &Recipients,
    empty_notification: bool,
) -> Result<DispatchOutcome, ExportError> {
    if table.is_empty() && !empty_notification {
        tracing::warn!(
            search = %metadata.search_query,
            "no results and empty notifications are disabled, not sending email"
        );
        return Ok(DispatchOutcome::SkippedEmpty);
    }

    if recipients.is_empty() {
        tracing::error!(
            search = %metadata.search_query,
            "no to or cc recipients configured, not sending email"
        );
        return Ok(DispatchOutcome::NoRecipients);
    }

    let content = if table.is_empty() {
        compose_no_results_email(metadata)
    } else {
        compose_results_email(table, metadata)
    };

    mailer.send(recipients, &content).await?;
    tracing::info!(subject = %content.subject, "email sent");
    Ok(DispatchOutcome::Sent)
}
