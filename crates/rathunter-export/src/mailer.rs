//! Outbound mail transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rathunter_core::MailConfig;

use crate::dispatch::Recipients;
use crate::email::EmailContent;
use crate::error::ExportError;

const SENDER_NAME: &str = "RAT Hunter";

/// Sends a composed email to a recipient set.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipients: &Recipients, content: &EmailContent)
        -> Result<(), ExportError>;
}

/// SMTP mailer authenticated with the configured account credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds a STARTTLS relay transport for `config.smtp_host`. No connection
    /// is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Address`] if the account is not a valid address,
    /// or [`ExportError::Smtp`] if the relay cannot be configured.
    pub fn new(config: &MailConfig) -> Result<Self, ExportError> {
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), config.account.parse()?);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.account.clone(),
                config.secret.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }

    fn build_message(
        &self,
        recipients: &Recipients,
        content: &EmailContent,
    ) -> Result<Message, ExportError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(content.subject.clone())
            .header(ContentType::TEXT_HTML);
        for to in &recipients.to {
            builder = builder.to(to.parse()?);
        }
        for cc in &recipients.cc {
            builder = builder.cc(cc.parse()?);
        }
        Ok(builder.body(content.html_body.clone())?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        recipients: &Recipients,
        content: &EmailContent,
    ) -> Result<(), ExportError> {
        let message = self.build_message(recipients, content)?;
        tracing::info!(
            subject = %content.subject,
            to = ?recipients.to,
            cc = ?recipients.cc,
            "sending email"
        );
        self.transport.send(message).await?;
        Ok(())
    }
}
