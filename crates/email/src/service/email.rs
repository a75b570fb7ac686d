use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, MultiPart},
    transport::smtp::authentication::Credentials,
};
use tracing::{error, info};
use uuid::Uuid;

use shared::errors::HandlerError;

use crate::{abstract_trait::MailerTrait, domain::OutgoingEmail};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

/// Production mailer over SMTP. The transport is built once at startup and
/// reused across invocations; it holds no per-request state.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(username: &str, password: &str, host: &str, port: u16) -> anyhow::Result<Self> {
        let creds = Credentials::new(username.to_string(), password.to_string());

        let mailer = SmtpTransport::starttls_relay(host)?
            .credentials(creds)
            .port(port)
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailerTrait for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, HandlerError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|e| HandlerError::Unexpected(format!("Invalid sender email: {e}")))?;

        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| HandlerError::Unexpected(format!("Invalid recipient email: {e}")))?;

        // The message id stamped here is what the handler reports back.
        let message_id = format!("<{}@order-email>", Uuid::new_v4());

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .message_id(Some(message_id.clone()))
            .subject(email.subject.clone());

        if let Some(reply_to) = &email.reply_to {
            let reply: Mailbox = reply_to
                .parse()
                .map_err(|e| HandlerError::Unexpected(format!("Invalid reply-to email: {e}")))?;
            builder = builder.reply_to(reply);
        }

        let message = builder
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| HandlerError::Unexpected(format!("Failed to build email: {e}")))?;

        match self.mailer.send(message).await {
            Ok(_) => {
                info!("Email sent to {}. Message ID: {}", email.to, message_id);
                Ok(message_id)
            }
            Err(e) => {
                error!("Failed to send email to {}: {}", email.to, e);
                Err(HandlerError::Provider(e.to_string()))
            }
        }
    }
}
