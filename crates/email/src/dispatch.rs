use tracing::info;

use shared::errors::HandlerError;

use crate::{
    abstract_trait::DynMailer,
    domain::{OrderEmailRequest, OutgoingEmail, RenderedEmail},
};

/// Builds the provider-agnostic send request from a validated payload and
/// its rendering, then invokes the mailer exactly once. No retries.
pub struct Dispatcher {
    mailer: DynMailer,
    sender: Option<String>,
    reply_to: Option<String>,
}

impl Dispatcher {
    pub fn new(mailer: DynMailer, sender: Option<String>, reply_to: Option<String>) -> Self {
        Self {
            mailer,
            sender,
            reply_to,
        }
    }

    pub async fn dispatch(
        &self,
        request: &OrderEmailRequest,
        rendered: RenderedEmail,
    ) -> Result<String, HandlerError> {
        // The validator guarantees both of these on the normal path.
        let from = self.sender.clone().ok_or_else(|| {
            HandlerError::Validation("SENDER_EMAIL environment variable is required".to_string())
        })?;
        let to = request.customer_email.clone().ok_or_else(|| {
            HandlerError::Unexpected("customerEmail missing after validation".to_string())
        })?;

        let email = OutgoingEmail {
            from,
            to,
            reply_to: self
                .reply_to
                .as_deref()
                .filter(|reply_to| !reply_to.is_empty())
                .map(str::to_string),
            subject: rendered.subject,
            html_body: rendered.html_body,
            text_body: rendered.text_body,
        };

        info!("Sending email to: {}", email.to);

        self.mailer.send(&email).await
    }
}
