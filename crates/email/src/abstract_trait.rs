use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

use shared::errors::HandlerError;

use crate::domain::OutgoingEmail;

pub type DynMailer = Arc<dyn MailerTrait>;

/// Remote send capability: one message in, provider message id out.
#[async_trait]
pub trait MailerTrait: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, HandlerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl MailerTrait for Mailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<String, HandlerError>;
    }
}
