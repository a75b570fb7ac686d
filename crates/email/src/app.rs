use std::sync::Arc;

use tracing::info;

use shared::{config::Config, errors::ServiceError};

use crate::{
    abstract_trait::DynMailer,
    dispatch::Dispatcher,
    handler::OrderEmailHandler,
    service::{KafkaOrderEmailService, SmtpMailer},
};

pub struct EmailServiceApp {
    config: Config,
}

impl EmailServiceApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<(), ServiceError> {
        let email = &self.config.email_config;

        let mailer = Arc::new(
            SmtpMailer::new(
                &email.smtp_user,
                &email.smtp_pass,
                &email.smtp_server,
                email.smtp_port,
            )
            .map_err(|e| ServiceError::Internal(format!("Failed to build SMTP transport: {e}")))?,
        ) as DynMailer;

        let dispatcher = Dispatcher::new(
            mailer,
            email.sender_email.clone(),
            email.reply_to_email.clone(),
        );

        let handler = OrderEmailHandler::new(dispatcher, email.clone());

        let kafka_service = KafkaOrderEmailService::new(
            &self.config.kafka_broker,
            "email-service-group",
            &["email-service-topic-order-placed"],
            handler,
        )?;

        info!("Starting Order Email Service...");
        kafka_service.start_consuming().await
    }
}
