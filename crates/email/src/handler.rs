use rdkafka::{Message, message::BorrowedMessage};
use serde_json::Value;
use tracing::{error, info};

use shared::{
    config::EmailConfig,
    errors::{HandlerError, ServiceError},
};

use crate::{
    dispatch::Dispatcher,
    domain::{HandlerResponse, OrderEmailRequest},
    render,
    validate::validate,
};

/// Outer handler: runs the validate, render, dispatch pipeline for one
/// order event and maps the outcome to a response record.
pub struct OrderEmailHandler {
    dispatcher: Dispatcher,
    config: EmailConfig,
}

impl OrderEmailHandler {
    pub fn new(dispatcher: Dispatcher, config: EmailConfig) -> Self {
        Self { dispatcher, config }
    }

    pub async fn handle_message(&self, message: &BorrowedMessage<'_>) -> Result<(), ServiceError> {
        let payload = message
            .payload()
            .ok_or_else(|| ServiceError::Custom("Empty message payload".to_string()))?;

        let response = match serde_json::from_slice::<Value>(payload) {
            Ok(event) => self.handle_event(&event).await,
            Err(e) => {
                error!("Invalid JSON payload: {e}");
                HandlerResponse::failure(
                    &HandlerError::Unexpected(format!("Invalid JSON payload: {e}")),
                    "unknown",
                )
            }
        };

        info!(
            status_code = response.status_code,
            body = %response.body,
            "Order email processed"
        );

        Ok(())
    }

    /// Always returns a structured response; pipeline failures never
    /// propagate as errors. The `orderId` in error bodies is read from the
    /// raw event, since validation may be what failed.
    pub async fn handle_event(&self, event: &Value) -> HandlerResponse {
        info!("Event received: {event}");

        let order_id = event
            .get("orderId")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        match self.process(event).await {
            Ok(message_id) => {
                info!("Email sent successfully. Message ID: {message_id}");
                HandlerResponse::success(&message_id, &order_id)
            }
            Err(e) => {
                error!("{}: {}", e.label(), e.message());
                HandlerResponse::failure(&e, &order_id)
            }
        }
    }

    async fn process(&self, event: &Value) -> Result<String, HandlerError> {
        let request: OrderEmailRequest = serde_json::from_value(event.clone())
            .map_err(|e| HandlerError::Unexpected(format!("Malformed order event: {e}")))?;

        validate(&request, &self.config)?;

        info!(
            "Processing order: {} for customer: {}",
            request.order_id.as_deref().unwrap_or_default(),
            request.customer_name.as_deref().unwrap_or_default()
        );

        let rendered = render::render(&request);

        self.dispatcher.dispatch(&request, rendered).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::*;
    use crate::abstract_trait::MockMailer;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_server: "localhost".into(),
            smtp_port: 587,
            smtp_user: "user".into(),
            smtp_pass: "pass".into(),
            sender_email: Some("orders@example.com".into()),
            reply_to_email: None,
        }
    }

    fn handler_with(mailer: MockMailer, config: EmailConfig) -> OrderEmailHandler {
        let dispatcher = Dispatcher::new(
            Arc::new(mailer),
            config.sender_email.clone(),
            config.reply_to_email.clone(),
        );
        OrderEmailHandler::new(dispatcher, config)
    }

    fn order_event() -> Value {
        json!({
            "orderId": "test-123",
            "customerEmail": "customer@example.com",
            "customerName": "Test User",
            "productName": "Test Product",
            "quantity": 2,
            "unitPrice": 99.99,
            "totalPrice": 199.98,
            "orderDate": "2024-01-31T10:30:00"
        })
    }

    fn body_of(response: &HandlerResponse) -> Value {
        serde_json::from_str(&response.body).expect("body must be valid JSON")
    }

    #[tokio::test]
    async fn success_dispatches_once_and_returns_200() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|email| {
                email.subject == "Order Confirmation - Order #test-123"
                    && email.to == "customer@example.com"
                    && email.from == "orders@example.com"
            })
            .returning(|_| Ok("<message-id@order-email>".to_string()));

        let handler = handler_with(mailer, config());
        let response = handler.handle_event(&order_event()).await;

        assert_eq!(response.status_code, 200);
        let body = body_of(&response);
        assert_eq!(body["message"], "Email sent successfully");
        assert_eq!(body["messageId"], "<message-id@order-email>");
        assert_eq!(body["orderId"], "test-123");
    }

    #[tokio::test]
    async fn missing_field_returns_400_naming_the_field() {
        let mut event = order_event();
        event.as_object_mut().unwrap().remove("customerEmail");

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = handler_with(mailer, config());
        let response = handler.handle_event(&event).await;

        assert_eq!(response.status_code, 400);
        let body = body_of(&response);
        assert_eq!(body["error"], "Validation error");
        assert!(body["message"].as_str().unwrap().contains("customerEmail"));
        assert_eq!(body["orderId"], "test-123");
    }

    #[tokio::test]
    async fn missing_order_id_falls_back_to_unknown() {
        let mut event = order_event();
        event.as_object_mut().unwrap().remove("orderId");

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = handler_with(mailer, config());
        let response = handler.handle_event(&event).await;

        assert_eq!(response.status_code, 400);
        let body = body_of(&response);
        assert!(body["message"].as_str().unwrap().contains("orderId"));
        assert_eq!(body["orderId"], "unknown");
    }

    #[tokio::test]
    async fn provider_failure_returns_500_with_provider_message() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| {
            Err(HandlerError::Provider(
                "Email address is not verified".to_string(),
            ))
        });

        let handler = handler_with(mailer, config());
        let response = handler.handle_event(&order_event()).await;

        assert_eq!(response.status_code, 500);
        let body = body_of(&response);
        assert_eq!(body["error"], "Email provider error");
        assert_eq!(body["message"], "Email address is not verified");
        assert_eq!(body["orderId"], "test-123");
    }

    #[tokio::test]
    async fn missing_sender_configuration_returns_400() {
        let mut cfg = config();
        cfg.sender_email = None;

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = handler_with(mailer, cfg);
        let response = handler.handle_event(&order_event()).await;

        assert_eq!(response.status_code, 400);
        let body = body_of(&response);
        assert_eq!(body["error"], "Validation error");
        assert!(body["message"].as_str().unwrap().contains("SENDER_EMAIL"));
    }

    #[tokio::test]
    async fn wrong_typed_payload_returns_500_internal() {
        let mut event = order_event();
        event["quantity"] = json!({"boxes": 2});

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = handler_with(mailer, config());
        let response = handler.handle_event(&event).await;

        assert_eq!(response.status_code, 500);
        let body = body_of(&response);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["orderId"], "test-123");
    }

    #[tokio::test]
    async fn unit_price_omission_flows_through_to_the_sent_bodies() {
        let mut event = order_event();
        event.as_object_mut().unwrap().remove("unitPrice");

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|email| {
                !email.html_body.contains("Unit Price") && !email.text_body.contains("Unit Price")
            })
            .returning(|_| Ok("<id@order-email>".to_string()));

        let handler = handler_with(mailer, config());
        let response = handler.handle_event(&event).await;
        assert_eq!(response.status_code, 200);
    }
}
