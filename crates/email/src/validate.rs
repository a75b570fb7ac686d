use shared::{config::EmailConfig, errors::HandlerError};

use crate::domain::OrderEmailRequest;

/// Checks the fixed ordered list of required fields, short-circuiting on
/// the first one that is absent or empty, then checks the sender-address
/// precondition. Nothing past this point may run on an invalid request.
pub fn validate(request: &OrderEmailRequest, config: &EmailConfig) -> Result<(), HandlerError> {
    let required = [
        ("orderId", request.order_id.as_deref()),
        ("customerEmail", request.customer_email.as_deref()),
        ("customerName", request.customer_name.as_deref()),
        ("productName", request.product_name.as_deref()),
    ];

    for (name, value) in required {
        if value.unwrap_or("").is_empty() {
            return Err(HandlerError::Validation(format!("{name} is required")));
        }
    }

    if config.sender_email.is_none() {
        return Err(HandlerError::Validation(
            "SENDER_EMAIL environment variable is required".to_string(),
        ));
    }

    Ok(())
}
