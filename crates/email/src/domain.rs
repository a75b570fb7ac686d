use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared::errors::HandlerError;

/// Order-placed event payload.
///
/// Every field is optional at the type level so a payload with missing
/// fields still deserializes; the validator rejects it afterwards, naming
/// the first missing field. Prices stay as raw JSON values because the
/// contract accepts both numbers and numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderEmailRequest {
    pub order_id: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Value>,
    pub total_price: Option<Value>,
    pub order_status: Option<String>,
    pub order_date: Option<String>,
}

/// Immutable rendering of one confirmation email, created per request and
/// discarded after dispatch.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Provider-agnostic send request handed to the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    /// `None` means the header is left off the message entirely.
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Per-invocation response record; `body` is itself a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn success(message_id: &str, order_id: &str) -> Self {
        let body = serde_json::json!({
            "message": "Email sent successfully",
            "messageId": message_id,
            "orderId": order_id,
        });

        Self {
            status_code: 200,
            body: body.to_string(),
        }
    }

    pub fn failure(error: &HandlerError, order_id: &str) -> Self {
        let body = serde_json::json!({
            "error": error.label(),
            "message": error.message(),
            "orderId": order_id,
        });

        Self {
            status_code: error.status_code(),
            body: body.to_string(),
        }
    }
}
