use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::domain::{OrderEmailRequest, RenderedEmail};

const DATE_DISPLAY: &str = "%B %d, %Y at %I:%M %p";
const TRACKING_BASE_URL: &str = "https://yourdomain.com/orders";
const SUPPORT_EMAIL: &str = "support@yourdomain.com";

/// Renders the subject and both bodies for one validated request. Pure and
/// deterministic; all provider interaction happens later in the dispatcher.
pub fn render(request: &OrderEmailRequest) -> RenderedEmail {
    let order_id = request.order_id.as_deref().unwrap_or("N/A");

    RenderedEmail {
        subject: format!("Order Confirmation - Order #{order_id}"),
        html_body: render_html(request),
        text_body: render_text(request),
    }
}

/// Display values shared by both renderings, with defaults applied.
/// `unit_price: None` means the whole line is omitted, not shown as zero.
struct DisplayValues<'a> {
    order_id: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
    product_name: &'a str,
    product_description: &'a str,
    quantity: i64,
    unit_price: Option<String>,
    total_price: String,
    order_status: &'a str,
    order_date: String,
}

impl<'a> DisplayValues<'a> {
    fn from_request(request: &'a OrderEmailRequest) -> Self {
        Self {
            order_id: request.order_id.as_deref().unwrap_or("N/A"),
            customer_name: request.customer_name.as_deref().unwrap_or("Customer"),
            customer_email: request.customer_email.as_deref().unwrap_or(""),
            product_name: request.product_name.as_deref().unwrap_or("Product"),
            product_description: request.product_description.as_deref().unwrap_or(""),
            quantity: request.quantity.unwrap_or(1),
            unit_price: request
                .unit_price
                .as_ref()
                .map(|price| format_price(Some(price))),
            total_price: format_price(request.total_price.as_ref()),
            order_status: request.order_status.as_deref().unwrap_or("CONFIRMED"),
            order_date: format_date(request.order_date.as_deref()),
        }
    }
}

pub fn render_html(request: &OrderEmailRequest) -> String {
    let values = DisplayValues::from_request(request);

    let order_id = escape_html(values.order_id);
    let customer_name = escape_html(values.customer_name);
    let customer_email = escape_html(values.customer_email);
    let product_name = escape_html(values.product_name);
    let product_description = escape_html(values.product_description);
    let order_status = escape_html(values.order_status);
    let order_date = escape_html(&values.order_date);

    let description_row = if product_description.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="detail-row"><span class="detail-label">Description:</span><span class="detail-value">{product_description}</span></div>"#
        )
    };

    let unit_price_row = match &values.unit_price {
        Some(price) => format!(
            r#"<div class="detail-row"><span class="detail-label">Unit Price:</span><span class="detail-value">${price}</span></div>"#
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Order Confirmation</title>
    <style>{styles}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Order Confirmed!</h1>
            <p>Thank you for your purchase</p>
        </div>
        <div class="content">
            <div class="greeting">Hi {customer_name},</div>
            <p>
                We're excited to confirm that your order has been received and is being processed.
                Here are the details of your purchase:
            </p>
            <div class="order-details">
                <h2>Order Details</h2>
                <div class="detail-row">
                    <span class="detail-label">Order ID:</span>
                    <span class="detail-value">#{order_id}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">Order Date:</span>
                    <span class="detail-value">{order_date}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">Status:</span>
                    <span class="status-badge">{order_status}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">Product:</span>
                    <span class="detail-value">{product_name}</span>
                </div>
                {description_row}
                <div class="detail-row">
                    <span class="detail-label">Quantity:</span>
                    <span class="detail-value">{quantity}</span>
                </div>
                {unit_price_row}
                <div class="detail-row">
                    <span class="detail-label">Total Amount:</span>
                    <span class="total-price">${total_price}</span>
                </div>
            </div>
            <div class="message">
                <strong>What's Next?</strong><br>
                We'll send you another email with tracking information once your order ships.
                Expected delivery: 3-5 business days.
            </div>
            <center>
                <a href="{tracking_base}/{order_id}" class="button">Track Your Order</a>
            </center>
            <p>
                If you have any questions about your order, please don't hesitate to contact our customer support team.
            </p>
        </div>
        <div class="footer">
            <p>Need help? <a href="mailto:{support_email}">Contact Support</a></p>
            <p>&copy; 2024 Your Company. All rights reserved.</p>
            <p class="disclosure">This email was sent to {customer_email} because you placed an order.</p>
        </div>
    </div>
</body>
</html>
"#,
        styles = EMAIL_STYLES,
        customer_name = customer_name,
        order_id = order_id,
        order_date = order_date,
        order_status = order_status,
        product_name = product_name,
        description_row = description_row,
        quantity = values.quantity,
        unit_price_row = unit_price_row,
        total_price = values.total_price,
        tracking_base = TRACKING_BASE_URL,
        support_email = SUPPORT_EMAIL,
        customer_email = customer_email,
    )
}

pub fn render_text(request: &OrderEmailRequest) -> String {
    let values = DisplayValues::from_request(request);

    let mut lines = vec![
        "ORDER CONFIRMATION".to_string(),
        "==================".to_string(),
        String::new(),
        format!("Hi {},", values.customer_name),
        String::new(),
        "Thank you for your order! We're excited to confirm that your order has been received and is being processed.".to_string(),
        String::new(),
        "ORDER DETAILS:".to_string(),
        "--------------".to_string(),
        format!("Order ID: #{}", values.order_id),
        format!("Order Date: {}", values.order_date),
        format!("Status: {}", values.order_status),
        String::new(),
        "PRODUCT DETAILS:".to_string(),
        "----------------".to_string(),
        format!("Product: {}", values.product_name),
    ];

    if !values.product_description.is_empty() {
        lines.push(format!("Description: {}", values.product_description));
    }

    lines.push(format!("Quantity: {}", values.quantity));

    if let Some(price) = &values.unit_price {
        lines.push(format!("Unit Price: ${price}"));
    }

    lines.push(format!("Total Amount: ${}", values.total_price));

    lines.extend([
        String::new(),
        "WHAT'S NEXT?".to_string(),
        "------------".to_string(),
        "We'll send you another email with tracking information once your order ships.".to_string(),
        "Expected delivery: 3-5 business days.".to_string(),
        String::new(),
        format!("Track your order: {}/{}", TRACKING_BASE_URL, values.order_id),
        String::new(),
        "NEED HELP?".to_string(),
        "----------".to_string(),
        format!(
            "If you have any questions about your order, please contact our customer support team at {SUPPORT_EMAIL}"
        ),
        String::new(),
        format!(
            "This email was sent to {} because you placed an order.",
            values.customer_email
        ),
    ]);

    lines.join("\n")
}

/// Total over any input: number or numeric string renders with two decimal
/// digits, everything else falls back to "0.00".
pub fn format_price(value: Option<&Value>) -> String {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(price) if price.is_finite() => format!("{price:.2}"),
        _ => "0.00".to_string(),
    }
}

/// Absent input renders "N/A"; an unparseable string is returned unchanged.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return "N/A".to_string();
    };

    // RFC 3339 first (covers a trailing Z as UTC), then naive timestamps,
    // then bare dates at midnight.
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return date_time.format(DATE_DISPLAY).to_string();
    }

    if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return date_time.format(DATE_DISPLAY).to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(date_time) = date.and_hms_opt(0, 0, 0) {
            return date_time.format(DATE_DISPLAY).to_string();
        }
    }

    raw.to_string()
}

/// Escapes the five HTML metacharacters, ampersand first so produced
/// entities are not re-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const EMAIL_STYLES: &str = r#"
        body {
            font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            margin: 0;
            padding: 0;
            background-color: #f4f4f4;
        }
        .container {
            max-width: 600px;
            margin: 20px auto;
            background: #ffffff;
            border-radius: 10px;
            overflow: hidden;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
        }
        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 30px 20px;
            text-align: center;
        }
        .header h1 {
            margin: 0;
            font-size: 28px;
            font-weight: 600;
        }
        .content {
            padding: 30px 20px;
        }
        .greeting {
            font-size: 18px;
            margin-bottom: 20px;
        }
        .order-details {
            background: #f8f9fa;
            border-left: 4px solid #667eea;
            padding: 20px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .order-details h2 {
            margin-top: 0;
            color: #667eea;
            font-size: 20px;
        }
        .detail-row {
            display: flex;
            justify-content: space-between;
            padding: 10px 0;
            border-bottom: 1px solid #e9ecef;
        }
        .detail-row:last-child {
            border-bottom: none;
        }
        .detail-label {
            font-weight: 600;
            color: #495057;
        }
        .detail-value {
            color: #212529;
        }
        .total-price {
            font-size: 24px;
            font-weight: bold;
            color: #667eea;
        }
        .status-badge {
            display: inline-block;
            padding: 5px 15px;
            border-radius: 20px;
            font-size: 14px;
            font-weight: 600;
            background-color: #28a745;
            color: white;
        }
        .message {
            background: #e7f3ff;
            border-left: 4px solid #007bff;
            padding: 15px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .footer {
            background: #f8f9fa;
            padding: 20px;
            text-align: center;
            color: #6c757d;
            font-size: 14px;
        }
        .footer a {
            color: #667eea;
            text-decoration: none;
        }
        .footer .disclosure {
            font-size: 12px;
            color: #adb5bd;
            margin-top: 10px;
        }
        .button {
            display: inline-block;
            padding: 12px 30px;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            text-decoration: none;
            border-radius: 5px;
            margin: 20px 0;
            font-weight: 600;
        }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> OrderEmailRequest {
        OrderEmailRequest {
            order_id: Some("test-123".to_string()),
            customer_email: Some("customer@example.com".to_string()),
            customer_name: Some("Test User".to_string()),
            product_name: Some("Test Product".to_string()),
            product_description: Some("This is a test product".to_string()),
            quantity: Some(2),
            unit_price: Some(json!(99.99)),
            total_price: Some(json!(199.98)),
            order_status: Some("CONFIRMED".to_string()),
            order_date: Some("2024-01-31T10:30:00".to_string()),
        }
    }

    #[test]
    fn format_price_is_total() {
        assert_eq!(format_price(Some(&json!(99.99))), "99.99");
        assert_eq!(format_price(Some(&json!("99.99"))), "99.99");
        assert_eq!(format_price(Some(&json!(99.989))), "99.99");
        assert_eq!(format_price(None), "0.00");
        assert_eq!(format_price(Some(&json!("abc"))), "0.00");
    }

    #[test]
    fn format_date_handles_naive_timestamps() {
        let formatted = format_date(Some("2024-01-31T10:30:00"));
        assert!(formatted.contains("January 31, 2024"));
        assert!(formatted.contains("10:30 AM"));
    }

    #[test]
    fn format_date_accepts_utc_suffix() {
        let formatted = format_date(Some("2024-01-31T22:30:00Z"));
        assert!(formatted.contains("January 31, 2024"));
        assert!(formatted.contains("10:30 PM"));
    }

    #[test]
    fn format_date_falls_back_to_raw_input() {
        assert_eq!(format_date(Some("not-a-date")), "not-a-date");
    }

    #[test]
    fn format_date_absent_is_na() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
    }

    #[test]
    fn escape_html_handles_all_five_metacharacters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Co'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Co&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_html_escapes_ampersand_first() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn html_escapes_user_supplied_strings() {
        let mut req = request();
        req.customer_name = Some("<script>alert('x')</script>".to_string());
        req.product_name = Some(r#"Widget "Pro" & Co"#.to_string());

        let html = render_html(&req);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Widget &quot;Pro&quot; &amp; Co"));
    }

    #[test]
    fn text_uses_raw_values() {
        let mut req = request();
        req.product_name = Some("Widget & Co".to_string());

        assert!(render_text(&req).contains("Product: Widget & Co"));
    }

    #[test]
    fn unit_price_line_omitted_when_absent() {
        let mut req = request();
        req.unit_price = None;

        let html = render_html(&req);
        let text = render_text(&req);
        assert!(!html.contains("Unit Price"));
        assert!(!text.contains("Unit Price"));
        assert!(html.contains("199.98"));
        assert!(text.contains("Total Amount: $199.98"));
    }

    #[test]
    fn description_line_omitted_when_absent() {
        let mut req = request();
        req.product_description = None;

        assert!(!render_html(&req).contains("Description"));
        assert!(!render_text(&req).contains("Description"));
    }

    #[test]
    fn description_line_omitted_when_empty() {
        let mut req = request();
        req.product_description = Some(String::new());

        assert!(!render_html(&req).contains("Description"));
        assert!(!render_text(&req).contains("Description"));
    }

    #[test]
    fn defaults_applied_for_optional_fields() {
        let req = OrderEmailRequest {
            order_id: Some("ord-9".into()),
            customer_email: Some("a@example.com".into()),
            customer_name: Some("A".into()),
            product_name: Some("P".into()),
            ..Default::default()
        };

        let text = render_text(&req);
        assert!(text.contains("Quantity: 1"));
        assert!(text.contains("Status: CONFIRMED"));
        assert!(text.contains("Total Amount: $0.00"));
        assert!(text.contains("Order Date: N/A"));
        assert!(!text.contains("Unit Price"));
    }

    #[test]
    fn unparseable_total_falls_back_to_zero() {
        let mut req = request();
        req.total_price = Some(json!("abc"));

        assert!(render_text(&req).contains("Total Amount: $0.00"));
    }

    #[test]
    fn subject_references_order_id() {
        let rendered = render(&request());
        assert_eq!(rendered.subject, "Order Confirmation - Order #test-123");
    }

    #[test]
    fn both_bodies_carry_the_tracking_link() {
        assert!(render_html(&request()).contains("https://yourdomain.com/orders/test-123"));
        assert!(render_text(&request()).contains("https://yourdomain.com/orders/test-123"));
    }

    #[test]
    fn footer_discloses_recipient_address() {
        assert!(render_html(&request()).contains("customer@example.com"));
        assert!(render_text(&request()).contains("customer@example.com"));
    }
}
