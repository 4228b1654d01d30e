use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Checkout;

pub const REFUND_SUBJECT: &str = "Your Order Refund Confirmation";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub const SUPPORT_ADDRESS: &str = "support@example.com";
const SIGN_OFF: &str = "The OEPM Team";

/// A rendered refund confirmation, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

struct Line {
    name: String,
    quantity: i32,
    amount: Decimal,
}

impl RefundEmail {
    pub fn for_checkout(checkout: &Checkout, refunded_at: DateTime<Utc>) -> Self {
        let greeting_name = checkout.username().unwrap_or("Customer");
        let reference = checkout.short_reference();
        let order_date = checkout.created_at.format(DATE_FORMAT).to_string();
        let refund_date = refunded_at.format(DATE_FORMAT).to_string();
        let lines: Vec<Line> = checkout
            .items
            .iter()
            .map(|item| Line {
                name: item.product_name().unwrap_or("Product").to_string(),
                quantity: item.quantity,
                amount: item.subtotal(),
            })
            .collect();

        let mut text = format!(
            "Dear {greeting_name},\n\n\
             Your refund for order #{reference} has been processed.\n\n\
             Order ID: #{reference}\n\
             Order Date: {order_date}\n\
             Refund Date: {refund_date}\n\
             Refund Amount: ${total:.2}\n\n\
             Refunded items:\n",
            total = checkout.total_price,
        );
        for line in &lines {
            text.push_str(&format!(
                "  {} x{}  ${:.2}\n",
                line.name, line.quantity, line.amount
            ));
        }
        text.push_str(&format!(
            "Total: ${:.2}\n\n\
             The refunded amount should appear in your account within 3-5 business days.\n\n\
             Need help? If you have any questions about your refund, please contact our \
             customer support team at {SUPPORT_ADDRESS}.\n\n\
             Thank you for your understanding.\n\n\
             Best regards,\n\
             {SIGN_OFF}\n",
            checkout.total_price
        ));

        let rows: String = lines
            .iter()
            .map(|line| {
                format!(
                    "<tr><td>{}</td><td style=\"text-align:center\">{}</td><td style=\"text-align:right\">${:.2}</td></tr>",
                    escape_html(&line.name),
                    line.quantity,
                    line.amount
                )
            })
            .collect();
        let html = format!(
            "<div style=\"font-family:Arial,sans-serif;max-width:600px;margin:0 auto\">\
             <h1>Refund Confirmation</h1>\
             <p>Dear {name},</p>\
             <p>Your refund for order <strong>#{reference}</strong> has been processed.</p>\
             <table>\
             <tr><td>Order ID:</td><td>#{reference}</td></tr>\
             <tr><td>Order Date:</td><td>{order_date}</td></tr>\
             <tr><td>Refund Date:</td><td>{refund_date}</td></tr>\
             <tr><td>Refund Amount:</td><td>${total:.2}</td></tr>\
             </table>\
             <h3>Refunded Items</h3>\
             <table><thead><tr><th>Product</th><th>Quantity</th><th>Price</th></tr></thead>\
             <tbody>{rows}<tr><td colspan=\"2\">Total:</td><td>${total:.2}</td></tr></tbody></table>\
             <p>The refunded amount should appear in your account within 3-5 business days.</p>\
             <div style=\"background-color:#f5f5f5;padding:15px;border-radius:5px\">\
             <p><strong>Need help?</strong> If you have any questions about your refund, please contact \
             our customer support team at <a href=\"mailto:{SUPPORT_ADDRESS}\">{SUPPORT_ADDRESS}</a>.</p>\
             </div>\
             <p>Thank you for your understanding.</p>\
             <p>Best regards,<br>{SIGN_OFF}</p>\
             </div>",
            name = escape_html(greeting_name),
            total = checkout.total_price,
        );

        Self {
            to: checkout.email.clone(),
            subject: REFUND_SUBJECT.to_string(),
            text,
            html,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
