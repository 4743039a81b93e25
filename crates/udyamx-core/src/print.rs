//! # Printable Invoice
//!
//! Renders the current invoice form to a self-contained HTML document that
//! opens the print dialog as soon as it loads.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ INVOICE                              UdyamX Inc.     │
//! │                                      123 Business .. │
//! │ BILL TO                    Invoice #: 482913         │
//! │ Local Coffee Shop          Date: 16/10/2026          │
//! │ ┌──────────────┬─────┬────────────┬────────┐         │
//! │ │ Description  │ Qty │ Unit Price │ Total  │         │
//! │ └──────────────┴─────┴────────────┴────────┘         │
//! │                                   Total: ₹85.50      │
//! │            Thank you for your business!              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every user-supplied string is HTML-escaped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::money::Money;
use crate::types::InvoiceItem;

/// Letterhead printed on every invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub name: String,
    pub address_lines: Vec<String>,
    pub currency_symbol: String,
}

impl Default for BusinessDetails {
    fn default() -> Self {
        BusinessDetails {
            name: "UdyamX Inc.".to_string(),
            address_lines: vec!["123 Business Lane".to_string(), "Innovation City, 12345".to_string()],
            currency_symbol: "₹".to_string(),
        }
    }
}

/// A rendered invoice ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    /// Six-digit invoice number.
    pub number: String,
    pub html: String,
}

/// Invoice number: the last six digits of the issue time in milliseconds.
pub fn invoice_number(issued_at: DateTime<Utc>) -> String {
    format!("{:06}", issued_at.timestamp_millis().rem_euclid(1_000_000))
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
body { font-family: 'Inter', sans-serif; margin: 0; padding: 0; background-color: #fff; color: #333; }
.invoice-box { max-width: 800px; margin: auto; padding: 30px; font-size: 16px; line-height: 24px; }
.header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 40px; }
.header h1 { margin: 0; color: #0a2540; font-size: 2.5em; }
.company-details { text-align: right; }
.details { display: flex; justify-content: space-between; margin-bottom: 40px; }
.details strong { display: block; margin-bottom: 5px; color: #555; }
table { width: 100%; text-align: left; border-collapse: collapse; }
table th { background: #f5f5f5; font-weight: bold; padding: 10px; border-bottom: 2px solid #ddd; }
table td { padding: 10px; border-bottom: 1px solid #eee; }
.total-section { display: flex; justify-content: flex-end; margin-top: 30px; }
.total-table { width: 50%; }
.total-table .total { font-weight: bold; font-size: 1.2em; border-top: 2px solid #333; }
.footer { text-align: center; color: #777; border-top: 1px solid #eee; padding-top: 20px; margin-top: 40px; }";

/// Renders the invoice. Callers validate the form first
/// (see [`InvoiceDraft::validate_for_print`](crate::invoice::InvoiceDraft::validate_for_print)).
pub fn render_invoice(
    business: &BusinessDetails,
    client_name: &str,
    items: &[InvoiceItem],
    issued_at: DateTime<Utc>,
) -> PrintDocument {
    let number = invoice_number(issued_at);
    let currency = escape_html(&business.currency_symbol);
    let amount = |m: Money| format!("{}{}", currency, m.to_decimal_string());
    let client = escape_html(client_name.trim());

    let mut rows = String::new();
    for item in items {
        // Writing into a String cannot fail
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&item.description),
            item.quantity,
            amount(item.price),
            amount(item.line_total()),
        );
    }
    let total: Money = items.iter().map(InvoiceItem::line_total).sum();

    let mut company = format!("<strong>{}</strong>", escape_html(&business.name));
    for line in &business.address_lines {
        company.push_str("<br>");
        company.push_str(&escape_html(line));
    }

    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Invoice - {client}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n\
<div class=\"invoice-box\">\n\
<div class=\"header\"><h1>INVOICE</h1><div class=\"company-details\">{company}</div></div>\n\
<div class=\"details\"><div><strong>BILL TO</strong>{client}</div><div><strong>Invoice #:</strong> {number}<br><strong>Date:</strong> {date}</div></div>\n\
<table><thead><tr><th>Item Description</th><th>Quantity</th><th>Unit Price</th><th>Total</th></tr></thead>\n<tbody>{rows}</tbody>\n</table>\n\
<div class=\"total-section\"><table class=\"total-table\"><tr class=\"total\"><td>Total:</td><td style=\"text-align: right;\">{total}</td></tr></table></div>\n\
<div class=\"footer\">Thank you for your business!</div>\n\
</div>\n\
<script>window.onload = () => window.print();</script>\n\
</body>\n</html>\n",
        date = issued_at.format("%d/%m/%Y"),
        total = amount(total),
    );

    PrintDocument { number, html }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_760_000_482_913).single().unwrap()
    }

    #[test]
    fn test_invoice_number_is_last_six_digits() {
        assert_eq!(invoice_number(issued()), "482913");
        let early = Utc.timestamp_millis_opt(1_000_000_000_042).single().unwrap();
        assert_eq!(invoice_number(early), "000042");
    }

    #[test]
    fn test_render_contains_lines_and_total() {
        let items = vec![
            InvoiceItem::new("1 Dozen Croissants", 2, Money::from_paise(2400)),
            InvoiceItem::new("Sourdough Loaf", 5, Money::from_paise(750)),
        ];
        let doc = render_invoice(&BusinessDetails::default(), "Local Coffee Shop", &items, issued());

        assert_eq!(doc.number, "482913");
        assert!(doc.html.contains("<strong>BILL TO</strong>Local Coffee Shop"));
        assert!(doc.html.contains("<td>Sourdough Loaf</td><td>5</td><td>₹7.50</td><td>₹37.50</td>"));
        assert!(doc.html.contains("₹85.50"));
        assert!(doc.html.contains("UdyamX Inc.</strong><br>123 Business Lane"));
        assert!(doc.html.contains("Thank you for your business!"));
        assert!(doc.html.contains("window.print()"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let items = vec![InvoiceItem::new("<b>Soap</b> & co", 1, Money::zero())];
        let doc = render_invoice(&BusinessDetails::default(), "Tom's \"Shop\"", &items, issued());

        assert!(doc.html.contains("&lt;b&gt;Soap&lt;/b&gt; &amp; co"));
        assert!(doc.html.contains("Tom&#39;s &quot;Shop&quot;"));
        assert!(!doc.html.contains("<b>Soap"));
    }
}
