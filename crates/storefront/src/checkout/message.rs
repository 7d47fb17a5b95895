//! Seller handoff message and WhatsApp deep link.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use url::Url;

use bella_core::OrderId;

use super::OrderPayload;
use crate::backend::Customer;

/// Base of WhatsApp click-to-chat links.
const WHATSAPP_BASE: &str = "https://wa.me";

/// Shown for profile fields the customer never filled in.
const MISSING_FIELD: &str = "No registrado";

/// Compose the order summary sent to the seller.
///
/// Uses WhatsApp text formatting: `*bold*` for headings.
#[must_use]
pub fn build_order_message(
    customer: &Customer,
    order_id: &OrderId,
    payload: &OrderPayload,
    placed_at: DateTime<Utc>,
) -> String {
    let mut message = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(message, "🛍️ *Nuevo Pedido de {}*", customer.display_name());
    let _ = writeln!(message);
    let _ = writeln!(message, "🔖 Pedido: #{order_id}");
    let _ = writeln!(message, "📅 Fecha: {}", placed_at.format("%d/%m/%Y"));
    let _ = writeln!(message, "📞 Teléfono: {}", field(customer.phone.as_deref()));
    let _ = writeln!(message, "📍 Dirección: {}", field(customer.address.as_deref()));
    let _ = writeln!(message);
    let _ = writeln!(message, "🧾 *Detalle del pedido:*");
    for line in &payload.lines {
        let _ = writeln!(
            message,
            "- {} x{} = {}",
            line.name,
            line.quantity,
            line.line_total()
        );
    }
    let _ = writeln!(message);
    let _ = write!(message, "💰 *Total a pagar:* {}", payload.total);

    message
}

/// Click-to-chat link opening a conversation with `seller` prefilled with
/// `message`.
///
/// # Errors
///
/// Returns `url::ParseError` if `seller` produces an invalid URL.
pub fn whatsapp_url(seller: &str, message: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{WHATSAPP_BASE}/{seller}?text={}",
        urlencoding::encode(message)
    ))
}

fn field(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_FIELD)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use bella_core::{CustomerId, Price, Product, Quantity};

    use super::*;
    use crate::cart::Cart;

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new("u-1"),
            full_name: Some("Ana Pérez".to_string()),
            phone: Some("71234567".to_string()),
            address: None,
        }
    }

    fn payload() -> OrderPayload {
        let mut cart = Cart::new();
        cart.add(
            Product::new("p1", "Labial mate", Price::from_cents(3550)),
            Quantity::new(2).unwrap(),
        );
        cart.add(Product::new("p2", "Rubor", Price::from_cents(4000)), Quantity::ONE);
        OrderPayload::from_cart(&cart).unwrap()
    }

    #[test]
    fn test_message_contents() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 15, 0, 0).unwrap();
        let message = build_order_message(&customer(), &OrderId::new("118"), &payload(), at);

        assert_eq!(
            message,
            "🛍️ *Nuevo Pedido de Ana Pérez*\n\
             \n\
             🔖 Pedido: #118\n\
             📅 Fecha: 07/03/2025\n\
             📞 Teléfono: 71234567\n\
             📍 Dirección: No registrado\n\
             \n\
             🧾 *Detalle del pedido:*\n\
             - Labial mate x2 = Bs 71.00\n\
             - Rubor x1 = Bs 40.00\n\
             \n\
             💰 *Total a pagar:* Bs 111.00"
        );
    }

    #[test]
    fn test_whatsapp_url_is_encoded() {
        let url = whatsapp_url("59170000000", "Hola *mundo* & más\nfin").unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/59170000000");

        let text: Vec<_> = url.query_pairs().filter(|(k, _)| k == "text").collect();
        assert_eq!(text.len(), 1);
        assert_eq!(text[0].1, "Hola *mundo* & más\nfin");
        assert!(!url.as_str().contains(' '));
    }
}
