//! Terminal output. The only place the CLI writes to stdout or stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;

use bella_core::{OrderId, Price};
use bella_storefront::backend::{CatalogProduct, OrderItemDetail, OrderSummary};
use bella_storefront::cart::Cart;
use bella_storefront::checkout::CheckoutReceipt;
use bella_storefront::error::AppError;

pub fn line(text: &str) {
    println!("{text}");
}

pub fn notice(text: &str) {
    eprintln!("{text}");
}

pub fn error(err: &AppError) {
    eprintln!("error: {}", err.user_message());
}

pub fn cart(cart: &Cart) {
    print!("{}", render_cart(cart));
}

pub fn receipt(receipt: &CheckoutReceipt) {
    println!("Pedido #{} registrado ({})", receipt.order.id, receipt.order.status);
    println!("Total: {}", receipt.payload.total);
    println!();
    println!("Envía tu pedido a la vendedora:");
    println!("{}", receipt.handoff_url);
}

pub fn products(products: &[CatalogProduct]) {
    print!("{}", render_products(products));
}

pub fn orders(orders: &[OrderSummary]) {
    print!("{}", render_orders(orders));
}

pub fn order_items(id: &OrderId, items: &[OrderItemDetail]) {
    print!("{}", render_order_items(id, items));
}

fn render_products(products: &[CatalogProduct]) -> String {
    if products.is_empty() {
        return "No hay productos disponibles\n".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "  {:<10} {:<30} {}",
            product.id.as_str(),
            product.name,
            product.price
        );
    }
    out
}

/// Orders as a table: customer, phone, date, total, status.
fn render_orders(orders: &[OrderSummary]) -> String {
    if orders.is_empty() {
        return "No hay pedidos\n".to_string();
    }

    let name_width = orders
        .iter()
        .map(|order| order.customer_name().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for order in orders {
        let phone = order
            .customer
            .as_ref()
            .and_then(|c| c.phone.as_deref())
            .unwrap_or("-");
        let date = order.created_at.map_or_else(
            || "-".to_string(),
            |at| at.format("%d/%m/%Y %H:%M").to_string(),
        );
        let _ = writeln!(
            out,
            "  #{:<6} {:<name_width$}  {:<10} {:<16} {:>12}  {}",
            order.id.as_str(),
            order.customer_name(),
            phone,
            date,
            order.total_price.format_amount(),
            order.status
        );
    }
    out
}

fn render_order_items(id: &OrderId, items: &[OrderItemDetail]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pedido #{id}");
    for item in items {
        let _ = writeln!(
            out,
            "  {:<30} x{:<3} {:>10}  {}",
            item.product_name(),
            item.quantity,
            item.unit_price.format_amount(),
            item.line_total()
        );
    }
    let total = items.iter().map(OrderItemDetail::line_total).sum::<Price>();
    let _ = writeln!(out, "Total: {total}");
    out
}

/// Cart as a plain-text table.
fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Tu carrito está vacío\n".to_string();
    }

    let name_width = cart
        .items()
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    // `write!` into a String cannot fail.
    let _ = writeln!(out, "Carrito ({} artículos)", cart.item_count());
    for item in cart.items() {
        let _ = writeln!(
            out,
            "  {:<10} {:<name_width$}  x{:<3} {:>8}  {}",
            item.id.as_str(),
            item.name,
            item.quantity,
            item.price.format_amount(),
            item.line_total()
        );
    }
    let _ = writeln!(out, "Total: {}", cart.total());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bella_core::{OrderStatus, Product, Quantity};
    use bella_storefront::backend::{OrderCustomer, OrderItemProduct};
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::new()), "Tu carrito está vacío\n");
    }

    #[test]
    fn test_render_cart_lines_and_total() {
        let mut cart = Cart::new();
        cart.add(
            Product::new("p1", "Labial mate", Price::from_cents(3550)),
            Quantity::new(2).unwrap(),
        );
        cart.add(Product::new("p2", "Rubor", Price::from_cents(4000)), Quantity::ONE);

        let out = render_cart(&cart);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "Carrito (3 artículos)");
        assert!(lines[1].contains("Labial mate"));
        assert!(lines[1].contains("x2"));
        assert!(lines[1].ends_with("Bs 71.00"));
        assert!(lines[2].ends_with("Bs 40.00"));
        assert_eq!(lines[3], "Total: Bs 111.00");
    }

    #[test]
    fn test_render_products() {
        let products = vec![CatalogProduct {
            id: "7".into(),
            name: "Labial mate".to_string(),
            description: None,
            price: Price::from_cents(3550),
            image_url: None,
        }];
        let out = render_products(&products);
        assert!(out.contains("Labial mate"));
        assert!(out.trim_end().ends_with("Bs 35.50"));
        assert_eq!(render_products(&[]), "No hay productos disponibles\n");
    }

    #[test]
    fn test_render_orders_with_and_without_customer() {
        let orders = vec![
            OrderSummary {
                id: "118".into(),
                created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 14, 2, 0).unwrap()),
                total_price: Price::from_cents(7550),
                status: OrderStatus::Pending,
                customer: Some(OrderCustomer {
                    full_name: Some("Ana Pérez".to_string()),
                    phone: Some("71234567".to_string()),
                }),
            },
            OrderSummary {
                id: "119".into(),
                created_at: None,
                total_price: Price::from_cents(1000),
                status: OrderStatus::Cancelled,
                customer: None,
            },
        ];
        let out = render_orders(&orders);
        let lines: Vec<_> = out.lines().collect();

        assert!(lines[0].contains("#118"));
        assert!(lines[0].contains("71234567"));
        assert!(lines[0].contains("01/03/2025 14:02"));
        assert!(lines[0].ends_with("pendiente"));
        assert!(lines[1].contains("Sin nombre"));
        assert!(lines[1].ends_with("anulado"));
    }

    #[test]
    fn test_render_order_items_total() {
        let items = vec![
            OrderItemDetail {
                quantity: Quantity::new(2).unwrap(),
                unit_price: Price::from_cents(3550),
                product: Some(OrderItemProduct {
                    name: "Labial mate".to_string(),
                }),
            },
            OrderItemDetail {
                quantity: Quantity::ONE,
                unit_price: Price::from_cents(4000),
                product: None,
            },
        ];
        let out = render_order_items(&OrderId::new("118"), &items);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "Pedido #118");
        assert!(lines[1].ends_with("Bs 71.00"));
        assert!(lines[2].starts_with("  Producto eliminado"));
        assert_eq!(lines[3], "Total: Bs 111.00");
    }
}
