//! Seller order management against a recording backend.

#![allow(clippy::unwrap_used)]

use bella_core::{OrderId, OrderStatus, Price, Quantity};
use bella_integration_tests::{FailAt, RecordingBackend, placed_order};
use bella_storefront::backend::{OrderItemDetail, OrderItemProduct};
use bella_storefront::error::AppError;
use bella_storefront::orders::{OrderFilter, Resolution, order_items, recent_orders, resolve_order};

fn backend() -> RecordingBackend {
    RecordingBackend::default()
        .with_placed_orders([
            placed_order("12", Some("Ana Pérez"), OrderStatus::Pending),
            placed_order("11", Some("Lucía Mamani"), OrderStatus::Completed),
            placed_order("10", None, OrderStatus::Pending),
            placed_order("9", Some("Mariana Ana"), OrderStatus::Cancelled),
        ])
        .with_placed_item(
            "12",
            OrderItemDetail {
                quantity: Quantity::new(2).unwrap(),
                unit_price: Price::from_cents(2500),
                product: Some(OrderItemProduct {
                    name: "Rubor".to_string(),
                }),
            },
        )
}

fn ids(orders: &[bella_storefront::backend::OrderSummary]) -> Vec<&str> {
    orders.iter().map(|o| o.id.as_str()).collect()
}

#[tokio::test]
async fn test_recent_orders_filtered_by_status_and_name() {
    let backend = backend();

    let pending = OrderFilter {
        status: Some(OrderStatus::Pending),
        ..OrderFilter::default()
    };
    assert_eq!(ids(&recent_orders(&backend, &pending).await.unwrap()), ["12", "10"]);

    let ana = OrderFilter {
        customer: Some("ANA".to_string()),
        ..OrderFilter::default()
    };
    assert_eq!(ids(&recent_orders(&backend, &ana).await.unwrap()), ["12", "9"]);

    let one = OrderFilter {
        limit: 1,
        ..OrderFilter::default()
    };
    assert_eq!(ids(&recent_orders(&backend, &one).await.unwrap()), ["12"]);
}

#[tokio::test]
async fn test_complete_and_cancel() {
    let backend = backend();

    let done = resolve_order(&backend, &OrderId::new("12"), Resolution::Complete)
        .await
        .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);

    resolve_order(&backend, &OrderId::new("10"), Resolution::Cancel)
        .await
        .unwrap();

    let statuses: Vec<_> = backend
        .placed_orders()
        .into_iter()
        .map(|o| (o.id.into_inner(), o.status))
        .collect();
    assert_eq!(
        statuses,
        [
            ("12".to_string(), OrderStatus::Completed),
            ("11".to_string(), OrderStatus::Completed),
            ("10".to_string(), OrderStatus::Cancelled),
            ("9".to_string(), OrderStatus::Cancelled),
        ]
    );
}

#[tokio::test]
async fn test_resolving_unknown_order_is_not_found() {
    let err = resolve_order(&backend(), &OrderId::new("404"), Resolution::Cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err}");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_order_items() {
    let backend = backend();

    let items = order_items(&backend, &OrderId::new("12")).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().product_name(), "Rubor");
    assert_eq!(items.first().unwrap().line_total(), Price::from_cents(5000));

    let err = order_items(&backend, &OrderId::new("404")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_seller_outage_is_internal() {
    let backend = backend().failing_at(FailAt::Seller);
    let err = recent_orders(&backend, &OrderFilter::default())
        .await
        .unwrap_err();
    assert!(err.is_internal());
    assert_eq!(backend.placed_orders().len(), 4);
}
