//! Integration tests for the exchange service
//!
//! Tests the full stack behind `ExchangeHandle`:
//! - Seed orders from JSON configuration
//! - Matching through the command queue
//! - Concurrent submitters
//! - Subscribers on the service's event bus
//! - Shutdown

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use meridian_core::{CurrencyPair, EventKind, OrderRequest, OrderStatus};
use meridian_exchange::{ConfigError, Exchange, ExchangeConfig, ExchangeError};
use meridian_notify::EventBus;
use rust_decimal_macros::dec;

// ============================================================================
// Test Fixtures
// ============================================================================

fn quiet_config() -> ExchangeConfig {
    let _ = env_logger::try_init();
    ExchangeConfig {
        log_events: false,
        ..ExchangeConfig::default()
    }
}

const SAMPLE_SESSION: &str = r#"{
    "name": "MSC/BTC sample",
    "seed_orders": [
        { "type": "sell", "amount_for_sale": "35000000", "price": "0.23",
          "currency_for_sale": "MSC", "currency_desired": "BTC" },
        { "type": "sell", "amount_for_sale": "225000000", "price": "0.23",
          "currency_for_sale": "MSC", "currency_desired": "BTC" },
        { "type": "sell", "amount_for_sale": "1500000000", "price": "0.2155",
          "currency_for_sale": "MSC", "currency_desired": "BTC" }
    ]
}"#;

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_seeded_book_and_buy() {
    let _ = env_logger::try_init();
    let config = ExchangeConfig::from_json(SAMPLE_SESSION).unwrap();
    let (exchange, task) = Exchange::spawn(config).unwrap();

    let asks = exchange
        .open_orders(CurrencyPair::new("MSC", "BTC"))
        .await
        .unwrap();
    let amounts: Vec<u64> = asks.iter().map(|o| o.amount_for_sale()).collect();
    assert_eq!(amounts, vec![1_500_000_000, 35_000_000, 225_000_000]);

    let buy = OrderRequest::buy(dec!(2000000000), dec!(0.25), "MSC", "BTC").unwrap();
    let response = exchange.submit_order(buy).await.unwrap();

    assert_eq!(response.trades.len(), 3);
    assert!(response.is_resting());
    assert_eq!(response.order.status(), OrderStatus::PartiallyFilled);
    assert_eq!(response.order.amount_for_sale(), 60_000_000);
    assert_eq!(response.order.amount_desired(), 240_000_000);

    let asks = exchange
        .open_orders(CurrencyPair::new("MSC", "BTC"))
        .await
        .unwrap();
    assert!(asks.is_empty());
    let bids = exchange
        .open_orders(CurrencyPair::new("BTC", "MSC"))
        .await
        .unwrap();
    assert_eq!(bids, vec![response.order.clone()]);

    let stats = exchange.stats().await.unwrap();
    assert_eq!(stats.name, "MSC/BTC sample");
    assert_eq!(stats.orders_received, 4);
    assert_eq!(stats.orders_rejected, 0);
    assert_eq!(stats.trades_executed, 3);
    assert_eq!(stats.open_orders, 1);

    exchange.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_concurrent_submitters_are_serialized() {
    let (exchange, task) = Exchange::spawn(quiet_config()).unwrap();

    let mut submitters = Vec::new();
    for i in 0..20 {
        let exchange = exchange.clone();
        submitters.push(tokio::spawn(async move {
            let request = if i % 2 == 0 {
                OrderRequest::new("A", dec!(10), "B", dec!(10))
            } else {
                OrderRequest::new("B", dec!(10), "A", dec!(10))
            };
            exchange.submit_order(request).await
        }));
    }

    let mut ids = Vec::new();
    for submitter in submitters {
        let response = submitter.await.unwrap().unwrap();
        ids.push(response.order.id());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    // Equal amounts at one price: every order finds its counterpart
    let stats = exchange.stats().await.unwrap();
    assert_eq!(stats.trades_executed, 10);
    assert_eq!(stats.open_orders, 0);

    exchange.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_rejected_order_reports_matching_error() {
    let (exchange, task) = Exchange::spawn(quiet_config()).unwrap();

    let err = exchange
        .submit_order(OrderRequest::new("A", dec!(0.5), "B", dec!(1)))
        .await
        .unwrap_err();
    assert!(err.is_rejection());
    assert!(matches!(err, ExchangeError::Matching(_)));

    // The service keeps serving after a rejection
    let response = exchange
        .submit_order(OrderRequest::new("A", dec!(5), "B", dec!(1)))
        .await
        .unwrap();
    assert_eq!(response.order.status(), OrderStatus::New);

    let stats = exchange.stats().await.unwrap();
    assert_eq!(stats.orders_received, 2);
    assert_eq!(stats.orders_rejected, 1);

    exchange.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_bus_subscribers_see_service_events() {
    let trades = Arc::new(AtomicUsize::new(0));
    let mut bus = EventBus::new();
    let counter = Arc::clone(&trades);
    bus.subscribe(EventKind::Trade, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let config = ExchangeConfig::from_json(SAMPLE_SESSION).unwrap();
    let (exchange, task) = Exchange::spawn_with_bus(config, bus).unwrap();

    exchange
        .submit_order(OrderRequest::new("BTC", dec!(10000000), "MSC", dec!(35000000)))
        .await
        .unwrap();
    exchange.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(trades.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_prevent_self_trade_policy() {
    let config = ExchangeConfig::from_json(
        r#"{ "match_policy": "prevent-self-trade", "log_events": false }"#,
    )
    .unwrap();
    let (exchange, task) = Exchange::spawn(config).unwrap();

    exchange
        .submit_order(OrderRequest::new("A", dec!(10), "B", dec!(10)).with_owner("alice"))
        .await
        .unwrap();
    let own = exchange
        .submit_order(OrderRequest::new("B", dec!(10), "A", dec!(10)).with_owner("alice"))
        .await
        .unwrap();
    assert!(own.trades.is_empty());

    let other = exchange
        .submit_order(OrderRequest::new("B", dec!(10), "A", dec!(10)).with_owner("bob"))
        .await
        .unwrap();
    assert_eq!(other.trades.len(), 1);
    assert_eq!(other.order.status(), OrderStatus::Filled);

    exchange.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_invalid_seed_order_fails_startup() {
    let config = ExchangeConfig::from_json(
        r#"{ "seed_orders": [
            { "type": "limit", "currency_for_sale": "A", "amount_for_sale": "0",
              "currency_desired": "B", "amount_desired": "1" }
        ] }"#,
    )
    .unwrap();

    let err = Exchange::spawn(config).unwrap_err();
    assert!(matches!(err, ExchangeError::Config(ConfigError::Invalid(_))));
}

#[tokio::test]
async fn test_submit_after_shutdown_fails() {
    let (exchange, task) = Exchange::spawn(quiet_config()).unwrap();

    exchange.shutdown().await.unwrap();
    task.await.unwrap();
    assert!(exchange.is_closed());

    let err = exchange
        .submit_order(OrderRequest::new("A", dec!(1), "B", dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::ChannelSend(_)));
    assert!(!err.is_rejection());
}
