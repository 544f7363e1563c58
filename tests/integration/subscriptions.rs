//! Subscription and balance transaction calls.

use crate::integration::mock_server::MockServerFixture;
use crate::integration::scripted::{client_with, json_response, query_param, ScriptedTransport};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use stripe_rust::resources::{
    BalanceTransactionListOptions, SubscriptionCancelOptions, SubscriptionCreateOptions,
    SubscriptionItemOptions, SubscriptionSharedOptions, SubscriptionStatus,
    SubscriptionUpdateOptions,
};
use stripe_rust::transport::Method;
use stripe_rust::RequestOptions;

#[tokio::test]
async fn create_subscription_encodes_items_and_percentages() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/v1/subscriptions")
            .match_body(
                "customer=cus_1&items%5B0%5D%5Bplan%5D=gold&items%5B0%5D%5Bquantity%5D=2\
                 &tax_percent=8.875&trial_end=now",
            )
            .with_status(200)
            .with_body(
                r#"{"id":"sub_1","object":"subscription","status":"active","tax_percent":8.875,"customer":"cus_1"}"#,
            )
            .create_async()
            .await
    };

    let client = fixture.create_test_client(0).unwrap();
    let create = SubscriptionCreateOptions {
        shared: SubscriptionSharedOptions {
            tax_percent: Some(Decimal::from_str("8.8750").unwrap()),
            end_trial_now: true,
            ..Default::default()
        },
        ..SubscriptionCreateOptions::new("cus_1")
            .item(SubscriptionItemOptions::plan("gold").quantity(2))
    };
    let sub = client
        .subscriptions()
        .create(&create, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(sub.status, Some(SubscriptionStatus::Active));
    assert_eq!(sub.customer.as_deref(), Some("cus_1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn cancel_uses_delete_with_query_and_idempotency_key() {
    let transport = ScriptedTransport::new([json_response(
        200,
        json!({"id": "sub_1", "object": "subscription", "status": "canceled", "canceled_at": 1_700_000_000}),
    )]);
    let client = client_with(transport.clone(), 0);

    let sub = client
        .subscriptions()
        .cancel(
            "sub_1",
            &SubscriptionCancelOptions {
                at_period_end: Some(true),
            },
            &RequestOptions::new(),
        )
        .await
        .unwrap();
    assert_eq!(sub.status, Some(SubscriptionStatus::Canceled));
    assert_eq!(sub.canceled_at.unwrap().unix_timestamp(), 1_700_000_000);

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Delete);
    assert!(req.body.is_none());
    assert_eq!(query_param(req, "at_period_end").as_deref(), Some("true"));
    assert!(req.header("Idempotency-Key").is_some());
}

#[tokio::test]
async fn update_rejects_excess_precision_locally() {
    let transport = ScriptedTransport::new([json_response(200, json!({"id": "sub_1", "object": "subscription"}))]);
    let client = client_with(transport.clone(), 0);

    let update = SubscriptionUpdateOptions {
        shared: SubscriptionSharedOptions {
            application_fee_percent: Some(Decimal::from_str("12.345").unwrap()),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = client
        .subscriptions()
        .update("sub_1", &update, &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, stripe_rust::Error::Validation { .. }));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn balance_transactions_for_a_charge() {
    let transport = ScriptedTransport::new([
        json_response(
            200,
            json!({
                "object": "list",
                "data": [{"id": "txn_1", "object": "balance_transaction", "amount": 1000, "fee": 59, "net": 941, "type": "charge", "source": "ch_1"}],
                "has_more": false
            }),
        ),
        json_response(
            200,
            json!({"id": "txn_1", "object": "balance_transaction", "amount": 1000, "fee": 59, "net": 941, "type": "charge", "source": "ch_1"}),
        ),
    ]);
    let client = client_with(transport.clone(), 0);

    let list = BalanceTransactionListOptions::default()
        .source("ch_1")
        .transaction_type("charge");
    let found: Vec<_> = client
        .balance_transactions()
        .list_auto_paging(&list, RequestOptions::new())
        .unwrap()
        .stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let txn = client
        .balance_transactions()
        .retrieve(&found[0].id, &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(txn.source.as_deref(), Some("ch_1"));
    assert_eq!(txn.net, 941);

    let requests = transport.requests();
    assert_eq!(query_param(&requests[0], "source").as_deref(), Some("ch_1"));
    assert_eq!(query_param(&requests[0], "type").as_deref(), Some("charge"));
    assert!(requests[1].url.ends_with("/v1/balance_transactions/txn_1"));
}
