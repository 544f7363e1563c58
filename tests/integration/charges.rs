//! Charge calls end to end over HTTP against mockito.

use crate::integration::mock_server::{MockServerFixture, TEST_KEY};
use mockito::Matcher;
use stripe_rust::resources::{ChargeCaptureOptions, ChargeCreateOptions, ChargeUpdateOptions};
use stripe_rust::{ErrorKind, RequestOptions};

#[tokio::test]
async fn create_charge_sends_form_body_and_decodes_entity() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/v1/charges")
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .match_header("stripe-version", "2018-02-28")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_header("idempotency-key", Matcher::Regex(".+".into()))
            .match_body("amount=1000&currency=usd&source=tok_visa")
            .with_status(200)
            .with_body(r#"{"id":"ch_1","amount":1000,"object":"charge"}"#)
            .create_async()
            .await
    };

    let client = fixture.create_test_client(0).unwrap();
    let charge = client
        .charges()
        .create(
            &ChargeCreateOptions::new(1000, "usd").source("tok_visa"),
            &RequestOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(charge.id, "ch_1");
    assert_eq!(charge.amount, 1000);
    mock.assert_async().await;
}

#[tokio::test]
async fn retrieve_sends_no_idempotency_key_and_keeps_unknown_fields() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("GET", "/v1/charges/ch_1")
            .match_header("idempotency-key", Matcher::Missing)
            .match_header("stripe-account", "acct_9")
            .with_status(200)
            .with_body(
                r#"{"id":"ch_1","object":"charge","amount":1000,"captured":true,
                    "source":{"id":"card_1","object":"card","brand":"Visa","last4":"4242"},
                    "balance_transaction":"txn_1",
                    "radar_options":{"session":"x"}}"#,
            )
            .create_async()
            .await
    };

    let client = fixture.create_test_client(0).unwrap();
    let charge = client
        .charges()
        .retrieve("ch_1", &RequestOptions::new().stripe_account("acct_9"))
        .await
        .unwrap();

    assert!(charge.captured);
    assert_eq!(charge.balance_transaction.as_ref().map(|t| t.id()), Some("txn_1"));
    let card = charge.source.as_ref().and_then(|s| s.as_card()).unwrap();
    assert_eq!(card.brand.as_deref(), Some("Visa"));
    assert!(charge.extra.contains_key("radar_options"));
    mock.assert_async().await;
}

#[tokio::test]
async fn update_and_capture_post_to_entity_paths() {
    let fixture = MockServerFixture::new().await;
    let update = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/v1/charges/ch_1")
            .match_body("description=updated&metadata%5Border%5D=42")
            .with_status(200)
            .with_body(r#"{"id":"ch_1","object":"charge","description":"updated"}"#)
            .create_async()
            .await
    };
    let capture = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/v1/charges/ch_1/capture")
            .match_body("amount=500")
            .with_status(200)
            .with_body(r#"{"id":"ch_1","object":"charge","captured":true,"amount":1000}"#)
            .create_async()
            .await
    };

    let client = fixture.create_test_client(0).unwrap();
    let opts = ChargeUpdateOptions {
        description: Some("updated".into()),
        base: stripe_rust::resources::BaseOptions::default().metadata("order", "42"),
        ..Default::default()
    };
    let updated = client
        .charges()
        .update("ch_1", &opts, &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("updated"));

    let captured = client
        .charges()
        .capture(
            "ch_1",
            &ChargeCaptureOptions {
                amount: Some(500),
                ..Default::default()
            },
            &RequestOptions::new(),
        )
        .await
        .unwrap();
    assert!(captured.captured);

    update.assert_async().await;
    capture.assert_async().await;
}

#[tokio::test]
async fn card_decline_is_typed_and_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            "POST",
            "/v1/charges",
            402,
            r#"{"error":{"type":"card_error","code":"card_declined","decline_code":"insufficient_funds","message":"Your card has insufficient funds.","param":"source"}}"#,
            1,
        )
        .await;

    let client = fixture.create_test_client(2).unwrap();
    let err = client
        .charges()
        .create(
            &ChargeCreateOptions::new(1000, "usd").source("tok_chargeDeclinedInsufficientFunds"),
            &RequestOptions::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::CardDeclined));
    let api = err.as_api_error().unwrap();
    assert_eq!(api.http_status(), 402);
    assert_eq!(api.decline_code(), Some("insufficient_funds"));
    assert_eq!(api.param(), Some("source"));
    assert_eq!(api.request_id(), Some("req_mock"));
    mock.assert_async().await;
}

#[tokio::test]
async fn invalid_options_never_reach_the_server() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("POST", "/v1/charges", 200, r#"{"id":"ch_1","object":"charge"}"#, 0)
        .await;

    let client = fixture.create_test_client(0).unwrap();
    let err = client
        .charges()
        .create(
            &ChargeCreateOptions::new(1000, "usd")
                .source("tok_visa")
                .source_card(stripe_rust::resources::CardOptions::new("4242424242424242", 12, 2030)),
            &RequestOptions::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, stripe_rust::Error::Validation { .. }));
    assert!(client.charges().retrieve("", &RequestOptions::new()).await.is_err());
    mock.assert_async().await;
}
