//! Error mapping as seen by callers.

use crate::integration::mock_server::MockServerFixture;
use crate::integration::scripted::{client_with, json_response, ScriptedTransport, Step};
use serde_json::json;
use stripe_rust::transport::HttpResponse;
use stripe_rust::{Error, ErrorKind, RequestOptions};

#[tokio::test]
async fn not_found_keeps_param_and_doc_url() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            "GET",
            "/v1/charges/ch_missing",
            404,
            r#"{"error":{"type":"invalid_request_error","message":"No such charge: ch_missing","param":"id","doc_url":"https://stripe.com/docs/error-codes/resource-missing","code":"resource_missing"}}"#,
            1,
        )
        .await;

    let client = fixture.create_test_client(2).unwrap();
    let err = client
        .charges()
        .retrieve("ch_missing", &RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert_eq!(err.http_status(), Some(404));
    let api = err.as_api_error().unwrap();
    assert_eq!(api.code(), Some("resource_missing"));
    assert_eq!(api.param(), Some("id"));
    assert!(api.doc_url().unwrap().contains("resource-missing"));
    assert!(api.decline_code().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn authentication_failure_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            "GET",
            "/v1/balance_transactions/txn_1",
            401,
            r#"{"error":{"type":"invalid_request_error","message":"Invalid API Key provided: sk_test_****"}}"#,
            1,
        )
        .await;

    let client = fixture.create_test_client(3).unwrap();
    let err = client
        .balance_transactions()
        .retrieve("txn_1", &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Authentication));
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_error_type_maps_to_generic_api_kind() {
    let transport = ScriptedTransport::new([json_response(
        418,
        json!({"error": {"type": "teapot_error", "message": "short and stout"}}),
    )]);
    let client = client_with(transport, 0);

    let err = client
        .charges()
        .retrieve("ch_1", &RequestOptions::new())
        .await
        .unwrap_err();
    let api = err.as_api_error().unwrap();
    assert_eq!(api.kind(), ErrorKind::Api);
    assert_eq!(api.error_type(), Some("teapot_error"));
    assert_eq!(api.message(), "short and stout");
}

#[tokio::test]
async fn idempotency_conflict_is_its_own_kind() {
    let transport = ScriptedTransport::new([json_response(
        400,
        json!({"error": {"type": "idempotency_error", "message": "Keys for idempotent requests can only be used with the same parameters they were first used with."}}),
    )]);
    let client = client_with(transport.clone(), 2);

    let err = client
        .charges()
        .create(
            &stripe_rust::resources::ChargeCreateOptions::new(1000, "usd").source("tok_visa"),
            &RequestOptions::new().idempotency_key("reused"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::IdempotencyConflict));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn html_error_page_still_produces_an_error() {
    let transport = ScriptedTransport::new([
        Step::Respond(HttpResponse::new(502, "<html>Bad Gateway</html>")),
    ]);
    let client = client_with(transport, 0);

    let err = client
        .charges()
        .retrieve("ch_1", &RequestOptions::new())
        .await
        .unwrap_err();
    match err {
        Error::Api(api) => {
            assert_eq!(api.kind(), ErrorKind::Api);
            assert!(api.message().contains("Bad Gateway"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_without_id_is_a_decode_error() {
    let transport = ScriptedTransport::new([json_response(200, json!({"object": "charge"}))]);
    let client = client_with(transport, 2);

    let err = client
        .charges()
        .retrieve("ch_1", &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Decode));
}
