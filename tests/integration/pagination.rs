//! Auto-paging over list endpoints.

use crate::integration::scripted::{charge_page, client_with, query_param, ScriptedTransport, Step};
use futures::{StreamExt, TryStreamExt};
use stripe_rust::resources::{Charge, ChargeListOptions};
use stripe_rust::{Error, ListOptions, RequestOptions};

fn ids(charges: &[Charge]) -> Vec<&str> {
    charges.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn walks_every_page_in_order() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_1", "ch_2"], true),
        charge_page(&["ch_3", "ch_4"], true),
        charge_page(&["ch_5"], false),
    ]);
    let client = client_with(transport.clone(), 0);

    let list = ChargeListOptions {
        customer: Some("cus_1".into()),
        list: ListOptions::new().limit(2),
        ..Default::default()
    };
    let pager = client
        .charges()
        .list_auto_paging(&list, RequestOptions::new())
        .unwrap();
    let all: Vec<Charge> = pager.stream().try_collect().await.unwrap();

    assert_eq!(ids(&all), vec!["ch_1", "ch_2", "ch_3", "ch_4", "ch_5"]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(query_param(&requests[0], "starting_after"), None);
    assert_eq!(query_param(&requests[1], "starting_after").as_deref(), Some("ch_2"));
    assert_eq!(query_param(&requests[2], "starting_after").as_deref(), Some("ch_4"));
    for req in &requests {
        assert_eq!(query_param(req, "customer").as_deref(), Some("cus_1"));
        assert_eq!(query_param(req, "limit").as_deref(), Some("2"));
    }
}

#[tokio::test]
async fn stream_restarts_from_the_first_page() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_1"], true),
        charge_page(&["ch_2"], false),
        charge_page(&["ch_1"], true),
        charge_page(&["ch_2"], false),
    ]);
    let client = client_with(transport.clone(), 0);
    let pager = client
        .charges()
        .list_auto_paging(&ChargeListOptions::default(), RequestOptions::new())
        .unwrap();

    let first: Vec<Charge> = pager.stream().try_collect().await.unwrap();
    let second: Vec<Charge> = pager.stream().try_collect().await.unwrap();
    assert_eq!(ids(&first), ids(&second));

    let requests = transport.requests();
    assert_eq!(query_param(&requests[2], "starting_after"), None);
}

#[tokio::test]
async fn pages_are_fetched_only_on_demand() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_1", "ch_2"], true),
        charge_page(&["ch_3"], false),
    ]);
    let client = client_with(transport.clone(), 0);
    let pager = client
        .charges()
        .list_auto_paging(&ChargeListOptions::default(), RequestOptions::new())
        .unwrap();

    let head: Vec<_> = pager.stream().take(2).collect().await;
    assert_eq!(head.len(), 2);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn starting_cursor_is_kept_and_advanced() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_4", "ch_5"], true),
        charge_page(&["ch_6"], false),
    ]);
    let client = client_with(transport.clone(), 0);
    let list = ChargeListOptions {
        list: ListOptions::new().starting_after("ch_3"),
        ..Default::default()
    };
    let all: Vec<Charge> = client
        .charges()
        .list_auto_paging(&list, RequestOptions::new())
        .unwrap()
        .stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&all), vec!["ch_4", "ch_5", "ch_6"]);
    let requests = transport.requests();
    assert_eq!(query_param(&requests[0], "starting_after").as_deref(), Some("ch_3"));
    assert_eq!(query_param(&requests[1], "starting_after").as_deref(), Some("ch_5"));
}

#[tokio::test]
async fn backward_iteration_uses_first_id() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_8", "ch_7"], true),
        charge_page(&["ch_10", "ch_9"], false),
    ]);
    let client = client_with(transport.clone(), 0);
    let list = ChargeListOptions {
        list: ListOptions::new().ending_before("ch_6"),
        ..Default::default()
    };
    let pager = client
        .charges()
        .list_auto_paging(&list, RequestOptions::new())
        .unwrap();
    assert_eq!(pager.direction(), stripe_rust::pagination::Direction::Backward);

    let all: Vec<Charge> = pager.stream().try_collect().await.unwrap();
    assert_eq!(ids(&all), vec!["ch_8", "ch_7", "ch_10", "ch_9"]);

    let requests = transport.requests();
    assert_eq!(query_param(&requests[1], "ending_before").as_deref(), Some("ch_8"));
    assert_eq!(query_param(&requests[1], "starting_after"), None);
}

#[tokio::test]
async fn empty_page_with_more_is_a_violation() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_1"], true),
        charge_page(&[], true),
    ]);
    let client = client_with(transport.clone(), 0);
    let pager = client
        .charges()
        .list_auto_paging(&ChargeListOptions::default(), RequestOptions::new())
        .unwrap();

    let results: Vec<_> = pager.stream().collect().await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().id, "ch_1");
    assert!(matches!(results[1], Err(Error::Pagination { .. })));
}

#[tokio::test]
async fn repeated_cursor_is_a_violation() {
    let transport = ScriptedTransport::new([
        charge_page(&["ch_1", "ch_2"], true),
        charge_page(&["ch_2", "ch_3"], true),
        charge_page(&["ch_4"], false),
    ]);
    let client = client_with(transport.clone(), 0);
    let pager = client
        .charges()
        .list_auto_paging(&ChargeListOptions::default(), RequestOptions::new())
        .unwrap();

    let err = pager.stream().try_collect::<Vec<_>>().await.unwrap_err();
    assert!(matches!(err, Error::Pagination { .. }));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn conflicting_cursors_fail_before_any_request() {
    let transport = ScriptedTransport::new(Vec::<Step>::new());
    let client = client_with(transport.clone(), 0);
    let list = ChargeListOptions {
        list: ListOptions::new().starting_after("a").ending_before("b"),
        ..Default::default()
    };
    assert!(client
        .charges()
        .list_auto_paging(&list, RequestOptions::new())
        .is_err());
    assert!(client
        .charges()
        .list(&list, &RequestOptions::new())
        .await
        .is_err());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn single_list_call_returns_one_page() {
    let transport = ScriptedTransport::new([charge_page(&["ch_1", "ch_2"], true)]);
    let client = client_with(transport.clone(), 0);
    let page = client
        .charges()
        .list(&ChargeListOptions::default(), &RequestOptions::new())
        .await
        .unwrap();
    assert!(page.has_more);
    assert_eq!(page.len(), 2);
    assert_eq!(page.url.as_deref(), Some("/v1/charges"));
}
