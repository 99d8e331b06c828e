use proptest::prelude::*;
use serde_json::json;
use vecta_client::{
    Comparator, ExploreParams, GroupParams, GroupType, Kind, Movement, WhereFilter,
};
use vecta_core::Method;
use vecta_test_utils::{init_tracing, InMemoryServer, RecordingTransport};

#[tokio::test]
async fn test_get_articles_with_limit() {
    init_tracing();
    let server = InMemoryServer::new();
    server.respond_to_query(json!({
        "data": {"Get": {"Things": {"Article": [
            {"title": "a", "url": "https://a", "wordCount": 60},
            {"title": "b", "url": "https://b", "wordCount": 80}
        ]}}}
    }));

    let response = server
        .client()
        .graphql()
        .get()
        .with_class_name("Article")
        .with_fields("title url wordCount")
        .with_limit(7)
        .execute()
        .await
        .unwrap();

    let articles = response.get(Kind::Things, "Article");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[1]["wordCount"], json!(80));

    let request = &server.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(
        request.body,
        Some(json!({"query": "{Get{Things{Article(limit: 7){title url wordCount}}}}"}))
    );
}

#[tokio::test]
async fn test_get_with_where_from_json() {
    let transport = RecordingTransport::new();
    transport.respond_json(json!({"data": {"Get": {"Things": {"Article": []}}}}));

    transport
        .client()
        .graphql()
        .get()
        .with_class_name("Article")
        .with_fields("title")
        .with_where_json(&json!({
            "operator": "GreaterThanEqual",
            "path": ["wordCount"],
            "valueInt": 50
        }))
        .execute()
        .await
        .unwrap();

    let body = transport.last_request().unwrap().body.unwrap();
    let query = body["query"].as_str().unwrap();
    assert!(query.contains("operator: GreaterThanEqual"));
    assert!(query.contains(r#"path: ["wordCount"]"#));
    assert!(query.contains("valueInt: 50"));
    for other in ["valueNumber", "valueString", "valueText", "valueBoolean", "valueDate"] {
        assert!(!query.contains(other), "unexpected {} in {}", other, query);
    }
}

#[test]
fn test_nested_filter_with_date() {
    let client = RecordingTransport::new().client();
    let filter = json!({
        "operator": "And",
        "operands": [
            {"operator": "Like", "path": ["title"], "valueText": "apple*"},
            {
                "operator": "Or",
                "operands": [
                    {"operator": "LessThan", "path": ["wordCount"], "valueInt": 100},
                    {"operator": "GreaterThan", "path": ["published"], "valueDate": "2020-01-01T00:00:00Z"}
                ]
            }
        ]
    });

    let query = client
        .graphql()
        .get()
        .with_class_name("Article")
        .with_fields("title")
        .with_where_json(&filter)
        .build()
        .unwrap();

    assert_eq!(
        query,
        r#"{Get{Things{Article(where: {operator: And, operands: [{path: ["title"], operator: Like, valueText: "apple*"}, {operator: Or, operands: [{path: ["wordCount"], operator: LessThan, valueInt: 100}, {path: ["published"], operator: GreaterThan, valueDate: "2020-01-01T00:00:00+00:00"}]}]}){title}}}}"#
    );
}

#[test]
fn test_get_with_explore_and_group() {
    let client = RecordingTransport::new().client();
    let query = client
        .graphql()
        .get()
        .with_kind(Kind::Actions)
        .with_class_name("Event")
        .with_fields("name")
        .with_explore(
            ExploreParams::new(["launch", "rocket"])
                .with_certainty(0.8)
                .with_move_to(Movement::new(["space"], 0.5))
                .with_move_away_from(Movement::new(["car"], 1.0)),
        )
        .with_group(GroupParams::new(GroupType::Merge, 1.0))
        .build()
        .unwrap();

    assert_eq!(
        query,
        r#"{Get{Actions{Event(explore: {concepts: ["launch", "rocket"], certainty: 0.8, moveTo: {concepts: ["space"], force: 0.5}, moveAwayFrom: {concepts: ["car"], force: 1.0}}, group: {type: merge, force: 1.0}){name}}}}"#
    );
}

#[tokio::test]
async fn test_aggregate_meta_count() {
    let server = InMemoryServer::new();
    server.respond_to_query(json!({
        "data": {"Aggregate": {"Things": {"Article": [{"meta": {"count": 3}}]}}}
    }));

    let response = server
        .client()
        .graphql()
        .aggregate()
        .with_class_name("Article")
        .with_fields("meta { count }")
        .with_where(WhereFilter::leaf(["wordCount"], Comparator::GreaterThan, 10))
        .execute()
        .await
        .unwrap();

    assert_eq!(response.aggregate(Kind::Things, "Article")[0]["meta"]["count"], json!(3));
    assert_eq!(
        server.requests()[0].body.as_ref().unwrap()["query"],
        json!(r#"{Aggregate{Things{Article(where: {path: ["wordCount"], operator: GreaterThan, valueInt: 10}){meta { count }}}}}"#)
    );
}

#[tokio::test]
async fn test_explore_beacons() {
    let server = InMemoryServer::new();
    server.respond_to_query(json!({
        "data": {"Explore": [
            {"beacon": "weaviate://localhost/things/1565c06c-463f-466c-9092-5930dbac3887", "certainty": 0.81, "className": "Article"}
        ]}
    }));

    let response = server
        .client()
        .graphql()
        .explore()
        .with_concepts(["iphone"])
        .with_certainty(0.7)
        .with_move_to(Movement::new(["phone"], 0.3))
        .with_limit(3)
        .with_fields("beacon certainty className")
        .execute()
        .await
        .unwrap();

    assert_eq!(response.explore().len(), 1);
    assert_eq!(response.explore()[0]["className"], json!("Article"));
}

#[tokio::test]
async fn test_independent_queries_run_concurrently() {
    let server = InMemoryServer::new();
    let client = server.client();

    let handles: Vec<_> = (1..=4u32)
        .map(|limit| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .graphql()
                    .get()
                    .with_class_name("Article")
                    .with_fields("title")
                    .with_limit(limit)
                    .execute()
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(server.requests().len(), 4);
}

fn any_comparator() -> impl Strategy<Value = Comparator> {
    prop_oneof![
        Just(Comparator::Equal),
        Just(Comparator::NotEqual),
        Just(Comparator::GreaterThan),
        Just(Comparator::GreaterThanEqual),
        Just(Comparator::LessThan),
        Just(Comparator::LessThanEqual),
    ]
}

proptest! {
    #[test]
    fn prop_get_query_is_deterministic(
        class_name in "[A-Z][a-zA-Z0-9]{0,12}",
        word_count in any::<i64>(),
        comparator in any_comparator(),
        limit in proptest::option::of(1u32..1000),
    ) {
        let client = RecordingTransport::new().client();
        let build = || {
            let mut builder = client
                .graphql()
                .get()
                .with_class_name(class_name.clone())
                .with_fields("title")
                .with_where(WhereFilter::leaf(["wordCount"], comparator, word_count));
            if let Some(limit) = limit {
                builder = builder.with_limit(limit);
            }
            builder.build()
        };

        let first = build().unwrap();
        prop_assert_eq!(&first, &build().unwrap());
        let expected_prefix = format!("{{Get{{Things{{{}(where: ", class_name);
        prop_assert!(first.starts_with(&expected_prefix));
        prop_assert_eq!(first.contains("limit: "), limit.is_some());
    }
}
