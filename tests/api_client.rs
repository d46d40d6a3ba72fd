//! Catalog client against a mock HTTP server

use std::time::Duration;

use dexterm::api::ApiClient;
use dexterm::FetchError;
use httpmock::prelude::*;
use serde_json::{json, Value};

fn record(id: u32, name: &str, category: &str, generation: u32) -> Value {
    json!({
        "id": id,
        "pokedexId": id,
        "name": name,
        "image": format!("https://img.example/{id}.png"),
        "sprite": format!("https://img.example/{id}s.png"),
        "slug": name.to_lowercase(),
        "stats": {
            "HP": 45, "attack": 49, "defense": 49,
            "special_attack": 65, "special_defense": 65, "speed": 45
        },
        "apiTypes": [{ "name": category, "image": "" }],
        "apiGeneration": generation,
        "apiResistances": [
            { "name": "Feu", "damage_multiplier": 2.0, "damage_relation": "vulnerable" }
        ],
        "apiEvolutions": [],
        "apiPreEvolution": "none",
        "resistanceModifyingAbilitiesForApi": []
    })
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.base_url(), Duration::from_secs(5))
}

#[tokio::test]
async fn fetch_all_uses_limit_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/limit/2");
            then.status(200)
                .header("content-type", "application/json; charset=utf-8")
                .body(json!([record(1, "Bulbizarre", "Plante", 1), record(2, "Herbizarre", "Plante", 1)]).to_string());
        })
        .await;

    let list = client(&server).fetch_all(Some(2)).await.unwrap();
    mock.assert_async().await;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "Bulbizarre");
    assert_eq!(list[0].total_stats(), 318);
    assert!(list[0].pre_evolution.is_none());
    assert_eq!(list[0].resistances[0].damage_multiplier, 2.0);
}

#[tokio::test]
async fn missing_id_is_none_but_missing_name_is_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/99999");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"message":"not found"}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/Nope");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"message":"not found"}"#);
        })
        .await;

    let api = client(&server);
    assert!(api.fetch_by_id(99999).await.unwrap().is_none());

    let err = api.fetch_by_name("Nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/types");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html>maintenance</html>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/7");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html>maintenance</html>");
        })
        .await;

    let api = client(&server);
    let err = api.fetch_categories().await.unwrap_err();
    assert!(matches!(err, FetchError::ContentType { .. }));
    assert!(api.fetch_by_id(7).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/limit/3");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id": "one"}]"#);
        })
        .await;

    let err = client(&server).fetch_all(Some(3)).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { .. }));
}

#[tokio::test]
async fn category_query_hits_type_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/pokemon/type/")
                .path_contains("lectrik");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!([record(25, "Pikachu", "Électrik", 1)]).to_string());
        })
        .await;

    let list = client(&server).fetch_by_category("Électrik").await.unwrap();
    mock.assert_async().await;
    assert_eq!(list.len(), 1);
    assert!(list[0].has_category("électrik"));
}

#[tokio::test]
async fn generation_filters_the_capped_listing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/limit/400");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!([
                        record(1, "A", "Plante", 1),
                        record(2, "B", "Eau", 1),
                        record(152, "C", "Plante", 2)
                    ])
                    .to_string(),
                );
        })
        .await;

    let api = client(&server);
    let gen1 = api.fetch_by_generation(1, 400).await.unwrap();
    let names: Vec<&str> = gen1.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let gen3 = api.fetch_by_generation(3, 400).await.unwrap();
    assert!(gen3.is_empty());
}

#[tokio::test]
async fn search_matches_substring_case_insensitively() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/limit/200");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!([
                        record(25, "Pikachu", "Électrik", 1),
                        record(26, "Raichu", "Électrik", 1),
                        record(172, "Pichu", "Électrik", 2)
                    ])
                    .to_string(),
                );
        })
        .await;

    let api = client(&server);
    let hits = api.search("CHU", 2).await.unwrap();
    let names: Vec<&str> = hits.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Pikachu", "Raichu"]);
}

#[tokio::test]
async fn many_by_id_skips_missing_and_keeps_order() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/4");
            then.status(200)
                .header("content-type", "application/json")
                .body(record(4, "Salamèche", "Feu", 1).to_string());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/1");
            then.status(200)
                .header("content-type", "application/json")
                .body(record(1, "Bulbizarre", "Plante", 1).to_string());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/9999");
            then.status(404).body("gone");
        })
        .await;

    let list = client(&server).fetch_many_by_id(&[4, 9999, 1]).await.unwrap();
    let ids: Vec<u32> = list.iter().map(|c| c.pokedex_id).collect();
    assert_eq!(ids, vec![4, 1]);
}

#[tokio::test]
async fn many_by_id_skips_a_failed_lookup() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/4");
            then.status(200)
                .header("content-type", "application/json")
                .body(record(4, "Salamèche", "Feu", 1).to_string());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pokemon/5");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id": "five"}"#);
        })
        .await;

    let api = client(&server);
    assert!(matches!(api.fetch_by_id(5).await.unwrap_err(), FetchError::Parse { .. }));

    let list = api.fetch_many_by_id(&[5, 4]).await.unwrap();
    let ids: Vec<u32> = list.iter().map(|c| c.pokedex_id).collect();
    assert_eq!(ids, vec![4]);
}

#[tokio::test]
async fn server_error_on_listing_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/types");
            then.status(503);
        })
        .await;

    let err = client(&server).fetch_categories().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "failed to fetch categories: HTTP 503");
}
