//! Shared fixtures for integration tests against a mock catalog server

#![allow(dead_code)]

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use character_catalog::app::{CatalogClient, CharacterStore, ClientConfig, RetryPolicy};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHARACTER_PATH: &str = "/api/character";

/// Retry schedule short enough for tests: 50ms, 100ms, capped at 200ms
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(50),
        multiplier: 2,
        max_delay: Duration::from_millis(200),
    }
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), CHARACTER_PATH)
}

pub fn client_config(base_url: impl Into<String>) -> ClientConfig {
    ClientConfig {
        retry: fast_retry(),
        ..ClientConfig::with_base_url(base_url)
    }
}

pub fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::with_config(client_config(base_url(server))).unwrap()
}

pub fn store_for(server: &MockServer) -> Arc<CharacterStore> {
    Arc::new(CharacterStore::new(client_for(server)))
}

pub fn character_json(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Character {}", id),
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
        "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
        "image": format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id),
        "episode": [
            "https://rickandmortyapi.com/api/episode/1",
            "https://rickandmortyapi.com/api/episode/2"
        ],
        "url": format!("https://rickandmortyapi.com/api/character/{}", id),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

/// A list page holding `ids`, with a `next` cursor when `has_next` is set
pub fn page_json(
    ids: RangeInclusive<u32>,
    page: u32,
    count: u32,
    pages: u32,
    has_next: bool,
) -> Value {
    let results: Vec<Value> = ids.map(character_json).collect();
    let next = has_next.then(|| {
        format!(
            "https://rickandmortyapi.com/api/character?page={}",
            page + 1
        )
    });
    let prev = (page > 1).then(|| {
        format!(
            "https://rickandmortyapi.com/api/character?page={}",
            page - 1
        )
    });
    json!({
        "info": { "count": count, "pages": pages, "next": next, "prev": prev },
        "results": results
    })
}

/// Serve `body` for `?page=<page>` exactly `expected` times
pub async fn mount_page(server: &MockServer, page: u32, body: Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

/// Standard unfiltered catalog page: 100 characters over 5 pages
pub fn catalog_page(page: u32) -> Value {
    let first = (page - 1) * 20 + 1;
    page_json(first..=first + 19, page, 100, 5, page < 5)
}
