//! Integration tests for the character store
//!
//! These cover the paginated list, filters, entity lookups and the
//! concurrency guards against a mock catalog server.

mod common;

use std::time::Duration;

use character_catalog::app::CharacterFilters;
use character_catalog::errors::FetchError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

#[tokio::test]
async fn test_first_page_then_load_more_appends_in_order() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(&server, page, catalog_page(page), 1).await;
    }

    let store = store_for(&server);
    store.fetch_first_page().await;
    store.load_next_page().await;
    store.load_next_page().await;

    let ids = store.display_ids();
    assert_eq!(ids, (1..=60).collect::<Vec<_>>());
    assert_eq!(store.current_page(), 3);
    assert_eq!(store.total_count(), 100);
    assert_eq!(store.total_pages(), 5);
    assert!(store.has_next_page());
    assert!(store.has_previous_page());
    assert_eq!(store.cache_len(), 60);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_revision_advances_with_each_transition() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;

    let store = store_for(&server);
    let mut changes = store.subscribe();
    let before = store.revision();

    store.fetch_first_page().await;

    // begin + complete
    assert_eq!(store.revision(), before + 2);
    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();
    assert!(!changes.has_changed().unwrap());
}

#[tokio::test]
async fn test_overlapping_first_page_fetches_make_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog_page(1))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    tokio::join!(store.fetch_first_page(), store.fetch_first_page());

    assert_eq!(store.display_ids().len(), 20);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_overlapping_load_more_makes_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog_page(2))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_first_page().await;
    tokio::join!(store.load_next_page(), store.load_next_page());

    assert_eq!(store.display_ids().len(), 40);
    assert_eq!(store.current_page(), 2);
    assert!(!store.is_loading_more());
}

#[tokio::test]
async fn test_load_more_on_last_page_makes_no_request() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=5, 1, 5, 1, false), 1).await;

    let store = store_for(&server);
    store.fetch_first_page().await;
    store.load_next_page().await;

    assert_eq!(store.display_ids(), vec![1, 2, 3, 4, 5]);
    assert!(!store.has_next_page());
    // Only the page 1 request was received
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_filtered_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "1"))
        .and(query_param("status", "Alive"))
        .and(query_param("species", "Human"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(1..=20, 1, 366, 19, true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .apply_filters(
            CharacterFilters::new()
                .with_status("Alive")
                .with_species("Human"),
        )
        .await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.characters.len(), 20);
    assert_eq!(snapshot.total_count, 366);
    assert!(snapshot.has_next_page);
    assert!(snapshot.has_active_filters);
    assert!(!snapshot.has_no_results);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_first_page_404_means_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .apply_filters(CharacterFilters::new().with_name("nobody"))
        .await;

    assert!(store.has_no_results());
    assert!(store.display_ids().is_empty());
    assert_eq!(store.total_count(), 0);
    assert!(!store.has_next_page());
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_load_more_404_clears_next_cursor() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_first_page().await;
    store.load_next_page().await;

    assert_eq!(store.display_ids().len(), 20);
    assert!(!store.has_next_page());
    assert!(store.error().is_none());

    // Cursor is gone, so no further request
    store.load_next_page().await;
}

#[tokio::test]
async fn test_load_more_failure_keeps_list_and_sets_error() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_first_page().await;
    store.load_next_page().await;

    assert_eq!(store.display_ids().len(), 20);
    assert_eq!(store.current_page(), 1);
    assert!(!store.is_loading_more());
    let message = store.error().unwrap();
    assert!(message.contains("page 2"), "unexpected message: {}", message);
    assert!(store.has_next_page());
}

#[tokio::test]
async fn test_first_page_failure_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_first_page().await;

    assert!(!store.is_loading());
    assert!(store.display_ids().is_empty());
    assert!(!store.has_no_results());
    let message = store.error().unwrap();
    assert!(message.starts_with("Failed to fetch characters page 1"));
}

#[tokio::test]
async fn test_changing_filters_keeps_cache() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;

    let store = store_for(&server);
    store.fetch_first_page().await;
    assert_eq!(store.display_ids().len(), 20);

    store.set_filters(CharacterFilters::new().with_status("Dead"));

    assert!(store.display_ids().is_empty());
    assert_eq!(store.current_page(), 1);
    assert!(!store.has_next_page());
    assert_eq!(store.cache_len(), 20);
    assert!(store.is_cached(5));
    assert!(store.has_active_filters());
}

#[tokio::test]
async fn test_response_for_outdated_filters_is_cached_then_reloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "1"))
        .and(query_param("status", "Alive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog_page(1))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "1"))
        .and(query_param("status", "Dead"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(101..=110, 1, 10, 1, false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    tokio::join!(
        store.apply_filters(CharacterFilters::new().with_status("Alive")),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            // Skipped by the in-flight guard; the running fetch picks it up
            store
                .apply_filters(CharacterFilters::new().with_status("Dead"))
                .await;
        }
    );

    assert_eq!(store.filters().status.as_deref(), Some("Dead"));
    assert_eq!(store.display_ids(), (101..=110).collect::<Vec<_>>());
    assert_eq!(store.total_count(), 10);
    assert!(!store.is_loading());
    assert!(store.error().is_none());
    // The outdated page is still cached by ID
    assert!(store.is_cached(7));
    assert_eq!(store.cache_len(), 30);
}

#[tokio::test]
async fn test_set_filters_during_fetch_reloads_for_new_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "1"))
        .and(query_param("species", "Alien"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalog_page(1))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    tokio::join!(store.fetch_first_page(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.set_filters(CharacterFilters::new().with_species("Alien"));
    });

    assert!(store.display_ids().is_empty());
    assert!(store.has_no_results());
    assert!(!store.is_loading());
    assert_eq!(store.cache_len(), 20);
}

#[tokio::test]
async fn test_load_characters_batches_uncached_ids() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;
    Mock::given(method("GET"))
        .and(path(format!("{}/45,46", CHARACTER_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            character_json(45),
            character_json(46)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_first_page().await;

    let characters = store.load_characters(&[46, 3, 45]).await.unwrap();
    assert_eq!(
        characters.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![46, 3, 45]
    );

    // Everything is cached now, so no further request
    let again = store.load_characters(&[45, 46]).await.unwrap();
    assert_eq!(again.len(), 2);
    assert!(store.load_characters(&[]).await.unwrap().is_empty());
    assert_eq!(store.display_ids().len(), 20);
}

#[tokio::test]
async fn test_load_page_containing_uses_cache_first() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;

    let store = store_for(&server);
    store.fetch_first_page().await;

    let character = store.load_page_containing(7).await.unwrap();
    assert_eq!(character.id, 7);
    // Only the first page request; the lookup was served from cache
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_load_page_containing_fetches_the_holding_page() {
    let server = MockServer::start().await;
    mount_page(&server, 3, catalog_page(3), 1).await;

    let store = store_for(&server);
    let character = store.load_page_containing(45).await.unwrap();

    assert_eq!(character.id, 45);
    assert!(store.is_page_cached(3));
    assert_eq!(store.cache_len(), 20);
    // The display list is not touched by entity lookups
    assert!(store.display_ids().is_empty());
}

#[tokio::test]
async fn test_load_page_containing_ignores_active_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_page(2)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.set_filters(CharacterFilters::new().with_status("Dead"));
    store.load_page_containing(30).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query().unwrap_or("").contains("status"));
}

#[tokio::test]
async fn test_load_page_containing_reports_missing_characters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHARACTER_PATH))
        .and(query_param("page", "50"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);

    let missing = store.load_page_containing(999).await;
    assert!(matches!(missing, Err(FetchError::NotFound { id: 999 })));

    let zero = store.load_page_containing(0).await;
    assert!(matches!(zero, Err(FetchError::NotFound { id: 0 })));
    // Lookup errors do not become the list error
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_fetch_character_by_id_caches_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/42", CHARACTER_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(character_json(42)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/4242", CHARACTER_PATH)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);

    assert_eq!(store.fetch_character_by_id(42).await.unwrap().id, 42);
    // Second lookup is a cache hit
    assert_eq!(store.fetch_character_by_id(42).await.unwrap().id, 42);
    assert!(store.is_cached(42));

    let missing = store.fetch_character_by_id(4242).await;
    assert!(missing.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let server = MockServer::start().await;
    mount_page(&server, 1, catalog_page(1), 1).await;

    let store = store_for(&server);
    store.fetch_first_page().await;
    store.reset();

    let snapshot = store.snapshot();
    assert!(snapshot.characters.is_empty());
    assert_eq!(store.cache_len(), 0);
    assert!(!snapshot.has_active_filters);
    assert_eq!(snapshot.current_page, 1);
}
