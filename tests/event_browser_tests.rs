mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{event, FakeClient, PendingClient};
use escale::events::api::{DiscoveredEvents, EventQueryService, INITIAL_QUERY};
use escale::events::browser::{derive_view, BrowserState, EventBrowser, EVENTS_PER_PAGE};
use escale::events::model::{Category, Event};
use escale::favorites::{FavoritesStore, FAVORITES_KEY};
use escale::storage::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration as StdDuration;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn hours_ago(id: &str, hours: i64) -> Event {
    event(id, &(now() - Duration::hours(hours)).to_rfc3339())
}

fn upcoming(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| event(&format!("e{i:02}"), &format!("2025-07-{:02}T20:00:00Z", i + 1)))
        .collect()
}

fn browser_with(events: Vec<Event>) -> EventBrowser<MemoryStore> {
    let mut browser = EventBrowser::new(FavoritesStore::load(MemoryStore::default()));
    let ticket = browser.begin_initial_load();
    browser.complete_search(
        ticket,
        DiscoveredEvents {
            events,
            sources: vec![],
        },
    );
    browser
}

#[test_log::test]
fn should_keep_events_that_started_within_six_hours() {
    let events = vec![hours_ago("recent", 5), hours_ago("over", 7)];

    let view = derive_view(&BrowserState::default(), &events, &[], now());
    let ids: Vec<&str> = view.events.iter().map(|e| e.id.as_str()).collect();

    assert_eq!(ids, ["recent"]);
}

#[test_log::test]
fn when_outdated_events_are_shown_should_keep_them() {
    let events = vec![hours_ago("recent", 5), hours_ago("over", 7)];
    let state = BrowserState {
        hide_outdated: false,
        ..Default::default()
    };

    assert_eq!(derive_view(&state, &events, &[], now()).total, 2);
}

#[test_log::test]
fn should_match_category_loosely() {
    let mut clubbing = event("club", "2025-06-02T23:00:00Z");
    clubbing.category = "Underground Clubbing".to_string();
    let events = vec![clubbing, event("social", "2025-06-02T19:00:00Z")];
    let state = BrowserState {
        category: Category::Clubbing,
        ..Default::default()
    };

    let view = derive_view(&state, &events, &[], now());

    assert_eq!(view.events.len(), 1);
    assert_eq!(view.events[0].id, "club");
}

#[test_log::test]
fn should_keep_only_safe_bets_when_asked() {
    let mut niche = event("niche", "2025-06-02T23:00:00Z");
    niche.is_accessible = false;
    let events = vec![niche, event("safe", "2025-06-02T19:00:00Z")];
    let state = BrowserState {
        accessible_only: true,
        ..Default::default()
    };

    let view = derive_view(&state, &events, &[], now());

    assert_eq!(view.events.len(), 1);
    assert_eq!(view.events[0].id, "safe");
}

#[test_log::test]
fn should_sort_by_start_ascending() {
    let events = vec![
        event("third", "2025-06-03"),
        event("first", "2025-06-01"),
        event("second", "2025-06-02"),
    ];
    let state = BrowserState {
        hide_outdated: false,
        ..Default::default()
    };

    let ids: Vec<String> = derive_view(&state, &events, &[], now())
        .events
        .into_iter()
        .map(|e| e.id)
        .collect();

    assert_eq!(ids, ["first", "second", "third"]);
}

#[test_log::test]
fn should_paginate_by_twelve() {
    let events = upcoming(25);
    let mut state = BrowserState::default();

    let page = derive_view(&state, &events, &[], now());
    assert_eq!(EVENTS_PER_PAGE, 12);
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.events, events[0..12]);
    assert!(page.has_next());

    state.go_to_page(2);
    assert_eq!(derive_view(&state, &events, &[], now()).events, events[12..24]);

    state.go_to_page(3);
    let last = derive_view(&state, &events, &[], now());
    assert_eq!(last.events, events[24..25]);
    assert!(!last.has_next());
    assert!(last.has_previous());
}

#[test_log::test]
fn should_not_navigate_past_last_page() {
    let mut browser = browser_with(upcoming(25));

    browser.go_to_page(7, now());

    assert_eq!(browser.state().page, 3);
}

#[test_log::test]
fn when_category_changes_should_go_back_to_first_page() {
    let mut browser = browser_with(upcoming(30));
    browser.go_to_page(3, now());
    assert_eq!(browser.view(now()).page, 3);

    browser.set_category(Category::Social);

    assert_eq!(browser.view(now()).page, 1);
}

#[test_log::test]
fn should_restore_state_after_favoriting_twice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    let mut browser = EventBrowser::new(FavoritesStore::load(FileStore::new(&path)));
    let picnic = event("picnic", "2025-06-08");

    assert!(browser.toggle_favorite(&picnic));
    assert!(browser.is_favorite("picnic"));

    let reloaded = FavoritesStore::load(FileStore::new(&path));
    assert_eq!(reloaded.events(), [picnic.clone()]);

    assert!(!browser.toggle_favorite(&picnic));
    assert!(!browser.is_favorite("picnic"));
    assert!(FavoritesStore::load(FileStore::new(&path)).events().is_empty());
    assert_eq!(
        FileStore::new(&path).get(FAVORITES_KEY).unwrap().as_deref(),
        Some("[]")
    );
}

#[test_log::test]
fn should_show_favorites_only_when_toggled() {
    let mut browser = browser_with(upcoming(3));
    let saved = event("saved", "2025-08-01T20:00:00Z");
    browser.toggle_favorite(&saved);

    browser.set_favorites_only(true);
    let view = browser.view(now());

    assert_eq!(view.events, vec![saved]);
}

#[test_log::test]
fn should_drop_results_of_stale_searches() {
    let mut browser = browser_with(vec![]);

    let older = browser.begin_search();
    let newer = browser.begin_search();

    assert!(browser.complete_search(
        newer,
        DiscoveredEvents {
            events: upcoming(2),
            sources: vec![],
        }
    ));
    assert!(!browser.is_loading());

    assert!(!browser.complete_search(
        older,
        DiscoveredEvents {
            events: upcoming(5),
            sources: vec![],
        }
    ));
    assert_eq!(browser.events().len(), 2);
}

#[test_log::test(tokio::test)]
async fn should_load_initial_events_from_service() {
    let client = Arc::new(FakeClient::with_text(
        r#"{"events": [{"id": "a", "title": "Expo", "category": "Culture", "date": "Monday",
            "isoDate": "2099-01-05T10:00:00Z", "location": "Louvre", "description": "Art",
            "vibe": "Calm", "isAccessible": true}]}"#,
    ));
    let service = EventQueryService::new(client.clone(), "gemini-3-flash-preview");
    let mut browser = EventBrowser::new(FavoritesStore::load(MemoryStore::default()));

    browser.load_initial(&service).await;

    assert!(!browser.is_loading());
    assert_eq!(browser.view(Utc::now()).events.len(), 1);
    assert!(client.requests()[0].turns[0].text.contains(INITIAL_QUERY));
}

#[test_log::test(tokio::test)]
async fn when_search_fails_should_clear_loading_and_show_nothing() {
    let client = Arc::new(FakeClient::failing());
    let service = EventQueryService::new(client, "gemini-3-flash-preview");
    let mut browser = browser_with(upcoming(3));
    browser.set_favorites_only(true);
    browser.set_query("techno");

    browser.search(&service).await;

    assert!(!browser.is_loading());
    assert!(!browser.state().favorites_only);
    assert!(browser.events().is_empty());
}

#[test_log::test(tokio::test)]
async fn when_search_is_cancelled_should_clear_loading_and_allow_another() {
    let pending = EventQueryService::new(Arc::new(PendingClient), "gemini-3-flash-preview");
    let mut browser = browser_with(upcoming(3));

    let cancelled =
        tokio::time::timeout(StdDuration::from_millis(50), browser.search(&pending)).await;

    assert!(cancelled.is_err());
    assert!(!browser.is_loading());
    assert_eq!(browser.events().len(), 3);

    let client = Arc::new(FakeClient::with_text(r#"{"events": []}"#));
    let service = EventQueryService::new(client.clone(), "gemini-3-flash-preview");
    browser.search(&service).await;

    assert!(!browser.is_loading());
    assert!(browser.events().is_empty());
    assert_eq!(client.requests().len(), 1);
}
