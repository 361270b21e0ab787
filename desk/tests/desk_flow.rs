//! End-to-end desk workflows through the store, against a mock server

#![allow(clippy::unwrap_used)] // Test code can unwrap

use serde_json::json;
use smart_entry_api::{ApiClient, SessionHandle, Venue};
use smart_entry_desk::{
    DeskAction, DeskEnvironment, DeskReducer, DeskState, SearchPhase, StatusKind, Tab,
};
use smart_entry_runtime::Store;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type DeskStore = Store<DeskState, DeskAction, DeskEnvironment, DeskReducer>;

fn desk_store(server_uri: String) -> DeskStore {
    let api = ApiClient::new(server_uri, SessionHandle::new());
    Store::new(
        DeskState::default(),
        DeskReducer::new(),
        DeskEnvironment::new(api),
    )
}

fn search_terminal(action: &DeskAction) -> bool {
    matches!(
        action,
        DeskAction::SearchLoaded { .. } | DeskAction::SearchFailed { .. }
    )
}

fn jane(barcode: Option<&str>) -> serde_json::Value {
    json!({
        "email": "jane@event.com",
        "name": "Jane Doe",
        "referenceNo": "REF-001",
        "barcode": barcode,
    })
}

#[tokio::test]
async fn search_select_assign_updates_both_views_without_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/participants/search"))
        .and(query_param("query", "doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([jane(None)])))
        // A single expected call: the assign success must NOT re-search
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/participants/assign-barcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jane(Some("BC100"))))
        .mount(&server)
        .await;

    let store = desk_store(server.uri());

    store
        .send_and_wait_for(
            DeskAction::Search {
                term: "doe".to_string(),
            },
            search_terminal,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    store.send(DeskAction::Select { index: 0 }).await.unwrap();

    let result = store
        .send_and_wait_for(
            DeskAction::Assign {
                code: "BC100".to_string(),
            },
            |a| {
                matches!(
                    a,
                    DeskAction::AssignSucceeded { .. } | DeskAction::AssignFailed { .. }
                )
            },
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(result, DeskAction::AssignSucceeded { .. }));
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    store
        .state(|s| {
            let selection = s.search.selection.as_ref().unwrap();
            assert_eq!(selection.participant.barcode.as_deref(), Some("BC100"));
            assert_eq!(s.search.results[0].barcode.as_deref(), Some("BC100"));
            assert_eq!(
                s.search.status.as_ref().unwrap().kind,
                StatusKind::Success
            );
        })
        .await;
}

#[tokio::test]
async fn superseded_search_response_never_overwrites_newer_results() {
    let server = MockServer::start().await;

    // The first search answers late; the second answers immediately
    Mock::given(method("GET"))
        .and(path("/participants/search"))
        .and(query_param("query", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{
                    "email": "slow@event.com",
                    "name": "Slow Result",
                    "referenceNo": "REF-SLOW",
                }]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/participants/search"))
        .and(query_param("query", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "email": "fast@event.com",
            "name": "Fast Result",
            "referenceNo": "REF-FAST",
        }])))
        .mount(&server)
        .await;

    let store = desk_store(server.uri());

    store
        .send(DeskAction::Search {
            term: "slow".to_string(),
        })
        .await
        .unwrap();

    // Supersede it before the first response lands
    tokio::time::sleep(Duration::from_millis(50)).await;
    store
        .send_and_wait_for(
            DeskAction::Search {
                term: "fast".to_string(),
            },
            search_terminal,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    // Let the stale response arrive and be discarded
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    store
        .state(|s| {
            assert_eq!(s.search.phase, SearchPhase::Results);
            assert_eq!(s.search.results.len(), 1);
            assert_eq!(s.search.results[0].email, "fast@event.com");
        })
        .await;
}

#[tokio::test]
async fn marked_entry_is_most_recent_in_refetched_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/entries/mark"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Entry marked",
            "entry": {
                "id": "e2", "barcode": "BC100", "venue": "Main Hall",
                "timestamp": "2025-03-01T09:30:00Z"
            },
            "history": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entries/BC100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                {"id": "e2", "barcode": "BC100", "venue": "Main Hall",
                 "timestamp": "2025-03-01T09:30:00Z"},
                {"id": "e1", "barcode": "BC100", "venue": "Dining Hall",
                 "timestamp": "2025-03-01T08:00:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    let store = desk_store(server.uri());

    let result = store
        .send_and_wait_for(
            DeskAction::MarkEntry {
                barcode: "BC100".to_string(),
                venue: Some(Venue::MainHall),
            },
            |a| {
                matches!(
                    a,
                    DeskAction::HistoryLoaded { .. }
                        | DeskAction::HistoryLoadFailed { .. }
                        | DeskAction::MarkEntryFailed { .. }
                )
            },
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(result, DeskAction::HistoryLoaded { .. }));
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    store
        .state(|s| {
            assert_eq!(s.entry.history.len(), 2);
            assert_eq!(s.entry.history[0].id, "e2");
            assert_eq!(s.entry.history[0].venue, Venue::MainHall);
            assert!(!s.entry.submitting);
        })
        .await;
}

#[tokio::test]
async fn marking_an_unassigned_barcode_surfaces_conflict_without_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/entries/mark"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "Barcode BC999 is not assigned to any participant"
        })))
        .mount(&server)
        .await;

    let store = desk_store(server.uri());

    let result = store
        .send_and_wait_for(
            DeskAction::MarkEntry {
                barcode: "BC999".to_string(),
                venue: Some(Venue::MainHall),
            },
            |a| {
                matches!(
                    a,
                    DeskAction::EntryMarked { .. } | DeskAction::MarkEntryFailed { .. }
                )
            },
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(result, DeskAction::MarkEntryFailed { .. }));
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    store
        .state(|s| {
            assert!(s.entry.history.is_empty());
            let status = s.entry.status.as_ref().unwrap();
            assert!(status.is_error());
            assert_eq!(
                status.text,
                "Barcode BC999 is not assigned to any participant"
            );
        })
        .await;
}

#[tokio::test]
async fn refresh_all_replaces_every_reporting_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([jane(Some("BC100"))])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entries/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e1", "barcode": "BC100", "venue": "Auditorium",
             "timestamp": "2025-03-01T08:00:00Z"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entries/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalEntries": 1, "uniqueParticipants": 1})),
        )
        .mount(&server)
        .await;

    let store = desk_store(server.uri());

    store.send(DeskAction::RefreshAll).await.unwrap();
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    store
        .state(|s| {
            assert_eq!(s.roster.participants.len(), 1);
            assert_eq!(s.roster.entries.len(), 1);
            assert_eq!(s.roster.stats.unwrap().total_entries, 1);
        })
        .await;
}

#[tokio::test]
async fn switching_to_a_reporting_tab_triggers_its_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entries/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalEntries": 7, "uniqueParticipants": 3})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = desk_store(server.uri());

    store
        .send(DeskAction::RoleChanged {
            role: Some(smart_entry_api::Role::Admin),
        })
        .await
        .unwrap();
    store
        .send(DeskAction::SwitchTab { tab: Tab::Stats })
        .await
        .unwrap();
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    store
        .state(|s| {
            assert_eq!(s.shell.active_tab, Tab::Stats);
            assert_eq!(s.roster.stats.unwrap().unique_participants, 3);
        })
        .await;
}
