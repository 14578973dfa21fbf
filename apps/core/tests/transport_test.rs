use calcfind_core::catalog::Catalog;
use calcfind_core::config::Config;
use calcfind_core::contract::{CoreRequest, CoreResponse, IdRequest, QueryRequest};
use calcfind_core::core_service::CoreService;
use calcfind_core::storage::{MemoryStore, StorageBackend, StorageKind};
use calcfind_core::theme::Theme;
use calcfind_core::transport::{handle_json, handle_request, ErrorCode, TransportResponse};

fn service() -> CoreService {
    let cfg = Config {
        storage: StorageKind::Memory,
        ..Config::default()
    };
    CoreService::with_store(cfg, Catalog::builtin(), StorageBackend::Memory(MemoryStore::new()))
        .unwrap()
}

#[test]
fn search_request_returns_dtos_with_favorite_flag() {
    let mut service = service();
    service.toggle_favorite("break-even").unwrap();

    let response = handle_request(
        &mut service,
        CoreRequest::Search(QueryRequest {
            query: "break even".to_string(),
        }),
    );

    let TransportResponse::Ok {
        response: CoreResponse::Search(search),
    } = response
    else {
        panic!("expected search response");
    };
    assert_eq!(search.query, "break even");
    assert_eq!(search.results[0].calculator.id, "break-even");
    assert!(search.results[0].calculator.favorite);
}

#[test]
fn json_toggle_and_list_favorites() {
    let mut service = service();

    let toggled = handle_json(&mut service, r#"{"kind":"toggle_favorite","payload":{"id":"tip"}}"#);
    let value: serde_json::Value = serde_json::from_str(&toggled).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["response"]["kind"], "favorite");
    assert_eq!(value["response"]["payload"]["favorite"], true);

    let listed = handle_json(&mut service, r#"{"kind":"favorites"}"#);
    let value: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(value["response"]["payload"][0]["id"], "tip");
}

#[test]
fn json_key_event_cycles_theme() {
    let mut service = service();
    handle_json(&mut service, r#"{"kind":"mount"}"#);

    let reply = handle_json(
        &mut service,
        r#"{"kind":"key","payload":{"key":"t","focus":"document"}}"#,
    );
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(value["response"]["payload"]["action"], "cycle_theme");
    assert_eq!(value["response"]["payload"]["theme"], "light");
    assert_eq!(service.theme(), Theme::Light);
}

#[test]
fn invalid_json_maps_to_error_code() {
    let mut service = service();
    let reply = handle_json(&mut service, "{not-json");
    let parsed: TransportResponse = serde_json::from_str(&reply).unwrap();
    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidJson),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn unknown_ids_and_themes_are_typed_errors() {
    let mut service = service();

    let missing = handle_request(
        &mut service,
        CoreRequest::OpenCalculator(IdRequest {
            id: "nope".to_string(),
        }),
    );
    assert!(matches!(
        missing,
        TransportResponse::Err { ref error } if error.code == ErrorCode::ItemNotFound
    ));

    let reply = handle_json(&mut service, r#"{"kind":"set_theme","payload":{"theme":"sepia"}}"#);
    let parsed: TransportResponse = serde_json::from_str(&reply).unwrap();
    assert!(matches!(
        parsed,
        TransportResponse::Err { ref error } if error.code == ErrorCode::InvalidRequest
    ));
}

#[test]
fn categories_response_lists_catalog() {
    let mut service = service();
    let response = handle_request(&mut service, CoreRequest::ListCategories);
    let TransportResponse::Ok {
        response: CoreResponse::Categories(categories),
    } = response
    else {
        panic!("expected categories");
    };
    assert_eq!(categories.len(), service.categories().len());
    assert_eq!(categories[0].id, "finance");
}
