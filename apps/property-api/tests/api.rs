//! Router tests against CSV fixtures

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use property_api::{build_router, AppState};
use property_store::{CsvSource, PortfolioConfig, SqliteStore};
use property_types::{Building, LeaseRecord, Ownership};
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;
use tower::ServiceExt;

const BUILDINGS: &str = "\
Location Code,Real Property Asset Name,Owned or Leased,Street Address,City,State,Latitude,Longitude,Building Rentable Square Feet,Available Square Feet,Construction Date
DC0001,Federal Triangle,F,1 Main St,Washington,DC,38.89,-77.03,100000,0,1931
TX0001,Austin Field Office,L,2 Congress Ave,Austin,TX,30.27,-97.74,20000,5000,1985
TX0002,Dallas Annex,L,3 Elm St,Dallas,TX,NA,NA,10000,NA,1925
VA0001,Pentagon Annex,F,4 Army Navy Dr,Arlington,VA,38.87,-77.05,NA,NA,NA
";

const LEASES: &str = "\
Location Code,Lease Number,Lease Effective Date,Lease Expiration Date
TX0001,LTX01,2010-01-01,2015-01-01
TX0001,LTX02,2023-01-01,2030-01-01
TX0002,LTX03,2020-01-01,2025-09-01
ZZ0001,LZZ01,2020-01-01,2030-01-01
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn csv_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let buildings = write(dir.path(), "buildings.csv", BUILDINGS);
    let leases = write(dir.path(), "leases.csv", LEASES);

    let state = AppState::with_source(
        Arc::new(CsvSource::new(buildings, leases)),
        PortfolioConfig::default(),
    )
    .with_today(today());
    (dir, build_router(Arc::new(state)))
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

async fn get(app: Router, uri: &str) -> (StatusCode, JsonValue) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    json_body(resp).await
}

async fn json_body(resp: Response<Body>) -> (StatusCode, JsonValue) {
    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let json: JsonValue = serde_json::from_slice(&bytes).expect("valid JSON response");
    (status, json)
}

fn codes(list: &JsonValue) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|b| b["locationCode"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_reports_source() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "property-api");
    assert_eq!(json["source"], "csv");
    assert!(json["version"].as_str().is_some());
}

#[tokio::test]
async fn test_list_all_buildings() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/buildings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 4);
    assert_eq!(
        codes(&json["buildings"]),
        vec!["DC0001", "TX0001", "TX0002", "VA0001"]
    );
    assert!(json.get("stats").is_none());

    let dallas = &json["buildings"][2];
    assert_eq!(dallas["ownership"], "leased");
    assert_eq!(dallas["latitude"], JsonValue::Null);
    assert_eq!(dallas["constructionYear"], 1925);
}

#[tokio::test]
async fn test_stats_cover_filtered_set_before_limit() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/buildings?type=leased&includeStats=true&limit=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(codes(&json["buildings"]), vec!["TX0001"]);

    let stats = &json["stats"];
    assert_eq!(stats["summary"]["totalBuildings"], 2);
    assert_eq!(stats["summary"]["leasedBuildings"], 2);
    assert_eq!(stats["summary"]["oldestBuilding"], "Dallas Annex (1925)");
    assert_eq!(
        stats["decades"],
        json!([
            {"decade": 1920, "label": "1920s", "count": 1, "owned": 0, "leased": 1},
            {"decade": 1980, "label": "1980s", "count": 1, "owned": 0, "leased": 1},
        ])
    );
    assert_eq!(
        stats["states"],
        json!([{"state": "TX", "owned": 0, "leased": 2, "total": 2}])
    );
    assert_eq!(stats["squareFootage"][0]["label"], "Utilized");
    assert_eq!(stats["squareFootage"][0]["squareFeet"], 25000.0);
    assert_eq!(stats["squareFootage"][1]["squareFeet"], 5000.0);
}

#[tokio::test]
async fn test_map_data_skips_buildings_without_coordinates() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/buildings?mapData=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(codes(&json["points"]), vec!["DC0001", "TX0001", "VA0001"]);
    assert!(json.get("buildings").is_none());
}

#[tokio::test]
async fn test_state_filter_and_sort() {
    let (_dir, app) = csv_app();
    let (status, json) = get(
        app,
        "/api/buildings?state=tx&sort=rentable_square_feet&order=desc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(codes(&json["buildings"]), vec!["TX0001", "TX0002"]);
}

#[tokio::test]
async fn test_search_matches_name() {
    let (_dir, app) = csv_app();
    let (_, json) = get(app, "/api/buildings?search=annex").await;
    assert_eq!(codes(&json["buildings"]), vec!["TX0002", "VA0001"]);
}

#[tokio::test]
async fn test_invalid_query_values_return_400() {
    for uri in [
        "/api/buildings?type=rented",
        "/api/buildings?limit=ten",
        "/api/buildings?sort=height",
        "/api/leases?format=xml",
        "/api/leases?includeStats=maybe",
    ] {
        let (_dir, app) = csv_app();
        let (status, json) = get(app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].as_str().is_some(), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_query_string_returns_json_400() {
    for uri in [
        "/api/buildings?limit=1&limit=2",
        "/api/leases?format=raw&format=enhanced",
    ] {
        let (_dir, app) = csv_app();
        let (status, json) = get(app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()), "{uri}");
    }
}

#[tokio::test]
async fn test_building_detail() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/buildings/TX0001").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["building"]["name"], "Austin Field Office");
    assert_eq!(json["leases"].as_array().unwrap().len(), 2);
    assert_eq!(json["primaryLease"]["leaseNumber"], "LTX02");
    assert_eq!(json["primaryLease"]["status"], "active");
}

#[tokio::test]
async fn test_unknown_building_is_404() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/buildings/NOPE").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"error": "Building not found: NOPE"}));
}

#[tokio::test]
async fn test_enhanced_leases_by_default() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/leases").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(codes(&json["buildings"]), vec!["TX0001", "TX0002"]);
    assert_eq!(json["buildings"][1]["primaryLease"]["leaseNumber"], "LTX03");
    assert!(json.get("stats").is_none());
}

#[tokio::test]
async fn test_raw_leases_with_stats() {
    let (_dir, app) = csv_app();
    let (status, json) = get(app, "/api/leases?format=raw&includeStats=true&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 4);
    assert_eq!(json["leases"].as_array().unwrap().len(), 2);
    assert_eq!(json["leases"][0]["status"], "expired");
    assert_eq!(json["leases"][0]["durationYears"], 5.0);

    let stats = &json["stats"];
    assert_eq!(stats["totalLeases"], 3);
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["expired"], 1);
    assert_eq!(stats["upcoming"], 0);
    assert_eq!(stats["expiringSoon"], 1);
    assert_eq!(stats["expiringWindowMonths"], 6);
    assert_eq!(stats["coveragePercentage"], 100.0);
}

#[tokio::test]
async fn test_missing_csv_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_source(
        Arc::new(CsvSource::new(
            dir.path().join("missing.csv"),
            dir.path().join("missing.csv"),
        )),
        PortfolioConfig::default(),
    );
    let (status, json) = get(build_router(Arc::new(state)), "/api/buildings").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_sqlite_source_serves_same_routes() {
    let store = SqliteStore::in_memory().await.unwrap();
    let mut building = Building::new("NM0001", Ownership::Leased);
    building.name = "Santa Fe Office".to_string();
    store.upsert_buildings(&[building]).await.unwrap();
    store
        .upsert_leases(&[LeaseRecord {
            location_code: "NM0001".to_string(),
            lease_number: "LNM01".to_string(),
            effective_date: Some("2026-01-01".to_string()),
            expiration_date: Some("2036-01-01".to_string()),
            ..Default::default()
        }])
        .await
        .unwrap();

    let state = AppState::with_source(Arc::new(store), PortfolioConfig::default())
        .with_today(today());
    let app = build_router(Arc::new(state));

    let (_, health) = get(app.clone(), "/health").await;
    assert_eq!(health["source"], "sqlite");

    let (status, json) = get(app, "/api/buildings/NM0001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["primaryLease"]["status"], "upcoming");
}
