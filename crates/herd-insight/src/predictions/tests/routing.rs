use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::config::IdentityConfig;
use crate::predictions::router::{create_handler, PredictionRouterState};
use crate::predictions::PredictionService;

fn post_prediction(owner: Option<&str>, payload: Value) -> Request<Body> {
    let mut builder = Request::post("/api/v1/predictions")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(owner) = owner {
        builder = builder.header("x-owner-id", owner);
    }
    builder
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

fn get_as(uri: &str, owner: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(owner) = owner {
        builder = builder.header("x-owner-id", owner);
    }
    builder.body(Body::empty()).unwrap()
}

fn delete_as(uri: &str, owner: Option<&str>) -> Request<Body> {
    let mut builder = Request::delete(uri);
    if let Some(owner) = owner {
        builder = builder.header("x-owner-id", owner);
    }
    builder.body(Body::empty()).unwrap()
}

fn record_payload() -> Value {
    serde_json::to_value(baseline_record()).unwrap()
}

#[tokio::test]
async fn create_route_returns_stored_prediction() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_prediction(Some("farmer-a"), record_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["animalId"], "COW-001");
    assert_eq!(body["owner"], "farmer-a");
    assert_eq!(body["predictedMilkYield"], json!(24.71));
    assert_eq!(body["diseaseStatus"], "healthy");
    assert_eq!(body["diseaseProbability"], json!(1.0));
    assert!(body["id"].as_str().unwrap().starts_with("pred-"));
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn create_route_rejects_anonymous_callers() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_prediction(None, record_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "user not authenticated");
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn create_route_rejects_out_of_range_measurements() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let mut payload = record_payload();
    payload["humidity"] = json!(140);

    let response = router
        .oneshot(post_prediction(Some("farmer-a"), payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("humidity"));
}

#[tokio::test]
async fn create_route_rejects_case_variant_category_labels() {
    let (service, repository) = build_service();
    let router = router_with_service(service);
    let mut payload = record_payload();
    payload["lactationStage"] = json!("PEAK");

    let response = router
        .oneshot(post_prediction(Some("farmer-a"), payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "unrecognized lactationStage 'PEAK'");
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn create_handler_maps_repository_outage_to_internal_error() {
    let service = Arc::new(PredictionService::new(Arc::new(UnavailableRepository)));
    let state = PredictionRouterState::new(service, &IdentityConfig::default());
    let mut headers = HeaderMap::new();
    headers.insert("x-owner-id", HeaderValue::from_static("farmer-a"));

    let response = create_handler(State(state), headers, axum::Json(baseline_record())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn list_route_is_owner_scoped() {
    let (service, _) = build_service();
    service
        .predict(Some(&owner("farmer-a")), baseline_record())
        .expect("stored");
    service
        .predict(Some(&owner("farmer-b")), mastitis_record())
        .expect("stored");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get_as("/api/v1/predictions", Some("farmer-b")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["diseaseStatus"], "mastitis");

    let anonymous = router
        .oneshot(get_as("/api/v1/predictions", None))
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::OK);
    assert_eq!(read_json_body(anonymous).await, json!([]));
}

#[tokio::test]
async fn delete_route_hides_foreign_records() {
    let (service, repository) = build_service();
    let stored = service
        .predict(Some(&owner("farmer-a")), baseline_record())
        .expect("stored");
    let router = router_with_service(service);
    let uri = format!("/api/v1/predictions/{}", stored.id.0);

    let foreign = router
        .clone()
        .oneshot(delete_as(&uri, Some("farmer-b")))
        .await
        .unwrap();
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let anonymous = router.clone().oneshot(delete_as(&uri, None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let owned = router
        .oneshot(delete_as(&uri, Some("farmer-a")))
        .await
        .unwrap();
    assert_eq!(owned.status(), StatusCode::NO_CONTENT);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn clear_route_reports_deleted_count() {
    let (service, _) = build_service();
    for _ in 0..2 {
        service
            .predict(Some(&owner("farmer-a")), baseline_record())
            .expect("stored");
    }
    let router = router_with_service(service);

    let response = router
        .oneshot(delete_as("/api/v1/predictions", Some("farmer-a")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "deleted": 2 }));
}

#[tokio::test]
async fn summary_route_rolls_up_history() {
    let (service, _) = build_service();
    service
        .predict(Some(&owner("farmer-a")), baseline_record())
        .expect("stored");
    service
        .predict(Some(&owner("farmer-a")), mastitis_record())
        .expect("stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(get_as("/api/v1/predictions/summary", Some("farmer-a")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_predictions"], 2);
    assert_eq!(body["alert_count"], 1);
    assert_eq!(body["yield_trend"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn export_route_streams_csv() {
    let (service, _) = build_service();
    service
        .predict(Some(&owner("farmer-a")), mastitis_record())
        .expect("stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(get_as(
            "/api/v1/predictions/export?format=detailed",
            Some("farmer-a"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("detailed-cattle-data-"));

    let body = String::from_utf8(read_body(response).await).unwrap();
    assert!(body.starts_with("Date,Animal ID,Breed,Age,Weight,Lactation Stage"));
    assert!(body.contains("COW-002"));
    assert!(body.contains("mastitis,40.0%"));
}

#[tokio::test]
async fn report_route_serves_printable_html() {
    let (service, _) = build_service();
    service
        .predict(Some(&owner("farmer-a")), mastitis_record())
        .expect("stored");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get_as("/api/v1/predictions/report", Some("farmer-a")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("cattle-farm-report-"));
    let body = String::from_utf8(read_body(response).await).unwrap();
    assert!(body.contains("Farm Owner: farmer-a"));
    assert!(body.contains("<td>COW-002</td>"));

    let anonymous = router
        .oneshot(get_as("/api/v1/predictions/report", None))
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_route_without_history_is_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_as("/api/v1/predictions/export", Some("farmer-a")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_owner_header_is_honoured() {
    let (service, _) = build_service();
    let identity = IdentityConfig::new("x-farm-user").expect("valid header");
    let router = crate::predictions::prediction_router(Arc::new(service), &identity);

    let request = Request::post("/api/v1/predictions")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-farm-user", "farmer-z")
        .body(Body::from(serde_json::to_vec(&record_payload()).unwrap()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let ignored = router
        .oneshot(post_prediction(Some("farmer-z"), record_payload()))
        .await
        .unwrap();
    assert_eq!(ignored.status(), StatusCode::UNAUTHORIZED);
}
