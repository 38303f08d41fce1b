use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::recommendations::answers::AnswerRecord;
use crate::recommendations::profile::ProfileStore;
use crate::recommendations::router::{
    assessment_handler, history_handler, intake_handler, IntakeRequest,
};
use crate::recommendations::{recommendation_router, JsonFileProfileStore, RecommendationService};

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn assessment_route_returns_recommendations() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/users/u-http/assessments",
            json!({
                "age_years": 55,
                "goals": ["Energy Boost"],
                "lifestyle": "Sedentary",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["user_id"], json!("u-http"));
    let recommendations = payload["recommendations"]
        .as_array()
        .expect("recommendation list");
    assert_eq!(recommendations.len(), 5);
    assert_eq!(
        recommendations[0]["item"]["id"],
        json!("vitamin-b-complex")
    );
    assert_eq!(recommendations[0]["recommended"], json!(true));
    assert_eq!(payload["warnings"], json!([]));
}

#[tokio::test]
async fn assessment_handler_rejects_invalid_ages() {
    let (service, _) = build_service();
    let answers = serde_json::from_value(json!({ "age_years": 999 })).expect("answers parse");

    let response = assessment_handler(
        State(Arc::new(service)),
        Path("u-old".to_string()),
        axum::Json(answers),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("999"));
}

#[tokio::test]
async fn assessment_handler_still_answers_when_the_store_is_down() {
    let service = Arc::new(
        RecommendationService::new(
            catalog(),
            Arc::new(UnavailableStore),
            &recommendation_config(),
        )
        .expect("service builds"),
    );

    let response = assessment_handler(
        State(service),
        Path("u-offline".to_string()),
        axum::Json(energetic_senior()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["warnings"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn profile_route_returns_not_found_before_any_assessment() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/users/u-unknown/profile"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["user_id"], json!("u-unknown"));
}

#[tokio::test]
async fn profile_route_returns_stored_insights() {
    let (service, _) = build_service();
    service
        .recommend(&user("u-sleep"), restless_sleeper())
        .expect("assessment");
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/users/u-sleep/profile"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload["deficiencies"]
        .as_array()
        .expect("deficiency list")
        .contains(&json!("Magnesium")));
    assert_eq!(
        payload["assessment_history"].as_array().map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn history_handler_returns_empty_list_for_unknown_users() {
    let (service, _) = build_service();

    let response = history_handler(State(Arc::new(service)), Path("u-none".to_string())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));
}

#[tokio::test]
async fn intake_route_updates_compliance() {
    let (service, store) = build_service();
    service
        .recommend_at(&user("u-intake"), AnswerRecord::default(), assessed_at())
        .expect("assessment");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/users/u-intake/intake",
            json!({
                "events": [
                    { "item_id": "vitamin-d3", "taken_on": "2025-03-10" },
                    { "item_id": "omega-3", "taken_on": "2025-03-10" },
                    { "item_id": "multivitamin", "taken_on": "2025-03-10" },
                ],
                "today": "2025-03-10",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["compliance_score"], json!(100));
    let profile = store
        .get_profile(&user("u-intake"))
        .expect("readable")
        .expect("profile exists");
    assert_eq!(profile.compliance_score, 100);
}

#[tokio::test]
async fn intake_route_rejects_a_backdated_today() {
    let (service, store) = build_service();
    service
        .recommend_at(&user("u-early"), AnswerRecord::default(), assessed_at())
        .expect("assessment");
    store
        .set_latest_compliance(&user("u-early"), 67)
        .expect("score stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/users/u-early/intake",
            json!({ "events": [], "today": "2025-03-01" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let profile = store
        .get_profile(&user("u-early"))
        .expect("readable")
        .expect("profile exists");
    assert_eq!(profile.compliance_score, 67);
}

#[tokio::test]
async fn intake_handler_returns_not_found_without_assessment() {
    let (service, _) = build_service();

    let response = intake_handler(
        State(Arc::new(service)),
        Path("u-new".to_string()),
        axum::Json(IntakeRequest::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_routes_list_and_lookup_items() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/catalog"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(21));
    assert_eq!(payload[0]["id"], json!("multivitamin"));

    let response = router
        .clone()
        .oneshot(get("/api/v1/catalog/lions-mane"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["category"], json!("Cognitive Support"));

    let response = router
        .oneshot(get("/api/v1/catalog/unicorn-dust"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn json_file_store_serves_requests_through_the_router() {
    let path = scratch_store_path("router");
    let store = Arc::new(JsonFileProfileStore::new(&path));
    let service = RecommendationService::new(catalog(), store, &recommendation_config())
        .expect("service builds");
    let router = recommendation_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/users/u-file/assessments",
            json!({ "goals": ["Better Sleep"], "concerns": ["Poor Sleep"] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["warnings"], json!([]));

    let response = router
        .oneshot(get("/api/v1/users/u-file/history"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let history = read_json_body(response).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert!(path.exists());

    let _ = std::fs::remove_dir_all(path.parent().expect("scratch dir"));
}
