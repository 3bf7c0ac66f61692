//! # API REST
//!
//! REST API implementation for the patient records service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `records-core` for every data operation.

#![warn(rust_2018_idioms)]

mod error;
mod routes;

pub use error::ApiError;
pub use routes::ApiDoc;

use axum::{
    routing::{get, post, put},
    Router,
};
use records_core::PatientService;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

/// Builds the full REST router, including Swagger UI at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/about", get(routes::about))
        .route("/health", get(routes::health))
        .route("/view_patients", get(routes::view_patients))
        .route("/patient/:id", get(routes::view_patient))
        .route("/sort", get(routes::sort_patients))
        .route("/create", post(routes::create_patient))
        .route("/update/:id", put(routes::update_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the REST API until the server stops.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Patient records REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use records_core::{JsonFileStore, MemoryStore};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SEED: &str = r#"{
  "P002": {"name": "Ravi Mehta", "city": "Mumbai", "age": 35, "gender": "male", "height": 1.75, "weight": 85.0},
  "P001": {"name": "Ananya Verma", "city": "Guwahati", "age": 28, "gender": "female", "height": 1.88, "weight": 85.0}
}"#;

    fn app_with(store: Arc<MemoryStore>) -> Router {
        router(AppState::new(PatientService::new(store)))
    }

    fn seeded() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_json(SEED));
        (app_with(store.clone()), store)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, text) = send_raw(app, req).await;
        (status, serde_json::from_str(&text).unwrap())
    }

    fn p003() -> Value {
        json!({
            "id": "P003",
            "name": "Kiran Das",
            "city": "Pune",
            "age": 41,
            "gender": "other",
            "height": 1.65,
            "weight": 72.5
        })
    }

    #[tokio::test]
    async fn info_endpoints_respond() {
        let (app, _) = seeded();

        let (status, body) = send(&app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, get_req("/about")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn view_patients_returns_raw_fields_in_order() {
        let (app, _) = seeded();

        let (status, text) = send_raw(&app, get_req("/view_patients")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.find("\"P002\"").unwrap() < text.find("\"P001\"").unwrap());
        assert!(!text.contains("bmi"));
        assert!(!text.contains("verdict"));

        let (_, again) = send_raw(&app, get_req("/view_patients")).await;
        assert_eq!(text, again);
    }

    #[tokio::test]
    async fn view_patient_returns_fields_or_404() {
        let (app, _) = seeded();

        let (status, body) = send(&app, get_req("/patient/P001")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ananya Verma");
        assert_eq!(body["height"], 1.88);
        assert!(body.get("bmi").is_none());
        assert!(body.get("id").is_none());

        let (status, body) = send(&app, get_req("/patient/P404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Patient not found");
    }

    #[tokio::test]
    async fn sort_includes_derived_values() {
        let (app, _) = seeded();

        let (status, body) = send(&app, get_req("/sort?sort_by=bmi&order=desc")).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "P002");
        assert_eq!(list[0]["bmi"], 27.76);
        assert_eq!(list[0]["verdict"], "Overweight");
        assert_eq!(list[1]["id"], "P001");
        assert_eq!(list[1]["bmi"], 24.05);
        assert_eq!(list[1]["verdict"], "Normal");

        let (_, body) = send(&app, get_req("/sort?sort_by=height")).await;
        assert_eq!(body[0]["id"], "P002");
    }

    #[tokio::test]
    async fn sort_rejects_invalid_parameters() {
        let (app, _) = seeded();

        let (status, body) = send(&app, get_req("/sort?sort_by=name")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("height"));
        assert!(detail.contains("weight"));
        assert!(detail.contains("bmi"));

        let (status, _) = send(&app, get_req("/sort?sort_by=bmi&order=sideways")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get_req("/sort")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let (app, _) = seeded();

        let (status, body) = send(&app, json_req(Method::POST, "/create", &p003())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "patient created successfully");

        let (status, body) = send(&app, get_req("/patient/P003")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "name": "Kiran Das",
                "city": "Pune",
                "age": 41,
                "gender": "other",
                "height": 1.65,
                "weight": 72.5
            })
        );
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected_without_writing() {
        let (app, store) = seeded();
        let before = store.snapshot();

        let mut body = p003();
        body["id"] = json!("P001");
        let (status, body) = send(&app, json_req(Method::POST, "/create", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("P001"));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn create_reports_validation_errors() {
        let (app, store) = seeded();
        let before = store.snapshot();

        let mut body = p003();
        body["age"] = json!(0);
        let (status, res) = send(&app, json_req(Method::POST, "/create", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(res["detail"].as_str().unwrap().starts_with("age:"));

        let mut body = p003();
        body.as_object_mut().unwrap().remove("gender");
        let (status, res) = send(&app, json_req(Method::POST, "/create", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res["detail"], "gender: field required");

        let mut body = p003();
        body.as_object_mut().unwrap().remove("id");
        let (status, res) = send(&app, json_req(Method::POST, "/create", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res["detail"], "id: field required");

        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let (app, _) = seeded();

        let req = Request::builder()
            .method(Method::POST)
            .uri("/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"id\": \"P009\", \"age\": \"old\""))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields() {
        let (app, _) = seeded();

        let (status, body) = send(
            &app,
            json_req(Method::PUT, "/update/P001", &json!({"weight": 100.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "patient updated successfully");

        let (_, body) = send(&app, get_req("/patient/P001")).await;
        assert_eq!(body["weight"], 100.0);
        assert_eq!(body["name"], "Ananya Verma");
        assert_eq!(body["city"], "Guwahati");
        assert_eq!(body["age"], 28);

        let (_, body) = send(&app, get_req("/sort?sort_by=bmi")).await;
        let p001 = body
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == "P001")
            .unwrap();
        assert_eq!(p001["bmi"], 28.29);
        assert_eq!(p001["verdict"], "Overweight");
    }

    #[tokio::test]
    async fn update_errors() {
        let (app, store) = seeded();
        let before = store.snapshot();

        let (status, _) = send(
            &app,
            json_req(Method::PUT, "/update/P404", &json!({"weight": 60.0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            json_req(Method::PUT, "/update/P001", &json!({"gender": "robot"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("gender:"));

        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn storage_failures_are_opaque_server_errors() {
        let app = app_with(Arc::new(MemoryStore::missing()));

        let (status, body) = send(&app, get_req("/view_patients")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Internal error");
    }

    #[tokio::test]
    async fn works_against_a_json_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        std::fs::write(&path, SEED).unwrap();
        let store = Arc::new(JsonFileStore::new(&path));
        let app = router(AppState::new(PatientService::new(store)));

        let (status, _) = send(&app, json_req(Method::POST, "/create", &p003())).await;
        assert_eq!(status, StatusCode::CREATED);

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"P003\""));
        assert!(!on_disk.contains("bmi"));
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let (app, _) = seeded();

        let (status, body) = send(&app, get_req("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/sort"].is_object());
        assert!(body["paths"]["/update/{id}"].is_object());
        assert_eq!(
            body["paths"]["/view_patients"]["get"]["responses"]["200"]["content"]
                ["application/json"]["schema"]["$ref"],
            "#/components/schemas/ListPatientsRes"
        );
        assert_eq!(
            body["components"]["schemas"]["ListPatientsRes"]["additionalProperties"]["$ref"],
            "#/components/schemas/PatientFieldsRes"
        );
    }
}
