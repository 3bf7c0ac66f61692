//! HTTP handlers and the OpenAPI document describing them.

use crate::error::ApiError;
use crate::AppState;
use api_shared::{
    CreatePatientReq, ErrorRes, HealthRes, HealthService, ListPatientsRes, MessageRes,
    PatientFieldsRes, PatientRes, SortQuery, UpdatePatientReq,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path as AxumPath, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use records_core::{Patient, PatientDraft, PatientError, PatientPatch, ValidationError};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        home,
        about,
        health,
        view_patients,
        view_patient,
        sort_patients,
        create_patient,
        update_patient,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        ErrorRes,
        PatientFieldsRes,
        PatientRes,
        ListPatientsRes,
        CreatePatientReq,
        UpdatePatientReq,
    ))
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn home() -> Json<MessageRes> {
    Json(MessageRes::new("Patient Management System API"))
}

#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Service description", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn about() -> Json<MessageRes> {
    Json(MessageRes::new(
        "A fully functional API to manage your patient records",
    ))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not touch storage.
#[axum::debug_handler]
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/view_patients",
    responses(
        (status = 200, description = "Mapping of patient id to stored fields, in insertion order", body = ListPatientsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients
///
/// Returns the raw collection. Derived BMI and verdict are not included in this view.
///
/// # Errors
/// Returns `500 Internal Server Error` if the collection cannot be loaded.
#[axum::debug_handler]
pub(crate) async fn view_patients(
    State(state): State<AppState>,
) -> Result<Json<ListPatientsRes>, ApiError> {
    let collection = state.patient_service.list()?;
    let patients = collection
        .iter()
        .map(|p| (p.id().to_owned(), fields_res(p)))
        .collect();
    Ok(Json(ListPatientsRes { patients }))
}

#[utoipa::path(
    get,
    path = "/patient/{id}",
    params(
        ("id" = String, Path, description = "Patient id", example = "P001")
    ),
    responses(
        (status = 200, description = "Stored fields of the patient", body = PatientFieldsRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch a single patient
///
/// Returns stored fields only, like the list view.
///
/// # Errors
/// Returns `404 Not Found` if no patient has the id, or `500 Internal Server Error` if the
/// collection cannot be loaded.
#[axum::debug_handler]
pub(crate) async fn view_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientFieldsRes>, ApiError> {
    let patient = state.patient_service.get(&id)?;
    Ok(Json(fields_res(&patient)))
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortQuery),
    responses(
        (status = 200, description = "Sorted patients with derived values", body = [PatientRes]),
        (status = 400, description = "Invalid sort field or order", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Sort patients by height, weight or BMI
///
/// # Errors
/// Returns `400 Bad Request` naming the accepted values if `sort_by` or `order` is invalid.
#[axum::debug_handler]
pub(crate) async fn sort_patients(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<Vec<PatientRes>>, ApiError> {
    let Query(query) = query?;
    let sorted = state
        .patient_service
        .sort(query.sort_by.as_deref(), query.order.as_deref())?;
    Ok(Json(sorted.iter().map(patient_res).collect()))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = MessageRes),
        (status = 400, description = "Duplicate id, invalid field or malformed body", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// # Errors
/// Returns `400 Bad Request` if the id already exists, a field is missing or invalid, or the body
/// is not valid JSON for this shape.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<CreatePatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let Json(req) = payload?;
    let (id, draft) = split_create_req(req)?;
    state.patient_service.create(&id, draft)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes::new("patient created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/update/{id}",
    params(
        ("id" = String, Path, description = "Patient id", example = "P001")
    ),
    request_body = UpdatePatientReq,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 400, description = "Merged record invalid or malformed body", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Partially update a patient record
///
/// Only fields present in the body are changed; the id cannot be changed.
///
/// # Errors
/// Returns `404 Not Found` for an unknown id and `400 Bad Request` if the merged record is invalid.
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    payload: Result<Json<UpdatePatientReq>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Json(req) = payload?;
    state.patient_service.update(&id, patch_from_req(req))?;
    Ok(Json(MessageRes::new("patient updated successfully")))
}

// Helper functions

fn fields_res(patient: &Patient) -> PatientFieldsRes {
    PatientFieldsRes {
        name: patient.name().to_owned(),
        city: patient.city().to_owned(),
        age: patient.age(),
        gender: patient.gender().to_string(),
        height: patient.height(),
        weight: patient.weight(),
    }
}

fn patient_res(patient: &Patient) -> PatientRes {
    PatientRes {
        id: patient.id().to_owned(),
        name: patient.name().to_owned(),
        city: patient.city().to_owned(),
        age: patient.age(),
        gender: patient.gender().to_string(),
        height: patient.height(),
        weight: patient.weight(),
        bmi: patient.bmi(),
        verdict: patient.verdict().to_string(),
    }
}

fn split_create_req(req: CreatePatientReq) -> Result<(String, PatientDraft), ApiError> {
    let id = req
        .id
        .ok_or_else(|| PatientError::from(ValidationError::new("id", "field required")))?;
    let draft = PatientDraft {
        name: req.name,
        city: req.city,
        age: req.age,
        gender: req.gender,
        height: req.height,
        weight: req.weight,
    };
    Ok((id, draft))
}

fn patch_from_req(req: UpdatePatientReq) -> PatientPatch {
    PatientPatch {
        name: req.name,
        city: req.city,
        age: req.age,
        gender: req.gender,
        height: req.height,
        weight: req.weight,
    }
}
