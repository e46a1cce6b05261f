//! Person CRUD handlers.
//!
//! Handlers go through the repository capability in [`AppState`]; cache
//! consistency is the repository's concern.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use peoples_core::person::{
    CreatePersonRequest, CreatedPerson, ListPeopleQuery, Person, UpdatePersonRequest,
};

use crate::{handlers::AppError, state::AppState};

/// Error response with message (for body validation errors).
fn bad_request(rejection: JsonRejection) -> (StatusCode, String) {
    let message = rejection.body_text();
    tracing::warn!(message = %message, "Rejected request body");
    (StatusCode::BAD_REQUEST, message)
}

/// List people (GET /api/v1/peoples).
pub async fn list_people(
    State(state): State<AppState>,
    Query(query): Query<ListPeopleQuery>,
) -> Result<Json<Vec<Person>>, AppError> {
    let people = state.repository.list_people(&query.into_filter()).await?;
    Ok(Json(people))
}

/// Get a single person by ID (GET /api/v1/peoples/{id}).
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Person>, AppError> {
    let person = state.repository.get_person(id).await?;
    Ok(Json(person))
}

/// Create a person (POST /api/v1/peoples).
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<impl IntoResponse, axum::response::Response> {
    let Json(payload) = payload.map_err(|e| bad_request(e).into_response())?;
    let person = payload
        .into_new_person()
        .map_err(|e| AppError::from(e).into_response())?;

    let id = state
        .repository
        .create_person(&person)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(person_id = %id, "Created person");
    Ok((StatusCode::CREATED, Json(CreatedPerson { id })))
}

/// Replace a person's fields (PUT /api/v1/peoples/{id}).
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> Result<Json<Person>, axum::response::Response> {
    let Json(payload) = payload.map_err(|e| bad_request(e).into_response())?;
    let person = payload
        .into_person(id)
        .map_err(|e| AppError::from(e).into_response())?;

    state
        .repository
        .update_person(&person)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(person_id = %id, "Updated person");
    Ok(Json(person))
}

/// Soft-delete a person (DELETE /api/v1/peoples/{id}).
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_person(id).await?;
    tracing::info!(person_id = %id, "Deleted person");
    Ok(StatusCode::OK)
}
