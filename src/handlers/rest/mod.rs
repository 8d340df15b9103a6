use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, MessageResponse, NoteResponse, UpdateNoteRequest},
    error::{ApiError, ApiResult},
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        create_note,
        update_note,
        delete_note,
        get_one_note,
        get_all_notes
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        MessageResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

fn note_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!("rejected note id: {e}");
        ApiError::BadRequest("Invalid note id".to_string())
    })
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(payload)| payload)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Missing title or content", body = MessageResponse),
        (status = 429, description = "Rate limit exceeded", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let payload = json_body(payload)?;

    match service.create_note(payload).await {
        Ok(note) => Ok((StatusCode::CREATED, Json(note)).into_response()),
        Err(e) => Err(ApiError::from_service(e, "Failed to create note")),
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Missing title or content", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let id = note_id(id)?;
    let payload = json_body(payload)?;

    match service.update_note(id, payload).await {
        Ok(Some(note)) => Ok((StatusCode::OK, Json(note)).into_response()),
        Ok(None) => Err(ApiError::NotFound("Note not found")),
        Err(e) => Err(ApiError::from_service(e, "Failed to update note")),
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let id = note_id(id)?;

    match service.delete_note(id).await {
        Ok(true) => Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Note deleted successfully")),
        )
            .into_response()),
        Ok(false) => Err(ApiError::NotFound("Note not found")),
        Err(e) => Err(ApiError::from_service(e, "Failed to delete note")),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let id = note_id(id)?;

    match service.get_one_note(id).await {
        Ok(Some(note)) => Ok((StatusCode::OK, Json(note)).into_response()),
        Ok(None) => Err(ApiError::NotFound("Note not found")),
        Err(e) => Err(ApiError::from_service(e, "Failed to get note")),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, newest first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> ApiResult<Response> {
    match service.get_all_notes().await {
        Ok(notes) => Ok((StatusCode::OK, Json(notes)).into_response()),
        Err(e) => Err(ApiError::from_service(e, "Failed to get all notes")),
    }
}
