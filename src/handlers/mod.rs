pub mod rest;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn root() -> Response {
    (StatusCode::OK, "Notes API is running").into_response()
}
