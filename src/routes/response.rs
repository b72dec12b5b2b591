use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{Map, Value as JsonValue};

use crate::{dto::response_dto::SubmitResponseResult, error::Result, models::response::Response, AppState};

#[utoipa::path(
    post,
    path = "/response",
    responses(
        (status = 201, description = "Response stored", body = Json<SubmitResponseResult>),
        (status = 400, description = "Body is not a JSON object")
    )
)]
#[axum::debug_handler]
pub async fn submit_response(
    State(state): State<AppState>,
    Json(body): Json<Map<String, JsonValue>>,
) -> Result<impl IntoResponse> {
    let template_id = state.published.latest().and_then(|t| t.id);
    let response = state.responses.record_submission(body, template_id)?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponseResult {
            success: true,
            id: Some(response.id),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/responses",
    responses(
        (status = 200, description = "All responses, newest first", body = Vec<Response>)
    )
)]
#[axum::debug_handler]
pub async fn list_responses(State(state): State<AppState>) -> Result<Json<Vec<Response>>> {
    Ok(Json(state.responses.list_newest_first()))
}
