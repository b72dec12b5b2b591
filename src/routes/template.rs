use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::template_dto::{DeleteTemplateResponse, TemplatePayload},
    error::{Error, Result},
    models::template::PublishedTemplate,
    AppState,
};

#[utoipa::path(
    get,
    path = "/template",
    responses(
        (status = 200, description = "Latest published template", body = Json<PublishedTemplate>),
        (status = 404, description = "No template published")
    )
)]
#[axum::debug_handler]
pub async fn get_template(State(state): State<AppState>) -> Result<Json<PublishedTemplate>> {
    let template = state
        .published
        .latest()
        .ok_or_else(|| Error::NotFound("Template not found".to_string()))?;
    Ok(Json(template))
}

#[utoipa::path(
    post,
    path = "/template",
    request_body = TemplatePayload,
    responses(
        (status = 201, description = "Template published", body = Json<PublishedTemplate>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let template = state.published.create(payload)?;
    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    put,
    path = "/template",
    request_body = TemplatePayload,
    responses(
        (status = 200, description = "Template updated", body = Json<PublishedTemplate>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Template not found")
    )
)]
#[axum::debug_handler]
pub async fn update_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplatePayload>,
) -> Result<Json<PublishedTemplate>> {
    payload.validate()?;
    let template = state.published.update(payload)?;
    Ok(Json(template))
}

#[utoipa::path(
    delete,
    path = "/template",
    responses(
        (status = 200, description = "Latest template deleted", body = Json<DeleteTemplateResponse>),
        (status = 404, description = "No template published")
    )
)]
#[axum::debug_handler]
pub async fn delete_template(State(state): State<AppState>) -> Result<Json<DeleteTemplateResponse>> {
    let deleted_id = state.published.delete_latest()?;
    Ok(Json(DeleteTemplateResponse {
        success: true,
        deleted_id,
    }))
}
