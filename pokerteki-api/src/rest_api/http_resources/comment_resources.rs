/*
    Copyright 2025 MydriaTech AB

    Licensed under the Apache License 2.0 with Free world makers exception
    1.0.0 (the "License"); you may not use this file except in compliance with
    the License. You should have obtained a copy of the License with the source
    or binary distribution in file named

        LICENSE-Apache-2.0-with-FWM-Exception-1.0.0

    Unless required by applicable law or agreed to in writing, software
    distributed under the License is distributed on an "AS IS" BASIS,
    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
    See the License for the specific language governing permissions and
    limitations under the License.
*/

//! API resources for comments on a table.

use crate::rest_api::AppState;
use crate::rest_api::common::ApiErrorMapper;
use actix_web::Error;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::delete;
use actix_web::post;
use actix_web::put;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Path;
use pokerteki_core::tracker::CommentRecord;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;

/// A comment on a table.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CommentResponse {
    /// Unique comment identifier.
    comment_id: u64,
    /// The table that was commented.
    table_id: u64,
    /// Author of the comment. Absent if the user was removed.
    creator: Option<u64>,
    /// Comment text.
    comment: String,
    /// Time of the last save in epoch microseconds.
    created_at_micros: u64,
}

impl From<CommentRecord> for CommentResponse {
    fn from(value: CommentRecord) -> Self {
        Self {
            comment_id: value.comment_id,
            table_id: value.table_id,
            creator: value.creator,
            comment: value.comment,
            created_at_micros: value.created_at_micros,
        }
    }
}

/// Comment text.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CommentRequest {
    comment: String,
}

/// Comment on the table.
///
/// Anyone who may see the table may comment on it.
#[utoipa::path(
    tag = "comments",
    params(
        ("table_id", description = "Table identifier."),
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "The comment was created.", body = CommentResponse),
        (status = 400, description = "Bad Request: Empty or too long comment."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[post("/tables/{table_id}/comments")]
pub async fn comment_create(
    app_state: Data<AppState>,
    path: Path<u64>,
    request: Json<CommentRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let comment = app_state
        .tracker
        .comment_create(&identity, path.into_inner(), &request.comment)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Replace the text of the comment.
///
/// Only the author may change the comment.
#[utoipa::path(
    tag = "comments",
    params(
        ("table_id", description = "Table identifier."),
        ("comment_id", description = "Comment identifier."),
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "The updated comment.", body = CommentResponse),
        (status = 400, description = "Bad Request: Empty or too long comment."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such comment on the table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[put("/tables/{table_id}/comments/{comment_id}")]
pub async fn comment_update(
    app_state: Data<AppState>,
    path: Path<(u64, u64)>,
    request: Json<CommentRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let (table_id, comment_id) = path.into_inner();
    let comment = app_state
        .tracker
        .comment_update(&identity, table_id, comment_id, &request.comment)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// Delete the comment.
#[utoipa::path(
    tag = "comments",
    params(
        ("table_id", description = "Table identifier."),
        ("comment_id", description = "Comment identifier."),
    ),
    responses(
        (status = 204, description = "The comment was deleted."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such comment on the table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[delete("/tables/{table_id}/comments/{comment_id}")]
pub async fn comment_delete(
    app_state: Data<AppState>,
    path: Path<(u64, u64)>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let (table_id, comment_id) = path.into_inner();
    app_state
        .tracker
        .comment_delete(&identity, table_id, comment_id)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::NoContent().finish())
}
