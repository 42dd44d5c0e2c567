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

//! API resources for poker tables.

use super::comment_resources::CommentResponse;
use super::game_resources::GameResponse;
use crate::rest_api::AppState;
use crate::rest_api::common::ApiErrorMapper;
use actix_web::Error;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::delete;
use actix_web::get;
use actix_web::patch;
use actix_web::post;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Path;
use pokerteki_core::tracker::TableDetail;
use pokerteki_core::tracker::TableRecord;
use pokerteki_core::tracker::TableUpdate;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;

/// A poker table.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct TableResponse {
    /// Unique table identifier.
    table_id: u64,
    /// Display name.
    name: String,
    /// User administering the table. Absent if the user was removed.
    dealer: Option<u64>,
    /// User that created the table. Absent if the user was removed.
    creator: Option<u64>,
    /// Time of play in epoch microseconds.
    play_date_micros: u64,
}

impl From<TableRecord> for TableResponse {
    fn from(value: TableRecord) -> Self {
        Self {
            table_id: value.table_id,
            name: value.name,
            dealer: value.dealer,
            creator: value.creator,
            play_date_micros: value.play_date_micros,
        }
    }
}

/// A poker table with its games and comments.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct TableDetailResponse {
    table: TableResponse,
    games: Vec<GameResponse>,
    comments: Vec<CommentResponse>,
}

impl From<TableDetail> for TableDetailResponse {
    fn from(value: TableDetail) -> Self {
        Self {
            table: TableResponse::from(value.table),
            games: value.games.into_iter().map(GameResponse::from).collect(),
            comments: value
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}

/// New table.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct TableCreateRequest {
    /// Display name.
    name: String,
    /// Dealer of the table. Defaults to the creator.
    #[serde(default)]
    dealer: Option<u64>,
    /// Time of play in epoch microseconds. Defaults to now.
    #[serde(default)]
    play_date_micros: Option<u64>,
}

/// Changes to a table. Absent fields are left as is.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct TableUpdateRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dealer: Option<u64>,
    #[serde(default)]
    play_date_micros: Option<u64>,
}

/// List the tables that the authenticated user may see.
#[utoipa::path(
    tag = "tables",
    responses(
        (status = 200, description = "Readable tables.", body = Vec<TableResponse>),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[get("/tables")]
pub async fn tables_list(
    app_state: Data<AppState>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let tables = app_state
        .tracker
        .tables(&identity)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok().json(
        tables
            .into_iter()
            .map(TableResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a new table with the authenticated user as creator.
#[utoipa::path(
    tag = "tables",
    request_body = TableCreateRequest,
    responses(
        (status = 201, description = "The table was created.", body = TableResponse),
        (status = 400, description = "Bad Request: Invalid name or unknown dealer."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[post("/tables")]
pub async fn table_create(
    app_state: Data<AppState>,
    request: Json<TableCreateRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let request = request.into_inner();
    let table = app_state
        .tracker
        .table_create(
            &identity,
            &request.name,
            request.dealer,
            request.play_date_micros,
        )
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Created().json(TableResponse::from(table)))
}

/// Return the table with its games and comments.
#[utoipa::path(
    tag = "tables",
    params(
        ("table_id", description = "Table identifier."),
    ),
    responses(
        (status = 200, description = "The table.", body = TableDetailResponse),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[get("/tables/{table_id}")]
pub async fn table_detail(
    app_state: Data<AppState>,
    path: Path<u64>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let detail = app_state
        .tracker
        .table_detail(&identity, path.into_inner())
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok().json(TableDetailResponse::from(detail)))
}

/// Change name, dealer or time of play of the table.
#[utoipa::path(
    tag = "tables",
    params(
        ("table_id", description = "Table identifier."),
    ),
    request_body = TableUpdateRequest,
    responses(
        (status = 200, description = "The updated table.", body = TableResponse),
        (status = 400, description = "Bad Request: Invalid name or unknown dealer."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[patch("/tables/{table_id}")]
pub async fn table_update(
    app_state: Data<AppState>,
    path: Path<u64>,
    request: Json<TableUpdateRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let request = request.into_inner();
    let update = TableUpdate {
        name: request.name,
        dealer: request.dealer,
        play_date_micros: request.play_date_micros,
    };
    let table = app_state
        .tracker
        .table_update(&identity, path.into_inner(), update)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok().json(TableResponse::from(table)))
}

/// Delete the table with all its games and comments.
#[utoipa::path(
    tag = "tables",
    params(
        ("table_id", description = "Table identifier."),
    ),
    responses(
        (status = 204, description = "The table was deleted."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[delete("/tables/{table_id}")]
pub async fn table_delete(
    app_state: Data<AppState>,
    path: Path<u64>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    app_state
        .tracker
        .table_delete(&identity, path.into_inner())
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::NoContent().finish())
}
