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

//! API resources for games played at a table.

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
use pokerteki_core::tracker::GameRecord;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// A game played at a table.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct GameResponse {
    /// Unique game identifier.
    game_id: u64,
    /// The table where the game was played.
    table_id: u64,
    /// Winner of the game, if any.
    winner: Option<u64>,
    /// Users that played the game.
    players: Vec<u64>,
}

impl From<GameRecord> for GameResponse {
    fn from(value: GameRecord) -> Self {
        Self {
            game_id: value.game_id,
            table_id: value.table_id,
            winner: value.winner,
            players: value.players.into_iter().collect(),
        }
    }
}

/// Outcome of a game.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct GameRequest {
    /// Winner of the game, if any.
    #[serde(default)]
    winner: Option<u64>,
    /// Users that played the game.
    #[serde(default)]
    players: BTreeSet<u64>,
}

/// Record a new game at the table.
///
/// Requires the right to change the table.
#[utoipa::path(
    tag = "games",
    params(
        ("table_id", description = "Table identifier."),
    ),
    request_body = GameRequest,
    responses(
        (status = 201, description = "The game was created.", body = GameResponse),
        (status = 400, description = "Bad Request: Unknown winner or player."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[post("/tables/{table_id}/games")]
pub async fn game_create(
    app_state: Data<AppState>,
    path: Path<u64>,
    request: Json<GameRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let request = request.into_inner();
    let game = app_state
        .tracker
        .game_create(&identity, path.into_inner(), request.winner, request.players)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Created().json(GameResponse::from(game)))
}

/// Replace winner and players of the game.
///
/// Only the dealer of the table may change its games.
#[utoipa::path(
    tag = "games",
    params(
        ("table_id", description = "Table identifier."),
        ("game_id", description = "Game identifier."),
    ),
    request_body = GameRequest,
    responses(
        (status = 200, description = "The updated game.", body = GameResponse),
        (status = 400, description = "Bad Request: Unknown winner or player."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such game at the table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[put("/tables/{table_id}/games/{game_id}")]
pub async fn game_update(
    app_state: Data<AppState>,
    path: Path<(u64, u64)>,
    request: Json<GameRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let (table_id, game_id) = path.into_inner();
    let request = request.into_inner();
    let game = app_state
        .tracker
        .game_update(
            &identity,
            table_id,
            game_id,
            request.winner,
            request.players,
        )
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok().json(GameResponse::from(game)))
}

/// Delete the game.
#[utoipa::path(
    tag = "games",
    params(
        ("table_id", description = "Table identifier."),
        ("game_id", description = "Game identifier."),
    ),
    responses(
        (status = 204, description = "The game was deleted."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 403, description = "Forbidden: Authorization failure."),
        (status = 404, description = "No such game at the table."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[delete("/tables/{table_id}/games/{game_id}")]
pub async fn game_delete(
    app_state: Data<AppState>,
    path: Path<(u64, u64)>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let (table_id, game_id) = path.into_inner();
    app_state
        .tracker
        .game_delete(&identity, table_id, game_id)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::NoContent().finish())
}
