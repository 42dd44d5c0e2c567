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

//! API resources for accounts and login sessions.

use crate::rest_api::AppState;
use crate::rest_api::common::ApiErrorMapper;
use actix_web::Error;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::delete;
use actix_web::get;
use actix_web::post;
use actix_web::web::Data;
use actix_web::web::Json;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;

/// Username and password.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    /// Login name. 1 to 150 letters, digits and `@.+-_`.
    username: String,
    /// Password.
    password: String,
}

/// A registered user.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier.
    user_id: u64,
    /// Login name.
    username: String,
}

/// Session token of a successful login.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Token to present as `Authorization: Bearer` or in the session cookie.
    token: String,
}

/// Register a new user account.
#[utoipa::path(
    tag = "accounts",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "The account was created.", body = UserResponse),
        (status = 400, description = "Bad Request: Invalid username or password."),
        (status = 409, description = "Conflict: The username is taken."),
        (status = 500, description = "Internal server error."),
    ),
)]
#[post("/accounts")]
pub async fn account_register(
    app_state: Data<AppState>,
    credentials: Json<CredentialsRequest>,
) -> Result<HttpResponse, Error> {
    let credentials = credentials.into_inner();
    let user = app_state
        .tracker
        .register(&credentials.username, &credentials.password)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Created().json(UserResponse {
        user_id: user.user_id,
        username: user.username,
    }))
}

/// Return the authenticated user.
#[utoipa::path(
    tag = "accounts",
    responses(
        (status = 200, description = "The authenticated user.", body = UserResponse),
        (status = 401, description = "Unauthorized: Authentication failure."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[get("/accounts/current")]
pub async fn account_current(
    app_state: Data<AppState>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    let user = app_state
        .tracker
        .whoami(&identity)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok().json(UserResponse {
        user_id: user.user_id,
        username: user.username,
    }))
}

/// Delete the account of the authenticated user.
///
/// Tables, games and comments remain, but no longer reference the user.
#[utoipa::path(
    tag = "accounts",
    responses(
        (status = 204, description = "The account was deleted."),
        (status = 401, description = "Unauthorized: Authentication failure."),
        (status = 500, description = "Internal server error."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[delete("/accounts/current")]
pub async fn account_current_delete(
    app_state: Data<AppState>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    app_state
        .tracker
        .delete_account(&identity)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::NoContent()
        .cookie(app_state.auth.session_cookie_removal())
        .finish())
}

/// Log in and start a new session.
///
/// The session token is returned in the body and as a `HttpOnly` cookie.
/// Repeated failures from the same client lock out further attempts for the
/// username.
#[utoipa::path(
    tag = "accounts",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in.", body = SessionResponse),
        (status = 401, description = "Unauthorized: Invalid username or password."),
        (status = 429, description = "Too Many Requests: Locked out after repeated failures."),
        (status = 500, description = "Internal server error."),
    ),
)]
#[post("/sessions")]
pub async fn session_login(
    app_state: Data<AppState>,
    credentials: Json<CredentialsRequest>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let client_ip = app_state.auth.client_address(&http_request);
    let credentials = credentials.into_inner();
    let token = app_state
        .tracker
        .login(&credentials.username, &credentials.password, &client_ip)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::Ok()
        .cookie(app_state.auth.session_cookie(&token))
        .json(SessionResponse { token }))
}

/// End the current session.
#[utoipa::path(
    tag = "accounts",
    responses(
        (status = 204, description = "Logged out."),
        (status = 401, description = "Unauthorized: Authentication failure."),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
)]
#[delete("/sessions/current")]
pub async fn session_logout(
    app_state: Data<AppState>,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let identity = app_state
        .auth
        .get_identity(&app_state.tracker, &http_request)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    app_state
        .tracker
        .logout(&identity)
        .await
        .map_err(ApiErrorMapper::from_tracker_error)?;
    Ok(HttpResponse::NoContent()
        .cookie(app_state.auth.session_cookie_removal())
        .finish())
}
