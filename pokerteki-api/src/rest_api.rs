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

//! REST API server and resources.

mod http_resources {
    //! API resources

    pub mod account_resources;
    pub mod comment_resources;
    pub mod game_resources;
    pub mod table_resources;
}
mod common {
    //! Common REST API resources and utils.

    mod api_error_mapper;
    mod openapi_security_schemes;
    mod security_headers;
    mod session_authentication_checker;

    pub use api_error_mapper::*;
    pub use openapi_security_schemes::*;
    pub use security_headers::*;
    pub use session_authentication_checker::*;
}

use self::common::SecurityHeaders;
use self::common::SessionAuthenticationChecker;
use self::common::SessionSecuritySchemes;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::get;
use actix_web::http::header::ContentType;
use actix_web::middleware;
use actix_web::web;
use pokerteki_core::conf::AppConfig;
use pokerteki_core::tracker::Tracker;
use std::sync::Arc;
use tyst_api_rest_health::AppHealth;
use tyst_api_rest_health::health_resources;
use utoipa::OpenApi;

/// Number of parallel requests the can be served for each worker.
const CONNECTIONS_PER_WORKER: usize = 256;

/// Shared state between requests.
#[derive(Clone)]
struct AppState {
    tracker: Arc<Tracker>,
    auth: Arc<SessionAuthenticationChecker>,
}

impl AppState {
    fn new(app_config: &AppConfig, tracker: &Arc<Tracker>) -> Self {
        Self {
            tracker: Arc::clone(tracker),
            auth: SessionAuthenticationChecker::new(app_config),
        }
    }
}

/// Simple health check that gets the tracker instance.
pub struct TrackerHealth {
    tracker: Arc<Tracker>,
}
impl TrackerHealth {
    fn with_app(tracker: &Arc<Tracker>) -> Arc<dyn AppHealth> {
        Arc::new(Self {
            tracker: Arc::clone(tracker),
        })
    }
}
impl AppHealth for TrackerHealth {
    fn is_health_started(&self) -> bool {
        self.tracker.is_health_started()
    }
    fn is_health_ready(&self) -> bool {
        self.tracker.is_health_ready()
    }
    fn is_health_live(&self) -> bool {
        self.tracker.is_health_live()
    }
}

/// Register all API resources.
fn configure_services(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/api/v1")
        .service(get_openapi)
        .service(http_resources::account_resources::account_register)
        .service(http_resources::account_resources::account_current)
        .service(http_resources::account_resources::account_current_delete)
        .service(http_resources::account_resources::session_login)
        .service(http_resources::account_resources::session_logout)
        .service(http_resources::table_resources::tables_list)
        .service(http_resources::table_resources::table_create)
        .service(http_resources::table_resources::table_detail)
        .service(http_resources::table_resources::table_update)
        .service(http_resources::table_resources::table_delete)
        .service(http_resources::game_resources::game_create)
        .service(http_resources::game_resources::game_update)
        .service(http_resources::game_resources::game_delete)
        .service(http_resources::comment_resources::comment_create)
        .service(http_resources::comment_resources::comment_update)
        .service(http_resources::comment_resources::comment_delete);
    cfg.service(web::redirect("/openapi", "/api/v1/openapi.json"))
        .service(web::redirect("/openapi.json", "/api/v1/openapi.json"))
        .service(scope)
        .service(health_resources::health)
        .service(health_resources::health_live)
        .service(health_resources::health_ready)
        .service(health_resources::health_started);
}

/// Run HTTP server.
pub async fn run_http_server(
    app_config: &Arc<AppConfig>,
    tracker: &Arc<Tracker>,
) -> Result<(), Box<dyn core::error::Error>> {
    let workers = app_config.api.workers();
    let max_connections = CONNECTIONS_PER_WORKER * workers;
    log::info!(
        "API described by http://{}:{}/openapi.json allows {max_connections} concurrent connections.",
        &app_config.api.bind_address(),
        &app_config.api.bind_port(),
    );
    let app_data = web::Data::<AppState>::new(AppState::new(app_config, tracker));
    let app_health = web::Data::<Arc<dyn AppHealth>>::new(TrackerHealth::with_app(tracker));
    let security_headers = web::Data::<SecurityHeaders>::new(SecurityHeaders::new(app_config));

    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .app_data(app_health.clone())
            .app_data(security_headers.clone())
            .wrap(middleware::from_fn(common::apply_security_policy))
            .configure(configure_services)
    })
    .workers(workers)
    .backlog(u32::try_from(max_connections / 2).unwrap_or(2048))
    .max_connections(max_connections)
    .bind_auto_h2c((app_config.api.bind_address(), app_config.api.bind_port()))?
    .disable_signals()
    .shutdown_timeout(5) // Default 30
    .run()
    .await?;
    Ok(())
}

/// Serve Open API documentation.
#[get("/openapi.json")]
async fn get_openapi() -> impl Responder {
    match openapi_as_string() {
        Ok(openapi) => HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(openapi),
        Err(e) => {
            log::warn!("Failed to serialize OpenAPI description: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Get the OpenAPI definition as a pretty JSON String.
pub fn openapi_as_string() -> Result<String, serde_json::Error> {
    #[derive(OpenApi)]
    #[openapi(
        // Use Cargo.toml as source for the "info" section
        modifiers(&SessionSecuritySchemes),
        paths(
            http_resources::account_resources::account_register,
            http_resources::account_resources::account_current,
            http_resources::account_resources::account_current_delete,
            http_resources::account_resources::session_login,
            http_resources::account_resources::session_logout,
            http_resources::table_resources::tables_list,
            http_resources::table_resources::table_create,
            http_resources::table_resources::table_detail,
            http_resources::table_resources::table_update,
            http_resources::table_resources::table_delete,
            http_resources::game_resources::game_create,
            http_resources::game_resources::game_update,
            http_resources::game_resources::game_delete,
            http_resources::comment_resources::comment_create,
            http_resources::comment_resources::comment_update,
            http_resources::comment_resources::comment_delete,
            health_resources::health,
            health_resources::health_live,
            health_resources::health_ready,
            health_resources::health_started,
        )
    )]
    struct ApiDoc;
    ApiDoc::openapi().to_pretty_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header;
    use actix_web::test;
    use serde_json::Value;
    use serde_json::json;

    /// Return shared state backed by an empty in-memory database.
    async fn app_data_for_tests(
        overrides: &[(&str, &str)],
    ) -> (
        web::Data<AppState>,
        web::Data<Arc<dyn AppHealth>>,
        web::Data<SecurityHeaders>,
    ) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut overrides = overrides.to_vec();
        overrides.push(("password.digestrounds", "10"));
        let app_config = Arc::new(
            AppConfig::with_overrides(
                env!("CARGO_PKG_NAME"),
                pokerteki_core::util::get_timestamp_micros(),
                &overrides,
            )
            .unwrap(),
        );
        let tracker = Tracker::new(&app_config).await.unwrap();
        (
            web::Data::new(AppState::new(&app_config, &tracker)),
            web::Data::new(TrackerHealth::with_app(&tracker)),
            web::Data::new(SecurityHeaders::new(&app_config)),
        )
    }

    /// Initialize the app the same way as [run_http_server] does.
    macro_rules! init_test_app {
        ($overrides:expr) => {{
            let (app_state, app_health, security_headers) = app_data_for_tests($overrides).await;
            test::init_service(
                App::new()
                    .app_data(app_state)
                    .app_data(app_health)
                    .app_data(security_headers)
                    .wrap(middleware::from_fn(common::apply_security_policy))
                    .configure(configure_services),
            )
            .await
        }};
    }

    /// Register and log in, returning the session token.
    macro_rules! register_and_login {
        ($app:expr, $username:expr) => {{
            let credentials = json!({"username": $username, "password": "river-card-7"});
            let req = test::TestRequest::post()
                .uri("/api/v1/accounts")
                .set_json(&credentials)
                .to_request();
            assert_eq!(
                test::call_service(&$app, req).await.status(),
                StatusCode::CREATED
            );
            let req = test::TestRequest::post()
                .uri("/api/v1/sessions")
                .set_json(&credentials)
                .to_request();
            let res = test::call_service(&$app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            let body: Value = test::read_body_json(res).await;
            body["token"].as_str().unwrap().to_string()
        }};
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn tables_are_gated_per_user() {
        let app = init_test_app!(&[]);
        let dealer = register_and_login!(app, "dealer");
        let stranger = register_and_login!(app, "stranger");
        // Anonymous listing requires authentication.
        let req = test::TestRequest::get().uri("/api/v1/tables").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
        let req = test::TestRequest::post()
            .uri("/api/v1/tables")
            .insert_header(bearer(&dealer))
            .set_json(json!({"name": "Friday"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let table: Value = test::read_body_json(res).await;
        let table_id = table["table_id"].as_u64().unwrap();
        let req = test::TestRequest::get()
            .uri("/api/v1/tables")
            .insert_header(bearer(&stranger))
            .to_request();
        let tables: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tables, json!([]));
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/tables/{table_id}"))
            .insert_header(bearer(&stranger))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
        let req = test::TestRequest::get()
            .uri("/api/v1/tables/9999")
            .insert_header(bearer(&stranger))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/tables/{table_id}/comments"))
            .insert_header(bearer(&dealer))
            .set_json(json!({"comment": "Shuffle up and deal"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/tables/{table_id}"))
            .insert_header(bearer(&dealer))
            .to_request();
        let detail: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(detail["table"]["name"], "Friday");
        assert_eq!(detail["comments"][0]["comment"], "Shuffle up and deal");
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/tables/{table_id}"))
            .insert_header(bearer(&stranger))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/tables/{table_id}"))
            .insert_header(bearer(&dealer))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
    }

    #[actix_web::test]
    async fn games_are_managed_by_the_dealer() {
        let app = init_test_app!(&[]);
        let dealer = register_and_login!(app, "dealer");
        let player = register_and_login!(app, "player");
        let req = test::TestRequest::get()
            .uri("/api/v1/accounts/current")
            .insert_header(bearer(&player))
            .to_request();
        let whoami: Value = test::call_and_read_body_json(&app, req).await;
        let player_id = whoami["user_id"].as_u64().unwrap();
        let req = test::TestRequest::post()
            .uri("/api/v1/tables")
            .insert_header(bearer(&dealer))
            .set_json(json!({"name": "Saturday"}))
            .to_request();
        let table: Value = test::call_and_read_body_json(&app, req).await;
        let table_id = table["table_id"].as_u64().unwrap();
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/tables/{table_id}/games"))
            .insert_header(bearer(&dealer))
            .set_json(json!({"winner": player_id, "players": [player_id]}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let game: Value = test::read_body_json(res).await;
        let game_id = game["game_id"].as_u64().unwrap();
        assert_eq!(game["players"], json!([player_id]));
        // Playing a game makes the table visible, but not changeable.
        let req = test::TestRequest::get()
            .uri("/api/v1/tables")
            .insert_header(bearer(&player))
            .to_request();
        let tables: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tables[0]["table_id"], table_id);
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/tables/{table_id}/games/{game_id}"))
            .insert_header(bearer(&player))
            .set_json(json!({"players": [player_id]}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/tables/{table_id}/comments"))
            .insert_header(bearer(&player))
            .set_json(json!({"comment": "Nice hand"}))
            .to_request();
        let comment: Value = test::call_and_read_body_json(&app, req).await;
        let comment_id = comment["comment_id"].as_u64().unwrap();
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/tables/{table_id}/comments/{comment_id}"))
            .insert_header(bearer(&dealer))
            .set_json(json!({"comment": "Edited"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/tables/{table_id}/comments/{comment_id}"))
            .insert_header(bearer(&player))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/tables/9999/games/{game_id}"))
            .insert_header(bearer(&dealer))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/tables/{table_id}/games/{game_id}"))
            .insert_header(bearer(&dealer))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
    }

    #[actix_web::test]
    async fn session_cookie_authenticates_until_logout() {
        let app = init_test_app!(&[]);
        let credentials = json!({"username": "alice", "password": "river-card-7"});
        let req = test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(&credentials)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
        let req = test::TestRequest::post()
            .uri("/api/v1/sessions")
            .set_json(&credentials)
            .to_request();
        let res = test::call_service(&app, req).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "sessionid")
            .unwrap()
            .into_owned();
        assert_eq!(cookie.http_only(), Some(true));
        let req = test::TestRequest::get()
            .uri("/api/v1/accounts/current")
            .cookie(cookie.clone())
            .to_request();
        let whoami: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(whoami["username"], "alice");
        let req = test::TestRequest::delete()
            .uri("/api/v1/sessions/current")
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
        let req = test::TestRequest::get()
            .uri("/api/v1/accounts/current")
            .cookie(cookie)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn login_lockout_responds_with_too_many_requests() {
        let app = init_test_app!(&[]);
        register_and_login!(app, "alice");
        let wrong = json!({"username": "alice", "password": "wrong-guess"});
        for _ in 0..5 {
            let req = test::TestRequest::post()
                .uri("/api/v1/sessions")
                .set_json(&wrong)
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::UNAUTHORIZED
            );
        }
        let req = test::TestRequest::post()
            .uri("/api/v1/sessions")
            .set_json(json!({"username": "alice", "password": "river-card-7"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn lockout_ignores_client_supplied_forwarded_for() {
        let app = init_test_app!(&[
            ("security.production", "true"),
            ("security.secretkey", "s3cr3t-for-testing"),
            ("security.allowedhosts", "pokerteki.mom"),
        ]);
        let credentials = json!({"username": "alice", "password": "river-card-7"});
        let req = test::TestRequest::post()
            .uri("/api/v1/accounts")
            .insert_header((header::HOST, "pokerteki.mom"))
            .insert_header(("x-forwarded-proto", "https"))
            .set_json(&credentials)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
        let wrong = json!({"username": "alice", "password": "wrong-guess"});
        for attempt in 0..5 {
            let req = test::TestRequest::post()
                .uri("/api/v1/sessions")
                .peer_addr("198.51.100.4:40000".parse().unwrap())
                .insert_header((header::HOST, "pokerteki.mom"))
                .insert_header(("x-forwarded-proto", "https"))
                .insert_header(("x-forwarded-for", format!("203.0.113.{attempt}")))
                .set_json(&wrong)
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::UNAUTHORIZED
            );
        }
        let req = test::TestRequest::post()
            .uri("/api/v1/sessions")
            .peer_addr("198.51.100.4:40000".parse().unwrap())
            .insert_header((header::HOST, "pokerteki.mom"))
            .insert_header(("x-forwarded-proto", "https"))
            .insert_header(("x-forwarded-for", "203.0.113.99"))
            .set_json(&credentials)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn responses_carry_security_headers() {
        let app = init_test_app!(&[]);
        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        let headers = res.headers();
        assert!(
            headers
                .get(header::CONTENT_SECURITY_POLICY)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("default-src 'self'")
        );
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        assert!(
            headers
                .get("permissions-policy")
                .unwrap()
                .to_str()
                .unwrap()
                .contains("camera=()")
        );
        assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
        assert!(headers.get("cross-origin-embedder-policy").is_none());
    }

    #[actix_web::test]
    async fn production_enforces_hosts_and_https() {
        let app = init_test_app!(&[
            ("security.production", "true"),
            ("security.secretkey", "s3cr3t-for-testing"),
            ("security.allowedhosts", "pokerteki.mom"),
        ]);
        let req = test::TestRequest::get()
            .uri("/api/v1/tables")
            .insert_header((header::HOST, "evil.mom"))
            .insert_header(("x-forwarded-proto", "https"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
        let req = test::TestRequest::get()
            .uri("/api/v1/tables?page=1")
            .insert_header((header::HOST, "pokerteki.mom"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "https://pokerteki.mom/api/v1/tables?page=1"
        );
        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::HOST, "pokerteki.mom"))
            .insert_header(("x-forwarded-proto", "https"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers()
                .get(header::STRICT_TRANSPORT_SECURITY)
                .unwrap(),
            "max-age=31536000; includeSubDomains"
        );
        assert_eq!(
            res.headers().get("cross-origin-embedder-policy").unwrap(),
            "require-corp"
        );
    }

    #[::core::prelude::v1::test]
    fn openapi_lists_resources() {
        let openapi = openapi_as_string().unwrap();
        assert!(openapi.contains("/tables/{table_id}/games"));
        assert!(openapi.contains("bearer_auth"));
    }
}
