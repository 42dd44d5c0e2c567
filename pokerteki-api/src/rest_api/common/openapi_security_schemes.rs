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

//! OpenAPI security schemes of session authenticated resources.

use utoipa::Modify;
use utoipa::openapi::Components;
use utoipa::openapi::OpenApi;
use utoipa::openapi::security::ApiKey;
use utoipa::openapi::security::ApiKeyValue;
use utoipa::openapi::security::HttpAuthScheme;
use utoipa::openapi::security::HttpBuilder;
use utoipa::openapi::security::SecurityScheme;

/// Adds the ways a session token can be presented to the OpenAPI document.
pub struct SessionSecuritySchemes;

impl SessionSecuritySchemes {
    /// Scheme name of the `Authorization: Bearer` header.
    pub const BEARER: &'static str = "bearer_auth";
    /// Scheme name of the session cookie.
    pub const COOKIE: &'static str = "session_cookie";
    /// Cookie name unless `session.cookiename` says otherwise.
    const DEFAULT_COOKIE_NAME: &'static str = "sessionid";
}

impl Modify for SessionSecuritySchemes {
    fn modify(&self, openapi: &mut OpenApi) {
        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .build();
        let cookie = ApiKey::Cookie(ApiKeyValue::with_description(
            Self::DEFAULT_COOKIE_NAME,
            "Session token set by a successful login.",
        ));
        openapi
            .components
            .get_or_insert_with(Components::new)
            .add_security_schemes_from_iter([
                (Self::BEARER, SecurityScheme::Http(bearer)),
                (Self::COOKIE, SecurityScheme::ApiKey(cookie)),
            ]);
    }
}
