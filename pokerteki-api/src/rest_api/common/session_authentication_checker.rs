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

//! Authentication with session tokens.

use actix_web::HttpRequest;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;
use actix_web::http::header::HeaderValue;
use pokerteki_core::conf::AppConfig;
use pokerteki_core::tracker::Tracker;
use pokerteki_core::tracker::TrackerError;
use pokerteki_core::tracker::TrackerErrorKind;
use pokerteki_core::tracker::auth::ClientIdentity;
use std::net::IpAddr;
use std::sync::Arc;

/// Resolves the [ClientIdentity] of requests and issues session cookies.
///
/// The session token is read from the `Authorization: Bearer` HTTP header and
/// falls back to the session cookie.
pub struct SessionAuthenticationChecker {
    cookie_name: String,
    cookie_secure: bool,
    max_age_secs: u64,
    trusted_proxies: Vec<IpAddr>,
}

impl SessionAuthenticationChecker {
    const BEARER_TOKEN: &str = "Bearer";
    const X_FORWARDED_FOR: &str = "x-forwarded-for";

    /// Return a new instance.
    pub fn new(app_config: &AppConfig) -> Arc<Self> {
        Arc::new(Self {
            cookie_name: app_config.session.cookie_name().to_owned(),
            cookie_secure: app_config.security.is_cookie_secure(),
            max_age_secs: app_config.session.max_age_secs(),
            trusted_proxies: app_config.security.trusted_proxies(),
        })
    }

    /// Return the session token of the request, if any.
    fn session_token(&self, http_request: &HttpRequest) -> Result<Option<String>, TrackerError> {
        if let Some(authorization_header) = http_request
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .map(HeaderValue::to_str)
        {
            let authorization_header = authorization_header
                .map_err(|e| {
                    TrackerErrorKind::AuthenticationFailure
                        .error_with_msg(format!("Invalid 'Authorization' HTTP header: {e}"))
                })?
                .trim();
            let bearer_token = authorization_header
                .strip_prefix(Self::BEARER_TOKEN)
                .and_then(|rest| rest.strip_prefix([' ', ':']))
                .ok_or_else(|| {
                    TrackerErrorKind::AuthenticationFailure
                        .error_with_msg("Only 'Bearer' authorization is supported.")
                })?
                .trim();
            return Ok(Some(bearer_token.to_owned()));
        }
        Ok(http_request
            .cookie(&self.cookie_name)
            .map(|cookie| cookie.value().to_owned()))
    }

    /// Return the identity of the request.
    ///
    /// Requests without a valid session yield [ClientIdentity::Anonymous]. A
    /// malformed `Authorization` header is an error.
    pub async fn get_identity(
        &self,
        tracker: &Tracker,
        http_request: &HttpRequest,
    ) -> Result<ClientIdentity, TrackerError> {
        let token = self.session_token(http_request)?;
        let identity = tracker.authenticate(token.as_deref()).await;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Request '{}' by '{identity}'.", http_request.path());
        }
        Ok(identity)
    }

    /// Return the address of the client.
    ///
    /// The connecting peer is the client unless it is a trusted proxy. Then
    /// the right-most `X-Forwarded-For` entry, appended by that proxy, is used.
    /// Entries further left are set by the client and never trusted.
    pub fn client_address(&self, http_request: &HttpRequest) -> String {
        let Some(peer_ip) = http_request.peer_addr().map(|socket_addr| socket_addr.ip()) else {
            return "unknown".to_string();
        };
        if self.trusted_proxies.contains(&peer_ip) {
            if let Some(forwarded_for) = Self::last_forwarded_for(http_request) {
                return forwarded_for;
            }
        }
        peer_ip.to_string()
    }

    fn last_forwarded_for(http_request: &HttpRequest) -> Option<String> {
        http_request
            .headers()
            .get_all(Self::X_FORWARDED_FOR)
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .last()
            .map(str::to_owned)
    }

    /// Return a cookie carrying the session token.
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build(self.cookie_name.to_owned(), token.to_owned())
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Strict)
            .max_age(actix_web::cookie::time::Duration::seconds(
                i64::try_from(self.max_age_secs).unwrap_or(i64::MAX),
            ))
            .finish()
    }

    /// Return a cookie that removes the session cookie from the client.
    pub fn session_cookie_removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.cookie_name.to_owned(), "")
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Strict)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::test::TestRequest;

    fn checker(overrides: &[(&str, &str)]) -> Arc<SessionAuthenticationChecker> {
        let app_config = AppConfig::with_overrides(env!("CARGO_PKG_NAME"), 0, overrides).unwrap();
        SessionAuthenticationChecker::new(&app_config)
    }

    fn token_of(auth: &SessionAuthenticationChecker, authorization: &str) -> Option<String> {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, authorization))
            .to_http_request();
        auth.session_token(&req).ok().flatten()
    }

    #[test]
    fn bearer_scheme_requires_a_separator() {
        let auth = checker(&[]);
        assert_eq!(token_of(&auth, "Bearer abc").as_deref(), Some("abc"));
        assert_eq!(token_of(&auth, "Bearer:abc").as_deref(), Some("abc"));
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "BearerXYZ"))
            .to_http_request();
        assert!(auth.session_token(&req).is_err());
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert!(auth.session_token(&req).is_err());
        let req = TestRequest::default().to_http_request();
        assert_eq!(auth.session_token(&req).unwrap(), None);
    }

    #[test]
    fn forwarded_for_is_only_used_from_trusted_proxies() {
        let auth = checker(&[("security.trustedproxies", "10.0.0.1, not-an-ip")]);
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:5000".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.66, 192.0.2.7"))
            .to_http_request();
        assert_eq!(auth.client_address(&req), "192.0.2.7");
        let req = TestRequest::default()
            .peer_addr("192.0.2.99:5000".parse().unwrap())
            .insert_header(("x-forwarded-for", "192.0.2.7"))
            .to_http_request();
        assert_eq!(auth.client_address(&req), "192.0.2.99");
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:5000".parse().unwrap())
            .to_http_request();
        assert_eq!(auth.client_address(&req), "10.0.0.1");
        let req = TestRequest::default().to_http_request();
        assert_eq!(auth.client_address(&req), "unknown");
    }
}
