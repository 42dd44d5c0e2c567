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

//! Security headers, allowed hosts and HTTPS enforcement.

use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::http::header::HeaderMap;
use actix_web::http::header::HeaderName;
use actix_web::http::header::HeaderValue;
use actix_web::middleware::Next;
use actix_web::web::Data;
use pokerteki_core::conf::AppConfig;
use std::sync::Arc;

/// Browser features that pages of this app never use.
const PERMISSIONS_POLICY: &str = "accelerometer=(), camera=(), geolocation=(), gyroscope=(), \
    magnetometer=(), microphone=(), payment=(), usb=()";

/// Security policy applied to every request and response.
pub struct SecurityHeaders {
    app_config: Arc<AppConfig>,
    content_security_policy: String,
    /// `Strict-Transport-Security` value when enabled.
    hsts: Option<String>,
    proxy_ssl_header: Option<String>,
}

impl SecurityHeaders {
    /// Return a new instance.
    pub fn new(app_config: &Arc<AppConfig>) -> Self {
        let security = &app_config.security;
        let hsts = (security.hsts_seconds() > 0).then(|| {
            if security.is_hsts_include_subdomains() {
                format!("max-age={}; includeSubDomains", security.hsts_seconds())
            } else {
                format!("max-age={}", security.hsts_seconds())
            }
        });
        Self {
            app_config: Arc::clone(app_config),
            content_security_policy: app_config.csp.header_value(),
            hsts,
            proxy_ssl_header: security.proxy_ssl_header().map(str::to_lowercase),
        }
    }

    /// Return the requested host with optional port.
    fn requested_host(req: &ServiceRequest) -> String {
        req.headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| req.uri().authority().map(|authority| authority.as_str()))
            .unwrap_or_default()
            .to_owned()
    }

    /// Return `true` if the request reached the app over HTTPS.
    fn is_secure(&self, req: &ServiceRequest) -> bool {
        match &self.proxy_ssl_header {
            Some(proxy_ssl_header) => req
                .headers()
                .get(proxy_ssl_header.as_str())
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.eq_ignore_ascii_case("https")),
            None => req.connection_info().scheme() == "https",
        }
    }

    /// Health checks are probed over plain HTTP from within the cluster.
    fn is_redirect_exempt(req: &ServiceRequest) -> bool {
        req.path() == "/health" || req.path().starts_with("/health/")
    }

    /// Add the security headers to a response.
    fn apply_to(&self, headers: &mut HeaderMap, secure: bool) {
        let static_headers = [
            (header::X_FRAME_OPTIONS, "DENY"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (header::REFERRER_POLICY, "same-origin"),
            (HeaderName::from_static("permissions-policy"), PERMISSIONS_POLICY),
            (HeaderName::from_static("cross-origin-opener-policy"), "same-origin"),
        ];
        for (name, value) in static_headers {
            headers.insert(name, HeaderValue::from_static(value));
        }
        if let Ok(value) = HeaderValue::from_str(&self.content_security_policy) {
            headers.insert(header::CONTENT_SECURITY_POLICY, value);
        } else {
            log::warn!("Content Security Policy is not a valid HTTP header value.");
        }
        if self.app_config.security.is_cross_origin_isolated() {
            headers.insert(
                HeaderName::from_static("cross-origin-embedder-policy"),
                HeaderValue::from_static("require-corp"),
            );
        }
        if secure {
            if let Some(hsts) = self
                .hsts
                .as_deref()
                .and_then(|hsts| HeaderValue::from_str(hsts).ok())
            {
                headers.insert(header::STRICT_TRANSPORT_SECURITY, hsts);
            }
        }
    }
}

/// Middleware that rejects requests for unknown hosts, redirects plain HTTP
/// to HTTPS and adds security headers to every response.
pub async fn apply_security_policy(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    let Some(security_headers) = req.app_data::<Data<SecurityHeaders>>().cloned() else {
        log::warn!("Security headers are not configured. Refusing to serve request.");
        return Ok(req
            .into_response(HttpResponse::InternalServerError().finish())
            .map_into_right_body());
    };
    let host = SecurityHeaders::requested_host(&req);
    let secure = security_headers.is_secure(&req);
    if !security_headers.app_config.security.is_host_allowed(&host) {
        log::info!("Rejected request for disallowed host '{host}'.");
        let mut res = req.into_response(HttpResponse::BadRequest().finish());
        security_headers.apply_to(res.headers_mut(), secure);
        return Ok(res.map_into_right_body());
    }
    if security_headers.app_config.security.is_ssl_redirect()
        && !secure
        && !SecurityHeaders::is_redirect_exempt(&req)
    {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or("/");
        let location = format!("https://{host}{path_and_query}");
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Redirecting plain HTTP request to '{location}'.");
        }
        let res = req.into_response(
            HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, location))
                .finish(),
        );
        return Ok(res.map_into_right_body());
    }
    let mut res = next.call(req).await?;
    security_headers.apply_to(res.headers_mut(), secure);
    Ok(res.map_into_left_body())
}
