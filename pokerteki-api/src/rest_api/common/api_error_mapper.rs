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

//! Mapper of app errors to Actix-web [Error].

use actix_web::Error;
use actix_web::error;
use pokerteki_core::tracker::TrackerError;
use pokerteki_core::tracker::TrackerErrorKind;

/// Mapper of app errors to Actix-web [Error].
pub struct ApiErrorMapper {}

impl ApiErrorMapper {
    /// Return REST API [Error] from [TrackerError].
    pub fn from_tracker_error<E: AsRef<TrackerError>>(e: E) -> Error {
        let e = e.as_ref();
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Will respond with error. kind: {} msg: {e:?}", e.kind());
        }
        let msg = e.msg().unwrap_or_default().to_string();
        match e.kind() {
            TrackerErrorKind::MalformedInput | TrackerErrorKind::InvalidPassword => {
                // HTTP 400
                error::ErrorBadRequest(msg)
            }
            TrackerErrorKind::AuthenticationFailure => {
                // HTTP 401
                error::ErrorUnauthorized(msg)
            }
            TrackerErrorKind::Unauthorized => {
                // HTTP 403
                error::ErrorForbidden(msg)
            }
            TrackerErrorKind::NotFound => {
                // HTTP 404
                error::ErrorNotFound(msg)
            }
            TrackerErrorKind::Conflict => {
                // HTTP 409
                error::ErrorConflict(msg)
            }
            TrackerErrorKind::LockedOut => {
                // HTTP 429
                error::ErrorTooManyRequests(msg)
            }
            TrackerErrorKind::Unspecified => {
                // HTTP 500 without leaking details
                error::ErrorInternalServerError("Internal server error.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn kinds_map_to_statuses() {
        let expected = [
            (TrackerErrorKind::MalformedInput, StatusCode::BAD_REQUEST),
            (TrackerErrorKind::InvalidPassword, StatusCode::BAD_REQUEST),
            (TrackerErrorKind::AuthenticationFailure, StatusCode::UNAUTHORIZED),
            (TrackerErrorKind::Unauthorized, StatusCode::FORBIDDEN),
            (TrackerErrorKind::NotFound, StatusCode::NOT_FOUND),
            (TrackerErrorKind::Conflict, StatusCode::CONFLICT),
            (TrackerErrorKind::LockedOut, StatusCode::TOO_MANY_REQUESTS),
            (TrackerErrorKind::Unspecified, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in expected {
            let e = ApiErrorMapper::from_tracker_error(kind.error_with_msg("test"));
            assert_eq!(e.error_response().status(), status);
        }
    }
}
