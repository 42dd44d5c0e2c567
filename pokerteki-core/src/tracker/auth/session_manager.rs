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

//! Login sessions backed by signed session tokens.

use super::ClientIdentity;
use crate::conf::AppConfig;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use pokerteki_dbp::dbp::DatabaseProvider;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;
use pokerteki_dbp::tracker::UserRecord;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;

/// Claims of a session token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User identifier.
    sub: String,
    /// Server-side session identifier.
    sid: String,
    /// Expiration in epoch seconds.
    exp: u64,
}

/** Issues and validates session tokens.

A token is a HS256 signed JWT referencing a server-side session. A token is
only accepted while the session exists, so ending the session revokes it.
*/
pub struct SessionManager {
    dbp: Arc<DatabaseProvider>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    max_age_micros: u64,
}

impl SessionManager {
    /// Return a new instance.
    pub fn new(app_config: &AppConfig, dbp: &Arc<DatabaseProvider>) -> Arc<Self> {
        let secret = app_config.security.secret_key().as_bytes();
        Arc::new(Self {
            dbp: Arc::clone(dbp),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            max_age_micros: app_config.session.max_age_secs().saturating_mul(1_000_000),
        })
    }

    /// Create a new server-side session for the user and return the session
    /// token.
    pub async fn create_session(&self, user: &UserRecord) -> Result<String, TrackerError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let expires_micros = crate::util::get_timestamp_micros().saturating_add(self.max_age_micros);
        let claims = SessionClaims {
            sub: user.user_id.to_string(),
            sid: session_id.to_owned(),
            exp: expires_micros / 1_000_000,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                TrackerErrorKind::Unspecified
                    .error_with_msg(format!("Failed to sign session token: {e}"))
            })?;
        self.dbp
            .session_facade()
            .session_insert(&session_id, user.user_id, expires_micros)
            .await;
        log::debug!("Created session for user '{}'.", user.user_id);
        Ok(token)
    }

    /// Return the identity of a valid session token or
    /// [ClientIdentity::Anonymous] otherwise.
    pub async fn identity_from_token(&self, token: &str) -> ClientIdentity {
        let claims = match jsonwebtoken::decode::<SessionClaims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(token_data) => token_data.claims,
            Err(e) => {
                log::debug!("Ignoring invalid session token: {e}");
                return ClientIdentity::Anonymous;
            }
        };
        let Ok(user_id) = claims.sub.parse::<UserId>() else {
            log::debug!("Ignoring session token with malformed subject '{}'.", claims.sub);
            return ClientIdentity::Anonymous;
        };
        let now = crate::util::get_timestamp_micros();
        if self
            .dbp
            .session_facade()
            .session_user_id(&claims.sid, now)
            .await
            .is_none_or(|session_user_id| session_user_id != user_id)
        {
            log::debug!("Ignoring session token of ended session.");
            return ClientIdentity::Anonymous;
        }
        match self.dbp.user_facade().user_by_id(user_id).await {
            Some(user) => ClientIdentity::from_session(user.user_id, &user.username, &claims.sid),
            None => ClientIdentity::Anonymous,
        }
    }

    /// End the session the identity was derived from. Return `false` if there
    /// was no such session.
    pub async fn end_session(&self, identity: &ClientIdentity) -> bool {
        match identity.session_id() {
            Some(session_id) => self.dbp.session_facade().session_delete(session_id).await,
            None => false,
        }
    }

    /// End all sessions of the user.
    pub async fn end_all_sessions(&self, user_id: UserId) {
        self.dbp
            .session_facade()
            .sessions_delete_by_user_id(user_id)
            .await
    }
}
