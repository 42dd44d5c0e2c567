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

//! Verified client identity.

use pokerteki_dbp::tracker::UserId;

/// A client identity verified through authentication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientIdentity {
    /// No valid session was presented.
    Anonymous,
    /// The identity source is a valid session token.
    User {
        /// Identifier of the authenticated user.
        user_id: UserId,
        /// Login name of the authenticated user.
        username: String,
        /// Identifier of the server-side session.
        session_id: String,
    },
}

impl std::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous;;"),
            Self::User {
                user_id, username, ..
            } => write!(f, "user;{user_id};{username}"),
        }
    }
}

impl ClientIdentity {
    /// Return a new authenticated instance.
    pub fn from_session(user_id: UserId, username: &str, session_id: &str) -> Self {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Client identity from session. user: '{user_id}', username: '{username}'");
        }
        Self::User {
            user_id,
            username: username.to_owned(),
            session_id: session_id.to_owned(),
        }
    }

    /// Return `true` if this identity was established through authentication.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Return the authenticated user's identifier.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User { user_id, .. } => Some(*user_id),
        }
    }

    /// Return the authenticated user's login name.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User { username, .. } => Some(username),
        }
    }

    /// Return the identifier of the session the identity was derived from.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User { session_id, .. } => Some(session_id),
        }
    }
}
