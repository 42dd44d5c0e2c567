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

//! Database facade for operations related to login sessions.

use crate::tracker::UserId;

/// Database facade for operations related to login sessions.
#[async_trait::async_trait]
pub trait SessionFacade: Send + Sync {
    /// Persist a session for the user that expires at `expires_micros`.
    async fn session_insert(&self, session_id: &str, user_id: UserId, expires_micros: u64);

    /// Return the user of the session unless it is unknown or expired at
    /// `now_micros`.
    async fn session_user_id(&self, session_id: &str, now_micros: u64) -> Option<UserId>;

    /// Remove the session. Return `false` if it did not exist.
    async fn session_delete(&self, session_id: &str) -> bool;

    /// Remove all sessions of the user.
    async fn sessions_delete_by_user_id(&self, user_id: UserId);

    /// Remove all sessions that expired before `now_micros`.
    async fn sessions_purge_expired(&self, now_micros: u64);
}
