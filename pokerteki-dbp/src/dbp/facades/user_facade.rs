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

//! Database facade for operations related to users.

use crate::tracker::TrackerError;
use crate::tracker::UserId;
use crate::tracker::UserRecord;

/// Database facade for operations related to users.
#[async_trait::async_trait]
pub trait UserFacade: Send + Sync {
    /// Persist a new user and return the stored record.
    ///
    /// Errors out with [crate::tracker::TrackerErrorKind::Conflict] if the
    /// `username` is already taken.
    async fn user_insert(
        &self,
        username: &str,
        password_digest: &str,
        joined_ts_micros: u64,
    ) -> Result<UserRecord, TrackerError>;

    /// Return the user with the identifier, if present.
    async fn user_by_id(&self, user_id: UserId) -> Option<UserRecord>;

    /// Return the user with the login name, if present.
    async fn user_by_username(&self, username: &str) -> Option<UserRecord>;

    /// Remove the user.
    ///
    /// References to the user as table dealer or creator, game winner or
    /// comment creator are cleared and the user is removed from all player
    /// sets. Return `false` if the user did not exist.
    async fn user_delete(&self, user_id: UserId) -> bool;
}
