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

//! Registered user.

/// Unique user identifier.
pub type UserId = u64;

/// A registered user.
///
/// Only the identity matters for authorization. The password digest is opaque
/// to the persistence layer.
#[derive(Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub user_id: UserId,
    /// Unique login name.
    pub username: String,
    /// Salted password digest.
    pub password_digest: String,
    /// Time of registration in epoch microseconds.
    pub joined_ts_micros: u64,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("password_digest", &"*redacted*")
            .field("joined_ts_micros", &self.joined_ts_micros)
            .finish()
    }
}
