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

//! User accounts and login.

use super::Tracker;
use super::auth::ClientIdentity;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;
use pokerteki_dbp::tracker::UserRecord;

impl Tracker {
    /// Longest accepted username.
    const USERNAME_MAX_LEN: usize = 150;

    /// Error out with [TrackerErrorKind::MalformedInput] unless `username`
    /// consists of 1 to 150 letters, digits and `@.+-_`.
    fn validate_username(username: &str) -> Result<(), TrackerError> {
        let len = username.chars().count();
        if len == 0 || len > Self::USERNAME_MAX_LEN {
            Err(TrackerErrorKind::MalformedInput.error_with_msg(format!(
                "The username must be 1 to {} characters.",
                Self::USERNAME_MAX_LEN
            )))?;
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            Err(TrackerErrorKind::MalformedInput
                .error_with_msg("The username may only contain letters, digits and @/./+/-/_."))?;
        }
        Ok(())
    }

    /// Register a new user.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserRecord, TrackerError> {
        Self::validate_username(username)?;
        self.password_policy.validate(username, password)?;
        let password_digest = self.password_hasher.digest(password);
        let user = self
            .dbp
            .user_facade()
            .user_insert(username, &password_digest, crate::util::get_timestamp_micros())
            .await?;
        log::info!("Registered user '{}' as '{username}'.", user.user_id);
        Ok(user)
    }

    /// Verify the credentials and return a new session token.
    ///
    /// Failed attempts are tracked per `username` and `client_ip`. Once the
    /// limit is reached, attempts fail with [TrackerErrorKind::LockedOut]
    /// without checking the password.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client_ip: &str,
    ) -> Result<String, TrackerError> {
        self.login_lockout.assert_not_locked_out(username, client_ip)?;
        let user_opt = self.dbp.user_facade().user_by_username(username).await;
        let user = match user_opt {
            Some(user) if self.password_hasher.verify(password, &user.password_digest) => user,
            user_opt => {
                if user_opt.is_none() {
                    self.password_hasher.verify_dummy(password);
                }
                let failures = self.login_lockout.register_failure(username, client_ip);
                log::info!(
                    "Failed login for '{username}' from '{client_ip}'. Failed attempts: {failures}"
                );
                return Err(TrackerErrorKind::AuthenticationFailure
                    .error_with_msg("Invalid username or password."));
            }
        };
        self.login_lockout.register_success(username, client_ip);
        let token = self.session_manager.create_session(&user).await?;
        log::info!("User '{}' logged in from '{client_ip}'.", user.user_id);
        Ok(token)
    }

    /// Resolve the identity behind an optional session token.
    ///
    /// Missing, invalid or revoked tokens yield [ClientIdentity::Anonymous].
    pub async fn authenticate(&self, token: Option<&str>) -> ClientIdentity {
        match token {
            Some(token) => self.session_manager.identity_from_token(token).await,
            None => ClientIdentity::Anonymous,
        }
    }

    /// Return the user behind the identity.
    pub async fn whoami(&self, identity: &ClientIdentity) -> Result<UserRecord, TrackerError> {
        let user_id = Self::assert_authenticated(identity)?;
        self.user_by_id(user_id).await.ok_or_else(|| {
            TrackerErrorKind::AuthenticationFailure.error_with_msg("The account no longer exists.")
        })
    }

    /// End the session of the identity.
    pub async fn logout(&self, identity: &ClientIdentity) -> Result<(), TrackerError> {
        let user_id = Self::assert_authenticated(identity)?;
        self.session_manager.end_session(identity).await;
        log::info!("User '{user_id}' logged out.");
        Ok(())
    }

    /// Remove the account of the identity and end all its sessions.
    ///
    /// Tables, games and comments are kept, but no longer reference the user.
    pub async fn delete_account(&self, identity: &ClientIdentity) -> Result<(), TrackerError> {
        let user_id = Self::assert_authenticated(identity)?;
        self.session_manager.end_all_sessions(user_id).await;
        if !self.dbp.user_facade().user_delete(user_id).await {
            Err(TrackerErrorKind::NotFound.error_with_msg(format!("No user '{user_id}'.")))?;
        }
        log::info!("Deleted account of user '{user_id}'.");
        Ok(())
    }

    /// Return the user by identifier.
    pub async fn user_by_id(&self, user_id: UserId) -> Option<UserRecord> {
        self.dbp.user_facade().user_by_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_validates_input() {
        let tracker = Tracker::for_tests().await;
        let e = tracker.register("", "river-card-7").await.unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::MalformedInput);
        let e = tracker.register("al ice", "river-card-7").await.unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::MalformedInput);
        let e = tracker.register("alice", "12345678").await.unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::InvalidPassword);
        let user = tracker.register("alice", "river-card-7").await.unwrap();
        assert_ne!(user.password_digest, "river-card-7");
        let e = tracker.register("alice", "turn-card-8").await.unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Conflict);
    }

    #[tokio::test]
    async fn login_issues_a_revocable_session() {
        let tracker = Tracker::for_tests().await;
        let user = tracker.register("alice", "river-card-7").await.unwrap();
        let token = tracker
            .login("alice", "river-card-7", "127.0.0.1")
            .await
            .unwrap();
        let identity = tracker.authenticate(Some(&token)).await;
        assert_eq!(identity.user_id(), Some(user.user_id));
        assert_eq!(identity.username(), Some("alice"));
        assert_eq!(
            tracker.authenticate(Some("not-a-token")).await,
            ClientIdentity::Anonymous
        );
        assert_eq!(tracker.authenticate(None).await, ClientIdentity::Anonymous);
        tracker.logout(&identity).await.unwrap();
        assert_eq!(
            tracker.authenticate(Some(&token)).await,
            ClientIdentity::Anonymous
        );
        let e = tracker.logout(&ClientIdentity::Anonymous).await.unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::AuthenticationFailure);
    }

    #[tokio::test]
    async fn repeated_failures_lock_out_the_client() {
        let tracker = Tracker::for_tests().await;
        tracker.register("alice", "river-card-7").await.unwrap();
        for _ in 0..5 {
            let e = tracker
                .login("alice", "wrong-guess", "10.0.0.1")
                .await
                .unwrap_err();
            assert_eq!(e.kind(), &TrackerErrorKind::AuthenticationFailure);
        }
        // Even the correct password is rejected during the lockout.
        let e = tracker
            .login("alice", "river-card-7", "10.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::LockedOut);
        assert!(
            tracker
                .login("alice", "river-card-7", "10.0.0.2")
                .await
                .is_ok()
        );
        // Unknown users are tracked the same way.
        let e = tracker
            .login("mallory", "river-card-7", "10.0.0.3")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::AuthenticationFailure);
    }

    #[tokio::test]
    async fn deleted_accounts_lose_their_sessions() {
        let tracker = Tracker::for_tests().await;
        tracker.register("alice", "river-card-7").await.unwrap();
        let token = tracker
            .login("alice", "river-card-7", "127.0.0.1")
            .await
            .unwrap();
        let identity = tracker.authenticate(Some(&token)).await;
        tracker.delete_account(&identity).await.unwrap();
        assert_eq!(
            tracker.authenticate(Some(&token)).await,
            ClientIdentity::Anonymous
        );
        let e = tracker
            .login("alice", "river-card-7", "127.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::AuthenticationFailure);
    }
}
