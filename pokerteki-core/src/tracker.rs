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

//! Poker tracker core.

pub mod auth {
    //! Authentication and authorization

    mod access_control;
    mod client_identity;
    mod login_lockout;
    mod password_hasher;
    mod password_policy;
    mod session_manager;

    pub use self::access_control::*;
    pub use self::client_identity::ClientIdentity;
    pub use self::login_lockout::LoginLockout;
    pub use self::password_hasher::PasswordHasher;
    pub use self::password_policy::PasswordPolicy;
    pub use self::session_manager::SessionManager;
}
mod accounts;
mod comments;
mod games;
mod tables;

pub use self::tables::TableDetail;
pub use self::tables::TableUpdate;
use crate::conf::AppConfig;
use crate::conf::BackendImplementation;
use auth::AccessControl;
use auth::ClientIdentity;
use auth::LoginLockout;
use auth::PasswordHasher;
use auth::PasswordPolicy;
use auth::SessionManager;
use pokerteki_dbp::dbp::DatabaseProvider;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
pub use pokerteki_dbp::tracker::*;
use pokerteki_dbp_mem::InMemoryDatabaseProvider;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/** Poker tracker.

The tracker owns the persistence and gates every operation on tables, games and
comments through [AccessControl].
*/
pub struct Tracker {
    /// Thread safe boolean used to indicate application readyness.
    health_ready: AtomicBool,
    /// The database provider
    dbp: Arc<DatabaseProvider>,
    // For checking authorization.
    access_control: Arc<AccessControl>,
    // Issues and validates session tokens.
    session_manager: Arc<SessionManager>,
    // Brute force protection of logins.
    login_lockout: Arc<LoginLockout>,
    password_hasher: PasswordHasher,
    password_policy: PasswordPolicy,
}

impl Tracker {
    /// Interval between purges of expired sessions.
    const SESSION_PURGE_INTERVAL_MICROS: u64 = 60_000_000;

    /// Return a new instance.
    pub async fn new(app_config: &Arc<AppConfig>) -> Result<Arc<Self>, TrackerError> {
        let dbp = match app_config.backend.implementation() {
            BackendImplementation::Mem => {
                let inmem_provider = InMemoryDatabaseProvider::new().await;
                Arc::new(inmem_provider.as_database_provider())
            }
        };
        let access_control = AccessControl::new(&dbp);
        let session_manager = SessionManager::new(app_config, &dbp);
        let login_lockout = LoginLockout::new(
            app_config.lockout.failure_limit(),
            app_config.lockout.cool_off_micros(),
            app_config.lockout.is_reset_on_success(),
        )
        .await;
        let password_hasher = PasswordHasher::new(app_config.password.digest_rounds());
        let password_policy = PasswordPolicy::new(app_config.password.min_length());
        log::info!("Tracker dependencies have been created.");
        Ok(Arc::new(Self {
            health_ready: AtomicBool::new(false),
            dbp,
            access_control,
            session_manager,
            login_lockout,
            password_hasher,
            password_policy,
        })
        .init(app_config))
    }

    /// Initialize background tasks.
    fn init(self: Arc<Self>, app_config: &Arc<AppConfig>) -> Arc<Self> {
        let self_clone = Arc::clone(&self);
        let startup_ts_micros = app_config.startup_ts_micros();
        tokio::spawn(async move { self_clone.post_init(startup_ts_micros).await });
        self
    }

    /// Async tasks to perform after this [Tracker] has been started.
    async fn post_init(&self, startup_ts_micros: u64) {
        let ready_ts_micros = crate::util::get_timestamp_micros();
        self.health_ready.store(true, Ordering::Relaxed);
        log::info!(
            "Tracker is ready after {} micros.",
            ready_ts_micros.saturating_sub(startup_ts_micros)
        );
        loop {
            tokio::time::sleep(tokio::time::Duration::from_micros(
                Self::SESSION_PURGE_INTERVAL_MICROS,
            ))
            .await;
            self.dbp
                .session_facade()
                .sessions_purge_expired(crate::util::get_timestamp_micros())
                .await;
        }
    }

    /// Return `true` if the app has started.
    pub fn is_health_started(&self) -> bool {
        self.health_ready.load(Ordering::Relaxed)
    }

    /// Return `true` if the app is ready to recieve requests.
    pub fn is_health_ready(&self) -> bool {
        self.health_ready.load(Ordering::Relaxed) && self.is_health_live()
    }

    /// Return `true` if the app is functioning as expected and `false` if it
    /// needs to be restarted.
    pub fn is_health_live(&self) -> bool {
        true
    }

    /// Error out with [TrackerErrorKind::AuthenticationFailure] for anonymous
    /// identities and return the user identifier otherwise.
    fn assert_authenticated(identity: &ClientIdentity) -> Result<UserId, TrackerError> {
        identity.user_id().ok_or_else(|| {
            TrackerErrorKind::AuthenticationFailure.error_with_msg("Authentication is required.")
        })
    }

    /// Return the table or error out with [TrackerErrorKind::NotFound].
    async fn table_by_id(&self, table_id: TableId) -> Result<TableRecord, TrackerError> {
        self.dbp
            .table_facade()
            .table_by_id(table_id)
            .await
            .ok_or_else(|| {
                TrackerErrorKind::NotFound.error_with_msg(format!("No table '{table_id}'."))
            })
    }

    /// Return the game together with its table.
    ///
    /// A game that does not belong to `table_id` is reported as not found.
    async fn game_at_table(
        &self,
        table_id: TableId,
        game_id: GameId,
    ) -> Result<(GameRecord, TableRecord), TrackerError> {
        let game = self
            .dbp
            .game_facade()
            .game_by_id(game_id)
            .await
            .filter(|game| game.table_id == table_id)
            .ok_or_else(|| {
                TrackerErrorKind::NotFound
                    .error_with_msg(format!("No game '{game_id}' at table '{table_id}'."))
            })?;
        let table = self.table_by_id(table_id).await?;
        Ok((game, table))
    }

    /// Return the comment.
    ///
    /// A comment that does not belong to `table_id` is reported as not found.
    async fn comment_at_table(
        &self,
        table_id: TableId,
        comment_id: CommentId,
    ) -> Result<CommentRecord, TrackerError> {
        self.dbp
            .comment_facade()
            .comment_by_id(comment_id)
            .await
            .filter(|comment| comment.table_id == table_id)
            .ok_or_else(|| {
                TrackerErrorKind::NotFound
                    .error_with_msg(format!("No comment '{comment_id}' at table '{table_id}'."))
            })
    }

    /// Error out with [TrackerErrorKind::MalformedInput] unless every user in
    /// `user_ids` exists.
    async fn assert_users_exist(
        &self,
        user_ids: impl IntoIterator<Item = &UserId>,
    ) -> Result<(), TrackerError> {
        for user_id in user_ids {
            if self.dbp.user_facade().user_by_id(*user_id).await.is_none() {
                Err(TrackerErrorKind::MalformedInput
                    .error_with_msg(format!("Unknown user '{user_id}'.")))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Tracker {
    /// Return an instance backed by an empty in-memory database.
    pub(crate) async fn for_tests() -> Arc<Self> {
        let _ = env_logger::builder().is_test(true).try_init();
        let app_config = AppConfig::with_overrides(
            env!("CARGO_PKG_NAME"),
            crate::util::get_timestamp_micros(),
            &[("password.digestrounds", "10")],
        )
        .unwrap();
        Tracker::new(&Arc::new(app_config)).await.unwrap()
    }

    /// Register a user and return an identity as if the user had logged in.
    pub(crate) async fn user_for_tests(&self, username: &str) -> ClientIdentity {
        let user = self.register(username, "river-card-7").await.unwrap();
        ClientIdentity::from_session(user.user_id, &user.username, "test-session")
    }
}
