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

//! Ephemeral in-memory implementation of [UserFacade].

use crate::InMemoryDatabaseProvider;
use pokerteki_dbp::dbp::facades::UserFacade;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;
use pokerteki_dbp::tracker::UserRecord;
use std::sync::Arc;

/// Ephemeral in-memory implementation of [UserFacade].
pub struct InMemUserFacade {
    inmem_provider: Arc<InMemoryDatabaseProvider>,
}

impl InMemUserFacade {
    /// Return a new instance.
    pub fn new(inmem_provider: &Arc<InMemoryDatabaseProvider>) -> Self {
        Self {
            inmem_provider: Arc::clone(inmem_provider),
        }
    }

    /// Clear all references to the user from tables, games and comments.
    fn detach_user(&self, user_id: UserId) {
        let provider = &self.inmem_provider;
        for entry in provider.tables.iter() {
            let table = entry.value();
            if table.dealer == Some(user_id) || table.creator == Some(user_id) {
                let mut table = table.clone();
                table.dealer = table.dealer.filter(|dealer| *dealer != user_id);
                table.creator = table.creator.filter(|creator| *creator != user_id);
                provider.tables.insert(table.table_id, table);
            }
        }
        for entry in provider.games.iter() {
            let game = entry.value();
            if game.winner == Some(user_id) || game.players.contains(&user_id) {
                let mut game = game.clone();
                game.winner = game.winner.filter(|winner| *winner != user_id);
                game.players.remove(&user_id);
                provider.games.insert(game.game_id, game);
            }
        }
        for entry in provider.comments.iter() {
            let comment = entry.value();
            if comment.creator == Some(user_id) {
                let mut comment = comment.clone();
                comment.creator = None;
                provider.comments.insert(comment.comment_id, comment);
            }
        }
    }
}

#[async_trait::async_trait]
impl UserFacade for InMemUserFacade {
    async fn user_insert(
        &self,
        username: &str,
        password_digest: &str,
        joined_ts_micros: u64,
    ) -> Result<UserRecord, TrackerError> {
        let user_id = self.inmem_provider.next_id();
        let claimed_by = *self
            .inmem_provider
            .user_id_by_username
            .get_or_insert(username.to_owned(), user_id)
            .value();
        if claimed_by != user_id {
            return Err(TrackerErrorKind::Conflict
                .error_with_msg(format!("Username '{username}' is already taken.")));
        }
        let user = UserRecord {
            user_id,
            username: username.to_owned(),
            password_digest: password_digest.to_owned(),
            joined_ts_micros,
        };
        self.inmem_provider.users.insert(user_id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, user_id: UserId) -> Option<UserRecord> {
        self.inmem_provider
            .users
            .get(&user_id)
            .map(|entry| entry.value().clone())
    }

    async fn user_by_username(&self, username: &str) -> Option<UserRecord> {
        let user_id = *self
            .inmem_provider
            .user_id_by_username
            .get(username)?
            .value();
        self.user_by_id(user_id).await
    }

    async fn user_delete(&self, user_id: UserId) -> bool {
        let _write_guard = self.inmem_provider.write_lock().await;
        let Some(entry) = self.inmem_provider.users.remove(&user_id) else {
            return false;
        };
        self.inmem_provider
            .user_id_by_username
            .remove(&entry.value().username);
        self.detach_user(user_id);
        true
    }
}
