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

//! Ephemeral in-memory implementation of [GameFacade].

use crate::InMemoryDatabaseProvider;
use pokerteki_dbp::dbp::facades::GameFacade;
use pokerteki_dbp::tracker::GameId;
use pokerteki_dbp::tracker::GameRecord;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ephemeral in-memory implementation of [GameFacade].
pub struct InMemGameFacade {
    inmem_provider: Arc<InMemoryDatabaseProvider>,
}

impl InMemGameFacade {
    /// Return a new instance.
    pub fn new(inmem_provider: &Arc<InMemoryDatabaseProvider>) -> Self {
        Self {
            inmem_provider: Arc::clone(inmem_provider),
        }
    }

    /// Drop references to removed users. Call with the write lock held.
    fn with_existing_users(&self, mut game: GameRecord) -> GameRecord {
        let provider = &self.inmem_provider;
        game.winner = provider.existing_user(game.winner);
        game.players.retain(|player| provider.users.contains_key(player));
        game
    }

    fn games_at(&self, table_id: TableId) -> impl Iterator<Item = GameRecord> + '_ {
        self.inmem_provider
            .games
            .iter()
            .filter(move |entry| entry.value().table_id == table_id)
            .map(|entry| entry.value().clone())
    }
}

#[async_trait::async_trait]
impl GameFacade for InMemGameFacade {
    async fn game_insert(
        &self,
        table_id: TableId,
        winner: Option<UserId>,
        players: &BTreeSet<UserId>,
    ) -> Result<GameRecord, TrackerError> {
        let provider = &self.inmem_provider;
        let _write_guard = provider.write_lock().await;
        if !provider.tables.contains_key(&table_id) {
            return Err(TrackerErrorKind::NotFound
                .error_with_msg(format!("Table '{table_id}' does not exist.")));
        }
        let game = self.with_existing_users(GameRecord {
            game_id: provider.next_id(),
            table_id,
            winner,
            players: players.clone(),
        });
        provider.games.insert(game.game_id, game.clone());
        Ok(game)
    }

    async fn game_by_id(&self, game_id: GameId) -> Option<GameRecord> {
        self.inmem_provider
            .games
            .get(&game_id)
            .map(|entry| entry.value().clone())
    }

    async fn games_by_table_id(&self, table_id: TableId) -> Vec<GameRecord> {
        self.games_at(table_id).collect()
    }

    async fn players_by_table_id(&self, table_id: TableId) -> BTreeSet<UserId> {
        self.games_at(table_id)
            .flat_map(|game| game.players.into_iter())
            .collect()
    }

    async fn game_update(&self, game: &GameRecord) -> bool {
        let provider = &self.inmem_provider;
        let _write_guard = provider.write_lock().await;
        if !provider.games.contains_key(&game.game_id)
            || !provider.tables.contains_key(&game.table_id)
        {
            return false;
        }
        let game = self.with_existing_users(game.clone());
        provider.games.insert(game.game_id, game);
        true
    }

    async fn game_delete(&self, game_id: GameId) -> bool {
        self.inmem_provider.games.remove(&game_id).is_some()
    }
}
