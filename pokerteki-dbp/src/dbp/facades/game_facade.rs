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

//! Database facade for operations related to games.

use crate::tracker::GameId;
use crate::tracker::GameRecord;
use crate::tracker::TableId;
use crate::tracker::TrackerError;
use crate::tracker::UserId;
use std::collections::BTreeSet;

/// Database facade for operations related to games.
#[async_trait::async_trait]
pub trait GameFacade: Send + Sync {
    /// Persist a new game at the table and return the stored record.
    ///
    /// Errors out with [crate::tracker::TrackerErrorKind::NotFound] if the
    /// table does not exist.
    async fn game_insert(
        &self,
        table_id: TableId,
        winner: Option<UserId>,
        players: &BTreeSet<UserId>,
    ) -> Result<GameRecord, TrackerError>;

    /// Return the game with the identifier, if present.
    async fn game_by_id(&self, game_id: GameId) -> Option<GameRecord>;

    /// Return all games of the table ordered by ascending identifier.
    async fn games_by_table_id(&self, table_id: TableId) -> Vec<GameRecord>;

    /// Return the union of the player sets of all games at the table.
    async fn players_by_table_id(&self, table_id: TableId) -> BTreeSet<UserId>;

    /// Replace a stored game. Return `false` if it no longer exists.
    async fn game_update(&self, game: &GameRecord) -> bool;

    /// Remove the game. Return `false` if it did not exist.
    async fn game_delete(&self, game_id: GameId) -> bool;
}
