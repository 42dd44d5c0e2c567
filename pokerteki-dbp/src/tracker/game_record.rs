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

//! Game played at a table.

use super::TableId;
use super::UserId;
use std::collections::BTreeSet;

/// Unique game identifier.
pub type GameId = u64;

/// A game played at exactly one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    /// Unique game identifier.
    pub game_id: GameId,
    /// Owning table. Deleting the table deletes the game.
    pub table_id: TableId,
    /// The winning user, if any.
    pub winner: Option<UserId>,
    /// Users that took part in the game.
    pub players: BTreeSet<UserId>,
}
