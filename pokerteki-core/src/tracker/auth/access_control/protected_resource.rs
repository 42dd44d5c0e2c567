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

//! Relationship snapshot of a protected resource.

use super::ResourceType;
use pokerteki_dbp::tracker::CommentRecord;
use pokerteki_dbp::tracker::GameRecord;
use pokerteki_dbp::tracker::TableRecord;
use pokerteki_dbp::tracker::UserId;
use std::collections::BTreeSet;

/// A resolved resource with the relations needed to decide access.
///
/// The snapshot is read once per request and never written back.
#[derive(Debug, Clone)]
pub enum ProtectedResource {
    /// A table with the union of the player sets of all its games.
    Table {
        /// The table.
        table: TableRecord,
        /// Users that played any game at the table.
        players: BTreeSet<UserId>,
    },
    /// A game with its owning table.
    Game {
        /// The game.
        game: GameRecord,
        /// The table the game was played at.
        table: TableRecord,
    },
    /// A comment.
    Comment {
        /// The comment.
        comment: CommentRecord,
    },
}

impl std::fmt::Display for ProtectedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table { table, .. } => write!(f, "/table/{}", table.table_id),
            Self::Game { game, table } => {
                write!(f, "/table/{}/game/{}", table.table_id, game.game_id)
            }
            Self::Comment { comment } => {
                write!(f, "/table/{}/comment/{}", comment.table_id, comment.comment_id)
            }
        }
    }
}

impl ProtectedResource {
    /// Return the type used for looking up predicates.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Table { .. } => ResourceType::Table,
            Self::Game { .. } => ResourceType::Game,
            Self::Comment { .. } => ResourceType::Comment,
        }
    }
}
