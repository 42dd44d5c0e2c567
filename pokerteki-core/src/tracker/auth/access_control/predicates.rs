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

//! Ownership and membership predicates.
//!
//! A relation that is not set never matches any user.

use super::ProtectedResource;
use pokerteki_dbp::tracker::TableRecord;
use pokerteki_dbp::tracker::UserId;

/// Return `true` if the user is the current dealer or the creator of the
/// table.
fn is_table_dealer_or_creator(user_id: UserId, table: &TableRecord) -> bool {
    table.dealer == Some(user_id) || table.creator == Some(user_id)
}

/// Dealer, creator or anyone who played a game at the table.
pub fn can_read_table(user_id: UserId, resource: &ProtectedResource) -> bool {
    match resource {
        ProtectedResource::Table { table, players } => {
            is_table_dealer_or_creator(user_id, table) || players.contains(&user_id)
        }
        _ => false,
    }
}

/// Dealer or creator of the table.
pub fn can_change_table(user_id: UserId, resource: &ProtectedResource) -> bool {
    match resource {
        ProtectedResource::Table { table, .. } => is_table_dealer_or_creator(user_id, table),
        _ => false,
    }
}

/// Dealer of the table the game was played at. The table creator is not
/// considered.
pub fn can_change_game(user_id: UserId, resource: &ProtectedResource) -> bool {
    match resource {
        ProtectedResource::Game { table, .. } => table.dealer == Some(user_id),
        _ => false,
    }
}

/// Creator of the comment.
pub fn can_change_comment(user_id: UserId, resource: &ProtectedResource) -> bool {
    match resource {
        ProtectedResource::Comment { comment } => comment.creator == Some(user_id),
        _ => false,
    }
}
