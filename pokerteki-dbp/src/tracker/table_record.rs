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

//! Poker table.

use super::UserId;

/// Unique table identifier.
pub type TableId = u64;

/// A poker table.
///
/// `dealer` and `creator` are cleared when the referenced user is removed. The
/// table itself is never deleted as a consequence of that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRecord {
    /// Unique table identifier.
    pub table_id: TableId,
    /// Display name.
    pub name: String,
    /// User currently administering the table.
    pub dealer: Option<UserId>,
    /// User that created the table.
    pub creator: Option<UserId>,
    /// Time of play (creation) in epoch microseconds.
    pub play_date_micros: u64,
}
