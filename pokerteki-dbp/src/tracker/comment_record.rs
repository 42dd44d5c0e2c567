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

//! Comment on a table.

use super::TableId;
use super::UserId;

/// Unique comment identifier.
pub type CommentId = u64;

/// A comment on exactly one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentRecord {
    /// Unique comment identifier.
    pub comment_id: CommentId,
    /// Owning table. Deleting the table deletes the comment.
    pub table_id: TableId,
    /// Author. Cleared when the author's account is removed.
    pub creator: Option<UserId>,
    /// Comment text.
    pub comment: String,
    /// Time of the last save in epoch microseconds.
    pub created_at_micros: u64,
}
