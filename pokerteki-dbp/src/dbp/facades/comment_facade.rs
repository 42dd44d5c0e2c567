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

//! Database facade for operations related to comments.

use crate::tracker::CommentId;
use crate::tracker::CommentRecord;
use crate::tracker::TableId;
use crate::tracker::TrackerError;
use crate::tracker::UserId;

/// Database facade for operations related to comments.
#[async_trait::async_trait]
pub trait CommentFacade: Send + Sync {
    /// Persist a new comment on the table and return the stored record.
    ///
    /// Errors out with [crate::tracker::TrackerErrorKind::NotFound] if the
    /// table does not exist.
    async fn comment_insert(
        &self,
        table_id: TableId,
        creator: Option<UserId>,
        comment: &str,
        created_at_micros: u64,
    ) -> Result<CommentRecord, TrackerError>;

    /// Return the comment with the identifier, if present.
    async fn comment_by_id(&self, comment_id: CommentId) -> Option<CommentRecord>;

    /// Return all comments on the table ordered by ascending identifier.
    async fn comments_by_table_id(&self, table_id: TableId) -> Vec<CommentRecord>;

    /// Replace a stored comment. Return `false` if it no longer exists.
    async fn comment_update(&self, comment: &CommentRecord) -> bool;

    /// Remove the comment. Return `false` if it did not exist.
    async fn comment_delete(&self, comment_id: CommentId) -> bool;
}
