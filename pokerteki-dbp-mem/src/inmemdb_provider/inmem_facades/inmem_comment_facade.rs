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

//! Ephemeral in-memory implementation of [CommentFacade].

use crate::InMemoryDatabaseProvider;
use pokerteki_dbp::dbp::facades::CommentFacade;
use pokerteki_dbp::tracker::CommentId;
use pokerteki_dbp::tracker::CommentRecord;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;
use std::sync::Arc;

/// Ephemeral in-memory implementation of [CommentFacade].
pub struct InMemCommentFacade {
    inmem_provider: Arc<InMemoryDatabaseProvider>,
}

impl InMemCommentFacade {
    /// Return a new instance.
    pub fn new(inmem_provider: &Arc<InMemoryDatabaseProvider>) -> Self {
        Self {
            inmem_provider: Arc::clone(inmem_provider),
        }
    }
}

#[async_trait::async_trait]
impl CommentFacade for InMemCommentFacade {
    async fn comment_insert(
        &self,
        table_id: TableId,
        creator: Option<UserId>,
        comment: &str,
        created_at_micros: u64,
    ) -> Result<CommentRecord, TrackerError> {
        let provider = &self.inmem_provider;
        let _write_guard = provider.write_lock().await;
        if !provider.tables.contains_key(&table_id) {
            return Err(TrackerErrorKind::NotFound
                .error_with_msg(format!("Table '{table_id}' does not exist.")));
        }
        let comment = CommentRecord {
            comment_id: provider.next_id(),
            table_id,
            creator: provider.existing_user(creator),
            comment: comment.to_owned(),
            created_at_micros,
        };
        provider.comments.insert(comment.comment_id, comment.clone());
        Ok(comment)
    }

    async fn comment_by_id(&self, comment_id: CommentId) -> Option<CommentRecord> {
        self.inmem_provider
            .comments
            .get(&comment_id)
            .map(|entry| entry.value().clone())
    }

    async fn comments_by_table_id(&self, table_id: TableId) -> Vec<CommentRecord> {
        self.inmem_provider
            .comments
            .iter()
            .filter(|entry| entry.value().table_id == table_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn comment_update(&self, comment: &CommentRecord) -> bool {
        let provider = &self.inmem_provider;
        let _write_guard = provider.write_lock().await;
        if !provider.comments.contains_key(&comment.comment_id)
            || !provider.tables.contains_key(&comment.table_id)
        {
            return false;
        }
        let mut comment = comment.clone();
        comment.creator = provider.existing_user(comment.creator);
        provider.comments.insert(comment.comment_id, comment);
        true
    }

    async fn comment_delete(&self, comment_id: CommentId) -> bool {
        self.inmem_provider.comments.remove(&comment_id).is_some()
    }
}
