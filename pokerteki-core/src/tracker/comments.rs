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

//! Comments on tables.

use super::Tracker;
use super::auth::Action;
use super::auth::ClientIdentity;
use super::auth::ProtectedResource;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
use pokerteki_dbp::tracker::CommentId;
use pokerteki_dbp::tracker::CommentRecord;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;

impl Tracker {
    /// Longest accepted comment.
    const COMMENT_MAX_LEN: usize = 10_000;

    fn validate_comment(comment: &str) -> Result<(), TrackerError> {
        let len = comment.chars().count();
        if comment.trim().is_empty() || len > Self::COMMENT_MAX_LEN {
            Err(TrackerErrorKind::MalformedInput.error_with_msg(format!(
                "The comment must be 1 to {} characters.",
                Self::COMMENT_MAX_LEN
            )))?;
        }
        Ok(())
    }

    /// Comment on the table as the identity.
    ///
    /// Anyone who may read the table may comment on it.
    pub async fn comment_create(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        comment: &str,
    ) -> Result<CommentRecord, TrackerError> {
        let user_id = Self::assert_authenticated(identity)?;
        let table = self.table_by_id(table_id).await?;
        let resource = self.access_control.table_resource(&table).await;
        self.access_control
            .assert_authorized(identity, Action::Read, &resource)?;
        Self::validate_comment(comment)?;
        let comment = self
            .dbp
            .comment_facade()
            .comment_insert(
                table_id,
                Some(user_id),
                comment,
                crate::util::get_timestamp_micros(),
            )
            .await?;
        log::info!(
            "Comment '{}' on table '{table_id}' was created by '{identity}'.",
            comment.comment_id
        );
        Ok(comment)
    }

    /// Replace the text of the comment.
    pub async fn comment_update(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        comment_id: CommentId,
        text: &str,
    ) -> Result<CommentRecord, TrackerError> {
        Self::assert_authenticated(identity)?;
        let mut comment = self.comment_at_table(table_id, comment_id).await?;
        let resource = ProtectedResource::Comment {
            comment: comment.clone(),
        };
        self.access_control
            .assert_authorized(identity, Action::Change, &resource)?;
        Self::validate_comment(text)?;
        comment.comment = text.to_owned();
        comment.created_at_micros = crate::util::get_timestamp_micros();
        if !self.dbp.comment_facade().comment_update(&comment).await {
            Err(TrackerErrorKind::NotFound
                .error_with_msg(format!("No comment '{comment_id}'.")))?;
        }
        log::info!("Comment '{comment_id}' on table '{table_id}' was updated by '{identity}'.");
        Ok(comment)
    }

    /// Delete the comment.
    pub async fn comment_delete(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        comment_id: CommentId,
    ) -> Result<(), TrackerError> {
        Self::assert_authenticated(identity)?;
        let comment = self.comment_at_table(table_id, comment_id).await?;
        let resource = ProtectedResource::Comment { comment };
        self.access_control
            .assert_authorized(identity, Action::Delete, &resource)?;
        if !self.dbp.comment_facade().comment_delete(comment_id).await {
            Err(TrackerErrorKind::NotFound
                .error_with_msg(format!("No comment '{comment_id}'.")))?;
        }
        log::info!("Comment '{comment_id}' on table '{table_id}' was deleted by '{identity}'.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn readers_comment_and_creators_edit() {
        let tracker = Tracker::for_tests().await;
        let dealer = tracker.user_for_tests("dealer").await;
        let player = tracker.user_for_tests("player").await;
        let stranger = tracker.user_for_tests("stranger").await;
        let table = tracker
            .table_create(&dealer, "Friday", None, None)
            .await
            .unwrap();
        tracker
            .game_create(
                &dealer,
                table.table_id,
                None,
                BTreeSet::from([player.user_id().unwrap()]),
            )
            .await
            .unwrap();
        let e = tracker
            .comment_create(&stranger, table.table_id, "Let me in")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        let e = tracker
            .comment_create(&player, table.table_id, "   ")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::MalformedInput);
        let comment = tracker
            .comment_create(&player, table.table_id, "Nice river")
            .await
            .unwrap();
        assert_eq!(comment.creator, player.user_id());
        // Not even the dealer may edit somebody else's comment.
        let e = tracker
            .comment_update(&dealer, table.table_id, comment.comment_id, "Edited")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        let updated = tracker
            .comment_update(&player, table.table_id, comment.comment_id, "Lucky river")
            .await
            .unwrap();
        assert_eq!(updated.comment, "Lucky river");
        assert!(updated.created_at_micros >= comment.created_at_micros);
        let detail = tracker.table_detail(&dealer, table.table_id).await.unwrap();
        assert_eq!(detail.comments, vec![updated]);
        let e = tracker
            .comment_delete(&dealer, table.table_id, comment.comment_id)
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        tracker
            .comment_delete(&player, table.table_id, comment.comment_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn orphaned_comments_are_frozen() {
        let tracker = Tracker::for_tests().await;
        let dealer = tracker.user_for_tests("dealer").await;
        let author = tracker.user_for_tests("author").await;
        let table = tracker
            .table_create(&dealer, "Friday", None, None)
            .await
            .unwrap();
        tracker
            .game_create(
                &dealer,
                table.table_id,
                None,
                BTreeSet::from([author.user_id().unwrap()]),
            )
            .await
            .unwrap();
        let comment = tracker
            .comment_create(&author, table.table_id, "GG")
            .await
            .unwrap();
        tracker.delete_account(&author).await.unwrap();
        let detail = tracker.table_detail(&dealer, table.table_id).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].creator, None);
        let e = tracker
            .comment_delete(&dealer, table.table_id, comment.comment_id)
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        // The former author has no rights left either.
        let e = tracker
            .comment_update(&author, table.table_id, comment.comment_id, "Edited")
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
    }
}
