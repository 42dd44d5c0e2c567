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

//! Ephemeral in-memory implementation of [DatabaseProvider].

mod inmem_facades;

use self::inmem_facades::InMemProviderFacades;
use crossbeam_skiplist::SkipMap;
use pokerteki_dbp::dbp::DatabaseProvider;
use pokerteki_dbp::tracker::CommentId;
use pokerteki_dbp::tracker::CommentRecord;
use pokerteki_dbp::tracker::GameId;
use pokerteki_dbp::tracker::GameRecord;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TableRecord;
use pokerteki_dbp::tracker::UserId;
use pokerteki_dbp::tracker::UserRecord;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::MutexGuard;

/// Ephemeral in-memory implementation of [DatabaseProvider].
pub struct InMemoryDatabaseProvider {
    sequence: AtomicU64,
    users: SkipMap<UserId, UserRecord>,
    user_id_by_username: SkipMap<String, UserId>,
    tables: SkipMap<TableId, TableRecord>,
    games: SkipMap<GameId, GameRecord>,
    comments: SkipMap<CommentId, CommentRecord>,
    /// Session identifier to user and expiration time in epoch microseconds.
    sessions: SkipMap<String, (UserId, u64)>,
    /// Held by writes of tables, games, comments and user removal, so that
    /// cascades and reference checks see a consistent state.
    write_lock: Mutex<()>,
}

impl InMemoryDatabaseProvider {
    /// Return a new instance.
    pub async fn new() -> Arc<Self> {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Using in-mem db provider.");
        }
        Arc::new(Self {
            sequence: AtomicU64::default(),
            users: SkipMap::default(),
            user_id_by_username: SkipMap::default(),
            tables: SkipMap::default(),
            games: SkipMap::default(),
            comments: SkipMap::default(),
            sessions: SkipMap::default(),
            write_lock: Mutex::new(()),
        })
    }

    /// Get [DatabaseProvider] instance.
    pub fn as_database_provider(self: &Arc<Self>) -> DatabaseProvider {
        DatabaseProvider::new(Arc::new(InMemProviderFacades::new(self)))
    }

    /// Return the next identifier. Identifiers are shared by all record types
    /// and start at 1.
    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Wait for exclusive write access.
    async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Return the reference if the user still exists. Call with the write lock
    /// held.
    fn existing_user(&self, user_id: Option<UserId>) -> Option<UserId> {
        user_id.filter(|user_id| self.users.contains_key(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
    use pokerteki_dbp::tracker::TrackerErrorKind;
    use std::collections::BTreeSet;

    async fn new_dbp() -> DatabaseProvider {
        InMemoryDatabaseProvider::new().await.as_database_provider()
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let dbp = new_dbp().await;
        let alice = dbp.user_facade().user_insert("alice", "x", 1).await.unwrap();
        let res = dbp.user_facade().user_insert("alice", "y", 2).await;
        assert_eq!(res.err().map(|e| *e.kind()), Some(TrackerErrorKind::Conflict));
        let found = dbp.user_facade().user_by_username("alice").await.unwrap();
        assert_eq!(found.user_id, alice.user_id);
        assert_eq!(found.password_digest, "x");
    }

    #[tokio::test]
    async fn deleting_table_cascades_to_games_and_comments() {
        let dbp = new_dbp().await;
        let keep = dbp.table_facade().table_insert("keep", None, None, 1).await;
        let gone = dbp.table_facade().table_insert("gone", None, None, 1).await;
        let dave = dbp.user_facade().user_insert("dave", "x", 1).await.unwrap();
        let players = BTreeSet::from([dave.user_id]);
        let kept_game = dbp
            .game_facade()
            .game_insert(keep.table_id, None, &players)
            .await
            .unwrap();
        dbp.game_facade()
            .game_insert(gone.table_id, None, &players)
            .await
            .unwrap();
        dbp.comment_facade()
            .comment_insert(gone.table_id, None, "gg", 1)
            .await
            .unwrap();
        assert!(dbp.table_facade().table_delete(gone.table_id).await);
        assert!(!dbp.table_facade().table_delete(gone.table_id).await);
        assert!(dbp.game_facade().games_by_table_id(gone.table_id).await.is_empty());
        assert!(dbp.comment_facade().comments_by_table_id(gone.table_id).await.is_empty());
        assert_eq!(
            dbp.game_facade().games_by_table_id(keep.table_id).await,
            vec![kept_game]
        );
        let res = dbp
            .game_facade()
            .game_insert(gone.table_id, None, &players)
            .await;
        assert_eq!(res.err().map(|e| *e.kind()), Some(TrackerErrorKind::NotFound));
    }

    #[tokio::test]
    async fn deleting_user_clears_references() {
        let dbp = new_dbp().await;
        let bob = dbp.user_facade().user_insert("bob", "x", 1).await.unwrap();
        let carol = dbp.user_facade().user_insert("carol", "x", 1).await.unwrap();
        let table = dbp
            .table_facade()
            .table_insert("friday", Some(bob.user_id), Some(bob.user_id), 1)
            .await;
        let game = dbp
            .game_facade()
            .game_insert(
                table.table_id,
                Some(bob.user_id),
                &BTreeSet::from([bob.user_id, carol.user_id]),
            )
            .await
            .unwrap();
        let comment = dbp
            .comment_facade()
            .comment_insert(table.table_id, Some(bob.user_id), "nh", 1)
            .await
            .unwrap();
        dbp.session_facade().session_insert("s1", bob.user_id, 100).await;
        assert!(dbp.user_facade().user_delete(bob.user_id).await);
        dbp.session_facade().sessions_delete_by_user_id(bob.user_id).await;

        let table = dbp.table_facade().table_by_id(table.table_id).await.unwrap();
        assert_eq!(table.dealer, None);
        assert_eq!(table.creator, None);
        let game = dbp.game_facade().game_by_id(game.game_id).await.unwrap();
        assert_eq!(game.winner, None);
        assert_eq!(game.players, BTreeSet::from([carol.user_id]));
        let comment = dbp
            .comment_facade()
            .comment_by_id(comment.comment_id)
            .await
            .unwrap();
        assert_eq!(comment.creator, None);
        assert!(dbp.user_facade().user_by_username("bob").await.is_none());
        assert!(dbp.session_facade().session_user_id("s1", 1).await.is_none());
    }

    #[tokio::test]
    async fn stale_writes_do_not_restore_removed_users() {
        let dbp = new_dbp().await;
        let bob = dbp.user_facade().user_insert("bob", "x", 1).await.unwrap();
        let carol = dbp.user_facade().user_insert("carol", "x", 1).await.unwrap();
        let table = dbp
            .table_facade()
            .table_insert("friday", Some(bob.user_id), Some(carol.user_id), 1)
            .await;
        let game = dbp
            .game_facade()
            .game_insert(
                table.table_id,
                Some(bob.user_id),
                &BTreeSet::from([bob.user_id, carol.user_id]),
            )
            .await
            .unwrap();
        let comment = dbp
            .comment_facade()
            .comment_insert(table.table_id, Some(bob.user_id), "nh", 1)
            .await
            .unwrap();
        assert!(dbp.user_facade().user_delete(bob.user_id).await);

        // Records read before the removal are written back.
        assert!(dbp.table_facade().table_update(&table).await);
        assert!(dbp.game_facade().game_update(&game).await);
        assert!(dbp.comment_facade().comment_update(&comment).await);
        let table = dbp.table_facade().table_by_id(table.table_id).await.unwrap();
        assert_eq!(table.dealer, None);
        assert_eq!(table.creator, Some(carol.user_id));
        let game = dbp.game_facade().game_by_id(game.game_id).await.unwrap();
        assert_eq!(game.winner, None);
        assert_eq!(game.players, BTreeSet::from([carol.user_id]));
        let comment = dbp
            .comment_facade()
            .comment_by_id(comment.comment_id)
            .await
            .unwrap();
        assert_eq!(comment.creator, None);

        let fresh = dbp
            .game_facade()
            .game_insert(table.table_id, Some(bob.user_id), &BTreeSet::from([bob.user_id]))
            .await
            .unwrap();
        assert_eq!(fresh.winner, None);
        assert!(fresh.players.is_empty());
    }

    #[tokio::test]
    async fn updates_of_records_at_a_removed_table_are_rejected() {
        let dbp = new_dbp().await;
        let table = dbp.table_facade().table_insert("t", None, None, 1).await;
        let game = dbp
            .game_facade()
            .game_insert(table.table_id, None, &BTreeSet::new())
            .await
            .unwrap();
        let comment = dbp
            .comment_facade()
            .comment_insert(table.table_id, None, "gg", 1)
            .await
            .unwrap();
        assert!(dbp.table_facade().table_delete(table.table_id).await);
        assert!(!dbp.table_facade().table_update(&table).await);
        assert!(!dbp.game_facade().game_update(&game).await);
        assert!(!dbp.comment_facade().comment_update(&comment).await);
        assert!(dbp.game_facade().game_by_id(game.game_id).await.is_none());
        assert!(dbp.comment_facade().comment_by_id(comment.comment_id).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn table_removal_leaves_no_orphans_under_concurrent_inserts() {
        let dbp = Arc::new(new_dbp().await);
        for _ in 0..20 {
            let table = dbp.table_facade().table_insert("t", None, None, 1).await;
            let table_id = table.table_id;
            let mut handles = Vec::new();
            for i in 0..16 {
                let dbp = Arc::clone(&dbp);
                handles.push(tokio::spawn(async move {
                    if i % 2 == 0 {
                        let _ = dbp
                            .game_facade()
                            .game_insert(table_id, None, &BTreeSet::new())
                            .await;
                    } else {
                        let _ = dbp
                            .comment_facade()
                            .comment_insert(table_id, None, "gl", 1)
                            .await;
                    }
                }));
            }
            let remover = {
                let dbp = Arc::clone(&dbp);
                tokio::spawn(async move { dbp.table_facade().table_delete(table_id).await })
            };
            for handle in handles {
                handle.await.unwrap();
            }
            assert!(remover.await.unwrap());
            assert!(dbp.game_facade().games_by_table_id(table_id).await.is_empty());
            assert!(dbp.comment_facade().comments_by_table_id(table_id).await.is_empty());
        }
    }

    #[tokio::test]
    async fn expired_sessions_are_not_returned() {
        let dbp = new_dbp().await;
        dbp.session_facade().session_insert("s1", 3, 100).await;
        assert_eq!(dbp.session_facade().session_user_id("s1", 99).await, Some(3));
        assert_eq!(dbp.session_facade().session_user_id("s1", 101).await, None);
        assert!(!dbp.session_facade().session_delete("s1").await);
    }

    #[tokio::test]
    async fn players_by_table_is_union_of_game_players() {
        let dbp = new_dbp().await;
        let table = dbp.table_facade().table_insert("t", None, None, 1).await;
        let mut ids = Vec::new();
        for username in ["ann", "ben", "cat"] {
            let user = dbp.user_facade().user_insert(username, "x", 1).await.unwrap();
            ids.push(user.user_id);
        }
        let facade = dbp.game_facade();
        facade
            .game_insert(table.table_id, None, &BTreeSet::from([ids[0], ids[1]]))
            .await
            .unwrap();
        facade
            .game_insert(table.table_id, Some(ids[2]), &BTreeSet::from([ids[1], ids[2]]))
            .await
            .unwrap();
        assert_eq!(
            facade.players_by_table_id(table.table_id).await,
            BTreeSet::from_iter(ids)
        );
    }
}
