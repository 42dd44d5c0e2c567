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

//! Games played at tables.

use super::Tracker;
use super::auth::Action;
use super::auth::ClientIdentity;
use super::auth::ProtectedResource;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
use pokerteki_dbp::tracker::GameId;
use pokerteki_dbp::tracker::GameRecord;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;
use std::collections::BTreeSet;

impl Tracker {
    /// Record a new game at the table.
    ///
    /// Requires the right to change the table.
    pub async fn game_create(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        winner: Option<UserId>,
        players: BTreeSet<UserId>,
    ) -> Result<GameRecord, TrackerError> {
        Self::assert_authenticated(identity)?;
        let table = self.table_by_id(table_id).await?;
        let resource = self.access_control.table_resource(&table).await;
        self.access_control
            .assert_authorized(identity, Action::Change, &resource)?;
        self.assert_users_exist(players.iter().chain(&winner)).await?;
        let game = self
            .dbp
            .game_facade()
            .game_insert(table_id, winner, &players)
            .await?;
        log::info!(
            "Game '{}' at table '{table_id}' was created by '{identity}'.",
            game.game_id
        );
        Ok(game)
    }

    /// Replace winner and players of the game.
    pub async fn game_update(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        game_id: GameId,
        winner: Option<UserId>,
        players: BTreeSet<UserId>,
    ) -> Result<GameRecord, TrackerError> {
        Self::assert_authenticated(identity)?;
        let (game, table) = self.game_at_table(table_id, game_id).await?;
        let resource = ProtectedResource::Game { game, table };
        self.access_control
            .assert_authorized(identity, Action::Change, &resource)?;
        self.assert_users_exist(players.iter().chain(&winner)).await?;
        let game = GameRecord {
            game_id,
            table_id,
            winner,
            players,
        };
        if !self.dbp.game_facade().game_update(&game).await {
            Err(TrackerErrorKind::NotFound.error_with_msg(format!("No game '{game_id}'.")))?;
        }
        log::info!("Game '{game_id}' at table '{table_id}' was updated by '{identity}'.");
        Ok(game)
    }

    /// Delete the game.
    pub async fn game_delete(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        game_id: GameId,
    ) -> Result<(), TrackerError> {
        Self::assert_authenticated(identity)?;
        let (game, table) = self.game_at_table(table_id, game_id).await?;
        let resource = ProtectedResource::Game { game, table };
        self.access_control
            .assert_authorized(identity, Action::Delete, &resource)?;
        if !self.dbp.game_facade().game_delete(game_id).await {
            Err(TrackerErrorKind::NotFound.error_with_msg(format!("No game '{game_id}'.")))?;
        }
        log::info!("Game '{game_id}' at table '{table_id}' was deleted by '{identity}'.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn games_are_managed_by_the_dealer_only() {
        let tracker = Tracker::for_tests().await;
        let creator = tracker.user_for_tests("creator").await;
        let dealer = tracker.user_for_tests("dealer").await;
        let player = tracker.user_for_tests("player").await;
        let player_id = player.user_id().unwrap();
        let table = tracker
            .table_create(&creator, "Friday", dealer.user_id(), None)
            .await
            .unwrap();
        // The creator may change the table and therefore add games.
        let game = tracker
            .game_create(&creator, table.table_id, None, BTreeSet::from([player_id]))
            .await
            .unwrap();
        // Only the dealer may change or delete games.
        let e = tracker
            .game_update(
                &creator,
                table.table_id,
                game.game_id,
                Some(player_id),
                BTreeSet::from([player_id]),
            )
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        let e = tracker
            .game_delete(&player, table.table_id, game.game_id)
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        let updated = tracker
            .game_update(
                &dealer,
                table.table_id,
                game.game_id,
                Some(player_id),
                BTreeSet::from([player_id]),
            )
            .await
            .unwrap();
        assert_eq!(updated.winner, Some(player_id));
        let e = tracker
            .game_delete(&creator, table.table_id, game.game_id)
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        tracker
            .game_delete(&dealer, table.table_id, game.game_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn game_input_is_validated() {
        let tracker = Tracker::for_tests().await;
        let dealer = tracker.user_for_tests("dealer").await;
        let player = tracker.user_for_tests("player").await;
        let table = tracker
            .table_create(&dealer, "Friday", None, None)
            .await
            .unwrap();
        let other_table = tracker
            .table_create(&dealer, "Saturday", None, None)
            .await
            .unwrap();
        let e = tracker
            .game_create(&dealer, table.table_id, Some(9_999), BTreeSet::new())
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::MalformedInput);
        let e = tracker
            .game_create(&player, table.table_id, None, BTreeSet::new())
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        let e = tracker
            .game_create(&dealer, 9_999, None, BTreeSet::new())
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::NotFound);
        let game = tracker
            .game_create(&dealer, table.table_id, None, BTreeSet::new())
            .await
            .unwrap();
        // A game addressed through another table does not exist.
        let e = tracker
            .game_delete(&dealer, other_table.table_id, game.game_id)
            .await
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::NotFound);
    }
}
