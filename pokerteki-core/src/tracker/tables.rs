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

//! Poker tables.

use super::Tracker;
use super::auth::Action;
use super::auth::ClientIdentity;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
use pokerteki_dbp::tracker::CommentRecord;
use pokerteki_dbp::tracker::GameRecord;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TableRecord;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use pokerteki_dbp::tracker::UserId;

/// A table with its games and comments.
#[derive(Debug, Clone)]
pub struct TableDetail {
    /// The table.
    pub table: TableRecord,
    /// Games played at the table.
    pub games: Vec<GameRecord>,
    /// Comments on the table.
    pub comments: Vec<CommentRecord>,
}

/// Requested changes to a table. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TableUpdate {
    /// New table name.
    pub name: Option<String>,
    /// New dealer.
    pub dealer: Option<UserId>,
    /// New time of play in epoch microseconds.
    pub play_date_micros: Option<u64>,
}

impl Tracker {
    /// Longest accepted table name.
    const TABLE_NAME_MAX_LEN: usize = 255;

    /// Return the trimmed name or error out with
    /// [TrackerErrorKind::MalformedInput].
    fn validate_table_name(name: &str) -> Result<String, TrackerError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > Self::TABLE_NAME_MAX_LEN {
            Err(TrackerErrorKind::MalformedInput.error_with_msg(format!(
                "The table name must be 1 to {} characters.",
                Self::TABLE_NAME_MAX_LEN
            )))?;
        }
        Ok(name.to_owned())
    }

    /// Return the tables that the identity may read.
    pub async fn tables(&self, identity: &ClientIdentity) -> Result<Vec<TableRecord>, TrackerError> {
        Self::assert_authenticated(identity)?;
        Ok(self.access_control.readable_tables(identity).await)
    }

    /// Return the table with its games and comments.
    pub async fn table_detail(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
    ) -> Result<TableDetail, TrackerError> {
        Self::assert_authenticated(identity)?;
        let table = self.table_by_id(table_id).await?;
        let resource = self.access_control.table_resource(&table).await;
        self.access_control
            .assert_authorized(identity, Action::Read, &resource)?;
        let games = self.dbp.game_facade().games_by_table_id(table_id).await;
        let comments = self.dbp.comment_facade().comments_by_table_id(table_id).await;
        Ok(TableDetail {
            table,
            games,
            comments,
        })
    }

    /// Create a new table with the identity as creator.
    ///
    /// The dealer defaults to the creator and the time of play to now.
    pub async fn table_create(
        &self,
        identity: &ClientIdentity,
        name: &str,
        dealer: Option<UserId>,
        play_date_micros: Option<u64>,
    ) -> Result<TableRecord, TrackerError> {
        let user_id = Self::assert_authenticated(identity)?;
        let name = Self::validate_table_name(name)?;
        self.assert_users_exist(&dealer).await?;
        let table = self
            .dbp
            .table_facade()
            .table_insert(
                &name,
                Some(dealer.unwrap_or(user_id)),
                Some(user_id),
                play_date_micros.unwrap_or_else(crate::util::get_timestamp_micros),
            )
            .await;
        log::info!(
            "Table '{}' was created by '{identity}'.",
            table.table_id
        );
        Ok(table)
    }

    /// Update name, dealer or time of play of the table.
    pub async fn table_update(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
        update: TableUpdate,
    ) -> Result<TableRecord, TrackerError> {
        Self::assert_authenticated(identity)?;
        let mut table = self.table_by_id(table_id).await?;
        let resource = self.access_control.table_resource(&table).await;
        self.access_control
            .assert_authorized(identity, Action::Change, &resource)?;
        if let Some(name) = &update.name {
            table.name = Self::validate_table_name(name)?;
        }
        if let Some(dealer) = update.dealer {
            self.assert_users_exist(&[dealer]).await?;
            table.dealer = Some(dealer);
        }
        if let Some(play_date_micros) = update.play_date_micros {
            table.play_date_micros = play_date_micros;
        }
        if !self.dbp.table_facade().table_update(&table).await {
            Err(TrackerErrorKind::NotFound.error_with_msg(format!("No table '{table_id}'.")))?;
        }
        log::info!("Table '{table_id}' was updated by '{identity}'.");
        Ok(table)
    }

    /// Delete the table together with its games and comments.
    pub async fn table_delete(
        &self,
        identity: &ClientIdentity,
        table_id: TableId,
    ) -> Result<(), TrackerError> {
        Self::assert_authenticated(identity)?;
        let table = self.table_by_id(table_id).await?;
        let resource = self.access_control.table_resource(&table).await;
        self.access_control
            .assert_authorized(identity, Action::Delete, &resource)?;
        if !self.dbp.table_facade().table_delete(table_id).await {
            Err(TrackerErrorKind::NotFound.error_with_msg(format!("No table '{table_id}'.")))?;
        }
        log::info!("Table '{table_id}' was deleted by '{identity}'.");
        Ok(())
    }
}
