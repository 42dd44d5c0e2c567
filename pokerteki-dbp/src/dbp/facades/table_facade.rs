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

//! Database facade for operations related to tables.

use crate::tracker::TableId;
use crate::tracker::TableRecord;
use crate::tracker::UserId;

/// Database facade for operations related to tables.
#[async_trait::async_trait]
pub trait TableFacade: Send + Sync {
    /// Persist a new table and return the stored record.
    async fn table_insert(
        &self,
        name: &str,
        dealer: Option<UserId>,
        creator: Option<UserId>,
        play_date_micros: u64,
    ) -> TableRecord;

    /// Return the table with the identifier, if present.
    async fn table_by_id(&self, table_id: TableId) -> Option<TableRecord>;

    /// Return all tables ordered by ascending identifier.
    async fn tables(&self) -> Vec<TableRecord>;

    /// Replace a stored table. Return `false` if it no longer exists.
    async fn table_update(&self, table: &TableRecord) -> bool;

    /// Remove the table together with its games and comments. Return `false`
    /// if it did not exist.
    async fn table_delete(&self, table_id: TableId) -> bool;
}
