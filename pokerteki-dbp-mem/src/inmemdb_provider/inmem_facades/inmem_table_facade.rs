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

//! Ephemeral in-memory implementation of [TableFacade].

use crate::InMemoryDatabaseProvider;
use pokerteki_dbp::dbp::facades::TableFacade;
use pokerteki_dbp::tracker::TableId;
use pokerteki_dbp::tracker::TableRecord;
use pokerteki_dbp::tracker::UserId;
use std::sync::Arc;

/// Ephemeral in-memory implementation of [TableFacade].
pub struct InMemTableFacade {
    inmem_provider: Arc<InMemoryDatabaseProvider>,
}

impl InMemTableFacade {
    /// Return a new instance.
    pub fn new(inmem_provider: &Arc<InMemoryDatabaseProvider>) -> Self {
        Self {
            inmem_provider: Arc::clone(inmem_provider),
        }
    }
}

#[async_trait::async_trait]
impl TableFacade for InMemTableFacade {
    async fn table_insert(
        &self,
        name: &str,
        dealer: Option<UserId>,
        creator: Option<UserId>,
        play_date_micros: u64,
    ) -> TableRecord {
        let provider = &self.inmem_provider;
        let _write_guard = provider.write_lock().await;
        let table = TableRecord {
            table_id: provider.next_id(),
            name: name.to_owned(),
            dealer: provider.existing_user(dealer),
            creator: provider.existing_user(creator),
            play_date_micros,
        };
        self.inmem_provider
            .tables
            .insert(table.table_id, table.clone());
        table
    }

    async fn table_by_id(&self, table_id: TableId) -> Option<TableRecord> {
        self.inmem_provider
            .tables
            .get(&table_id)
            .map(|entry| entry.value().clone())
    }

    async fn tables(&self) -> Vec<TableRecord> {
        self.inmem_provider
            .tables
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn table_update(&self, table: &TableRecord) -> bool {
        let provider = &self.inmem_provider;
        let _write_guard = provider.write_lock().await;
        if !provider.tables.contains_key(&table.table_id) {
            return false;
        }
        let mut table = table.clone();
        table.dealer = provider.existing_user(table.dealer);
        table.creator = provider.existing_user(table.creator);
        provider.tables.insert(table.table_id, table);
        true
    }

    async fn table_delete(&self, table_id: TableId) -> bool {
        let _write_guard = self.inmem_provider.write_lock().await;
        if self.inmem_provider.tables.remove(&table_id).is_none() {
            return false;
        }
        // Cascade to games and comments of the table
        for entry in self.inmem_provider.games.iter() {
            if entry.value().table_id == table_id {
                entry.remove();
            }
        }
        for entry in self.inmem_provider.comments.iter() {
            if entry.value().table_id == table_id {
                entry.remove();
            }
        }
        true
    }
}
