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

//! Ephemeral in-memory implementation of [SessionFacade].

use crate::InMemoryDatabaseProvider;
use pokerteki_dbp::dbp::facades::SessionFacade;
use pokerteki_dbp::tracker::UserId;
use std::sync::Arc;

/// Ephemeral in-memory implementation of [SessionFacade].
pub struct InMemSessionFacade {
    inmem_provider: Arc<InMemoryDatabaseProvider>,
}

impl InMemSessionFacade {
    /// Return a new instance.
    pub fn new(inmem_provider: &Arc<InMemoryDatabaseProvider>) -> Self {
        Self {
            inmem_provider: Arc::clone(inmem_provider),
        }
    }
}

#[async_trait::async_trait]
impl SessionFacade for InMemSessionFacade {
    async fn session_insert(&self, session_id: &str, user_id: UserId, expires_micros: u64) {
        self.inmem_provider
            .sessions
            .insert(session_id.to_owned(), (user_id, expires_micros));
    }

    async fn session_user_id(&self, session_id: &str, now_micros: u64) -> Option<UserId> {
        let entry = self.inmem_provider.sessions.get(session_id)?;
        let (user_id, expires_micros) = *entry.value();
        if expires_micros < now_micros {
            entry.remove();
            return None;
        }
        Some(user_id)
    }

    async fn session_delete(&self, session_id: &str) -> bool {
        self.inmem_provider.sessions.remove(session_id).is_some()
    }

    async fn sessions_delete_by_user_id(&self, user_id: UserId) {
        for entry in self.inmem_provider.sessions.iter() {
            if entry.value().0 == user_id {
                entry.remove();
            }
        }
    }

    async fn sessions_purge_expired(&self, now_micros: u64) {
        for entry in self.inmem_provider.sessions.iter() {
            if entry.value().1 < now_micros {
                entry.remove();
            }
        }
    }
}
