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

//! Ephemeral in-memory specific database code.

mod inmem_comment_facade;
mod inmem_game_facade;
mod inmem_session_facade;
mod inmem_table_facade;
mod inmem_user_facade;

pub use self::inmem_comment_facade::*;
pub use self::inmem_game_facade::*;
pub use self::inmem_session_facade::*;
pub use self::inmem_table_facade::*;
pub use self::inmem_user_facade::*;
use super::InMemoryDatabaseProvider;
use pokerteki_dbp::dbp::facades::*;
use std::sync::Arc;

/// Ephemeral in-memory specific database code.
pub struct InMemProviderFacades {
    comment_facade: InMemCommentFacade,
    game_facade: InMemGameFacade,
    session_facade: InMemSessionFacade,
    table_facade: InMemTableFacade,
    user_facade: InMemUserFacade,
}

impl InMemProviderFacades {
    /// Return a new instance.
    pub fn new(inmem_provider: &Arc<InMemoryDatabaseProvider>) -> Self {
        Self {
            comment_facade: InMemCommentFacade::new(inmem_provider),
            game_facade: InMemGameFacade::new(inmem_provider),
            session_facade: InMemSessionFacade::new(inmem_provider),
            table_facade: InMemTableFacade::new(inmem_provider),
            user_facade: InMemUserFacade::new(inmem_provider),
        }
    }
}

impl DatabaseProviderFacades for InMemProviderFacades {
    fn comment_facade(&self) -> &dyn CommentFacade {
        &self.comment_facade
    }

    fn game_facade(&self) -> &dyn GameFacade {
        &self.game_facade
    }

    fn session_facade(&self) -> &dyn SessionFacade {
        &self.session_facade
    }

    fn table_facade(&self) -> &dyn TableFacade {
        &self.table_facade
    }

    fn user_facade(&self) -> &dyn UserFacade {
        &self.user_facade
    }
}
