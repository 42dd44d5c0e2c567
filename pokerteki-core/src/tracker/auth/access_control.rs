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

//! Tracker access control.

mod action;
mod policy_engine;
mod policy_engine_local;
mod predicates;
mod protected_resource;

pub use self::action::*;
pub use self::policy_engine::*;
pub use self::policy_engine_local::*;
pub use self::protected_resource::*;
use super::ClientIdentity;
use pokerteki_dbp::dbp::DatabaseProvider;
use pokerteki_dbp::dbp::facades::DatabaseProviderFacades;
use pokerteki_dbp::tracker::TableRecord;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use std::sync::Arc;

/// Access controller.
///
/// Completes the relationship snapshot of a resource from persistence and asks
/// the [PolicyEngine] for a decision. Snapshots are taken per request and
/// nothing is cached between requests.
pub struct AccessControl {
    dbp: Arc<DatabaseProvider>,
    policy_engine: Arc<dyn PolicyEngine>,
}

impl AccessControl {
    /// Return a new instance.
    pub fn new(dbp: &Arc<DatabaseProvider>) -> Arc<Self> {
        Self::with_policy_engine(dbp, PolicyEngineLocal::new())
    }

    /// Return a new instance that delegates decisions to `policy_engine`.
    pub fn with_policy_engine(
        dbp: &Arc<DatabaseProvider>,
        policy_engine: Arc<dyn PolicyEngine>,
    ) -> Arc<Self> {
        Arc::new(Self {
            dbp: Arc::clone(dbp),
            policy_engine,
        })
    }

    /// Resolve the players of all games at the table.
    pub async fn table_resource(&self, table: &TableRecord) -> ProtectedResource {
        let players = self
            .dbp
            .game_facade()
            .players_by_table_id(table.table_id)
            .await;
        ProtectedResource::Table {
            table: table.to_owned(),
            players,
        }
    }

    /// Return `true` if `identity` may perform `action` on `resource`.
    pub fn authorize(
        &self,
        identity: &ClientIdentity,
        action: Action,
        resource: &ProtectedResource,
    ) -> bool {
        self.policy_engine.is_authorized(identity, action, resource)
    }

    /// Error out with [TrackerErrorKind::AuthenticationFailure] for anonymous
    /// identities and [TrackerErrorKind::Unauthorized] if the identity isn't
    /// allowed to perform `action` on `resource`.
    pub fn assert_authorized(
        &self,
        identity: &ClientIdentity,
        action: Action,
        resource: &ProtectedResource,
    ) -> Result<(), TrackerError> {
        if !identity.is_authenticated() {
            Err(TrackerErrorKind::AuthenticationFailure
                .error_with_msg(format!("Authentication is required to {action} '{resource}'.")))?;
        }
        if self.authorize(identity, action, resource) {
            log::debug!("Identity '{identity}' is authorized to {action} '{resource}'.");
            Ok(())
        } else {
            let msg = format!("Identity '{identity}' is not authorized to {action} '{resource}'.");
            log::info!("{msg}");
            Err(TrackerErrorKind::Unauthorized.error_with_msg(msg))
        }
    }

    /// Return all tables that `identity` may read.
    ///
    /// Tables that are not readable are left out instead of failing the
    /// request.
    pub async fn readable_tables(&self, identity: &ClientIdentity) -> Vec<TableRecord> {
        if !identity.is_authenticated() {
            return Vec::new();
        }
        let mut ret = Vec::new();
        for table in self.dbp.table_facade().tables().await {
            let resource = self.table_resource(&table).await;
            if self.authorize(identity, Action::Read, &resource) {
                ret.push(table);
            }
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerteki_dbp_mem::InMemoryDatabaseProvider;
    use std::collections::BTreeSet;

    struct DenyAll;

    impl PolicyEngine for DenyAll {
        fn is_authorized(&self, _: &ClientIdentity, _: Action, _: &ProtectedResource) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn denials_are_reported_by_cause() {
        let dbp = Arc::new(InMemoryDatabaseProvider::new().await.as_database_provider());
        let dealer_id = dbp
            .user_facade()
            .user_insert("dealer", "x", 0)
            .await
            .unwrap()
            .user_id;
        let player_id = dbp
            .user_facade()
            .user_insert("player", "x", 0)
            .await
            .unwrap()
            .user_id;
        let table = dbp
            .table_facade()
            .table_insert("Friday", Some(dealer_id), Some(dealer_id), 0)
            .await;
        dbp.game_facade()
            .game_insert(table.table_id, None, &BTreeSet::from([player_id]))
            .await
            .unwrap();
        let dealer = ClientIdentity::from_session(dealer_id, "dealer", "s1");
        let access_control = AccessControl::new(&dbp);
        let resource = access_control.table_resource(&table).await;
        let ProtectedResource::Table { players, .. } = &resource else {
            panic!("Expected a table resource.");
        };
        assert_eq!(players, &BTreeSet::from([player_id]));
        assert!(
            access_control
                .assert_authorized(&dealer, Action::Delete, &resource)
                .is_ok()
        );
        let e = access_control
            .assert_authorized(&ClientIdentity::Anonymous, Action::Read, &resource)
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::AuthenticationFailure);
        let access_control = AccessControl::with_policy_engine(&dbp, Arc::new(DenyAll));
        let e = access_control
            .assert_authorized(&dealer, Action::Read, &resource)
            .unwrap_err();
        assert_eq!(e.kind(), &TrackerErrorKind::Unauthorized);
        assert!(access_control.readable_tables(&dealer).await.is_empty());
    }
}
