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

//! Built-in policy engine.

use super::Action;
use super::PolicyEngine;
use super::ProtectedResource;
use super::ResourceType;
use super::predicates;
use crate::tracker::auth::ClientIdentity;
use pokerteki_dbp::tracker::UserId;
use std::collections::HashMap;
use std::sync::Arc;

/// Pure decision function for one resource type and action.
pub type Predicate = fn(UserId, &ProtectedResource) -> bool;

/// Built-in [PolicyEngine] implementation based on ownership and membership.
///
/// Each `(ResourceType, Action)` pair maps to a single [Predicate]:
///
/// | Resource | Read                      | Change and Delete |
/// |----------|---------------------------|-------------------|
/// | Table    | dealer, creator or player | dealer or creator |
/// | Game     | (none)                    | table dealer      |
/// | Comment  | (none)                    | comment creator   |
///
/// Anonymous identities are denied before any predicate is consulted and
/// pairs without a registered predicate are denied.
pub struct PolicyEngineLocal {
    predicates: HashMap<(ResourceType, Action), Predicate>,
}

impl PolicyEngineLocal {
    /// Return a new instance with the built-in predicates registered.
    pub fn new() -> Arc<Self> {
        Arc::new(
            Self::empty()
                .with_predicate(ResourceType::Table, Action::Read, predicates::can_read_table)
                .with_predicate(ResourceType::Table, Action::Change, predicates::can_change_table)
                .with_predicate(ResourceType::Table, Action::Delete, predicates::can_change_table)
                .with_predicate(ResourceType::Game, Action::Change, predicates::can_change_game)
                .with_predicate(ResourceType::Game, Action::Delete, predicates::can_change_game)
                .with_predicate(
                    ResourceType::Comment,
                    Action::Change,
                    predicates::can_change_comment,
                )
                .with_predicate(
                    ResourceType::Comment,
                    Action::Delete,
                    predicates::can_change_comment,
                ),
        )
    }

    /// Return a new instance without any predicates.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Register `predicate` for the resource type and action, replacing any
    /// previous registration.
    pub fn with_predicate(
        mut self,
        resource_type: ResourceType,
        action: Action,
        predicate: Predicate,
    ) -> Self {
        self.predicates.insert((resource_type, action), predicate);
        self
    }
}

impl PolicyEngine for PolicyEngineLocal {
    fn is_authorized(
        &self,
        identity: &ClientIdentity,
        action: Action,
        resource: &ProtectedResource,
    ) -> bool {
        let Some(user_id) = identity.user_id() else {
            return false;
        };
        let resource_type = resource.resource_type();
        match self.predicates.get(&(resource_type, action)) {
            Some(predicate) => predicate(user_id, resource),
            None => {
                log::info!(
                    "Denied {action} access to '{resource}', since no policy exists for {resource_type}."
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerteki_dbp::tracker::CommentRecord;
    use pokerteki_dbp::tracker::GameRecord;
    use pokerteki_dbp::tracker::TableRecord;
    use std::collections::BTreeSet;

    const DEALER: UserId = 1;
    const CREATOR: UserId = 2;
    const PLAYER: UserId = 3;
    const STRANGER: UserId = 4;

    fn user(user_id: UserId) -> ClientIdentity {
        ClientIdentity::from_session(user_id, &format!("user{user_id}"), "session")
    }

    fn table(dealer: Option<UserId>, creator: Option<UserId>) -> TableRecord {
        TableRecord {
            table_id: 10,
            name: "Friday".to_string(),
            dealer,
            creator,
            play_date_micros: 0,
        }
    }

    fn table_resource(dealer: Option<UserId>, creator: Option<UserId>) -> ProtectedResource {
        ProtectedResource::Table {
            table: table(dealer, creator),
            players: BTreeSet::from([PLAYER]),
        }
    }

    fn game_resource(dealer: Option<UserId>, creator: Option<UserId>) -> ProtectedResource {
        ProtectedResource::Game {
            game: GameRecord {
                game_id: 20,
                table_id: 10,
                winner: Some(PLAYER),
                players: BTreeSet::from([PLAYER]),
            },
            table: table(dealer, creator),
        }
    }

    fn comment_resource(creator: Option<UserId>) -> ProtectedResource {
        ProtectedResource::Comment {
            comment: CommentRecord {
                comment_id: 30,
                table_id: 10,
                creator,
                comment: "Nice hand".to_string(),
                created_at_micros: 0,
            },
        }
    }

    #[test]
    fn table_read_requires_a_relation() {
        let engine = PolicyEngineLocal::new();
        let resource = table_resource(Some(DEALER), Some(CREATOR));
        for user_id in [DEALER, CREATOR, PLAYER] {
            assert!(engine.is_authorized(&user(user_id), Action::Read, &resource));
        }
        assert!(!engine.is_authorized(&user(STRANGER), Action::Read, &resource));
    }

    #[test]
    fn table_change_and_delete_exclude_players() {
        let engine = PolicyEngineLocal::new();
        let resource = table_resource(Some(DEALER), Some(CREATOR));
        for action in [Action::Change, Action::Delete] {
            assert!(engine.is_authorized(&user(DEALER), action, &resource));
            assert!(engine.is_authorized(&user(CREATOR), action, &resource));
            assert!(!engine.is_authorized(&user(PLAYER), action, &resource));
            assert!(!engine.is_authorized(&user(STRANGER), action, &resource));
        }
    }

    #[test]
    fn game_change_and_delete_only_by_table_dealer() {
        let engine = PolicyEngineLocal::new();
        let resource = game_resource(Some(DEALER), Some(CREATOR));
        for action in [Action::Change, Action::Delete] {
            assert!(engine.is_authorized(&user(DEALER), action, &resource));
            assert!(!engine.is_authorized(&user(CREATOR), action, &resource));
            assert!(!engine.is_authorized(&user(PLAYER), action, &resource));
        }
        // The creator stays without rights even when the dealer is gone.
        let resource = game_resource(None, Some(CREATOR));
        assert!(!engine.is_authorized(&user(CREATOR), Action::Change, &resource));
    }

    #[test]
    fn comment_change_and_delete_only_by_creator() {
        let engine = PolicyEngineLocal::new();
        let resource = comment_resource(Some(PLAYER));
        for action in [Action::Change, Action::Delete] {
            assert!(engine.is_authorized(&user(PLAYER), action, &resource));
            assert!(!engine.is_authorized(&user(DEALER), action, &resource));
        }
        let orphaned = comment_resource(None);
        for user_id in [DEALER, CREATOR, PLAYER, STRANGER] {
            assert!(!engine.is_authorized(&user(user_id), Action::Change, &orphaned));
            assert!(!engine.is_authorized(&user(user_id), Action::Delete, &orphaned));
        }
    }

    #[test]
    fn unset_relations_match_nobody() {
        let engine = PolicyEngineLocal::new();
        let resource = ProtectedResource::Table {
            table: table(None, None),
            players: BTreeSet::new(),
        };
        for user_id in [DEALER, CREATOR, PLAYER, STRANGER] {
            for action in [Action::Read, Action::Change, Action::Delete] {
                assert!(!engine.is_authorized(&user(user_id), action, &resource));
            }
        }
    }

    #[test]
    fn anonymous_is_always_denied() {
        let engine = PolicyEngineLocal::new();
        let resources = [
            table_resource(Some(DEALER), Some(CREATOR)),
            game_resource(Some(DEALER), Some(CREATOR)),
            comment_resource(Some(PLAYER)),
        ];
        for resource in &resources {
            for action in [Action::Read, Action::Change, Action::Delete] {
                assert!(!engine.is_authorized(&ClientIdentity::Anonymous, action, resource));
            }
        }
    }

    #[test]
    fn missing_predicate_denies() {
        let engine = PolicyEngineLocal::new();
        // Game and comment reads are not separately governed.
        let game = game_resource(Some(DEALER), Some(CREATOR));
        assert!(!engine.is_authorized(&user(DEALER), Action::Read, &game));
        let comment = comment_resource(Some(PLAYER));
        assert!(!engine.is_authorized(&user(PLAYER), Action::Read, &comment));
        let engine = PolicyEngineLocal::empty();
        let table = table_resource(Some(DEALER), Some(CREATOR));
        assert!(!engine.is_authorized(&user(DEALER), Action::Change, &table));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let engine = PolicyEngineLocal::new();
        let resource = table_resource(Some(DEALER), None);
        let first = engine.is_authorized(&user(PLAYER), Action::Read, &resource);
        for _ in 0..10 {
            assert_eq!(
                engine.is_authorized(&user(PLAYER), Action::Read, &resource),
                first
            );
        }
    }
}
