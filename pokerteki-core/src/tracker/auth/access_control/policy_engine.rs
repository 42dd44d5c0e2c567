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

//! Policy engine interface.

use super::Action;
use super::ProtectedResource;
use crate::tracker::auth::ClientIdentity;

/// The policy engine is responsible for finding out if a [ClientIdentity] is
/// authorized to perform an [Action] on a [ProtectedResource].
///
/// Implementations must not have side effects, so that repeated evaluation of
/// unchanged state yields the same decision.
pub trait PolicyEngine: Sync + Send {
    /// Return `true` if the `identity` may perform `action` on `resource`.
    fn is_authorized(
        &self,
        identity: &ClientIdentity,
        action: Action,
        resource: &ProtectedResource,
    ) -> bool;
}
