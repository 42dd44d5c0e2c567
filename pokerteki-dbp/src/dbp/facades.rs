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

//! Database facades.

mod comment_facade;
mod game_facade;
mod session_facade;
mod table_facade;
mod user_facade;

pub use self::comment_facade::*;
pub use self::game_facade::*;
pub use self::session_facade::*;
pub use self::table_facade::*;
pub use self::user_facade::*;

/// Provide access to database facades.
pub trait DatabaseProviderFacades: Send + Sync {
    /// See [CommentFacade].
    fn comment_facade(&self) -> &dyn CommentFacade;

    /// See [GameFacade].
    fn game_facade(&self) -> &dyn GameFacade;

    /// See [SessionFacade].
    fn session_facade(&self) -> &dyn SessionFacade;

    /// See [TableFacade].
    fn table_facade(&self) -> &dyn TableFacade;

    /// See [UserFacade].
    fn user_facade(&self) -> &dyn UserFacade;
}
