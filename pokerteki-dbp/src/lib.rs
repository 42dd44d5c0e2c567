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

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod dbp;
pub mod tracker {
    //! Poker tracker records.

    mod comment_record;
    mod game_record;
    mod table_record;
    mod tracker_error;
    mod user_record;

    pub use self::comment_record::CommentId;
    pub use self::comment_record::CommentRecord;
    pub use self::game_record::GameId;
    pub use self::game_record::GameRecord;
    pub use self::table_record::TableId;
    pub use self::table_record::TableRecord;
    pub use self::tracker_error::TrackerError;
    pub use self::tracker_error::TrackerErrorKind;
    pub use self::user_record::UserId;
    pub use self::user_record::UserRecord;
}
