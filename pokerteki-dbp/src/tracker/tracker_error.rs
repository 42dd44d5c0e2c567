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

//! Poker tracker errors.

use std::error::Error;
use std::fmt;

/// Cause of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerErrorKind {
    /// General failure. See message for details.
    Unspecified,
    /// Malformed request input. E.g. an empty table name or unknown player.
    MalformedInput,
    /// The addressed object does not exist.
    NotFound,
    /// The object conflicts with an existing one. E.g. a taken username.
    Conflict,
    /// The password does not satisfy the password policy.
    InvalidPassword,
    /// Authentication failed or no authenticated identity was present.
    AuthenticationFailure,
    /// The authenticated identity is not allowed to perform the action.
    Unauthorized,
    /// Too many failed login attempts.
    LockedOut,
}

impl TrackerErrorKind {
    /// Create a new instance with an error message.
    pub fn error_with_msg<S: AsRef<str>>(self, msg: S) -> TrackerError {
        TrackerError {
            kind: self,
            msg: Some(msg.as_ref().to_string()),
        }
    }

    /// Create a new instance without an error message.
    pub fn error(self) -> TrackerError {
        TrackerError {
            kind: self,
            msg: None,
        }
    }
}

impl fmt::Display for TrackerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/** Poker tracker error.

Create a new instance via [TrackerErrorKind].
*/
#[derive(Debug)]
pub struct TrackerError {
    kind: TrackerErrorKind,
    msg: Option<String>,
}

impl TrackerError {
    /// Return the type of error.
    pub fn kind(&self) -> &TrackerErrorKind {
        &self.kind
    }

    /// Return the error message, if any.
    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(msg) = &self.msg {
            write!(f, "{} {}", self.kind, msg)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl AsRef<TrackerError> for TrackerError {
    fn as_ref(&self) -> &TrackerError {
        self
    }
}

impl Error for TrackerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let e = TrackerErrorKind::NotFound.error_with_msg("No table '7'.");
        assert_eq!(e.to_string(), "NotFound No table '7'.");
        assert_eq!(e.kind(), &TrackerErrorKind::NotFound);
        assert_eq!(TrackerErrorKind::LockedOut.error().to_string(), "LockedOut");
        assert!(TrackerErrorKind::LockedOut.error().msg().is_none());
    }
}
