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

//! Validation of new passwords.

use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;

/// Frequently used passwords that are rejected regardless of length.
const COMMON_PASSWORDS: &[&str] = &[
    "123456789",
    "12345678",
    "1234567890",
    "abc12345",
    "baseball",
    "football",
    "iloveyou",
    "password",
    "password1",
    "password123",
    "princess",
    "qwerty123",
    "qwertyuiop",
    "sunshine",
    "superman",
    "trustno1",
    "welcome1",
    "pokerface",
    "fullhouse",
    "royalflush",
];

/// Rules that a new password must satisfy.
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    /// Usernames shorter than this are not compared with the password.
    const MIN_SIMILARITY_LEN: usize = 3;

    /// Return a new instance.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Error out with [TrackerErrorKind::InvalidPassword] describing the first
    /// rule that `password` violates.
    pub fn validate(&self, username: &str, password: &str) -> Result<(), TrackerError> {
        let violation = |msg: String| Err(TrackerErrorKind::InvalidPassword.error_with_msg(msg));
        if password.chars().count() < self.min_length {
            return violation(format!(
                "The password must contain at least {} characters.",
                self.min_length
            ));
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return violation("The password is entirely numeric.".to_string());
        }
        let password_lowercase = password.to_lowercase();
        if COMMON_PASSWORDS.contains(&password_lowercase.as_str()) {
            return violation("The password is too common.".to_string());
        }
        let username_lowercase = username.to_lowercase();
        if username_lowercase.chars().count() >= Self::MIN_SIMILARITY_LEN
            && (password_lowercase.contains(&username_lowercase)
                || username_lowercase.contains(&password_lowercase))
        {
            return violation("The password is too similar to the username.".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_weak_passwords() {
        let policy = PasswordPolicy::new(8);
        let rejected = ["short1!", "1234567890123", "Password123", "xAliceDealerx"];
        for password in rejected {
            let e = policy.validate("AliceDealer", password).unwrap_err();
            assert_eq!(e.kind(), &TrackerErrorKind::InvalidPassword);
        }
        assert!(policy.validate("AliceDealer", "river-card-7").is_ok());
        // Short usernames are not compared.
        assert!(policy.validate("al", "always-all-in").is_ok());
    }
}
