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

//! PBKDF2 password digests.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Produce and verify PBKDF2-HMAC-SHA256 password digests in the encoded form
/// `pbkdf2_sha256${rounds}${salt hex}${digest hex}`.
pub struct PasswordHasher {
    rounds: u32,
    /// Digest verified against when the user is unknown, so that the response
    /// time does not reveal whether a username exists.
    dummy_digest: String,
}

impl PasswordHasher {
    const ALGORITHM: &'static str = "pbkdf2_sha256";
    const SALT_LEN: usize = 16;
    const DIGEST_LEN: usize = 32;

    /// Return a new instance that produces digests with `rounds` iterations.
    pub fn new(rounds: u32) -> Self {
        let rounds = rounds.max(1);
        let dummy_digest = Self::encode(rounds, &Self::random_salt(), "");
        Self {
            rounds,
            dummy_digest,
        }
    }

    fn random_salt() -> [u8; Self::SALT_LEN] {
        let mut salt = [0u8; Self::SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        salt
    }

    fn compute(rounds: u32, salt: &[u8], password: &str) -> [u8; Self::DIGEST_LEN] {
        let mut digest = [0u8; Self::DIGEST_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut digest);
        digest
    }

    fn encode(rounds: u32, salt: &[u8], password: &str) -> String {
        format!(
            "{}${rounds}${}${}",
            Self::ALGORITHM,
            hex::encode(salt),
            hex::encode(Self::compute(rounds, salt, password))
        )
    }

    /// Return the encoded digest of `password` with a fresh random salt.
    pub fn digest(&self, password: &str) -> String {
        Self::encode(self.rounds, &Self::random_salt(), password)
    }

    /// Return `true` if `password` matches the `encoded` digest.
    ///
    /// Digests created with a different number of rounds are still verified.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let mut parts = encoded.split('$');
        let (Some(algorithm), Some(rounds), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            log::debug!("Malformed password digest.");
            return false;
        };
        if algorithm != Self::ALGORITHM {
            log::debug!("Unsupported password digest algorithm '{algorithm}'.");
            return false;
        }
        let (Ok(rounds), Ok(salt), Ok(expected)) = (
            rounds.parse::<u32>(),
            hex::decode(salt),
            hex::decode(expected),
        ) else {
            log::debug!("Malformed password digest.");
            return false;
        };
        Self::compute(rounds.max(1), &salt, password)
            .as_slice()
            .ct_eq(&expected)
            .into()
    }

    /// Spend the same effort as [Self::verify] without any stored digest.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_own_digests() {
        let hasher = PasswordHasher::new(1000);
        let encoded = hasher.digest("correct horse battery");
        assert!(encoded.starts_with("pbkdf2_sha256$1000$"));
        assert!(hasher.verify("correct horse battery", &encoded));
        assert!(!hasher.verify("correct horse battery!", &encoded));
        // Salts differ between digests of the same password.
        assert_ne!(encoded, hasher.digest("correct horse battery"));
        // Older digests with another round count still verify.
        assert!(PasswordHasher::new(10).verify("correct horse battery", &encoded));
    }

    #[test]
    fn rejects_malformed_digests() {
        let hasher = PasswordHasher::new(10);
        assert!(!hasher.verify("pw", ""));
        assert!(!hasher.verify("pw", "md5$10$00$00"));
        assert!(!hasher.verify("pw", "sha256$10$00$00"));
        assert!(!hasher.verify("pw", "pbkdf2_sha256$ten$00$00"));
        assert!(!hasher.verify("pw", "pbkdf2_sha256$10$zz$00"));
        assert!(!hasher.verify("pw", "pbkdf2_sha256$10$00$00$00"));
    }

    #[test]
    fn matches_the_pbkdf2_hmac_sha256_test_vector() {
        // First 32 bytes of the RFC 7914 vector for "passwd", "salt", c = 1.
        assert_eq!(
            hex::encode(PasswordHasher::compute(1, b"salt", "passwd")),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
        let hasher = PasswordHasher::new(10);
        assert!(hasher.verify(
            "passwd",
            "pbkdf2_sha256$1$73616c74$55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        ));
    }
}
