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

//! Brute force protection of logins.

use crossbeam_skiplist::SkipMap;
use pokerteki_dbp::tracker::TrackerError;
use pokerteki_dbp::tracker::TrackerErrorKind;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Failures of a single username and client address combination.
#[derive(Default)]
struct FailureCount {
    count: u32,
    last_failure_micros: u64,
}

/// Track failed login attempts per username and client address.
///
/// After `failure_limit` failures, further attempts for the same combination
/// are rejected until `cool_off_micros` have passed since the last failure.
pub struct LoginLockout {
    failure_limit: u32,
    cool_off_micros: u64,
    reset_on_success: bool,
    /// Failures by lookup key. Entries are only modified or removed while
    /// holding their lock.
    failures: SkipMap<String, Mutex<FailureCount>>,
}

impl LoginLockout {
    /// Return a new instance.
    pub async fn new(failure_limit: u32, cool_off_micros: u64, reset_on_success: bool) -> Arc<Self> {
        Arc::new(Self {
            failure_limit,
            cool_off_micros,
            reset_on_success,
            failures: SkipMap::default(),
        })
        .init()
        .await
    }

    /// Initialize background tasks.
    async fn init(self: Arc<Self>) -> Arc<Self> {
        let ret = Arc::clone(&self);
        tokio::spawn(async move {
            self.purge_expired().await;
        });
        ret
    }

    /// Transform username and client address into a lookup key.
    fn as_key(username: &str, client_ip: &str) -> String {
        username.to_string() + ";" + client_ip
    }

    fn lock(failure_count: &Mutex<FailureCount>) -> MutexGuard<'_, FailureCount> {
        failure_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget failures that are older than the cool-off period.
    async fn purge_expired(&self) {
        let interval_micros = (self.cool_off_micros / 10).max(1_000_000);
        loop {
            tokio::time::sleep(tokio::time::Duration::from_micros(interval_micros)).await;
            let now = crate::util::get_timestamp_micros();
            for entry in self.failures.iter() {
                let failure_count = Self::lock(entry.value());
                if self.is_expired(failure_count.last_failure_micros, now) {
                    entry.remove();
                }
            }
        }
    }

    fn is_expired(&self, last_failure_micros: u64, now_micros: u64) -> bool {
        last_failure_micros.saturating_add(self.cool_off_micros) <= now_micros
    }

    /// Return `true` if further attempts are currently rejected.
    pub fn is_locked_out(&self, username: &str, client_ip: &str) -> bool {
        self.is_locked_out_at(username, client_ip, crate::util::get_timestamp_micros())
    }

    fn is_locked_out_at(&self, username: &str, client_ip: &str, now_micros: u64) -> bool {
        self.failures
            .get(&Self::as_key(username, client_ip))
            .is_some_and(|entry| {
                let failure_count = Self::lock(entry.value());
                failure_count.count >= self.failure_limit
                    && !self.is_expired(failure_count.last_failure_micros, now_micros)
            })
    }

    /// Error out with [TrackerErrorKind::LockedOut] if further attempts are
    /// currently rejected.
    pub fn assert_not_locked_out(&self, username: &str, client_ip: &str) -> Result<(), TrackerError> {
        if self.is_locked_out(username, client_ip) {
            log::warn!("Rejected login attempt for '{username}' from '{client_ip}' during lockout.");
            Err(TrackerErrorKind::LockedOut
                .error_with_msg("Too many failed login attempts. Try again later."))?;
        }
        Ok(())
    }

    /// Record a failed attempt and return the current number of failures.
    pub fn register_failure(&self, username: &str, client_ip: &str) -> u32 {
        self.register_failure_at(username, client_ip, crate::util::get_timestamp_micros())
    }

    fn register_failure_at(&self, username: &str, client_ip: &str, now_micros: u64) -> u32 {
        let key = Self::as_key(username, client_ip);
        let count = loop {
            let entry = self
                .failures
                .get_or_insert_with(key.clone(), || Mutex::new(FailureCount::default()));
            let mut failure_count = Self::lock(entry.value());
            if entry.is_removed() {
                // Purged or reset while waiting for the lock.
                continue;
            }
            if self.is_expired(failure_count.last_failure_micros, now_micros) {
                failure_count.count = 0;
            }
            failure_count.count = failure_count.count.saturating_add(1);
            failure_count.last_failure_micros = failure_count.last_failure_micros.max(now_micros);
            break failure_count.count;
        };
        if count == self.failure_limit {
            log::warn!(
                "Locking out '{username}' from '{client_ip}' after {count} failed login attempts."
            );
        }
        count
    }

    /// Record a successful login.
    pub fn register_success(&self, username: &str, client_ip: &str) {
        if self.reset_on_success {
            if let Some(entry) = self.failures.get(&Self::as_key(username, client_ip)) {
                let _failure_count = Self::lock(entry.value());
                entry.remove();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MICROS: u64 = 3_600_000_000;

    #[tokio::test]
    async fn locks_out_after_the_failure_limit() {
        let lockout = LoginLockout::new(5, HOUR_MICROS, true).await;
        let now = 10 * HOUR_MICROS;
        for attempt in 1..5 {
            assert_eq!(lockout.register_failure_at("alice", "10.0.0.1", now), attempt);
            assert!(!lockout.is_locked_out_at("alice", "10.0.0.1", now));
        }
        assert_eq!(lockout.register_failure_at("alice", "10.0.0.1", now), 5);
        assert!(lockout.is_locked_out_at("alice", "10.0.0.1", now + 1));
        // Other combinations are not affected.
        assert!(!lockout.is_locked_out_at("alice", "10.0.0.2", now + 1));
        assert!(!lockout.is_locked_out_at("bob", "10.0.0.1", now + 1));
        // The lockout ends after the cool-off period.
        assert!(!lockout.is_locked_out_at("alice", "10.0.0.1", now + HOUR_MICROS));
        assert_eq!(
            lockout.register_failure_at("alice", "10.0.0.1", now + HOUR_MICROS),
            1
        );
    }

    #[tokio::test]
    async fn concurrent_failures_are_all_counted() {
        let lockout = LoginLockout::new(u32::MAX, HOUR_MICROS, true).await;
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..2_000 {
                        lockout.register_failure_at("alice", "10.0.0.1", 1_000);
                    }
                });
            }
        });
        assert_eq!(
            lockout.register_failure_at("alice", "10.0.0.1", 1_000),
            16_001
        );
    }

    #[tokio::test]
    async fn success_resets_failures() {
        let lockout = LoginLockout::new(2, HOUR_MICROS, true).await;
        lockout.register_failure_at("alice", "10.0.0.1", 1);
        lockout.register_success("alice", "10.0.0.1");
        assert_eq!(lockout.register_failure_at("alice", "10.0.0.1", 2), 1);

        let lockout = LoginLockout::new(2, HOUR_MICROS, false).await;
        lockout.register_failure_at("alice", "10.0.0.1", 1);
        lockout.register_success("alice", "10.0.0.1");
        assert_eq!(lockout.register_failure_at("alice", "10.0.0.1", 2), 2);
    }
}
