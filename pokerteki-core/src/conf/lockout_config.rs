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

//! Parsing of configuration for brute force protection of logins.

use config::ConfigBuilder;
use config::ConfigError;
use config::builder::BuilderState;
use serde::{Deserialize, Serialize};

use super::AppConfigDefaults;

/// Brute force protection of logins.
///
/// Failed attempts are counted per combination of username and client IP
/// address.
#[derive(Debug, Deserialize, Serialize)]
pub struct LockoutConfig {
    /// See [Self::failure_limit()].
    failurelimit: u32,
    /// See [Self::cool_off_micros()].
    cooloffhours: u64,
    /// See [Self::is_reset_on_success()].
    resetonsuccess: bool,
}

impl AppConfigDefaults for LockoutConfig {
    /// Provide defaults for this part of the configuration
    fn set_defaults<T: BuilderState>(
        config_builder: ConfigBuilder<T>,
        prefix: &str,
    ) -> Result<ConfigBuilder<T>, ConfigError> {
        config_builder
            .set_default(format!("{prefix}.failurelimit"), "5")?
            .set_default(format!("{prefix}.cooloffhours"), "1")?
            .set_default(format!("{prefix}.resetonsuccess"), "true")
    }
}

impl LockoutConfig {
    /// Number of failed attempts that locks out further attempts.
    pub fn failure_limit(&self) -> u32 {
        self.failurelimit
    }

    /// Time since the last failure after which the failures are forgotten.
    pub fn cool_off_micros(&self) -> u64 {
        self.cooloffhours.saturating_mul(3_600_000_000)
    }

    /// Return `true` if a successful login should clear earlier failures.
    pub fn is_reset_on_success(&self) -> bool {
        self.resetonsuccess
    }
}
