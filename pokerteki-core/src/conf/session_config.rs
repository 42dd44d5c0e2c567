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

//! Parsing of configuration for login sessions.

use config::ConfigBuilder;
use config::ConfigError;
use config::builder::BuilderState;
use serde::{Deserialize, Serialize};

use super::AppConfigDefaults;

/// Login session settings.
#[derive(Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    maxagesecs: u64,
    cookiename: String,
}

impl AppConfigDefaults for SessionConfig {
    /// Provide defaults for this part of the configuration
    fn set_defaults<T: BuilderState>(
        config_builder: ConfigBuilder<T>,
        prefix: &str,
    ) -> Result<ConfigBuilder<T>, ConfigError> {
        config_builder
            .set_default(format!("{prefix}.maxagesecs"), "1209600")?
            .set_default(format!("{prefix}.cookiename"), "sessionid")
    }
}

impl SessionConfig {
    /// Session lifetime in seconds. Defaults to two weeks.
    pub fn max_age_secs(&self) -> u64 {
        self.maxagesecs
    }

    /// Name of the cookie carrying the session token.
    pub fn cookie_name(&self) -> &str {
        &self.cookiename
    }
}
