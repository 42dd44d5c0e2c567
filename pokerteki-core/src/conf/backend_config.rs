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

//! Persistence backend selection.

use super::AppConfigDefaults;
use config::ConfigBuilder;
use config::ConfigError;
use config::builder::BuilderState;
use serde::Deserialize;
use serde::Serialize;

/// Available persistence backends.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendImplementation {
    /// Ephemeral in-memory storage. All data is lost on restart.
    Mem,
}

/// Configuration for persistence backend.
#[derive(Debug, Deserialize, Serialize)]
pub struct BackendConfig {
    implementation: BackendImplementation,
}

impl AppConfigDefaults for BackendConfig {
    fn set_defaults<T: BuilderState>(
        config_builder: ConfigBuilder<T>,
        prefix: &str,
    ) -> Result<ConfigBuilder<T>, ConfigError> {
        config_builder.set_default(format!("{prefix}.implementation"), "mem")
    }
}

impl BackendConfig {
    /// Selected backend. Unknown names fail when the configuration is loaded.
    pub fn implementation(&self) -> BackendImplementation {
        self.implementation
    }
}
