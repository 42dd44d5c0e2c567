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

//! Parsing of application configuration.

mod api_config;
mod backend_config;
mod csp_config;
mod lockout_config;
mod password_config;
mod security_config;
mod session_config;

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::builder::BuilderState;
use serde::Deserialize;
use serde::Serialize;

pub use self::api_config::ApiConfig;
pub use self::backend_config::BackendConfig;
pub use self::backend_config::BackendImplementation;
pub use self::csp_config::CspConfig;
pub use self::lockout_config::LockoutConfig;
pub use self::password_config::PasswordConfig;
pub use self::security_config::SecurityConfig;
pub use self::session_config::SessionConfig;

/// Package name reported by Cargo at build time.
const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Package version reported by Cargo at build time.
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Static trait for tracking implementations.
trait AppConfigDefaults {
    fn set_defaults<T: BuilderState>(
        config_builder: ConfigBuilder<T>,
        prefix: &str,
    ) -> Result<ConfigBuilder<T>, ConfigError>;
}

/**
Application configration root.

The application name defaults to the Rust package name, but can be overridden
with the environment variable `APP_NAME`.

Configuration will be loaded from

1. the file `{application name}.json` in the current working directory.
2. environment variable overrides in the form
   `{APPLICATION_NAME}_MODULE_CONFIGKEYWITHOUTSPACES`

The configuration is assembled once at startup and is immutable afterwards.
 */
#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    /// Configuration of the exposed REST API.
    pub api: ApiConfig,
    /// Configuration for persistence backend.
    pub backend: BackendConfig,
    /// Content Security Policy directives.
    pub csp: CspConfig,
    /// Brute force protection of logins.
    pub lockout: LockoutConfig,
    /// Password policy and digest settings.
    pub password: PasswordConfig,
    /// HTTPS, host and secret key settings.
    pub security: SecurityConfig,
    /// Login session settings.
    pub session: SessionConfig,

    /// Lower case application name. Ignored when loading configuration.
    #[serde(skip_deserializing)]
    app_name: String,
    /// Time of application startup in epoch microseconds
    #[serde(skip_deserializing)]
    startup_ts_micros: u64,
}

impl AppConfig {
    /// The application name defaults to the Rust package name, but can be
    /// overridden with the environment variable `APP_NAME`.
    fn read_app_name_lowercase(cargo_pkg_name: &str) -> String {
        std::env::var("APP_NAME")
            .map_err(|e| {
                log::debug!(
                    "Environment variable APP_NAME: {e:?} -> Default app name '{cargo_pkg_name}' will be used."
                );
            })
            .ok()
            .map(|value| value.to_lowercase())
            .unwrap_or(cargo_pkg_name.to_owned())
    }

    /// Lower case application name.
    pub fn app_name_lowercase(&self) -> &str {
        &self.app_name
    }

    /// SemVer application version derived fromt the Rust package version.
    pub fn app_version(&self) -> &'static str {
        CARGO_PKG_VERSION
    }

    /// Time of application startup in epoch microseconds
    pub fn startup_ts_micros(&self) -> u64 {
        self.startup_ts_micros
    }

    /** Creates a new instance pre-populated with defaults, an optional
    configurations file and environment variable overrides.

    Use `env!("CARGO_PKG_NAME")` as `cargo_pkg_name`.
    */
    pub fn new(cargo_pkg_name: &str, startup_ts_micros: u64) -> Result<Self, ConfigError> {
        Self::with_overrides(cargo_pkg_name, startup_ts_micros, &[])
    }

    /// Like [Self::new], but `overrides` in the form `("section.key", "value")`
    /// take precedence over all other sources.
    pub fn with_overrides(
        cargo_pkg_name: &str,
        startup_ts_micros: u64,
        overrides: &[(&str, &str)],
    ) -> Result<Self, ConfigError> {
        let app_name = Self::read_app_name_lowercase(cargo_pkg_name);
        let config_filename = app_name.to_owned() + ".json";
        let config_env_prefix = &app_name.to_uppercase();
        let mut config_builder = Config::builder();
        config_builder = ApiConfig::set_defaults(config_builder, "api")?;
        config_builder = BackendConfig::set_defaults(config_builder, "backend")?;
        config_builder = CspConfig::set_defaults(config_builder, "csp")?;
        config_builder = LockoutConfig::set_defaults(config_builder, "lockout")?;
        config_builder = PasswordConfig::set_defaults(config_builder, "password")?;
        config_builder = SecurityConfig::set_defaults(config_builder, "security")?;
        config_builder = SessionConfig::set_defaults(config_builder, "session")?;
        let conf_file = std::env::current_dir()
            .map_err(|e| ConfigError::Message(format!("No current directory: {e}")))?
            .join(config_filename);
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "Will load '{}' configuration if present.",
                conf_file.display()
            );
        }
        config_builder = config_builder
            .add_source(File::with_name(&conf_file.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(config_env_prefix).separator("_"),
            );
        for (key, value) in overrides {
            config_builder = config_builder.set_override(*key, *value)?;
        }
        let mut app_config: AppConfig = config_builder.build()?.try_deserialize()?;
        app_config.app_name = app_name;
        app_config.startup_ts_micros = startup_ts_micros;
        app_config.security.resolve_secret_key()?;
        log::info!("Running with configuration: {app_config:?}");
        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_development_setup() {
        let app_config = AppConfig::new(CARGO_PKG_NAME, 42).unwrap();
        assert_eq!(app_config.startup_ts_micros(), 42);
        assert_eq!(
            app_config.backend.implementation(),
            BackendImplementation::Mem
        );
        assert!(!app_config.security.is_production());
        assert!(app_config.security.is_host_allowed("anything.example"));
        assert!(!app_config.security.is_ssl_redirect());
        assert_eq!(app_config.security.hsts_seconds(), 0);
        assert_eq!(app_config.lockout.failure_limit(), 5);
        assert_eq!(app_config.lockout.cool_off_micros(), 3_600_000_000);
        assert_eq!(app_config.session.cookie_name(), "sessionid");
        assert_eq!(app_config.password.min_length(), 8);
    }

    #[test]
    fn huge_cool_off_saturates() {
        let app_config = AppConfig::with_overrides(
            CARGO_PKG_NAME,
            0,
            &[("lockout.cooloffhours", "9223372036854775807")],
        )
        .unwrap();
        assert_eq!(app_config.lockout.cool_off_micros(), u64::MAX);
    }

    #[test]
    fn production_requires_a_secret_key() {
        let res = AppConfig::with_overrides(CARGO_PKG_NAME, 0, &[("security.production", "true")]);
        assert!(res.is_err());
        let app_config = AppConfig::with_overrides(
            CARGO_PKG_NAME,
            0,
            &[
                ("security.production", "true"),
                ("security.secretkey", "s3cr3t-for-testing"),
                ("security.allowedhosts", "pokerteki.mom,.example.com"),
            ],
        )
        .unwrap();
        assert!(app_config.security.is_ssl_redirect());
        assert_eq!(app_config.security.hsts_seconds(), 31_536_000);
        assert!(app_config.security.is_cookie_secure());
        assert!(app_config.security.is_host_allowed("pokerteki.mom:443"));
        assert!(app_config.security.is_host_allowed("www.example.com"));
        assert!(!app_config.security.is_host_allowed("evil.mom"));
        assert!(!format!("{app_config:?}").contains("s3cr3t-for-testing"));
    }

    #[test]
    fn ci_relaxes_https_settings() {
        let app_config = AppConfig::with_overrides(
            CARGO_PKG_NAME,
            0,
            &[
                ("security.production", "true"),
                ("security.ci", "true"),
                ("security.secretkey", "ci-key"),
            ],
        )
        .unwrap();
        assert!(!app_config.security.is_ssl_redirect());
        assert!(!app_config.security.is_cookie_secure());
        assert_eq!(app_config.security.hsts_seconds(), 0);
        assert!(app_config.security.proxy_ssl_header().is_none());
        assert!(app_config.security.is_cross_origin_isolated());
    }
}
