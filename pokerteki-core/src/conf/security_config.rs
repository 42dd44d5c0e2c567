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

//! Parsing of configuration for HTTPS, allowed hosts and the secret key.

use config::ConfigBuilder;
use config::ConfigError;
use config::builder::BuilderState;
use serde::Deserialize;
use serde::Serialize;
use std::net::IpAddr;

use super::AppConfigDefaults;

/// Secret key used when nothing else is configured. Refused in production.
const DEVELOPMENT_SECRET_KEY: &str = "pokerteki-insecure-key-for-local-development-only";

/// HTTPS, allowed hosts and secret key settings.
///
/// Outside of production all hosts are allowed and HTTPS is not enforced. The
/// `ci` flag keeps the production posture but relaxes HTTPS enforcement for
/// test pipelines without TLS termination.
#[derive(Deserialize, Serialize)]
pub struct SecurityConfig {
    production: bool,
    ci: bool,
    secretkey: String,
    /// Comma separated list of host names.
    allowedhosts: String,
    sslredirect: bool,
    hstsseconds: u64,
    hstssubdomains: bool,
    /// Header set by a TLS terminating proxy with value `https`.
    proxysslheader: String,
    /// Comma separated addresses of proxies whose `X-Forwarded-For` is used.
    trustedproxies: String,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("production", &self.production)
            .field("ci", &self.ci)
            .field("secretkey", &"*redacted*")
            .field("allowedhosts", &self.allowedhosts)
            .field("sslredirect", &self.sslredirect)
            .field("hstsseconds", &self.hstsseconds)
            .field("hstssubdomains", &self.hstssubdomains)
            .field("proxysslheader", &self.proxysslheader)
            .field("trustedproxies", &self.trustedproxies)
            .finish()
    }
}

impl AppConfigDefaults for SecurityConfig {
    /// Provide defaults for this part of the configuration
    fn set_defaults<T: BuilderState>(
        config_builder: ConfigBuilder<T>,
        prefix: &str,
    ) -> Result<ConfigBuilder<T>, ConfigError> {
        config_builder
            .set_default(format!("{prefix}.production"), "false")?
            .set_default(format!("{prefix}.ci"), "false")?
            .set_default(format!("{prefix}.secretkey"), DEVELOPMENT_SECRET_KEY)?
            .set_default(format!("{prefix}.allowedhosts"), "")?
            .set_default(format!("{prefix}.sslredirect"), "true")?
            .set_default(format!("{prefix}.hstsseconds"), "31536000")?
            .set_default(format!("{prefix}.hstssubdomains"), "true")?
            .set_default(format!("{prefix}.proxysslheader"), "X-Forwarded-Proto")?
            .set_default(format!("{prefix}.trustedproxies"), "")
    }
}

impl SecurityConfig {
    /// Read the secret key from the file named by `SECRET_KEY_FILE` when set
    /// and refuse to run production with a missing or development key.
    pub(super) fn resolve_secret_key(&mut self) -> Result<(), ConfigError> {
        if let Ok(filename) = std::env::var("SECRET_KEY_FILE") {
            match std::fs::read_to_string(&filename) {
                Ok(content) => self.secretkey = content.trim().to_string(),
                Err(e) => log::info!("Unable to read secret key file '{filename}': {e}"),
            }
        }
        if self.production
            && (self.secretkey.trim().is_empty() || self.secretkey == DEVELOPMENT_SECRET_KEY)
        {
            Err(ConfigError::Message(
                "Secret key is missing in production.".to_string(),
            ))?;
        }
        Ok(())
    }

    /// Return `true` when running in production.
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// Key for signing session tokens.
    pub fn secret_key(&self) -> &str {
        &self.secretkey
    }

    /// Lower case host names that may be served. `*` matches any host and a
    /// leading `.` matches the domain and all its subdomains.
    pub fn allowed_hosts(&self) -> Vec<String> {
        if !self.production {
            return vec!["*".to_string()];
        }
        self.allowedhosts
            .split(',')
            .map(|host| host.trim().to_lowercase())
            .filter(|host| !host.is_empty())
            .collect()
    }

    /// Return `true` if the `Host` (with optional port) may be served.
    pub fn is_host_allowed(&self, host_with_port: &str) -> bool {
        let host = Self::strip_port(host_with_port.trim()).to_lowercase();
        let host = host.trim_end_matches('.');
        self.allowed_hosts().iter().any(|pattern| {
            pattern == "*"
                || pattern == host
                || pattern
                    .strip_prefix('.')
                    .is_some_and(|domain| host == domain || host.ends_with(pattern.as_str()))
        })
    }

    /// Remove an optional port from `host` (`[::1]:8080` or `localhost:8080`).
    fn strip_port(host: &str) -> &str {
        if host.starts_with('[') {
            return host.find(']').map(|end| &host[..=end]).unwrap_or(host);
        }
        match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => host,
        }
    }

    /// Return `true` if plain HTTP requests should be redirected to HTTPS.
    pub fn is_ssl_redirect(&self) -> bool {
        self.production && !self.ci && self.sslredirect
    }

    /// `Strict-Transport-Security` max-age. `0` disables the header.
    pub fn hsts_seconds(&self) -> u64 {
        if self.production && !self.ci {
            self.hstsseconds
        } else {
            0
        }
    }

    /// Return `true` if HSTS should cover subdomains.
    pub fn is_hsts_include_subdomains(&self) -> bool {
        self.hstssubdomains
    }

    /// Return `true` if cookies should only be sent over HTTPS.
    pub fn is_cookie_secure(&self) -> bool {
        self.production && !self.ci
    }

    /// Header name that a TLS terminating proxy sets to `https`, if trusted.
    pub fn proxy_ssl_header(&self) -> Option<&str> {
        (self.production && !self.ci && !self.proxysslheader.is_empty())
            .then_some(self.proxysslheader.as_str())
    }

    /// Addresses of reverse proxies that append the client address to
    /// `X-Forwarded-For`. Unparsable entries are ignored.
    pub fn trusted_proxies(&self) -> Vec<IpAddr> {
        self.trustedproxies
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .filter_map(|address| {
                address
                    .parse::<IpAddr>()
                    .map_err(|e| log::warn!("Ignoring trusted proxy '{address}': {e}"))
                    .ok()
            })
            .collect()
    }

    /// Return `true` if cross origin isolation headers should be sent.
    pub fn is_cross_origin_isolated(&self) -> bool {
        self.production
    }
}
