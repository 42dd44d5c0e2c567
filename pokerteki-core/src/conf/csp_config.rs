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

//! Parsing of configuration for the Content Security Policy.

use config::ConfigBuilder;
use config::ConfigError;
use config::builder::BuilderState;
use serde::{Deserialize, Serialize};

use super::AppConfigDefaults;

/// Content Security Policy directives.
///
/// Each value is a space separated source list. Empty directives are left out
/// of the policy.
#[derive(Debug, Deserialize, Serialize)]
pub struct CspConfig {
    defaultsrc: String,
    scriptsrc: String,
    stylesrc: String,
    imgsrc: String,
    fontsrc: String,
    connectsrc: String,
    framesrc: String,
    objectsrc: String,
    baseuri: String,
    // Not inherited from default-src
    frameancestors: String,
    formaction: String,
}

impl AppConfigDefaults for CspConfig {
    /// Provide defaults for this part of the configuration
    fn set_defaults<T: BuilderState>(
        config_builder: ConfigBuilder<T>,
        prefix: &str,
    ) -> Result<ConfigBuilder<T>, ConfigError> {
        config_builder
            .set_default(format!("{prefix}.defaultsrc"), "'self'")?
            .set_default(format!("{prefix}.scriptsrc"), "'self'")?
            .set_default(
                format!("{prefix}.stylesrc"),
                "'self' 'unsafe-inline' https://fonts.googleapis.com",
            )?
            .set_default(
                format!("{prefix}.imgsrc"),
                "'self' data: https://igamingpolska.pl https://tailwindcss.com",
            )?
            .set_default(format!("{prefix}.fontsrc"), "'self' https://fonts.gstatic.com")?
            .set_default(format!("{prefix}.connectsrc"), "'self'")?
            .set_default(format!("{prefix}.framesrc"), "'self'")?
            .set_default(format!("{prefix}.objectsrc"), "'none'")?
            .set_default(format!("{prefix}.baseuri"), "'self'")?
            .set_default(format!("{prefix}.frameancestors"), "'self'")?
            .set_default(format!("{prefix}.formaction"), "'self'")
    }
}

impl CspConfig {
    /// Return the value of the `Content-Security-Policy` HTTP header.
    pub fn header_value(&self) -> String {
        [
            ("default-src", &self.defaultsrc),
            ("script-src", &self.scriptsrc),
            ("style-src", &self.stylesrc),
            ("img-src", &self.imgsrc),
            ("font-src", &self.fontsrc),
            ("connect-src", &self.connectsrc),
            ("frame-src", &self.framesrc),
            ("object-src", &self.objectsrc),
            ("base-uri", &self.baseuri),
            ("frame-ancestors", &self.frameancestors),
            ("form-action", &self.formaction),
        ]
        .iter()
        .filter_map(|(directive, sources)| {
            let sources = sources.split_whitespace().collect::<Vec<_>>().join(" ");
            (!sources.is_empty()).then(|| format!("{directive} {sources}"))
        })
        .collect::<Vec<_>>()
        .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directives_are_left_out() {
        let csp = CspConfig {
            defaultsrc: "'self'".to_string(),
            scriptsrc: String::new(),
            stylesrc: "'self'   'unsafe-inline'".to_string(),
            imgsrc: String::new(),
            fontsrc: String::new(),
            connectsrc: String::new(),
            framesrc: String::new(),
            objectsrc: "'none'".to_string(),
            baseuri: String::new(),
            frameancestors: String::new(),
            formaction: String::new(),
        };
        assert_eq!(
            csp.header_value(),
            "default-src 'self'; style-src 'self' 'unsafe-inline'; object-src 'none'"
        );
    }
}
