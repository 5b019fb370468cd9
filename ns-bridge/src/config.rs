//! Application settings.
//!
//! Settings are read from environment variables once at startup and then
//! handed to the rest of the application through [`AppState`]. `main` loads
//! a `.env` file into the environment first, if one exists. Variable names
//! are matched case-insensitively.
//!
//! [`AppState`]: crate::tools::AppState

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;

/// Default base URL for the NS API gateway.
pub const DEFAULT_BASE_URL: &str = "https://gateway.apiportal.ns.nl";

/// Default environment name.
const DEFAULT_ENVIRONMENT: &str = "production";

/// Errors raised while loading settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API key variable is unset or empty.
    #[error("NS_API_KEY is not set")]
    MissingApiKey,

    /// The listen address could not be parsed.
    #[error("invalid NS_BRIDGE_LISTEN address: {0}")]
    InvalidListenAddr(String),
}

/// Application settings.
#[derive(Clone)]
pub struct Settings {
    /// NS API subscription key.
    pub ns_api_key: String,
    /// Base URL of the NS API gateway.
    pub ns_api_base_url: String,
    /// Deployment environment name (e.g. "production", "development").
    pub environment: String,
    /// Address for the HTTP transport. `None` means stdio.
    pub listen_addr: Option<SocketAddr>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Load settings from name/value pairs.
    ///
    /// Names match case-insensitively; an exact-case match wins.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut exact = HashMap::new();
        let mut folded = HashMap::new();
        for (name, value) in vars {
            folded
                .entry(name.to_ascii_uppercase())
                .or_insert_with(|| value.clone());
            exact.insert(name, value);
        }

        Self::from_lookup(|key| {
            exact
                .get(key)
                .or_else(|| folded.get(&key.to_ascii_uppercase()))
                .cloned()
        })
    }

    /// Load settings using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ns_api_key = lookup("NS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let ns_api_base_url = lookup("NS_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let environment = lookup("ENVIRONMENT")
            .filter(|env| !env.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let listen_addr = lookup("NS_BRIDGE_LISTEN")
            .filter(|addr| !addr.trim().is_empty())
            .map(|addr| {
                addr.trim()
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::InvalidListenAddr(addr))
            })
            .transpose()?;

        Ok(Self {
            ns_api_key,
            ns_api_base_url,
            environment,
            listen_addr,
        })
    }

    /// Whether the application runs in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("ns_api_key", &"<redacted>")
            .field("ns_api_base_url", &self.ns_api_base_url)
            .field("environment", &self.environment)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn settings_from_env() {
        let settings = settings_from(&[
            ("NS_API_KEY", "test_key_123"),
            ("NS_API_BASE_URL", "https://test.api.ns.nl"),
            ("ENVIRONMENT", "development"),
        ])
        .unwrap();

        assert_eq!(settings.ns_api_key, "test_key_123");
        assert_eq!(settings.ns_api_base_url, "https://test.api.ns.nl");
        assert_eq!(settings.environment, "development");
        assert!(settings.is_development());
        assert!(settings.listen_addr.is_none());
    }

    #[test]
    fn settings_defaults() {
        let settings = settings_from(&[("NS_API_KEY", "test_key")]).unwrap();

        assert_eq!(settings.ns_api_base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.environment, "production");
        assert!(!settings.is_development());
    }

    #[test]
    fn is_development_ignores_case() {
        let settings =
            settings_from(&[("NS_API_KEY", "k"), ("ENVIRONMENT", "production")]).unwrap();
        assert!(!settings.is_development());

        let settings =
            settings_from(&[("NS_API_KEY", "k"), ("ENVIRONMENT", "DEVELOPMENT")]).unwrap();
        assert!(settings.is_development());
    }

    #[test]
    fn missing_api_key_is_an_error() {
        assert_eq!(settings_from(&[]).unwrap_err(), ConfigError::MissingApiKey);
        assert_eq!(
            settings_from(&[("NS_API_KEY", "  ")]).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let settings = settings_from(&[
            ("NS_API_KEY", "k"),
            ("NS_API_BASE_URL", "http://localhost:8080/"),
        ])
        .unwrap();
        assert_eq!(settings.ns_api_base_url, "http://localhost:8080");
    }

    #[test]
    fn listen_addr_parses() {
        let settings =
            settings_from(&[("NS_API_KEY", "k"), ("NS_BRIDGE_LISTEN", "127.0.0.1:3000")])
                .unwrap();
        assert_eq!(settings.listen_addr, Some(([127, 0, 0, 1], 3000).into()));

        let err = settings_from(&[("NS_API_KEY", "k"), ("NS_BRIDGE_LISTEN", "nowhere")])
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidListenAddr("nowhere".to_string()));
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = settings_from(&[("NS_API_KEY", "super-secret")]).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn variable_names_ignore_case() {
        let settings = Settings::from_vars(vars(&[
            ("ns_api_key", "lower_key"),
            ("Ns_Api_Base_Url", "https://mixed.example/"),
            ("environment", "development"),
        ]))
        .unwrap();

        assert_eq!(settings.ns_api_key, "lower_key");
        assert_eq!(settings.ns_api_base_url, "https://mixed.example");
        assert!(settings.is_development());
    }

    #[test]
    fn exact_case_wins() {
        let settings =
            Settings::from_vars(vars(&[("ns_api_key", "lower"), ("NS_API_KEY", "upper")])).unwrap();
        assert_eq!(settings.ns_api_key, "upper");
    }

    #[test]
    fn settings_from_dotenv_file() {
        let file = "# local development\nNS_API_KEY=from_dotenv\nenvironment=\"development\"\n";
        let pairs = dotenvy::from_read_iter(file.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let settings = Settings::from_vars(pairs).unwrap();
        assert_eq!(settings.ns_api_key, "from_dotenv");
        assert!(settings.is_development());
    }
}
