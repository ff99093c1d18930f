use serde::Deserialize;

use crate::payload::{ELASTIC_SEND_URL, MAXIMUM_FILE_SIZE};
use crate::Error;

pub const DEFAULT_PATH: &str = "/etc/elastic-mail/elastic-mail.toml";
const ENV_PREFIX: &str = "ELASTIC_MAIL";

// Request timeout, in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Settings needed to talk to Elastic Email
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub account: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_attachment_size")]
    pub max_attachment_size: usize,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_endpoint() -> String {
    ELASTIC_SEND_URL.to_string()
}

fn default_max_attachment_size() -> usize {
    MAXIMUM_FILE_SIZE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

/// Loads settings from the filesystem and merges them with any
/// environment variables prefixed with ELASTIC_MAIL_.
///
/// The file is optional; `api_key` and `account` must come from one of the
/// two sources.
///
/// See sample config file in `resources` for valid keys.
pub fn load_config(path: Option<&str>) -> Result<Settings, Error> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path.unwrap_or(DEFAULT_PATH)).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    settings.try_deserialize::<Settings>().map_err(|e| e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE_CONFIG: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/resources",
        "/elastic-mail.toml"
    );

    #[test]
    fn load_sample() {
        let settings = load_config(Some(SAMPLE_CONFIG)).unwrap();

        assert_eq!(settings.account, "sample-account");
        assert_eq!(settings.endpoint, ELASTIC_SEND_URL);
        assert_eq!(settings.max_attachment_size, 5242880);
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_credentials() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/resources", "/missing.toml");
        let result = load_config(Some(path));

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
