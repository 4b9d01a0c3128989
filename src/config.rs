//! Client configuration

use std::sync::Arc;

/// Public endpoint of the OWIDplus LIVE API
pub const DEFAULT_BASE_URL: &str = "https://www.owid.de/plus/live-2021/api/v3";

/// Final client configuration
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    /// Base URL of the API, without a trailing slash
    pub base_url: Box<str>,
}
//
impl Config {
    /// Configuration for a service hosted at some base URL
    pub fn new(base_url: impl AsRef<str>) -> Arc<Self> {
        Arc::new(Self {
            base_url: base_url.as_ref().trim_end_matches('/').into(),
        })
    }

    /// URL of an API endpoint, e.g. "search"
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }
}
//
impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_do_not_double_slashes() {
        let config = Config::new("http://localhost:8080/api/");
        assert_eq!(config.endpoint("years"), "http://localhost:8080/api/years");
        assert_eq!(
            Config::default().endpoint("norm"),
            format!("{DEFAULT_BASE_URL}/norm")
        );
    }
}
