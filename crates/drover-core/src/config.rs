//! Configuration types for drover components.

use std::time::Duration;

/// HTTP client configuration for portal API calls.
///
/// Every request is issued exactly once; there is no retry policy. The
/// timeout is the only backstop against a hung portal.
pub struct HttpConfig {
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
