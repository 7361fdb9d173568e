//! Endpoint validation and scoped editor acquisition.

use url::Url;

use drover_core::{AppError, HttpConfig};

use crate::editor::Editor;
use crate::transport::HttpTransport;

/// A validated CKAN endpoint plus API key.
///
/// Validation happens once, at construction; [`Session::editor`] then hands
/// out an [`Editor`] bound to the canonical action URL. Dropping the editor
/// releases it; no connection state survives it.
///
/// # Examples
///
/// ```
/// use drover_client::Session;
///
/// let session = Session::new("https://portal.example.com", "my-api-key").unwrap();
/// assert_eq!(session.endpoint(), "https://portal.example.com/api/action/");
/// ```
pub struct Session {
    action_url: String,
    key: String,
    config: HttpConfig,
}

impl Session {
    pub fn new(endpoint: &str, key: &str) -> Result<Self, AppError> {
        Self::with_config(endpoint, key, HttpConfig::default())
    }

    /// Validates the endpoint and key.
    ///
    /// The endpoint must either already carry the action path, which may
    /// include an API version (starts with `/api/`, ends with `/action/`),
    /// or have no path, in which case the canonical `api/action/` path is
    /// appended. Query strings and fragments are rejected.
    pub fn with_config(endpoint: &str, key: &str, config: HttpConfig) -> Result<Self, AppError> {
        if endpoint.is_empty() || key.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        let parsed = Url::parse(endpoint)
            .map_err(|e| AppError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(AppError::InvalidEndpoint(endpoint.to_string()));
        }

        let path = parsed.path();
        let action_url = if path.starts_with("/api/") && path.ends_with("/action/") {
            parsed.as_str().to_string()
        } else if path == "/" {
            parsed
                .join("api/action/")
                .map_err(|e| AppError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?
                .to_string()
        } else {
            return Err(AppError::InvalidEndpoint(endpoint.to_string()));
        };

        Ok(Self {
            action_url,
            key: key.to_string(),
            config,
        })
    }

    /// The canonical action URL all calls are issued against.
    pub fn endpoint(&self) -> &str {
        &self.action_url
    }

    /// Acquires an editor bound to the validated endpoint.
    pub fn editor(&self) -> Result<Editor<HttpTransport>, AppError> {
        let transport = HttpTransport::new(&self.action_url, &self.key, &self.config)?;
        Ok(Editor::new(transport))
    }
}
