use thiserror::Error;

/// Workspace-wide error type.
///
/// Only user-facing validation failures and local setup failures surface as
/// `AppError`. Remote and transport failures are never raised: they are
/// folded into a failed [`crate::Outcome`] for the caller to inspect, so a
/// flaky portal cannot abort a multi-step publishing run.
///
/// # Examples
///
/// ```
/// use drover_core::AppError;
///
/// let err = AppError::MissingAttribute("notes".to_string());
/// assert!(err.is_user_error());
/// assert_eq!(err.to_string(), "Required attribute missing: notes");
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// A required record attribute was absent from the caller's input.
    #[error("Required attribute missing: {0}")]
    MissingAttribute(String),

    /// The CKAN endpoint URL or the API key was empty or unset.
    #[error("CKAN URL and/or API key not provided")]
    MissingCredentials,

    /// The CKAN endpoint URL failed validation.
    ///
    /// A valid endpoint either already carries an `/api/.../action/` path
    /// (version-tolerant) or has no path at all; query strings and fragments
    /// are rejected.
    #[error("Invalid CKAN endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP client could not be constructed.
    #[error("API client error: {0}")]
    ClientError(String),
}

impl AppError {
    /// Returns true for validation failures caused by the caller's input,
    /// as opposed to local environment or client setup problems.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingAttribute(_)
                | AppError::MissingCredentials
                | AppError::InvalidEndpoint(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_display() {
        let err = AppError::MissingAttribute("owner_org".to_string());
        assert_eq!(err.to_string(), "Required attribute missing: owner_org");
    }

    #[test]
    fn test_missing_credentials_display() {
        let err = AppError::MissingCredentials;
        assert_eq!(err.to_string(), "CKAN URL and/or API key not provided");
    }

    #[test]
    fn test_invalid_endpoint_display() {
        let err = AppError::InvalidEndpoint("https://portal/other".to_string());
        assert!(err.to_string().contains("Invalid CKAN endpoint"));
    }

    #[test]
    fn test_is_user_error() {
        assert!(AppError::MissingAttribute("name".into()).is_user_error());
        assert!(AppError::MissingCredentials.is_user_error());
        assert!(AppError::InvalidEndpoint("x".into()).is_user_error());
        assert!(!AppError::ClientError("build failed".into()).is_user_error());
    }
}
