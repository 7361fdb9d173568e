//! `scheme://bucket/key` object URI parsing.

use url::Url;

use crate::StoreError;

/// Splits an object URI such as `s3://my-bucket/Dev/report.pdf` into
/// `(bucket, key)`. The leading `/` of the path is dropped from the key.
///
/// # Examples
///
/// ```
/// use drover_store::parse_object_uri;
///
/// let (bucket, key) = parse_object_uri("s3://extracts/Dev/report.pdf").unwrap();
/// assert_eq!(bucket, "extracts");
/// assert_eq!(key, "Dev/report.pdf");
/// ```
pub fn parse_object_uri(uri: &str) -> Result<(String, String), StoreError> {
    let parsed = Url::parse(uri).map_err(|e| StoreError::InvalidUri(format!("{}: {}", uri, e)))?;

    let bucket = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| StoreError::InvalidUri(format!("{}: missing bucket", uri)))?
        .to_string();

    let key = parsed.path().trim_start_matches('/').to_string();
    if key.is_empty() {
        return Err(StoreError::InvalidUri(format!("{}: missing key", uri)));
    }

    Ok((bucket, key))
}
