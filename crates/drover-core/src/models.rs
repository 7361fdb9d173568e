//! Record aliases and typed views of CKAN payloads.
//!
//! CKAN payloads are schema-loose: a package carries arbitrary extras, and
//! portals add fields freely. drover therefore moves records around as open
//! JSON maps and only types the handful of fields it actually inspects.

use serde::Deserialize;
use serde_json::Value;

/// A CKAN record: an open JSON object.
pub type JsonMap = serde_json::Map<String, Value>;

/// Minimal typed view of a resource entry in a package's `resources` list.
///
/// Only the fields drover inspects are typed; everything else the portal
/// returns is preserved in `extras`.
///
/// # Examples
///
/// ```
/// use drover_core::ResourceRef;
///
/// let json = r#"{
///     "id": "res-1",
///     "name": "bore-logs.csv",
///     "url_type": "upload",
///     "size": 1024
/// }"#;
///
/// let resource: ResourceRef = serde_json::from_str(json).unwrap();
/// assert_eq!(resource.id, "res-1");
/// assert_eq!(resource.name, "bore-logs.csv");
/// assert!(resource.extras.contains_key("size"));
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct ResourceRef {
    /// Server-assigned resource identifier.
    pub id: String,
    /// Resource name; the matching key within a dataset.
    #[serde(default)]
    pub name: String,
    /// All other fields returned by the portal.
    #[serde(flatten)]
    pub extras: JsonMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ref_deserialization() {
        let json = r#"{"id": "abc", "name": "report.pdf", "description": "annual report"}"#;
        let resource: ResourceRef = serde_json::from_str(json).unwrap();
        assert_eq!(resource.id, "abc");
        assert_eq!(resource.name, "report.pdf");
        assert_eq!(
            resource.extras.get("description").and_then(Value::as_str),
            Some("annual report")
        );
    }

    #[test]
    fn test_resource_ref_name_defaults_empty() {
        let json = r#"{"id": "abc"}"#;
        let resource: ResourceRef = serde_json::from_str(json).unwrap();
        assert_eq!(resource.name, "");
    }
}
