//! The dataset/resource editor: show, decide, then create/update/skip.

use serde_json::{json, Value};
use tracing::{error, info, warn};

use drover_core::{AppError, JsonMap, Outcome, Reconciler, ResourceRef};
use drover_store::{parse_object_uri, ObjectStore};

use crate::actions;
use crate::multipart;
use crate::transport::{normalize, Transport};

/// Orchestrates idempotent edits against a CKAN portal.
///
/// Obtained from a validated [`crate::Session`]. Every operation fetches
/// current state first and only writes when a delta exists, so re-running a
/// publishing job converges instead of churning the portal.
pub struct Editor<T: Transport> {
    transport: T,
}

impl<T: Transport> Editor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Connectivity and credential check.
    pub fn site_read(&self) -> Outcome {
        normalize(actions::site_read(&self.transport))
    }

    pub fn show_dataset(&self, dataset_id: &str) -> Outcome {
        normalize(actions::package_show(&self.transport, dataset_id))
    }

    pub fn show_resource(&self, resource_id: &str) -> Outcome {
        normalize(actions::resource_show(&self.transport, resource_id))
    }

    /// Field-filtered dataset search, e.g. `type:report`.
    pub fn query_datasets(&self, query: &str) -> Outcome {
        normalize(actions::package_query(&self.transport, query))
    }

    /// Creates the dataset if absent, otherwise skips or updates it.
    ///
    /// When the dataset is missing, the required attributes `name`, `notes`,
    /// `owner_org` and `extra:identifier` are validated before the create
    /// call. When it exists and `skip_existing` is false, only a record
    /// with actual field changes triggers an update; the merged record has
    /// its nested `organization` object flattened to the bare name first,
    /// because the portal rejects the markdown-formatted nested form.
    pub fn put_dataset(&self, desired: &JsonMap, skip_existing: bool) -> Result<Outcome, AppError> {
        let name = require_str(desired, "name")?;
        let shown = self.show_dataset(name);

        if !shown.ok() {
            for attr in ["name", "notes", "owner_org", "extra:identifier"] {
                if !desired.contains_key(attr) {
                    return Err(AppError::MissingAttribute(attr.to_string()));
                }
            }
            return Ok(normalize(actions::package_create(&self.transport, desired)));
        }

        if skip_existing {
            info!("Dataset {} exists, skipping", name);
            return Ok(shown);
        }

        info!("Updating newly provided attributes for dataset {}", name);
        let current = shown.result().as_object().cloned().unwrap_or_default();
        let mut reconciler = Reconciler::new();
        let delta = reconciler.reconcile(&current, Some(desired));
        if !delta.changed {
            info!("No change; update not requested");
            return Ok(shown);
        }

        let mut merged = delta.merged;
        if let Some(org_name) = merged
            .get("organization")
            .and_then(|org| org.get("name"))
            .cloned()
        {
            merged.insert("organization".to_string(), org_name);
        }
        Ok(normalize(actions::package_update(&self.transport, &merged)))
    }

    /// Deletes every resource of the dataset, then soft-deletes and purges
    /// the dataset itself (delete alone only moves it to the trash).
    ///
    /// Individual step failures are logged and swallowed; the returned
    /// value is always the terminal no-response outcome, which signals that
    /// the sequence ran to completion, NOT that every step succeeded.
    /// Callers needing per-step fidelity must consult the logs.
    pub fn delete_dataset(&self, dataset_id: &str) -> Outcome {
        info!(
            "Deleting and purging dataset {} and its resources",
            dataset_id
        );
        let shown = self.show_dataset(dataset_id);
        if shown.ok() {
            let resources = shown
                .result()
                .get("resources")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for resource in resources {
                match serde_json::from_value::<ResourceRef>(resource) {
                    Ok(resource) => {
                        normalize(actions::resource_delete(&self.transport, &resource.id));
                    }
                    Err(e) => warn!("Skipping malformed resource entry: {}", e),
                }
            }
            normalize(actions::package_delete(&self.transport, dataset_id));
            normalize(actions::dataset_purge(&self.transport, dataset_id));
        }
        Outcome::none()
    }

    /// Creates or updates a resource of dataset `desired["name"]` and
    /// streams the S3 object at `object_path` into it.
    ///
    /// Resources are matched by `desired["resource:name"]` within the
    /// dataset. When more than one remote resource carries that name the
    /// operation aborts with a warning and returns the dataset-fetch
    /// outcome unchanged rather than guessing which one to touch.
    /// A missing or prefix-like object reference is logged and yields the
    /// no-response outcome.
    pub fn put_resource_from_s3<S: ObjectStore>(
        &self,
        desired: &JsonMap,
        store: &S,
        object_path: &str,
        skip_existing: bool,
    ) -> Result<Outcome, AppError> {
        let name = require_str(desired, "name")?;
        let resource_name = require_str(desired, "resource:name")?;
        let description = require_str(desired, "resource:description")?;

        let shown = self.show_dataset(name);
        let resources = shown
            .result()
            .get("resources")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let matches: Vec<&JsonMap> = resources
            .iter()
            .filter_map(Value::as_object)
            .filter(|r| r.get("name").and_then(Value::as_str) == Some(resource_name))
            .collect();
        if matches.len() > 1 {
            warn!("Multiple resources have been matched, skipping this update...");
            return Ok(shown);
        }
        let existing = matches.first().copied();

        if let Some(existing) = existing {
            let id = existing.get("id").and_then(Value::as_str).unwrap_or("");
            if skip_existing {
                info!(
                    "Matched existing resource {} ({}), skipping...",
                    resource_name, id
                );
                return Ok(shown);
            }
            info!(
                "Matched existing resource {} ({}), updating...",
                resource_name, id
            );
        }

        let (bucket, key) = match parse_object_uri(object_path) {
            Ok(parts) => parts,
            Err(e) => {
                error!("Invalid S3 object: {}", e);
                return Ok(Outcome::none());
            }
        };
        let object = match store.head(&bucket, &key) {
            Ok(object) => object,
            Err(e) => {
                error!("Invalid S3 object: {}", e);
                return Ok(Outcome::none());
            }
        };

        let mut candidate = JsonMap::new();
        candidate.insert("package_id".to_string(), json!(name));
        candidate.insert("url".to_string(), json!(object.name));
        candidate.insert("name".to_string(), json!(resource_name));
        candidate.insert("description".to_string(), json!(description));
        candidate.insert("resource:description".to_string(), json!(description));
        candidate.insert("multipart_name".to_string(), json!(object.name));
        candidate.insert("url_type".to_string(), json!("upload"));
        candidate.insert("size".to_string(), json!(object.size));

        let response = if let Some(existing) = existing {
            let merged = Reconciler::new().reconcile(existing, Some(&candidate)).merged;
            normalize(actions::resource_update(&self.transport, &merged))
        } else {
            normalize(actions::resource_create(&self.transport, &candidate))
        };

        if response.ok() {
            let resource_id = response
                .result()
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            Ok(multipart::upload_from_store(
                &self.transport,
                store,
                &resource_id,
                &bucket,
                &object,
            ))
        } else {
            Ok(response)
        }
    }
}

fn require_str<'a>(record: &'a JsonMap, attr: &str) -> Result<&'a str, AppError> {
    record
        .get(attr)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MissingAttribute(attr.to_string()))
}
