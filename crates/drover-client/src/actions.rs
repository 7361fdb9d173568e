//! The CKAN action client: one stateless function per API action.
//!
//! Each function issues exactly one HTTP call against `<endpoint>/<action>`
//! and returns the raw transport result; callers normalize it with
//! [`crate::normalize`]. Mutating actions POST either plain form fields or
//! a percent-encoded JSON record (see [`crate::transport`]).

use serde_json::Value;
use tracing::info;

use drover_core::{JsonMap, RawResponse};

use crate::transport::{Transport, TransportError};

type ActionResult = Result<RawResponse, TransportError>;

fn record_name(record: &JsonMap) -> &str {
    record.get("name").and_then(Value::as_str).unwrap_or("")
}

pub fn site_read<T: Transport>(transport: &T) -> ActionResult {
    transport.get("site_read", &[])
}

pub fn package_show<T: Transport>(transport: &T, dataset_id: &str) -> ActionResult {
    info!("Showing dataset {}", dataset_id);
    transport.get("package_show", &[("id", dataset_id)])
}

/// Search with a single free-text filter query, e.g. `type:report`.
pub fn package_query<T: Transport>(transport: &T, query: &str) -> ActionResult {
    info!("Searching datasets for filter query {}", query);
    transport.get("package_search", &[("fq", query)])
}

pub fn resource_show<T: Transport>(transport: &T, resource_id: &str) -> ActionResult {
    info!("Showing resource {}", resource_id);
    transport.get("resource_show", &[("id", resource_id)])
}

pub fn resource_delete<T: Transport>(transport: &T, resource_id: &str) -> ActionResult {
    info!("Deleting resource {}", resource_id);
    transport.post_form("resource_delete", &[("id", resource_id)])
}

pub fn package_delete<T: Transport>(transport: &T, dataset_id: &str) -> ActionResult {
    info!("Deleting dataset {}", dataset_id);
    transport.post_form("package_delete", &[("id", dataset_id)])
}

/// Hard-deletes a dataset that has already been soft-deleted.
pub fn dataset_purge<T: Transport>(transport: &T, dataset_id: &str) -> ActionResult {
    info!("Purging dataset {}", dataset_id);
    transport.post_form("dataset_purge", &[("id", dataset_id)])
}

pub fn package_create<T: Transport>(transport: &T, record: &JsonMap) -> ActionResult {
    info!("Creating dataset {}", record_name(record));
    transport.post_json_form("package_create", record)
}

pub fn package_update<T: Transport>(transport: &T, record: &JsonMap) -> ActionResult {
    info!("Updating dataset {}", record_name(record));
    transport.post_json_form("package_update", record)
}

pub fn resource_create<T: Transport>(transport: &T, record: &JsonMap) -> ActionResult {
    info!("Creating resource {}", record_name(record));
    transport.post_json_form("resource_create", record)
}

pub fn resource_update<T: Transport>(transport: &T, record: &JsonMap) -> ActionResult {
    info!(
        "Updating resource {}",
        record.get("id").and_then(serde_json::Value::as_str).unwrap_or("")
    );
    transport.post_json_form("resource_update", record)
}
