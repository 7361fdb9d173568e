//! The chunked cloudstorage upload driver.
//!
//! CKAN's cloudstorage extension uploads large resource payloads in three
//! phases correlated by an opaque upload id: initiate, N part uploads, and
//! finish. The protocol looks resumable but is not; a failed run is cleaned
//! up by deleting the orphaned resource rather than resumed.

use std::io::Read;

use serde_json::{json, Value};
use tracing::{error, info, warn};

use drover_core::{JsonMap, Outcome};
use drover_store::{ObjectInfo, ObjectStore};

use crate::actions;
use crate::transport::{normalize, Transport};

/// Fixed part size for multipart uploads: 5 MiB.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Streams an object from storage into the portal resource `resource_id`.
///
/// Parts are numbered from 1 with no gaps and sent strictly one at a time.
/// A failed part upload is logged but does not halt the loop; the finish
/// call then fails server-side and triggers the compensating delete. This
/// mirrors the protocol's historical behavior (no per-part retry, no early
/// abort) and keeps call counts predictable.
///
/// When the finish call fails, a best-effort `resource_delete` removes the
/// orphaned partial resource before the failed finish outcome is returned.
pub fn upload_from_store<T: Transport, S: ObjectStore>(
    transport: &T,
    store: &S,
    resource_id: &str,
    bucket: &str,
    object: &ObjectInfo,
) -> Outcome {
    info!(
        "Uploading resource {}, size {:.1} MB from source s3://{}/{}",
        object.name,
        object.size as f64 / 1024.0 / 1024.0,
        bucket,
        object.key
    );

    let mut reader = match store.reader(bucket, &object.key, object.size) {
        Ok(reader) => reader,
        Err(e) => {
            error!("Cannot open object stream: {}", e);
            return Outcome::none();
        }
    };

    let mut initiate = JsonMap::new();
    initiate.insert("id".to_string(), json!(resource_id));
    initiate.insert("name".to_string(), json!(object.name));
    initiate.insert("size".to_string(), json!(object.size));
    let initiated = normalize(transport.post_json_form("cloudstorage_initiate_multipart", &initiate));
    if !initiated.ok() {
        return initiated;
    }
    let upload_id = match initiated.result().get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => return Outcome::from_error("multipart initiate response missing upload id"),
    };

    let mut part: u32 = 0;
    loop {
        let chunk = match read_chunk(reader.as_mut()) {
            Ok(chunk) => chunk,
            Err(e) => {
                error!("Object stream read failed after part {}: {}", part, e);
                break;
            }
        };
        if chunk.is_empty() {
            break;
        }
        part += 1;

        let fields = [
            ("uploadId", upload_id.clone()),
            ("partNumber", part.to_string()),
        ];
        let fragment = normalize(transport.post_multipart(
            "cloudstorage_upload_multipart",
            &fields,
            "upload",
            chunk,
        ));
        if fragment.ok() {
            info!("Fragment #{} uploaded", part);
        } else {
            info!(
                "{}",
                serde_json::to_string(fragment.result()).unwrap_or_default()
            );
        }
    }

    let finish = normalize(transport.post_form(
        "cloudstorage_finish_multipart",
        &[("id", resource_id), ("uploadId", &upload_id)],
    ));

    if !finish.ok() {
        warn!(
            "Multipart finish failed; deleting orphaned resource {}",
            resource_id
        );
        normalize(actions::resource_delete(transport, resource_id));
    }
    finish
}

/// Fills a chunk of up to `CHUNK_SIZE` bytes from the reader; short only
/// at end of stream.
fn read_chunk(reader: &mut dyn Read) -> std::io::Result<Vec<u8>> {
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut filled = 0;
    while filled < CHUNK_SIZE {
        let n = reader.read(&mut chunk[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    chunk.truncate(filled);
    Ok(chunk)
}
