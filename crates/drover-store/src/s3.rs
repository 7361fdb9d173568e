//! S3 implementation of [`ObjectStore`] using synchronous ranged GETs.

use std::cmp::min;
use std::io::{self, Read};

use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use tracing::debug;

use crate::{basename, ObjectInfo, ObjectStore, StoreError};

/// Bytes fetched per ranged GET. Matches the upload chunk size so one
/// fetch feeds one uploaded part.
const RANGE_CHUNK: u64 = 5 * 1024 * 1024;

/// S3-backed object store.
///
/// Holds region and credentials; a [`Bucket`] handle is built per call.
/// Credentials come from the default provider chain (environment,
/// profile, instance metadata).
pub struct S3Store {
    region: Region,
    credentials: Credentials,
}

impl S3Store {
    pub fn new(region: Region, credentials: Credentials) -> Self {
        Self {
            region,
            credentials,
        }
    }

    /// Builds a store from the ambient AWS environment. The region comes
    /// from `AWS_REGION` when set.
    pub fn from_env() -> Result<Self, StoreError> {
        let region = std::env::var("AWS_REGION")
            .ok()
            .and_then(|r| r.parse().ok())
            .unwrap_or(Region::UsEast1);
        let credentials =
            Credentials::default().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self::new(region, credentials))
    }

    fn bucket(&self, name: &str) -> Result<Bucket, StoreError> {
        Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl ObjectStore for S3Store {
    fn head(&self, bucket: &str, key: &str) -> Result<ObjectInfo, StoreError> {
        if key.ends_with('/') || basename(key).is_empty() {
            return Err(StoreError::IsPrefix(key.to_string()));
        }

        let (head, code) = self
            .bucket(bucket)?
            .head_object(key)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match code {
            404 => return Err(StoreError::NotFound(format!("{}/{}", bucket, key))),
            200..=299 => {}
            other => {
                return Err(StoreError::Backend(format!(
                    "HEAD {}/{} returned {}",
                    bucket, key, other
                )))
            }
        }

        let size = head
            .content_length
            .filter(|len| *len >= 0)
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", bucket, key)))?
            as u64;

        Ok(ObjectInfo {
            name: basename(key).to_string(),
            key: key.to_string(),
            size,
        })
    }

    fn reader(
        &self,
        bucket: &str,
        key: &str,
        size: u64,
    ) -> Result<Box<dyn Read + '_>, StoreError> {
        let bucket = self.bucket(bucket)?;
        Ok(Box::new(RangeReader::new(bucket, key.to_string(), size)))
    }
}

/// Sequential reader over an S3 object, fetching `RANGE_CHUNK`-sized
/// ranges lazily so only one chunk is resident at a time.
struct RangeReader {
    bucket: Bucket,
    key: String,
    size: u64,
    pos: u64,
    buf: Vec<u8>,
    buf_pos: usize,
}

impl RangeReader {
    fn new(bucket: Bucket, key: String, size: u64) -> Self {
        Self {
            bucket,
            key,
            size,
            pos: 0,
            buf: Vec::new(),
            buf_pos: 0,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let end = min(self.pos + RANGE_CHUNK, self.size) - 1;
        debug!("Fetching s3 range {}-{} of {}", self.pos, end, self.key);
        let response = self
            .bucket
            .get_object_range(&self.key, self.pos, Some(end))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.buf = response.bytes().to_vec();
        self.buf_pos = 0;
        self.pos = end + 1;
        Ok(())
    }
}

impl Read for RangeReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.buf_pos >= self.buf.len() {
            if self.pos >= self.size {
                return Ok(0);
            }
            self.fill()?;
            if self.buf.is_empty() {
                return Ok(0);
            }
        }

        let n = min(out.len(), self.buf.len() - self.buf_pos);
        out[..n].copy_from_slice(&self.buf[self.buf_pos..self.buf_pos + n]);
        self.buf_pos += n;
        Ok(n)
    }
}
