//! Recording fakes for the transport and object-store seams.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{Cursor, Read};
use std::rc::Rc;

use serde_json::{json, Value};

use drover_core::{JsonMap, RawResponse};
use drover_store::{ObjectInfo, ObjectStore, StoreError};

use crate::transport::{Transport, TransportError};

/// One recorded transport call.
pub(crate) struct Call {
    pub method: &'static str,
    pub action: String,
    pub fields: Vec<(String, String)>,
    pub record: Option<JsonMap>,
    pub body_len: usize,
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<Call>>,
    scripts: RefCell<HashMap<String, VecDeque<RawResponse>>>,
}

/// In-memory transport: records every call and replays scripted responses
/// per action, defaulting to a CKAN-shaped 404.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    inner: Rc<Inner>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, action: &str, status: u16, body: &str) {
        self.inner
            .scripts
            .borrow_mut()
            .entry(action.to_string())
            .or_default()
            .push_back(RawResponse {
                status,
                body: body.to_string(),
            });
    }

    pub fn respond_success(&self, action: &str, result: Value) {
        let body = json!({ "success": true, "result": result }).to_string();
        self.respond(action, 200, &body);
    }

    /// Actions called, in order.
    pub fn actions(&self) -> Vec<String> {
        self.inner
            .calls
            .borrow()
            .iter()
            .map(|call| call.action.clone())
            .collect()
    }

    pub fn with_calls<R>(&self, f: impl FnOnce(&[Call]) -> R) -> R {
        f(&self.inner.calls.borrow())
    }

    fn next(&self, action: &str) -> RawResponse {
        self.inner
            .scripts
            .borrow_mut()
            .get_mut(action)
            .and_then(VecDeque::pop_front)
            .unwrap_or(RawResponse {
                status: 404,
                body: r#"{"success": false, "error": {"message": "Not found"}}"#.to_string(),
            })
    }

    fn push(&self, call: Call) {
        self.inner.calls.borrow_mut().push(call);
    }
}

fn owned(fields: &[(&str, &str)]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Transport for FakeTransport {
    fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<RawResponse, TransportError> {
        self.push(Call {
            method: "GET",
            action: action.to_string(),
            fields: owned(params),
            record: None,
            body_len: 0,
        });
        Ok(self.next(action))
    }

    fn post_form(
        &self,
        action: &str,
        fields: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        self.push(Call {
            method: "POST",
            action: action.to_string(),
            fields: owned(fields),
            record: None,
            body_len: 0,
        });
        Ok(self.next(action))
    }

    fn post_json_form(
        &self,
        action: &str,
        record: &JsonMap,
    ) -> Result<RawResponse, TransportError> {
        self.push(Call {
            method: "POST",
            action: action.to_string(),
            fields: Vec::new(),
            record: Some(record.clone()),
            body_len: 0,
        });
        Ok(self.next(action))
    }

    fn post_multipart(
        &self,
        action: &str,
        fields: &[(&str, String)],
        _file_field: &str,
        bytes: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        self.push(Call {
            method: "MULTIPART",
            action: action.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            record: None,
            body_len: bytes.len(),
        });
        Ok(self.next(action))
    }
}

/// In-memory object store keyed by (bucket, key).
#[derive(Default)]
pub(crate) struct MemStore {
    objects: HashMap<(String, String), Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.objects
            .insert((bucket.to_string(), key.to_string()), bytes);
    }
}

impl ObjectStore for MemStore {
    fn head(&self, bucket: &str, key: &str) -> Result<ObjectInfo, StoreError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|bytes| ObjectInfo {
                name: key.rsplit('/').next().unwrap_or(key).to_string(),
                key: key.to_string(),
                size: bytes.len() as u64,
            })
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", bucket, key)))
    }

    fn reader(
        &self,
        bucket: &str,
        key: &str,
        _size: u64,
    ) -> Result<Box<dyn Read + '_>, StoreError> {
        let bytes = self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", bucket, key)))?;
        Ok(Box::new(Cursor::new(bytes.clone())))
    }
}
