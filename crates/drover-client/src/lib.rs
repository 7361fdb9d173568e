//! Drover Client - CKAN portal synchronization.
//!
//! This crate drives idempotent publishing against a CKAN portal:
//!
//! - [`transport`] - the HTTP collaborator seam and its reqwest implementation
//! - [`actions`] - one stateless function per CKAN API action
//! - [`editor`] - show/decide/create/update/skip orchestration
//! - [`multipart`] - the chunked cloudstorage upload driver
//! - [`session`] - endpoint validation and scoped editor acquisition
//!
//! # Overview
//!
//! A [`Session`] validates the endpoint and API key once and hands out an
//! [`Editor`]. The editor issues action calls, normalizes every raw response
//! into a [`drover_core::Outcome`], consults the reconciler to avoid no-op
//! writes, and streams S3-hosted payloads into the portal through the
//! multipart driver.

pub mod actions;
pub mod editor;
pub mod multipart;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

pub use editor::Editor;
pub use multipart::CHUNK_SIZE;
pub use session::Session;
pub use transport::{normalize, HttpTransport, Transport, TransportError};
