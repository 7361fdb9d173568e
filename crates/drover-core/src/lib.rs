//! Drover Core - Domain types, response normalization, and reconciliation.
//!
//! This crate holds the pieces of drover that do not perform I/O:
//!
//! - [`outcome`] - normalized CKAN API outcomes
//! - [`reconcile`] - minimal-delta merging of desired vs. current records
//! - [`error`] - the workspace error type
//! - [`config`] - HTTP client configuration
//! - [`models`] - record aliases and typed views of CKAN payloads

pub mod config;
pub mod error;
pub mod models;
pub mod outcome;
pub mod reconcile;

pub use config::HttpConfig;
pub use error::AppError;
pub use models::{JsonMap, ResourceRef};
pub use outcome::{Outcome, RawResponse};
pub use reconcile::{reconcile, Reconciler, Reconciliation};
