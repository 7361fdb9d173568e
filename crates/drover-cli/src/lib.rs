//! Drover CLI - Command-line interface for CKAN publishing.
//!
//! This crate provides the `drover` binary that ties the session, editor,
//! and object store together.

pub mod config;

pub use config::{Command, Config};
