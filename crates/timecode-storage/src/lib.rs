//! Object storage for the published chapter dataset.
//!
//! This crate provides:
//! - The `ObjectStore` trait the publisher writes through
//! - Google Cloud Storage uploads with service-account auth (or an emulator)
//! - A local directory store for development runs

pub mod error;
pub mod gcs;
pub mod local;
pub mod store;
pub mod token_cache;

pub use error::{StorageError, StorageResult};
pub use gcs::{GcsClient, GcsConfig};
pub use local::LocalStore;
pub use store::ObjectStore;
