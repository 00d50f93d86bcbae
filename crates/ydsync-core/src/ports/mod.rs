//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStorage`] - Remote directory operations (list, upload, delete, quota)
//! - [`ILocalDirectory`] - Flat listing of the tracked local directory

pub mod local_directory;
pub mod remote_storage;

pub use local_directory::ILocalDirectory;
pub use remote_storage::{IRemoteStorage, OperationOutcome, StorageError};
