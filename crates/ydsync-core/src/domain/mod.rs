//! Domain entities and business logic
//!
//! This module contains the core domain types for ydsync:
//! - Newtypes for validated values (`ModifiedAt`, `RemoteDir`)
//! - Listing records for both sides of a pass and the quota snapshot
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;
pub mod records;

// Re-export commonly used types
pub use errors::DomainError;
pub use newtypes::*;
pub use records::{into_listing, DiskQuota, LocalFileRecord, RemoteFileRecord, RemoteListing};
