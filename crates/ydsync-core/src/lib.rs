//! ydsync Core - Domain logic and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `ModifiedAt`, `RemoteDir`, listing records, `DiskQuota`
//! - **Port definitions** - Traits for adapters: `IRemoteStorage`, `ILocalDirectory`
//! - **Configuration** - YAML loading, environment overrides, validation
//!
//! # Architecture
//!
//! The domain module contains pure data and normalization rules with no I/O.
//! Ports define trait interfaces that adapter crates implement. The sync
//! engine in `ydsync-sync` orchestrates both sides through these ports.

pub mod config;
pub mod domain;
pub mod ports;
