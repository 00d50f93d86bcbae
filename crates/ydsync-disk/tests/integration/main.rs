//! Integration tests for ydsync-disk
//!
//! Uses wiremock to simulate the Yandex Disk API and verifies end-to-end
//! behavior of the DiskClient: quota, listings, uploads and deletions.

mod common;

mod test_delete;
mod test_listing;
mod test_quota;
mod test_upload;
