//! frontdesk-storage
//!
//! The document store seam: query and live-subscribe primitives over
//! collections of JSON documents, with an in-memory store and an S3-backed
//! store.

pub mod client;
pub mod error;
pub mod keys;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;
