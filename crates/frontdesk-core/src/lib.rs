//! frontdesk-core
//!
//! Documents and the paths used to read inside them, the report field
//! mapping, queue/employee/catalog models and collection names. Nothing here
//! talks to a store.

pub mod collections;
pub mod dates;
pub mod document;
pub mod error;
pub mod mapping;
pub mod models;
pub mod path;
