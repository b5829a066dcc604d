//! Stacks Store - Object store and log reader abstractions
//!
//! The install pipeline talks to two external collaborators:
//!
//! - **ObjectStore**: Get, list, create and delete objects by type coordinates
//! - **LogReader**: Stream the captured output of a worker pod
//!
//! ## In-Memory vs Remote
//!
//! The crate provides in-memory implementations suitable for development and
//! testing. A cluster-backed deployment implements the same traits against
//! the API server.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod logs;
pub mod memory;
pub mod store;

// Re-exports
pub use error::{Result, StoreError};
pub use logs::{LogReader, LogStream};
pub use memory::{InMemoryLogReader, InMemoryObjectStore};
pub use store::{ObjectKey, ObjectStore, ObjectStoreExt};
