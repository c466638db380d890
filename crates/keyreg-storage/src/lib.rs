//! # keyreg-storage
//!
//! Storage abstraction layer for keyreg using RocksDB.
//!
//! The registry depends only on the [`Storage`] and [`Batch`] traits; the
//! RocksDB implementation is the engine shipped with the workspace.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod rocksdb_impl;
pub mod traits;

pub use column_families::*;
pub use errors::{Result, StorageError};
pub use rocksdb_impl::RocksDbStorage;
pub use traits::{Batch, BatchExt, Storage};
