//! Shared test utilities for the bucket-mirror workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each grow their own. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for local directory trees with
//!   controlled modification times
//! - [`faults`]: store and filesystem wrappers that fail on demand

pub mod faults;
pub mod tree;

pub use faults::{FailingFs, FailingStore, FsOp, StoreOp};
pub use tree::{TestTree, at};
