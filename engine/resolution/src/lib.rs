#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Resolution engine.
//!
//! Turns a lookup key into a fully populated [`types::Schema`], consulting
//! the [`index::SchemaCache`] first and the registry on a miss.
//!
//! - [`plan`] holds the pure decisions: whether a key is answered from the
//!   cache, which location an id is resolved through, and whether the
//!   resolution really produced the requested id.
//! - [`Resolver`] performs the fetches those decisions call for, inserts the
//!   results, and coalesces concurrent resolutions of the same key.
//!
//! Resolving an id is the only two-step lookup: the registry first maps the
//! id to its (subject, version) locations, then the first location is
//! fetched like any other subject/version lookup.

/// Error type shared with the client facade.
pub mod error;
mod inflight;
/// Pure resolution decisions.
pub mod plan;
mod resolver;

pub use error::{ErrorKind, Operation, RegistryError, Result};
pub use plan::{LookupKey, Plan};
pub use resolver::Resolver;
