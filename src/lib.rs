// SPDX-License-Identifier: CC0-1.0

//! schema-cache umbrella crate.
//!
//! This crate primarily serves as the workspace root and re-exports the
//! public client surface for convenience.
//!
//! All functional code lives in the workspace member crates under
//! `primitives`, `backends`, `engine`, `codecs` and `cli`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(deprecated_in_future)]
#![doc(test(attr(warn(unused))))]

pub use client::{ClientOptions, ErrorKind, Operation, RegistryClient, RegistryError};
pub use codec::{frame, unframe, Serde, SerdeFormat};
pub use config::Config;
pub use types::{Schema, SchemaReference, SchemaType, SubjectVersion, VersionSelector};

/// Miscellaneous metadata about the schema-cache workspace.
pub mod schema_cache_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
