//! Crate-level error type.
//!
//! All failures are synchronous and leave the structure exactly as it was
//! before the offending call; there are no partial mutations to roll back.

use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// Removal of a mapping key that is not present.
    #[error("key not found")]
    KeyNotFound,
    /// Removal of a set item that is not present.
    #[error("item not found")]
    ItemNotFound,
    /// Mutation attempted through a map whose policy is `Frozen`.
    #[error("map is frozen")]
    Frozen,
    /// Construction input contradicts the configuration (duplicate values
    /// under single reverse cardinality).
    #[error("initial entries conflict with the configured reverse cardinality")]
    InvalidConfiguration,
}
