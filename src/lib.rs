//! revmap: mappings with a consistent reverse (value-to-key) index and a
//! freezable mutation policy, plus an insertion-ordered set.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep a key->value map and its value->keys index consistent in
//!   safe, verifiable layers so each piece can be reasoned about
//!   independently.
//! - Layers:
//!   - DualIndexMap<K, V, S>: structural store owning the forward index,
//!     the bucketed reverse index, entry storage behind stable
//!     generational keys, and an optional insertion-order index. Its
//!     methods are the only code that can touch an index, so the pairing
//!     invariant is enforced by the type, not by convention.
//!   - ReverseView<'a, K, V, S>: borrowed, read-only value->keys adapter.
//!     No copying, no mutating operations; its lifetime is bounded by the
//!     map it was derived from.
//!   - RevMap<K, V, S>: public API owning a DualIndexMap plus a policy
//!     tag ({Tracked, Frozen}) and reverse cardinality ({Multi, Single})
//!     fixed at construction. Mutations are checked against the tag on
//!     every call; `freeze` consumes the map and there is no thaw.
//!   - OrderedSet<T, S>: membership index over an order vector, the same
//!     dual-index construction reduced to one key space, with set algebra
//!     and order-insensitive set equality.
//!
//! Constraints
//! - Single-threaded use per instance: no locking, no interior
//!   mutability. Exclusive mutation is `&mut self`; concurrent use from
//!   several threads requires external synchronization by the caller.
//! - Index consistency: `forward[k] == v` iff `k` is in `v`'s reverse
//!   bucket, for all keys and only those keys, at every observable point.
//!   Reverse buckets are never empty.
//! - Mutations are all-or-nothing: a failed call (frozen policy, absent
//!   key or item, rejected construction input) leaves every index exactly
//!   as it was.
//! - Each entry stores its key and value hashes; user `Hash` impls are
//!   never invoked on rehash.
//!
//! Error model
//! - One synchronous `Error` enum: `KeyNotFound`, `ItemNotFound`,
//!   `Frozen`, `InvalidConfiguration`. Absent-key reads return `None`;
//!   only mutations and bulk construction report errors.
//!
//! Notes and non-goals
//! - No persistence, no internal synchronization, no ordering beyond
//!   insertion order (arbitrary by default, insertion order opt-in).
//! - One key maps to one value; a value maps back to zero or more keys.
//!   Under `Single` cardinality the reverse lookup reports the most
//!   recently inserted key, and bulk construction rejects duplicate
//!   values instead of silently dropping an entry.
//! - Holding a `ReverseView` across a mutation is a borrow error by
//!   design; re-deriving a view is free and always observes current
//!   state.
//! - Public surface is `RevMap`, `ReverseView`, `OrderedSet`, and the
//!   configuration/error types; `DualIndexMap` is exposed for callers
//!   that want the unguarded store.

pub mod dual_index_map;
mod dual_index_proptest;
mod error;
pub mod ordered_set;
pub mod rev_map;
pub mod reverse_view;

// Public surface
pub use dual_index_map::DualIndexMap;
pub use error::Error;
pub use ordered_set::OrderedSet;
pub use rev_map::{IterationOrder, MapConfig, Policy, RevMap, ReverseCardinality};
pub use reverse_view::ReverseView;
