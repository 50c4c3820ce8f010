//! `AddressTable`: the URL-keyed record store, split by concern.

pub mod compare;
pub mod lifecycle;
pub mod mutation;
pub mod search;

pub use lifecycle::{AddressTable, WriteOptions};
pub use mutation::MergeStats;
