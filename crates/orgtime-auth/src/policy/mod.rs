//! Authorization policy derived from hierarchy position.

pub mod access;

pub use access::{AccessPolicy, ListingScope};
